use async_trait::async_trait;
use sqlx::PgPool;
use std::cmp::Ordering;

use super::in_memory::{MemoryDatabase, MemoryTable};
use super::Record;
use crate::models::EducationRecord;

#[async_trait]
impl Record for EducationRecord {
    const TABLE: &'static str = "education_and_training";
    const KEY: &'static str = "education_id";
    const PARENT: Option<&'static str> = Some("profile_id");
    const ORDER_BY: &'static str = "start_date DESC, education_id DESC";

    fn key(&self) -> i64 {
        self.education_id
    }

    fn parent_key(&self) -> Option<i64> {
        Some(self.profile_id)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.education_id.cmp(&a.education_id))
    }

    fn table(db: &MemoryDatabase) -> &MemoryTable<Self> {
        &db.education
    }

    async fn pg_insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, EducationRecord>(
            "INSERT INTO education_and_training
             (education_id, profile_id, program_type, institution, level_or_course, enrollment_status,
              start_date, end_date, remarks, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *",
        )
        .bind(self.education_id)
        .bind(self.profile_id)
        .bind(self.program_type.as_str())
        .bind(&self.institution)
        .bind(&self.level_or_course)
        .bind(self.enrollment_status.as_str())
        .bind(self.start_date)
        .bind(self.end_date)
        .bind(&self.remarks)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    async fn pg_update(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, EducationRecord>(
            "UPDATE education_and_training SET
             program_type = $2, institution = $3, level_or_course = $4, enrollment_status = $5,
             start_date = $6, end_date = $7, remarks = $8, updated_at = $9
             WHERE education_id = $1
             RETURNING *",
        )
        .bind(self.education_id)
        .bind(self.program_type.as_str())
        .bind(&self.institution)
        .bind(&self.level_or_course)
        .bind(self.enrollment_status.as_str())
        .bind(self.start_date)
        .bind(self.end_date)
        .bind(&self.remarks)
        .bind(self.updated_at)
        .fetch_optional(pool)
        .await
    }
}
