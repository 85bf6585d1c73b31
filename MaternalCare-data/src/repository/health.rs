use async_trait::async_trait;
use sqlx::PgPool;
use std::cmp::Ordering;

use super::in_memory::{MemoryDatabase, MemoryTable};
use super::Record;
use crate::models::{ChildRecord, HealthRecord, VisitRecord};

#[async_trait]
impl Record for HealthRecord {
    const TABLE: &'static str = "maternal_health_record";
    const KEY: &'static str = "health_id";
    const PARENT: Option<&'static str> = Some("profile_id");
    const ORDER_BY: &'static str = "created_at DESC, health_id DESC";

    fn key(&self) -> i64 {
        self.health_id
    }

    fn parent_key(&self) -> Option<i64> {
        Some(self.profile_id)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.health_id.cmp(&a.health_id))
    }

    fn table(db: &MemoryDatabase) -> &MemoryTable<Self> {
        &db.health_records
    }

    async fn pg_insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, HealthRecord>(
            "INSERT INTO maternal_health_record
             (health_id, profile_id, lmp, edd, gravida, parity, height_cm, weight_kg, systolic, diastolic,
              td_doses, td_last_dose, pregnancy_status, remarks, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING *",
        )
        .bind(self.health_id)
        .bind(self.profile_id)
        .bind(self.lmp)
        .bind(self.edd)
        .bind(self.gravida)
        .bind(self.parity)
        .bind(self.height_cm)
        .bind(self.weight_kg)
        .bind(self.systolic)
        .bind(self.diastolic)
        .bind(self.td_doses)
        .bind(self.td_last_dose)
        .bind(self.pregnancy_status.as_str())
        .bind(&self.remarks)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    async fn pg_update(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, HealthRecord>(
            "UPDATE maternal_health_record SET
             lmp = $2, edd = $3, gravida = $4, parity = $5, height_cm = $6, weight_kg = $7,
             systolic = $8, diastolic = $9, td_doses = $10, td_last_dose = $11,
             pregnancy_status = $12, remarks = $13, updated_at = $14
             WHERE health_id = $1
             RETURNING *",
        )
        .bind(self.health_id)
        .bind(self.lmp)
        .bind(self.edd)
        .bind(self.gravida)
        .bind(self.parity)
        .bind(self.height_cm)
        .bind(self.weight_kg)
        .bind(self.systolic)
        .bind(self.diastolic)
        .bind(self.td_doses)
        .bind(self.td_last_dose)
        .bind(self.pregnancy_status.as_str())
        .bind(&self.remarks)
        .bind(self.updated_at)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl Record for ChildRecord {
    const TABLE: &'static str = "child_record";
    const KEY: &'static str = "child_id";
    const PARENT: Option<&'static str> = Some("health_id");
    const ORDER_BY: &'static str = "birth_date ASC, child_id ASC";

    fn key(&self) -> i64 {
        self.child_id
    }

    fn parent_key(&self) -> Option<i64> {
        Some(self.health_id)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.birth_date
            .cmp(&b.birth_date)
            .then_with(|| a.child_id.cmp(&b.child_id))
    }

    fn table(db: &MemoryDatabase) -> &MemoryTable<Self> {
        &db.children
    }

    async fn pg_insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, ChildRecord>(
            "INSERT INTO child_record
             (child_id, health_id, first_name, last_name, sex, birth_date, birth_weight_kg,
              birth_length_cm, place_of_delivery, immunizations, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
        .bind(self.child_id)
        .bind(self.health_id)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(self.sex.as_str())
        .bind(self.birth_date)
        .bind(self.birth_weight_kg)
        .bind(self.birth_length_cm)
        .bind(&self.place_of_delivery)
        .bind(&self.immunizations)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    async fn pg_update(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ChildRecord>(
            "UPDATE child_record SET
             first_name = $2, last_name = $3, sex = $4, birth_date = $5, birth_weight_kg = $6,
             birth_length_cm = $7, place_of_delivery = $8, immunizations = $9, updated_at = $10
             WHERE child_id = $1
             RETURNING *",
        )
        .bind(self.child_id)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(self.sex.as_str())
        .bind(self.birth_date)
        .bind(self.birth_weight_kg)
        .bind(self.birth_length_cm)
        .bind(&self.place_of_delivery)
        .bind(&self.immunizations)
        .bind(self.updated_at)
        .fetch_optional(pool)
        .await
    }
}

#[async_trait]
impl Record for VisitRecord {
    const TABLE: &'static str = "prenatal_postnatal_visit";
    const KEY: &'static str = "visit_id";
    const PARENT: Option<&'static str> = Some("health_id");
    const ORDER_BY: &'static str = "visit_date ASC, visit_id ASC";

    fn key(&self) -> i64 {
        self.visit_id
    }

    fn parent_key(&self) -> Option<i64> {
        Some(self.health_id)
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.visit_date
            .cmp(&b.visit_date)
            .then_with(|| a.visit_id.cmp(&b.visit_id))
    }

    fn table(db: &MemoryDatabase) -> &MemoryTable<Self> {
        &db.visits
    }

    async fn pg_insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, VisitRecord>(
            "INSERT INTO prenatal_postnatal_visit
             (visit_id, health_id, visit_type, visit_date, weight_kg, systolic, diastolic,
              fundal_height_cm, fetal_heart_rate, attended_by, remarks, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *",
        )
        .bind(self.visit_id)
        .bind(self.health_id)
        .bind(self.visit_type.as_str())
        .bind(self.visit_date)
        .bind(self.weight_kg)
        .bind(self.systolic)
        .bind(self.diastolic)
        .bind(self.fundal_height_cm)
        .bind(self.fetal_heart_rate)
        .bind(&self.attended_by)
        .bind(&self.remarks)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    async fn pg_update(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, VisitRecord>(
            "UPDATE prenatal_postnatal_visit SET
             visit_type = $2, visit_date = $3, weight_kg = $4, systolic = $5, diastolic = $6,
             fundal_height_cm = $7, fetal_heart_rate = $8, attended_by = $9, remarks = $10, updated_at = $11
             WHERE visit_id = $1
             RETURNING *",
        )
        .bind(self.visit_id)
        .bind(self.visit_type.as_str())
        .bind(self.visit_date)
        .bind(self.weight_kg)
        .bind(self.systolic)
        .bind(self.diastolic)
        .bind(self.fundal_height_cm)
        .bind(self.fetal_heart_rate)
        .bind(&self.attended_by)
        .bind(&self.remarks)
        .bind(self.updated_at)
        .fetch_optional(pool)
        .await
    }
}
