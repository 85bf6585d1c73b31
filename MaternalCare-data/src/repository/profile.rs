use async_trait::async_trait;
use sqlx::PgPool;
use std::cmp::Ordering;

use super::in_memory::{MemoryDatabase, MemoryTable};
use super::Record;
use crate::models::{Partner, Profile};

#[async_trait]
impl Record for Profile {
    const TABLE: &'static str = "profile";
    const KEY: &'static str = "profile_id";
    const PARENT: Option<&'static str> = None;
    const SEARCH: Option<&'static str> = Some("concat_ws(' ', first_name, middle_name, last_name, suffix)");
    const ORDER_BY: &'static str = "profile_id DESC";

    fn key(&self) -> i64 {
        self.profile_id
    }

    fn parent_key(&self) -> Option<i64> {
        None
    }

    fn search_text(&self) -> Option<String> {
        Some(self.full_name())
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.profile_id.cmp(&a.profile_id)
    }

    fn table(db: &MemoryDatabase) -> &MemoryTable<Self> {
        &db.profiles
    }

    async fn pg_insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            "INSERT INTO profile
             (profile_id, first_name, middle_name, last_name, suffix, birth_date, age, civil_status,
              religion, contact_number, educational_attainment, occupation,
              region_code, province_code, municipality_code, barangay_code, street, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
             RETURNING *",
        )
        .bind(self.profile_id)
        .bind(&self.first_name)
        .bind(&self.middle_name)
        .bind(&self.last_name)
        .bind(&self.suffix)
        .bind(self.birth_date)
        .bind(self.age)
        .bind(&self.civil_status)
        .bind(&self.religion)
        .bind(&self.contact_number)
        .bind(&self.educational_attainment)
        .bind(&self.occupation)
        .bind(&self.address.region_code)
        .bind(&self.address.province_code)
        .bind(&self.address.municipality_code)
        .bind(&self.address.barangay_code)
        .bind(&self.address.street)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    async fn pg_update(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            "UPDATE profile SET
             first_name = $2, middle_name = $3, last_name = $4, suffix = $5, birth_date = $6, age = $7,
             civil_status = $8, religion = $9, contact_number = $10, educational_attainment = $11,
             occupation = $12, region_code = $13, province_code = $14, municipality_code = $15,
             barangay_code = $16, street = $17, updated_at = $18
             WHERE profile_id = $1
             RETURNING *",
        )
        .bind(self.profile_id)
        .bind(&self.first_name)
        .bind(&self.middle_name)
        .bind(&self.last_name)
        .bind(&self.suffix)
        .bind(self.birth_date)
        .bind(self.age)
        .bind(&self.civil_status)
        .bind(&self.religion)
        .bind(&self.contact_number)
        .bind(&self.educational_attainment)
        .bind(&self.occupation)
        .bind(&self.address.region_code)
        .bind(&self.address.province_code)
        .bind(&self.address.municipality_code)
        .bind(&self.address.barangay_code)
        .bind(&self.address.street)
        .bind(self.updated_at)
        .fetch_optional(pool)
        .await
    }
}

// Partners share their profile's key, so they are never listed by owner
#[async_trait]
impl Record for Partner {
    const TABLE: &'static str = "partners_info";
    const KEY: &'static str = "profile_id";
    const PARENT: Option<&'static str> = None;
    const ORDER_BY: &'static str = "profile_id DESC";

    fn key(&self) -> i64 {
        self.profile_id
    }

    fn parent_key(&self) -> Option<i64> {
        None
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        b.profile_id.cmp(&a.profile_id)
    }

    fn table(db: &MemoryDatabase) -> &MemoryTable<Self> {
        &db.partners
    }

    async fn pg_insert(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Partner>(
            "INSERT INTO partners_info
             (profile_id, first_name, middle_name, last_name, suffix, birth_date, age, civil_status,
              occupation, contact_number, educational_attainment,
              region_code, province_code, municipality_code, barangay_code, street, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING *",
        )
        .bind(self.profile_id)
        .bind(&self.first_name)
        .bind(&self.middle_name)
        .bind(&self.last_name)
        .bind(&self.suffix)
        .bind(self.birth_date)
        .bind(self.age)
        .bind(&self.civil_status)
        .bind(&self.occupation)
        .bind(&self.contact_number)
        .bind(&self.educational_attainment)
        .bind(&self.address.region_code)
        .bind(&self.address.province_code)
        .bind(&self.address.municipality_code)
        .bind(&self.address.barangay_code)
        .bind(&self.address.street)
        .bind(self.created_at)
        .bind(self.updated_at)
        .fetch_one(pool)
        .await
    }

    async fn pg_update(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Partner>(
            "UPDATE partners_info SET
             first_name = $2, middle_name = $3, last_name = $4, suffix = $5, birth_date = $6, age = $7,
             civil_status = $8, occupation = $9, contact_number = $10, educational_attainment = $11,
             region_code = $12, province_code = $13, municipality_code = $14, barangay_code = $15,
             street = $16, updated_at = $17
             WHERE profile_id = $1
             RETURNING *",
        )
        .bind(self.profile_id)
        .bind(&self.first_name)
        .bind(&self.middle_name)
        .bind(&self.last_name)
        .bind(&self.suffix)
        .bind(self.birth_date)
        .bind(self.age)
        .bind(&self.civil_status)
        .bind(&self.occupation)
        .bind(&self.contact_number)
        .bind(&self.educational_attainment)
        .bind(&self.address.region_code)
        .bind(&self.address.province_code)
        .bind(&self.address.municipality_code)
        .bind(&self.address.barangay_code)
        .bind(&self.address.street)
        .bind(self.updated_at)
        .fetch_optional(pool)
        .await
    }
}
