use sqlx::PgPool;
use tracing::info;

use super::DatabaseError;

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    email VARCHAR(254) NOT NULL UNIQUE,
    full_name VARCHAR(200) NOT NULL,
    password_hash TEXT NOT NULL,
    role VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)";

const CREATE_PROFILE: &str = "CREATE TABLE IF NOT EXISTS profile (
    profile_id BIGINT PRIMARY KEY,
    first_name VARCHAR(100) NOT NULL,
    middle_name VARCHAR(100),
    last_name VARCHAR(100) NOT NULL,
    suffix VARCHAR(20),
    birth_date DATE NOT NULL,
    age INTEGER NOT NULL,
    civil_status VARCHAR(30) NOT NULL,
    religion VARCHAR(100),
    contact_number VARCHAR(30),
    educational_attainment VARCHAR(100) NOT NULL,
    occupation VARCHAR(100),
    region_code VARCHAR(20) NOT NULL,
    province_code VARCHAR(20) NOT NULL,
    municipality_code VARCHAR(20) NOT NULL,
    barangay_code VARCHAR(20) NOT NULL,
    street TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const CREATE_PARTNERS_INFO: &str = "CREATE TABLE IF NOT EXISTS partners_info (
    profile_id BIGINT PRIMARY KEY REFERENCES profile (profile_id),
    first_name VARCHAR(100) NOT NULL,
    middle_name VARCHAR(100),
    last_name VARCHAR(100) NOT NULL,
    suffix VARCHAR(20),
    birth_date DATE NOT NULL,
    age INTEGER NOT NULL,
    civil_status VARCHAR(30) NOT NULL,
    occupation VARCHAR(100),
    contact_number VARCHAR(30),
    educational_attainment VARCHAR(100) NOT NULL,
    region_code VARCHAR(20) NOT NULL,
    province_code VARCHAR(20) NOT NULL,
    municipality_code VARCHAR(20) NOT NULL,
    barangay_code VARCHAR(20) NOT NULL,
    street TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const CREATE_MATERNAL_HEALTH_RECORD: &str = "CREATE TABLE IF NOT EXISTS maternal_health_record (
    health_id BIGINT PRIMARY KEY,
    profile_id BIGINT NOT NULL REFERENCES profile (profile_id),
    lmp DATE,
    edd DATE,
    gravida INTEGER NOT NULL,
    parity INTEGER NOT NULL,
    height_cm DOUBLE PRECISION,
    weight_kg DOUBLE PRECISION,
    systolic INTEGER,
    diastolic INTEGER,
    td_doses INTEGER NOT NULL DEFAULT 0,
    td_last_dose DATE,
    pregnancy_status VARCHAR(20) NOT NULL,
    remarks TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const CREATE_CHILD_RECORD: &str = "CREATE TABLE IF NOT EXISTS child_record (
    child_id BIGINT PRIMARY KEY,
    health_id BIGINT NOT NULL REFERENCES maternal_health_record (health_id),
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    sex VARCHAR(10) NOT NULL,
    birth_date DATE NOT NULL,
    birth_weight_kg DOUBLE PRECISION,
    birth_length_cm DOUBLE PRECISION,
    place_of_delivery VARCHAR(200),
    immunizations TEXT[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const CREATE_VISIT: &str = "CREATE TABLE IF NOT EXISTS prenatal_postnatal_visit (
    visit_id BIGINT PRIMARY KEY,
    health_id BIGINT NOT NULL REFERENCES maternal_health_record (health_id),
    visit_type VARCHAR(20) NOT NULL,
    visit_date DATE NOT NULL,
    weight_kg DOUBLE PRECISION,
    systolic INTEGER,
    diastolic INTEGER,
    fundal_height_cm DOUBLE PRECISION,
    fetal_heart_rate INTEGER,
    attended_by VARCHAR(200),
    remarks TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const CREATE_EDUCATION: &str = "CREATE TABLE IF NOT EXISTS education_and_training (
    education_id BIGINT PRIMARY KEY,
    profile_id BIGINT NOT NULL REFERENCES profile (profile_id),
    program_type VARCHAR(20) NOT NULL,
    institution VARCHAR(200) NOT NULL,
    level_or_course VARCHAR(200) NOT NULL,
    enrollment_status VARCHAR(20) NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE,
    remarks TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const INDEXES: [&str; 5] = [
    "CREATE INDEX IF NOT EXISTS idx_health_record_profile ON maternal_health_record (profile_id)",
    "CREATE INDEX IF NOT EXISTS idx_child_record_health ON child_record (health_id)",
    "CREATE INDEX IF NOT EXISTS idx_visit_health ON prenatal_postnatal_visit (health_id, visit_date)",
    "CREATE INDEX IF NOT EXISTS idx_education_profile ON education_and_training (profile_id)",
    "CREATE INDEX IF NOT EXISTS idx_profile_name ON profile (last_name, first_name)",
];

/// Run PostgreSQL database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    info!("Running PostgreSQL migrations");

    // Order matters: referenced tables first
    let tables = [
        ("users", CREATE_USERS),
        ("profile", CREATE_PROFILE),
        ("partners_info", CREATE_PARTNERS_INFO),
        ("maternal_health_record", CREATE_MATERNAL_HEALTH_RECORD),
        ("child_record", CREATE_CHILD_RECORD),
        ("prenatal_postnatal_visit", CREATE_VISIT),
        ("education_and_training", CREATE_EDUCATION),
    ];

    for (name, ddl) in tables {
        info!("Creating {} table if not exists", name);
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(format!("{}: {}", name, e)))?;
    }

    for ddl in INDEXES {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;
    }

    info!("PostgreSQL migrations completed successfully");
    Ok(())
}
