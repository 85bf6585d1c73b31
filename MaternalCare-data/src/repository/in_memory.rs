use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{
    ChildRecord, EducationRecord, HealthRecord, Partner, Profile, User, VisitRecord,
};
use super::errors::RepositoryError;
use super::{ListQuery, Record};

/// In-memory stand-in for one table
#[derive(Debug)]
pub struct MemoryTable<T> {
    rows: Mutex<HashMap<i64, T>>,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Record> MemoryTable<T> {
    /// Store a new row, refusing a key that is already taken
    pub fn insert(&self, record: T) -> Result<T, RepositoryError> {
        let mut rows = self.rows.lock()?;
        let key = record.key();
        if rows.contains_key(&key) {
            return Err(RepositoryError::Conflict(format!(
                "{} {} already exists in {}",
                T::KEY,
                key,
                T::TABLE
            )));
        }
        rows.insert(key, record.clone());
        Ok(record)
    }

    /// Replace an existing row
    pub fn update(&self, record: T) -> Result<T, RepositoryError> {
        let mut rows = self.rows.lock()?;
        let key = record.key();
        match rows.get_mut(&key) {
            Some(existing) => {
                *existing = record.clone();
                Ok(record)
            }
            None => Err(RepositoryError::NotFound(format!("{} {}", T::KEY, key))),
        }
    }

    pub fn get(&self, key: i64) -> Result<Option<T>, RepositoryError> {
        let rows = self.rows.lock()?;
        Ok(rows.get(&key).cloned())
    }

    pub fn exists(&self, key: i64) -> Result<bool, RepositoryError> {
        let rows = self.rows.lock()?;
        Ok(rows.contains_key(&key))
    }

    pub fn max_key_between(&self, low: i64, high: i64) -> Result<Option<i64>, RepositoryError> {
        let rows = self.rows.lock()?;
        Ok(rows.keys().copied().filter(|key| (low..=high).contains(key)).max())
    }

    /// Filter, sort and paginate the same way the SQL list query does
    pub fn list(&self, query: &ListQuery) -> Result<(Vec<T>, usize), RepositoryError> {
        let rows = self.rows.lock()?;
        let needle = query.search.as_ref().map(|term| term.trim().to_lowercase());

        let mut matching: Vec<T> = rows
            .values()
            .filter(|row| match query.parent {
                Some(parent) => row.parent_key() == Some(parent),
                None => true,
            })
            .filter(|row| match &needle {
                Some(needle) if !needle.is_empty() => row
                    .search_text()
                    .map(|text| text.to_lowercase().contains(needle.as_str()))
                    .unwrap_or(false),
                _ => true,
            })
            .cloned()
            .collect();

        matching.sort_by(T::list_order);

        // Apply pagination
        let total = matching.len();
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(total);

        let page = matching.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }
}

/// Every table kept in process memory, used when no database is configured
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    pub(crate) profiles: MemoryTable<Profile>,
    pub(crate) partners: MemoryTable<Partner>,
    pub(crate) health_records: MemoryTable<HealthRecord>,
    pub(crate) children: MemoryTable<ChildRecord>,
    pub(crate) visits: MemoryTable<VisitRecord>,
    pub(crate) education: MemoryTable<EducationRecord>,
    pub(crate) users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryDatabase {
    /// Create an empty in-memory database
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnrollmentStatus, ProgramType};
    use chrono::{NaiveDate, Utc};

    fn education(id: i64, profile_id: i64, start: NaiveDate) -> EducationRecord {
        let now = Utc::now();
        EducationRecord {
            education_id: id,
            profile_id,
            program_type: ProgramType::Als,
            institution: "Community Learning Center".to_string(),
            level_or_course: "Junior High".to_string(),
            enrollment_status: EnrollmentStatus::Enrolled,
            start_date: start,
            end_date: None,
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_insert_rejects_taken_key() {
        let table = MemoryTable::default();
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        table.insert(education(20240001, 1, start)).unwrap();

        let result = table.insert(education(20240001, 2, start));
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let table = MemoryTable::default();
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        let result = table.update(education(20240001, 1, start));
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[test]
    fn test_max_key_between_ignores_other_years() {
        let table = MemoryTable::default();
        let start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        for id in [20230042, 20240003, 20240007, 20250001] {
            table.insert(education(id, 1, start)).unwrap();
        }

        assert_eq!(table.max_key_between(20240000, 20249999).unwrap(), Some(20240007));
        assert_eq!(table.max_key_between(20260000, 20269999).unwrap(), None);
    }

    #[test]
    fn test_list_filters_by_parent_and_paginates() {
        let table = MemoryTable::default();
        for (id, day) in [(20240001, 1), (20240002, 2), (20240003, 3)] {
            let start = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
            table.insert(education(id, 7, start)).unwrap();
        }
        let other = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        table.insert(education(20240004, 8, other)).unwrap();

        let query = ListQuery {
            parent: Some(7),
            limit: Some(2),
            ..ListQuery::default()
        };
        let (page, total) = table.list(&query).unwrap();

        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|record| record.profile_id == 7));
    }
}
