//! Record identifiers of the form `year * 10000 + n`
//!
//! Identifiers are picked before the insert and checked with a follow-up
//! existence query. Two submissions can still pick the same free key; the
//! table's primary key rejects the second insert, which surfaces as a
//! `Conflict`.

use rand::Rng;
use tracing::{debug, warn};

use maternal_care_data::repository::{Record, Repository};

use super::errors::ServiceError;

/// Candidates tried before giving up
pub const MAX_ID_ATTEMPTS: usize = 10;

/// Largest per-year sequence number
pub const MAX_SEQUENCE: i64 = 9999;

pub fn compose_id(year: i32, n: i64) -> i64 {
    i64::from(year) * 10000 + n
}

/// First and last identifier of a year
pub fn year_range(year: i32) -> (i64, i64) {
    (compose_id(year, 1), compose_id(year, MAX_SEQUENCE))
}

/// Next free identifier after the year's current maximum
///
/// Starts at `year*10000 + 1` for a year with no records and checks at most
/// `MAX_ID_ATTEMPTS` consecutive candidates.
pub async fn next_sequential_id<T: Record>(repo: &dyn Repository<T>, year: i32) -> Result<i64, ServiceError> {
    let (low, high) = year_range(year);
    let mut candidate = match repo.max_key_between(low, high).await? {
        Some(max) => max + 1,
        None => low,
    };

    for _ in 0..MAX_ID_ATTEMPTS {
        if candidate > high {
            break;
        }
        if !repo.exists(candidate).await? {
            debug!("Picked {} {}", T::KEY, candidate);
            return Ok(candidate);
        }
        candidate += 1;
    }

    warn!("No free {} left for year {}", T::KEY, year);
    Err(ServiceError::IdExhausted(format!("no free {} for year {}", T::KEY, year)))
}

/// Random free identifier within the year
pub async fn random_id<T: Record>(repo: &dyn Repository<T>, year: i32) -> Result<i64, ServiceError> {
    for attempt in 1..=MAX_ID_ATTEMPTS {
        let n = rand::thread_rng().gen_range(1..=MAX_SEQUENCE);
        let candidate = compose_id(year, n);
        if !repo.exists(candidate).await? {
            debug!("Picked {} {} on attempt {}", T::KEY, candidate, attempt);
            return Ok(candidate);
        }
    }

    warn!("{} attempts to pick a {} for year {} all collided", MAX_ID_ATTEMPTS, T::KEY, year);
    Err(ServiceError::IdExhausted(format!(
        "could not find a free {} after {} attempts",
        T::KEY,
        MAX_ID_ATTEMPTS
    )))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use maternal_care_data::models::Profile;
    use maternal_care_data::repository::{ListQuery, RepositoryError, Storage};
    use mockall::mock;

    mock! {
        pub ProfileRepo {}

        #[async_trait]
        impl Repository<Profile> for ProfileRepo {
            async fn insert(&self, record: Profile) -> Result<Profile, RepositoryError>;
            async fn update(&self, record: Profile) -> Result<Profile, RepositoryError>;
            async fn get(&self, key: i64) -> Result<Option<Profile>, RepositoryError>;
            async fn exists(&self, key: i64) -> Result<bool, RepositoryError>;
            async fn max_key_between(&self, low: i64, high: i64) -> Result<Option<i64>, RepositoryError>;
            async fn list(&self, query: ListQuery) -> Result<(Vec<Profile>, usize), RepositoryError>;
        }
    }

    #[test]
    fn test_compose_id() {
        assert_eq!(compose_id(2024, 1), 20240001);
        assert_eq!(compose_id(2024, 9999), 20249999);
        assert_eq!(year_range(2025), (20250001, 20259999));
    }

    #[tokio::test]
    async fn test_sequential_starts_at_one() {
        let storage = Storage::memory();
        let id = next_sequential_id::<Profile>(&storage, 2024).await.unwrap();
        assert_eq!(id, 20240001);
    }

    #[tokio::test]
    async fn test_sequential_skips_taken_keys() {
        let mut repo = MockProfileRepo::new();
        repo.expect_max_key_between().returning(|_, _| Ok(Some(20240041)));
        repo.expect_exists().returning(|key| Ok(key < 20240044));

        let id = next_sequential_id::<Profile>(&repo, 2024).await.unwrap();
        assert_eq!(id, 20240044);
    }

    #[tokio::test]
    async fn test_sequential_gives_up_after_ten_checks() {
        let mut repo = MockProfileRepo::new();
        repo.expect_max_key_between().returning(|_, _| Ok(Some(20240100)));
        repo.expect_exists().times(MAX_ID_ATTEMPTS).returning(|_| Ok(true));

        let result = next_sequential_id::<Profile>(&repo, 2024).await;
        assert!(matches!(result, Err(ServiceError::IdExhausted(_))));
    }

    #[tokio::test]
    async fn test_sequential_stops_at_end_of_year() {
        let mut repo = MockProfileRepo::new();
        repo.expect_max_key_between().returning(|_, _| Ok(Some(20249999)));
        repo.expect_exists().never();

        let result = next_sequential_id::<Profile>(&repo, 2024).await;
        assert!(matches!(result, Err(ServiceError::IdExhausted(_))));
    }

    #[tokio::test]
    async fn test_random_stays_within_year() {
        let mut repo = MockProfileRepo::new();
        repo.expect_exists().returning(|_| Ok(false));

        let id = random_id::<Profile>(&repo, 2024).await.unwrap();
        assert!((20240001..=20249999).contains(&id));
    }

    #[tokio::test]
    async fn test_random_retries_ten_times() {
        let mut repo = MockProfileRepo::new();
        repo.expect_exists().times(MAX_ID_ATTEMPTS).returning(|_| Ok(true));

        let result = random_id::<Profile>(&repo, 2024).await;
        assert!(matches!(result, Err(ServiceError::IdExhausted(_))));
    }

    #[tokio::test]
    async fn test_storage_errors_propagate() {
        let mut repo = MockProfileRepo::new();
        repo.expect_exists()
            .returning(|_| Err(RepositoryError::Lock("poisoned".to_string())));

        let result = random_id::<Profile>(&repo, 2024).await;
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }
}
