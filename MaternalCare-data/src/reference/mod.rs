//! Static address reference dataset (region, province, municipality, barangay)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use utoipa::ToSchema;

/// Dataset compiled into the binary
const EMBEDDED_ADDRESS_DATA: &str = include_str!("address.json");

/// Errors raised while loading the reference dataset
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Failed to read address data from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid address data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Inconsistent address data: {0}")]
    Inconsistent(String),
}

/// One level of the address hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AddressLevel {
    Region,
    Province,
    Municipality,
    Barangay,
}

impl AddressLevel {
    /// Top to bottom
    pub const ALL: [AddressLevel; 4] = [
        AddressLevel::Region,
        AddressLevel::Province,
        AddressLevel::Municipality,
        AddressLevel::Barangay,
    ];

    pub fn parent(&self) -> Option<AddressLevel> {
        match self {
            AddressLevel::Region => None,
            AddressLevel::Province => Some(AddressLevel::Region),
            AddressLevel::Municipality => Some(AddressLevel::Province),
            AddressLevel::Barangay => Some(AddressLevel::Municipality),
        }
    }

    pub fn child(&self) -> Option<AddressLevel> {
        match self {
            AddressLevel::Region => Some(AddressLevel::Province),
            AddressLevel::Province => Some(AddressLevel::Municipality),
            AddressLevel::Municipality => Some(AddressLevel::Barangay),
            AddressLevel::Barangay => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressLevel::Region => "region",
            AddressLevel::Province => "province",
            AddressLevel::Municipality => "municipality",
            AddressLevel::Barangay => "barangay",
        }
    }
}

impl std::fmt::Display for AddressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named area at some level of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddressArea {
    pub code: String,
    pub name: String,
    /// Code of the enclosing area, absent for regions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
}

/// The four reference tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressDataset {
    pub regions: Vec<AddressArea>,
    pub provinces: Vec<AddressArea>,
    pub municipalities: Vec<AddressArea>,
    pub barangays: Vec<AddressArea>,
}

impl AddressDataset {
    /// The dataset shipped with the application
    pub fn embedded() -> Result<Self, ReferenceError> {
        Self::from_json(EMBEDDED_ADDRESS_DATA)
    }

    /// Load a replacement dataset with the same JSON shape
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ReferenceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dataset = Self::from_json(&raw)?;
        info!("Loaded address reference data from {}", path.display());
        Ok(dataset)
    }

    pub fn from_json(raw: &str) -> Result<Self, ReferenceError> {
        let dataset: AddressDataset = serde_json::from_str(raw)?;
        dataset.check()?;
        Ok(dataset)
    }

    /// Areas at one level
    pub fn level(&self, level: AddressLevel) -> &[AddressArea] {
        match level {
            AddressLevel::Region => &self.regions,
            AddressLevel::Province => &self.provinces,
            AddressLevel::Municipality => &self.municipalities,
            AddressLevel::Barangay => &self.barangays,
        }
    }

    /// Codes must be unique per level and every parent must exist one level up
    fn check(&self) -> Result<(), ReferenceError> {
        for level in AddressLevel::ALL {
            let mut seen = HashSet::new();
            for area in self.level(level) {
                if !seen.insert(area.code.as_str()) {
                    return Err(ReferenceError::Inconsistent(format!(
                        "duplicate {} code {}",
                        level, area.code
                    )));
                }
            }

            let parents: HashSet<&str> = match level.parent() {
                Some(parent) => self.level(parent).iter().map(|area| area.code.as_str()).collect(),
                None => continue,
            };
            for area in self.level(level) {
                let known = area
                    .parent_code
                    .as_deref()
                    .map(|code| parents.contains(code))
                    .unwrap_or(false);
                if !known {
                    return Err(ReferenceError::Inconsistent(format!(
                        "{} {} has no valid parent",
                        level, area.code
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_dataset_is_consistent() {
        let dataset = AddressDataset::embedded().unwrap();
        assert!(!dataset.regions.is_empty());
        assert!(!dataset.barangays.is_empty());

        // Codes nest by prefix
        for barangay in &dataset.barangays {
            let parent = barangay.parent_code.as_deref().unwrap();
            assert!(barangay.code.starts_with(parent));
        }
    }

    #[test]
    fn test_orphan_area_is_rejected() {
        let raw = r#"{
            "regions": [{ "code": "07", "name": "Central Visayas" }],
            "provinces": [{ "code": "0999", "name": "Nowhere", "parent_code": "09" }],
            "municipalities": [],
            "barangays": []
        }"#;

        let result = AddressDataset::from_json(raw);
        assert!(matches!(result, Err(ReferenceError::Inconsistent(_))));
    }

    #[test]
    fn test_levels_chain() {
        assert_eq!(AddressLevel::Region.child(), Some(AddressLevel::Province));
        assert_eq!(AddressLevel::Barangay.parent(), Some(AddressLevel::Municipality));
        assert_eq!(AddressLevel::Barangay.child(), None);
    }
}
