//! Cascading Region → Province → Municipality → Barangay selector

use std::collections::HashMap;
use tracing::{debug, warn};

use maternal_care_data::models::Address;
use maternal_care_data::reference::{AddressArea, AddressDataset, AddressLevel};

use super::errors::ServiceError;
use crate::entities::{AddressOptions, AddressSelectResponse};

/// Indexed view over the address reference dataset
#[derive(Debug, Clone)]
pub struct AddressDirectory {
    /// (level, code) -> area
    areas: HashMap<(AddressLevel, String), AddressArea>,
    /// (level, parent code) -> child areas in dataset order
    children: HashMap<(AddressLevel, String), Vec<AddressArea>>,
    regions: Vec<AddressArea>,
}

impl AddressDirectory {
    pub fn new(dataset: AddressDataset) -> Self {
        let mut areas = HashMap::new();
        let mut children: HashMap<(AddressLevel, String), Vec<AddressArea>> = HashMap::new();

        for level in AddressLevel::ALL {
            for area in dataset.level(level) {
                if let Some(parent) = &area.parent_code {
                    children
                        .entry((level, parent.clone()))
                        .or_default()
                        .push(area.clone());
                }
                areas.insert((level, area.code.clone()), area.clone());
            }
        }

        debug!(
            "Address directory ready: {} regions, {} areas in total",
            dataset.regions.len(),
            areas.len()
        );

        Self {
            areas,
            children,
            regions: dataset.regions,
        }
    }

    /// Directory over the dataset compiled into the binary
    pub fn embedded() -> Result<Self, ServiceError> {
        let dataset = AddressDataset::embedded()
            .map_err(|e| ServiceError::Internal(format!("embedded address data: {}", e)))?;
        Ok(Self::new(dataset))
    }

    pub fn find(&self, level: AddressLevel, code: &str) -> Option<&AddressArea> {
        self.areas.get(&(level, code.to_string()))
    }

    pub fn regions(&self) -> Vec<AddressArea> {
        self.regions.clone()
    }

    pub fn provinces(&self, region_code: &str) -> Result<Vec<AddressArea>, ServiceError> {
        self.children_of(AddressLevel::Region, region_code)
    }

    pub fn municipalities(&self, province_code: &str) -> Result<Vec<AddressArea>, ServiceError> {
        self.children_of(AddressLevel::Province, province_code)
    }

    pub fn barangays(&self, municipality_code: &str) -> Result<Vec<AddressArea>, ServiceError> {
        self.children_of(AddressLevel::Municipality, municipality_code)
    }

    /// Areas one level below `code`; unknown parents are `NotFound`
    fn children_of(&self, level: AddressLevel, code: &str) -> Result<Vec<AddressArea>, ServiceError> {
        let child_level = match level.child() {
            Some(child) => child,
            None => return Ok(Vec::new()),
        };
        if self.find(level, code).is_none() {
            return Err(ServiceError::NotFound(format!("{} {}", level, code)));
        }
        Ok(self
            .children
            .get(&(child_level, code.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    /// Set one level of a selection
    ///
    /// Every level below `level` is reset to empty. An empty `code` clears
    /// `level` as well. A code that does not belong to the currently selected
    /// parent is rejected. The street line is left alone.
    pub fn select(&self, selection: &Address, level: AddressLevel, code: &str) -> Result<AddressSelectResponse, ServiceError> {
        let code = code.trim();
        let mut next = selection.clone();

        if !code.is_empty() {
            let area = self.find(level, code).ok_or_else(|| {
                ServiceError::Validation(format!("Unknown {} code: {}", level, code))
            })?;

            if let Some(parent_level) = level.parent() {
                let parent_code = level_code(selection, parent_level);
                if parent_code.is_empty() {
                    return Err(ServiceError::Validation(format!(
                        "Select a {} before choosing a {}",
                        parent_level, level
                    )));
                }
                if area.parent_code.as_deref() != Some(parent_code) {
                    warn!("{} {} is not inside {} {}", level, code, parent_level, parent_code);
                    return Err(ServiceError::Validation(format!(
                        "{} {} does not belong to {} {}",
                        level, code, parent_level, parent_code
                    )));
                }
            }
        }

        set_level_code(&mut next, level, code.to_string());
        let mut below = level.child();
        while let Some(child) = below {
            set_level_code(&mut next, child, String::new());
            below = child.child();
        }

        let options = self.options_for(&next);
        Ok(AddressSelectResponse {
            selection: next,
            options,
        })
    }

    /// Option lists valid for a selection
    pub fn options_for(&self, selection: &Address) -> AddressOptions {
        let under = |level: AddressLevel| -> Vec<AddressArea> {
            let code = level_code(selection, level);
            if code.is_empty() {
                return Vec::new();
            }
            self.children_of(level, code).unwrap_or_default()
        };

        AddressOptions {
            regions: self.regions(),
            provinces: under(AddressLevel::Region),
            municipalities: under(AddressLevel::Province),
            barangays: under(AddressLevel::Municipality),
        }
    }

    /// All four codes present, known and correctly nested
    pub fn validate(&self, address: &Address) -> Result<(), ServiceError> {
        let mut missing = Vec::new();
        for level in AddressLevel::ALL {
            if level_code(address, level).is_empty() {
                missing.push(level.as_str());
            }
        }
        if !missing.is_empty() {
            return Err(ServiceError::Validation(format!(
                "Address is incomplete: missing {}",
                missing.join(", ")
            )));
        }

        for level in AddressLevel::ALL {
            let code = level_code(address, level);
            let area = self
                .find(level, code)
                .ok_or_else(|| ServiceError::Validation(format!("Unknown {} code: {}", level, code)))?;

            if let Some(parent_level) = level.parent() {
                let parent_code = level_code(address, parent_level);
                if area.parent_code.as_deref() != Some(parent_code) {
                    return Err(ServiceError::Validation(format!(
                        "{} {} does not belong to {} {}",
                        level, code, parent_level, parent_code
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Duplicate an address wholesale (profile → partner or partner → profile)
pub fn copy_address(source: &Address) -> Address {
    source.clone()
}

fn level_code(address: &Address, level: AddressLevel) -> &str {
    match level {
        AddressLevel::Region => &address.region_code,
        AddressLevel::Province => &address.province_code,
        AddressLevel::Municipality => &address.municipality_code,
        AddressLevel::Barangay => &address.barangay_code,
    }
}

fn set_level_code(address: &mut Address, level: AddressLevel, code: String) {
    match level {
        AddressLevel::Region => address.region_code = code,
        AddressLevel::Province => address.province_code = code,
        AddressLevel::Municipality => address.municipality_code = code,
        AddressLevel::Barangay => address.barangay_code = code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> AddressDirectory {
        AddressDirectory::embedded().unwrap()
    }

    fn cebu_city_lahug() -> Address {
        Address {
            region_code: "07".to_string(),
            province_code: "0722".to_string(),
            municipality_code: "072217".to_string(),
            barangay_code: "072217003".to_string(),
            street: Some("Purok 3".to_string()),
        }
    }

    #[test]
    fn test_lists_follow_parent_codes() {
        let directory = directory();
        let provinces = directory.provinces("07").unwrap();
        assert!(provinces.iter().all(|p| p.parent_code.as_deref() == Some("07")));
        assert!(provinces.iter().any(|p| p.code == "0722"));

        let barangays = directory.barangays("072217").unwrap();
        assert!(barangays.iter().any(|b| b.name == "Lahug"));
    }

    #[test]
    fn test_unknown_parent_is_not_found() {
        let result = directory().provinces("99");
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn test_changing_region_resets_descendants() {
        let directory = directory();
        let response = directory
            .select(&cebu_city_lahug(), AddressLevel::Region, "03")
            .unwrap();

        assert_eq!(response.selection.region_code, "03");
        assert_eq!(response.selection.province_code, "");
        assert_eq!(response.selection.municipality_code, "");
        assert_eq!(response.selection.barangay_code, "");
        assert_eq!(response.selection.street.as_deref(), Some("Purok 3"));
        assert!(response.options.provinces.iter().any(|p| p.code == "0354"));
        assert!(response.options.municipalities.is_empty());
    }

    #[test]
    fn test_changing_municipality_only_resets_barangay() {
        let directory = directory();
        let response = directory
            .select(&cebu_city_lahug(), AddressLevel::Municipality, "072230")
            .unwrap();

        assert_eq!(response.selection.province_code, "0722");
        assert_eq!(response.selection.municipality_code, "072230");
        assert_eq!(response.selection.barangay_code, "");
        assert!(response.options.barangays.iter().any(|b| b.name == "Subangdaku"));
    }

    #[test]
    fn test_empty_code_clears_level() {
        let response = directory()
            .select(&cebu_city_lahug(), AddressLevel::Province, "")
            .unwrap();

        assert_eq!(response.selection.region_code, "07");
        assert_eq!(response.selection.province_code, "");
        assert_eq!(response.selection.barangay_code, "");
    }

    #[test]
    fn test_code_outside_parent_is_rejected() {
        let result = directory().select(&cebu_city_lahug(), AddressLevel::Province, "0354");
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_child_before_parent_is_rejected() {
        let result = directory().select(&Address::default(), AddressLevel::Province, "0722");
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_validate_address() {
        let directory = directory();
        assert!(directory.validate(&cebu_city_lahug()).is_ok());

        let mut mismatched = cebu_city_lahug();
        mismatched.barangay_code = "071242001".to_string();
        assert!(directory.validate(&mismatched).is_err());

        let err = directory.validate(&Address::default()).unwrap_err();
        assert!(err.to_string().contains("missing region, province, municipality, barangay"));
    }

    #[test]
    fn test_copy_address_is_wholesale() {
        let source = cebu_city_lahug();
        assert_eq!(copy_address(&source), source);
    }
}
