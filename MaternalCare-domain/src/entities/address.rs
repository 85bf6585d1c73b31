use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use maternal_care_data::models::Address;
use maternal_care_data::reference::{AddressArea, AddressLevel};

/// One step of the cascading selector
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressSelectRequest {
    /// Selection before this step; empty codes mean "not chosen yet"
    #[serde(default)]
    pub selection: Address,

    /// Level being changed
    pub level: AddressLevel,

    /// New code for that level; empty clears it and everything below
    #[serde(default)]
    pub code: String,
}

/// Choices available for the current selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddressOptions {
    pub regions: Vec<AddressArea>,
    /// Empty until a region is chosen
    pub provinces: Vec<AddressArea>,
    /// Empty until a province is chosen
    pub municipalities: Vec<AddressArea>,
    /// Empty until a municipality is chosen
    pub barangays: Vec<AddressArea>,
}

/// Selection after one step plus the option lists valid for it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddressSelectResponse {
    pub selection: Address,
    pub options: AddressOptions,
}
