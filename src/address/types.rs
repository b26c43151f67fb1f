//! Address data model shared by the normalizer, the parser backends and
//! the HTTP layer.

use serde::{Deserialize, Serialize};

/// Semantic address components a parser backend can tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AddressField {
    StreetNumber,
    StreetName,
    Unit,
    Municipality,
    Province,
    PostalCode,
    Orientation,
    GeneralDelivery,
}

impl AddressField {
    /// Every field, in serialization order.
    pub const ALL: [AddressField; 8] = [
        AddressField::StreetNumber,
        AddressField::StreetName,
        AddressField::Unit,
        AddressField::Municipality,
        AddressField::Province,
        AddressField::PostalCode,
        AddressField::Orientation,
        AddressField::GeneralDelivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressField::StreetNumber => "StreetNumber",
            AddressField::StreetName => "StreetName",
            AddressField::Unit => "Unit",
            AddressField::Municipality => "Municipality",
            AddressField::Province => "Province",
            AddressField::PostalCode => "PostalCode",
            AddressField::Orientation => "Orientation",
            AddressField::GeneralDelivery => "GeneralDelivery",
        }
    }
}

impl std::fmt::Display for AddressField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a parser backend: one optional value per [`AddressField`].
///
/// Absent components stay `None` all the way to the response, where they
/// serialize as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParsedAddress {
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub unit: Option<String>,
    pub municipality: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub orientation: Option<String>,
    pub general_delivery: Option<String>,
}

impl ParsedAddress {
    pub fn get(&self, field: AddressField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: AddressField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// Builder-style setter, mostly for backends and tests.
    pub fn with(mut self, field: AddressField, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    pub(crate) fn slot_mut(&mut self, field: AddressField) -> &mut Option<String> {
        match field {
            AddressField::StreetNumber => &mut self.street_number,
            AddressField::StreetName => &mut self.street_name,
            AddressField::Unit => &mut self.unit,
            AddressField::Municipality => &mut self.municipality,
            AddressField::Province => &mut self.province,
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::Orientation => &mut self.orientation,
            AddressField::GeneralDelivery => &mut self.general_delivery,
        }
    }

    fn slot(&self, field: AddressField) -> &Option<String> {
        match field {
            AddressField::StreetNumber => &self.street_number,
            AddressField::StreetName => &self.street_name,
            AddressField::Unit => &self.unit,
            AddressField::Municipality => &self.municipality,
            AddressField::Province => &self.province,
            AddressField::PostalCode => &self.postal_code,
            AddressField::Orientation => &self.orientation,
            AddressField::GeneralDelivery => &self.general_delivery,
        }
    }
}

/// Body of `POST /parse-address/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawAddressRequest {
    pub address: String,
}

/// Success payload. `address` holds the parsed fields as a JSON document
/// encoded into a string, which is the shape existing callers decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddressResponse {
    pub address: String,
}

impl AddressResponse {
    pub fn encode(parsed: &ParsedAddress) -> Result<Self, serde_json::Error> {
        Ok(Self {
            address: serde_json::to_string(parsed)?,
        })
    }

    pub fn decode(&self) -> Result<ParsedAddress, serde_json::Error> {
        serde_json::from_str(&self.address)
    }
}
