use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePosition {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub country_name: String,
    pub state: String,
    pub city: String,
    pub postal_code: String,
    pub street: String,
    pub house_number: String,
}

/// A single suggestion returned by the text search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodedLocation {
    pub formatted_address: String,
    #[serde(default)]
    pub address: Address,
    pub reference_position: ReferencePosition,
}

impl GeocodedLocation {
    /// Address followed by the country, as shown in suggestion lists.
    pub fn label(&self) -> String {
        if self.address.country_name.is_empty() {
            self.formatted_address.clone()
        } else {
            format!("{}, {}", self.formatted_address, self.address.country_name)
        }
    }
}

impl From<&GeocodedLocation> for geo_types::Point {
    fn from(value: &GeocodedLocation) -> Self {
        geo_types::Point::new(
            value.reference_position.longitude,
            value.reference_position.latitude,
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocationsResponse {
    #[serde(default)]
    pub locations: Vec<GeocodedLocation>,
}
