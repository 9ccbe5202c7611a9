use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct ServiceArea {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub airport_code: Option<String>,
    pub is_primary_market: bool,
    pub base_rate_multiplier: f64,
    pub minimum_fare: Option<f64>,
    pub airport_surcharge: Option<f64>,
    pub coverage_radius_miles: Option<i32>,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAreaResponse {
    pub id: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub airport_code: Option<String>,
    pub is_primary_market: bool,
    pub base_rate_multiplier: f64,
    pub minimum_fare: Option<f64>,
    pub airport_surcharge: Option<f64>,
    pub coverage_radius_miles: Option<i32>,
}

impl ServiceAreaResponse {
    pub fn from_area(area: &ServiceArea) -> Self {
        Self {
            id: area.id.map(|id| id.to_hex()).unwrap_or_default(),
            city: area.city.clone(),
            state: area.state.clone(),
            country: area.country.clone(),
            airport_code: area.airport_code.clone(),
            is_primary_market: area.is_primary_market,
            base_rate_multiplier: area.base_rate_multiplier,
            minimum_fare: area.minimum_fare,
            airport_surcharge: area.airport_surcharge,
            coverage_radius_miles: area.coverage_radius_miles,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityEntry {
    pub city: String,
    pub state: String,
    pub display_name: String,
}

impl CityEntry {
    pub fn from_area(area: &ServiceArea) -> Self {
        Self {
            city: area.city.clone(),
            state: area.state.clone(),
            display_name: format!("{}, {}", area.city, area.state),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryMarket {
    pub id: String,
    pub city: String,
    pub state: String,
    pub airport_code: Option<String>,
    pub minimum_fare: Option<f64>,
    pub coverage_radius_miles: Option<i32>,
}

impl PrimaryMarket {
    pub fn from_area(area: &ServiceArea) -> Self {
        Self {
            id: area.id.map(|id| id.to_hex()).unwrap_or_default(),
            city: area.city.clone(),
            state: area.state.clone(),
            airport_code: area.airport_code.clone(),
            minimum_fare: area.minimum_fare,
            coverage_radius_miles: area.coverage_radius_miles,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityPricing {
    pub city: String,
    pub state: String,
    pub base_rate_multiplier: f64,
    pub minimum_fare: Option<f64>,
    pub airport_surcharge: Option<f64>,
    pub coverage_radius_miles: Option<i32>,
}

impl CityPricing {
    pub fn from_area(area: &ServiceArea) -> Self {
        Self {
            city: area.city.clone(),
            state: area.state.clone(),
            base_rate_multiplier: area.base_rate_multiplier,
            minimum_fare: area.minimum_fare,
            airport_surcharge: area.airport_surcharge,
            coverage_radius_miles: area.coverage_radius_miles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_entry_builds_display_name() {
        let area = ServiceArea {
            id: Some(ObjectId::new()),
            city: "Boston".to_string(),
            state: "MA".to_string(),
            country: "USA".to_string(),
            airport_code: Some("BOS".to_string()),
            is_primary_market: true,
            base_rate_multiplier: 1.1,
            minimum_fare: Some(75.0),
            airport_surcharge: Some(15.0),
            coverage_radius_miles: Some(40),
            is_active: true,
        };

        let entry = CityEntry::from_area(&area);
        assert_eq!(entry.display_name, "Boston, MA");
    }
}
