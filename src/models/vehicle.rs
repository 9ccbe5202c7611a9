use chrono::{DateTime, Utc};
use bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Vehicle {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub capacity: i32,
    pub color: Option<String>,
    pub license_plate: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub features: Option<Document>,
    pub base_hourly_rate: f64,
    pub base_distance_rate: f64,
    pub airport_transfer_rate: Option<f64>,
    pub minimum_booking_hours: Option<i32>,
    pub image_urls: Option<Vec<String>>,
    pub is_active: bool,
    pub is_available: bool,
    pub location_city: String,
    pub location_state: Option<String>,
    pub mileage: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Trimmed view embedded in booking responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

impl VehicleSummary {
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: vehicle.name.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            image_urls: None,
        }
    }

    pub fn with_images(vehicle: &Vehicle) -> Self {
        Self {
            image_urls: Some(vehicle.image_urls.clone().unwrap_or_default()),
            ..Self::from_vehicle(vehicle)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub capacity: i32,
    pub color: Option<String>,
    pub features: Document,
    pub base_hourly_rate: f64,
    pub base_distance_rate: f64,
    pub airport_transfer_rate: Option<f64>,
    pub minimum_booking_hours: Option<i32>,
    pub image_urls: Vec<String>,
    pub location_city: String,
    pub location_state: Option<String>,
}

impl VehicleListItem {
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: vehicle.name.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            capacity: vehicle.capacity,
            color: vehicle.color.clone(),
            features: vehicle.features.clone().unwrap_or_default(),
            base_hourly_rate: vehicle.base_hourly_rate,
            base_distance_rate: vehicle.base_distance_rate,
            airport_transfer_rate: vehicle.airport_transfer_rate,
            minimum_booking_hours: vehicle.minimum_booking_hours,
            image_urls: vehicle.image_urls.clone().unwrap_or_default(),
            location_city: vehicle.location_city.clone(),
            location_state: vehicle.location_state.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetail {
    #[serde(flatten)]
    pub base: VehicleListItem,
    pub license_plate: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub is_available: bool,
    pub mileage: Option<i32>,
}

impl VehicleDetail {
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            base: VehicleListItem::from_vehicle(vehicle),
            license_plate: vehicle.license_plate.clone(),
            fuel_type: vehicle.fuel_type.clone(),
            transmission: vehicle.transmission.clone(),
            is_available: vehicle.is_available,
            mileage: vehicle.mileage,
        }
    }
}

/// Row returned by the availability check.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableVehicle {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub brand: String,
    pub model: String,
    pub capacity: i32,
    pub base_hourly_rate: f64,
    pub base_distance_rate: f64,
    pub airport_transfer_rate: Option<f64>,
    pub image_urls: Vec<String>,
}

impl AvailableVehicle {
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: vehicle.name.clone(),
            vehicle_type: vehicle.vehicle_type.clone(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            capacity: vehicle.capacity,
            base_hourly_rate: vehicle.base_hourly_rate,
            base_distance_rate: vehicle.base_distance_rate,
            airport_transfer_rate: vehicle.airport_transfer_rate,
            image_urls: vehicle.image_urls.clone().unwrap_or_default(),
        }
    }
}
