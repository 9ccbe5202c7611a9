use std::collections::HashSet;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use futures::TryStreamExt;
use bson::{doc, oid::ObjectId, Document};
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;

use crate::db::mongo;
use crate::models::response::ErrorResponse;
use crate::models::vehicle::{AvailableVehicle, Vehicle, VehicleDetail, VehicleListItem};
use crate::models::booking::Booking;
use crate::services::booking_service::BookingService;

#[derive(Debug, Deserialize)]
pub struct VehicleListParams {
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub city: Option<String>,
    pub capacity: Option<i32>,
}

fn active_vehicle_filter(
    vehicle_type: &Option<String>,
    city: &Option<String>,
    capacity: Option<i32>,
) -> Document {
    let mut filter = doc! { "is_active": true, "is_available": true };
    if let Some(vehicle_type) = vehicle_type {
        filter.insert("type", vehicle_type.as_str());
    }
    if let Some(city) = city {
        filter.insert("location_city", city.as_str());
    }
    if let Some(capacity) = capacity {
        filter.insert("capacity", doc! { "$gte": capacity });
    }
    filter
}

pub async fn get_vehicles(
    data: web::Data<Arc<Client>>,
    params: web::Query<VehicleListParams>,
) -> impl Responder {
    let client = data.into_inner();
    let collection = mongo::collection::<Vehicle>(&client, mongo::VEHICLES);

    let filter = active_vehicle_filter(&params.vehicle_type, &params.city, params.capacity);

    match collection.find(filter).sort(doc! { "name": 1 }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Vehicle>>().await {
            Ok(vehicles) => {
                let items: Vec<VehicleListItem> =
                    vehicles.iter().map(VehicleListItem::from_vehicle).collect();
                HttpResponse::Ok().json(json!({ "vehicles": items }))
            }
            Err(err) => {
                log::error!("Failed to collect vehicles: {:?}", err);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to fetch vehicles"))
            }
        },
        Err(err) => {
            log::error!("Failed to fetch vehicles: {:?}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to fetch vehicles"))
        }
    }
}

pub async fn get_vehicle_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();

    let vehicle_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Invalid vehicle ID format"))
        }
    };

    let collection = mongo::collection::<Vehicle>(&client, mongo::VEHICLES);

    match collection
        .find_one(doc! { "_id": vehicle_id, "is_active": true })
        .await
    {
        Ok(Some(vehicle)) => {
            HttpResponse::Ok().json(json!({ "vehicle": VehicleDetail::from_vehicle(&vehicle) }))
        }
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new("Vehicle not found")),
        Err(err) => {
            log::error!("Failed to fetch vehicle: {:?}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to fetch vehicle"))
        }
    }
}

pub async fn get_vehicle_types(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection = mongo::collection::<Vehicle>(&client, mongo::VEHICLES);

    match collection
        .distinct("type", doc! { "is_active": true })
        .await
    {
        Ok(types) => {
            let types: Vec<String> = types
                .into_iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect();
            HttpResponse::Ok().json(json!({ "types": types }))
        }
        Err(err) => {
            log::error!("Failed to fetch vehicle types: {:?}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch vehicle types"))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInput {
    pub pickup_date: Option<NaiveDate>,
    pub pickup_time: Option<String>,
    pub service_city: Option<String>,
    pub vehicle_type: Option<String>,
    pub capacity: Option<i32>,
    pub estimated_duration: Option<i64>,
}

/// Availability is time-range aware: a vehicle is excluded only when a
/// confirmed or in-progress booking on the requested date occupies a window
/// that overlaps the requested one.
pub async fn check_availability(
    data: web::Data<Arc<Client>>,
    input: web::Json<AvailabilityInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    let (pickup_date, pickup_time, service_city) =
        match (&input.pickup_date, &input.pickup_time, &input.service_city) {
            (Some(date), Some(time), Some(city)) => (*date, time.clone(), city.clone()),
            _ => {
                return HttpResponse::BadRequest().json(ErrorResponse::new(
                    "Pickup date, time, and service city are required",
                ))
            }
        };

    let requested_window =
        match BookingService::time_window(&pickup_time, input.estimated_duration) {
            Some(window) => window,
            None => {
                return HttpResponse::BadRequest()
                    .json(ErrorResponse::new("Invalid pickup time format"))
            }
        };

    let vehicles_collection = mongo::collection::<Vehicle>(&client, mongo::VEHICLES);
    let filter = active_vehicle_filter(&input.vehicle_type, &Some(service_city), input.capacity);

    let vehicles = match vehicles_collection.find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Vehicle>>().await {
            Ok(vehicles) => vehicles,
            Err(err) => {
                log::error!("Failed to collect vehicles for availability: {:?}", err);
                return HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to check availability"));
            }
        },
        Err(err) => {
            log::error!("Failed to fetch vehicles for availability: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to check availability"));
        }
    };

    if vehicles.is_empty() {
        return HttpResponse::Ok().json(json!({ "availableVehicles": [] }));
    }

    let bookings_collection = mongo::collection::<Booking>(&client, mongo::BOOKINGS);
    let booking_filter = doc! {
        "pickup_date": pickup_date.to_string(),
        "status": { "$in": ["confirmed", "in_progress"] }
    };

    let bookings = match bookings_collection.find(booking_filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Booking>>().await {
            Ok(bookings) => bookings,
            Err(err) => {
                log::error!("Failed to collect bookings for availability: {:?}", err);
                return HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to check availability"));
            }
        },
        Err(err) => {
            log::error!("Failed to fetch bookings for availability: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to check availability"));
        }
    };

    let booked: HashSet<ObjectId> = BookingService::booked_vehicle_ids(&requested_window, &bookings);

    let available: Vec<AvailableVehicle> = vehicles
        .iter()
        .filter(|vehicle| vehicle.id.map(|id| !booked.contains(&id)).unwrap_or(false))
        .map(AvailableVehicle::from_vehicle)
        .collect();

    HttpResponse::Ok().json(json!({ "availableVehicles": available }))
}
