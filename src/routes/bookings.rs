use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use bson::{doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;

use crate::db::mongo;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::booking::{
    ActivityResponse, Booking, BookingActivity, BookingDetail, BookingInput, BookingListItem,
    BookingResponse, BookingStatus, CancelInput, CancelledBooking, PaymentStatus,
};
use crate::models::response::ErrorResponse;
use crate::models::vehicle::{Vehicle, VehicleSummary};
use crate::services::booking_service::BookingService;

const DEFAULT_CANCELLATION_REASON: &str = "Cancelled by customer";

/// List filter for the caller's own bookings, optionally narrowed by status.
fn my_bookings_filter(user_id: ObjectId, status: Option<&str>) -> Document {
    let mut filter = doc! { "user_id": user_id };
    if let Some(status) = status {
        filter.insert("status", status);
    }
    filter
}

/// Single-booking filter pinned to the owner; another user's booking never
/// matches, so absent and not-owned collapse into the same 404.
fn owned_booking_filter(booking_id: ObjectId, user_id: ObjectId) -> Document {
    doc! { "_id": booking_id, "user_id": user_id }
}

fn cancellation_update(reason: Option<&str>, now: &str) -> Document {
    doc! {
        "$set": {
            "status": BookingStatus::Cancelled.as_str(),
            "cancellation_reason": reason.unwrap_or(DEFAULT_CANCELLATION_REASON),
            "cancelled_at": now,
            "updated_at": now
        }
    }
}

fn cancellation_description(reason: Option<&str>) -> String {
    format!(
        "Booking cancelled by customer. Reason: {}",
        reason.unwrap_or("No reason provided")
    )
}

/// Best-effort audit append; a failure is logged and never surfaced.
async fn append_activity(
    client: &Client,
    booking_id: ObjectId,
    user_id: ObjectId,
    activity_type: &str,
    description: String,
) {
    let collection = mongo::collection::<BookingActivity>(client, mongo::BOOKING_ACTIVITIES);
    let activity = BookingActivity {
        id: None,
        booking_id,
        activity_type: activity_type.to_string(),
        description,
        performed_by_user_id: user_id,
        created_at: Utc::now(),
    };

    if let Err(err) = collection.insert_one(&activity).await {
        log::error!(
            "Failed to record {} activity for booking {}: {:?}",
            activity_type,
            booking_id.to_hex(),
            err
        );
    }
}

pub async fn create_booking(
    data: web::Data<Arc<Client>>,
    input: web::Json<BookingInput>,
    auth: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    if let Err(message) = input.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(message));
    }

    // validate() guarantees the required fields below are present
    let vehicle_id = input.vehicle_id.as_deref().unwrap_or_default();
    let vehicle_id = match ObjectId::parse_str(vehicle_id) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Invalid vehicle ID format"))
        }
    };
    let pickup_date = input.pickup_date.unwrap_or_default();
    let pickup_time = input.pickup_time.clone().unwrap_or_default();

    let requested_window = match BookingService::time_window(&pickup_time, input.estimated_duration)
    {
        Some(window) => window,
        None => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Invalid pickup time format"))
        }
    };

    // Verify vehicle exists and is bookable
    let vehicles = mongo::collection::<Vehicle>(&client, mongo::VEHICLES);
    let vehicle = match vehicles
        .find_one(doc! { "_id": vehicle_id, "is_active": true, "is_available": true })
        .await
    {
        Ok(Some(vehicle)) => vehicle,
        Ok(None) => {
            return HttpResponse::NotFound()
                .json(ErrorResponse::new("Vehicle not found or not available"))
        }
        Err(err) => {
            log::error!("Vehicle lookup failed: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to create booking"));
        }
    };

    // Reject a request whose window collides with an existing confirmed or
    // in-progress booking for the same vehicle and date. A narrow window
    // between this check and the insert remains; see DESIGN.md.
    let bookings = mongo::collection::<Booking>(&client, mongo::BOOKINGS);
    let conflict_filter = doc! {
        "vehicle_id": vehicle_id,
        "pickup_date": pickup_date.to_string(),
        "status": { "$in": ["confirmed", "in_progress"] }
    };
    match bookings.find(conflict_filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Booking>>().await {
            Ok(existing) => {
                if existing
                    .iter()
                    .any(|booking| BookingService::conflicts_with(&requested_window, booking))
                {
                    return HttpResponse::Conflict().json(ErrorResponse::new(
                        "Vehicle is already booked for the requested time",
                    ));
                }
            }
            Err(err) => {
                log::error!("Failed to collect conflicting bookings: {:?}", err);
                return HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to create booking"));
            }
        },
        Err(err) => {
            log::error!("Conflict check failed: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to create booking"));
        }
    }

    let now = Utc::now();
    let mut booking = Booking {
        id: None,
        user_id: auth.user_id,
        vehicle_id,
        booking_number: BookingService::generate_booking_number(),
        status: BookingStatus::Pending,
        booking_type: input.booking_type.clone().unwrap_or_default(),
        service_city: input.service_city.clone().unwrap_or_default(),
        pickup_location: input.pickup_location.clone().unwrap_or_default(),
        pickup_latitude: input.pickup_latitude,
        pickup_longitude: input.pickup_longitude,
        dropoff_location: input.dropoff_location.clone(),
        dropoff_latitude: input.dropoff_latitude,
        dropoff_longitude: input.dropoff_longitude,
        pickup_date,
        pickup_time,
        estimated_duration_minutes: input.estimated_duration,
        actual_duration_minutes: None,
        estimated_distance_miles: input.estimated_distance,
        actual_distance_miles: None,
        is_airport_transfer: input.is_airport_transfer.unwrap_or(false),
        flight_number: input.flight_number.clone(),
        airline: input.airline.clone(),
        terminal: input.terminal.clone(),
        meet_and_greet: input.meet_and_greet.unwrap_or(false),
        flight_monitoring: input.flight_monitoring.unwrap_or(false),
        special_requirements: input.special_requirements.clone(),
        passenger_count: input.passenger_count.unwrap_or(1),
        estimated_price: input.estimated_price.unwrap_or_default(),
        final_price: None,
        gratuity_amount: None,
        total_amount: None,
        payment_status: PaymentStatus::Pending,
        payment_method: None,
        customer_rating: None,
        customer_feedback: None,
        driver_notes: None,
        cancellation_reason: None,
        created_at: now,
        updated_at: now,
        confirmed_at: None,
        started_at: None,
        completed_at: None,
        cancelled_at: None,
    };

    let booking_id = match bookings.insert_one(&booking).await {
        Ok(result) => match result.inserted_id.as_object_id() {
            Some(id) => id,
            None => {
                log::error!("Inserted booking has no ObjectId");
                return HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to create booking"));
            }
        },
        Err(err) => {
            log::error!("Booking creation failed: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to create booking"));
        }
    };
    booking.id = Some(booking_id);

    append_activity(
        &client,
        booking_id,
        auth.user_id,
        "created",
        "Booking created by customer".to_string(),
    )
    .await;

    HttpResponse::Created().json(json!({
        "message": "Booking created successfully",
        "booking": BookingResponse::from_parts(&booking, VehicleSummary::from_vehicle(&vehicle))
    }))
}

#[derive(Debug, Deserialize)]
pub struct BookingListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

pub async fn get_my_bookings(
    data: web::Data<Arc<Client>>,
    params: web::Query<BookingListParams>,
    auth: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();

    let filter = my_bookings_filter(auth.user_id, params.status.as_deref());

    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0);

    let bookings = mongo::collection::<Booking>(&client, mongo::BOOKINGS);
    let rows = match bookings
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .skip(offset)
        .limit(limit)
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<Booking>>().await {
            Ok(rows) => rows,
            Err(err) => {
                log::error!("Failed to collect bookings: {:?}", err);
                return HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to fetch bookings"));
            }
        },
        Err(err) => {
            log::error!("Failed to fetch bookings: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch bookings"));
        }
    };

    let vehicle_summaries = load_vehicle_summaries(&client, &rows).await;

    let items: Vec<BookingListItem> = rows
        .iter()
        .map(|booking| {
            let summary = vehicle_summaries.get(&booking.vehicle_id).map(VehicleSummary::with_images);
            BookingListItem::from_parts(booking, summary)
        })
        .collect();

    HttpResponse::Ok().json(json!({ "bookings": items }))
}

/// One `$in` query for every distinct vehicle referenced by the page of
/// bookings, keyed by id for the per-row join.
async fn load_vehicle_summaries(
    client: &Client,
    bookings: &[Booking],
) -> HashMap<ObjectId, Vehicle> {
    let mut ids: Vec<ObjectId> = bookings.iter().map(|b| b.vehicle_id).collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return HashMap::new();
    }

    let vehicles = mongo::collection::<Vehicle>(client, mongo::VEHICLES);
    match vehicles.find(doc! { "_id": { "$in": ids } }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Vehicle>>().await {
            Ok(found) => found
                .into_iter()
                .filter_map(|vehicle| vehicle.id.map(|id| (id, vehicle)))
                .collect(),
            Err(err) => {
                log::error!("Failed to collect booking vehicles: {:?}", err);
                HashMap::new()
            }
        },
        Err(err) => {
            log::error!("Failed to fetch booking vehicles: {:?}", err);
            HashMap::new()
        }
    }
}

pub async fn get_booking_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    auth: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();

    let booking_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Invalid booking ID format"))
        }
    };

    let bookings = mongo::collection::<Booking>(&client, mongo::BOOKINGS);

    let booking = match bookings
        .find_one(owned_booking_filter(booking_id, auth.user_id))
        .await
    {
        Ok(Some(booking)) => booking,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::new("Booking not found"))
        }
        Err(err) => {
            log::error!("Failed to fetch booking: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch booking"));
        }
    };

    let vehicles = mongo::collection::<Vehicle>(&client, mongo::VEHICLES);
    let vehicle = match vehicles.find_one(doc! { "_id": booking.vehicle_id }).await {
        Ok(vehicle) => vehicle,
        Err(err) => {
            log::error!("Failed to fetch booking vehicle: {:?}", err);
            None
        }
    };

    let activities_collection =
        mongo::collection::<BookingActivity>(&client, mongo::BOOKING_ACTIVITIES);
    let activities = match activities_collection
        .find(doc! { "booking_id": booking_id })
        .sort(doc! { "created_at": -1 })
        .await
    {
        Ok(cursor) => cursor.try_collect::<Vec<BookingActivity>>().await.unwrap_or_else(|err| {
            log::error!("Failed to collect booking activities: {:?}", err);
            Vec::new()
        }),
        Err(err) => {
            log::error!("Failed to fetch booking activities: {:?}", err);
            Vec::new()
        }
    };

    let detail = BookingDetail::from_parts(
        &booking,
        vehicle.as_ref().map(VehicleSummary::with_images),
        activities.iter().map(ActivityResponse::from_activity).collect(),
    );

    HttpResponse::Ok().json(json!({ "booking": detail }))
}

pub async fn cancel_booking(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: Option<web::Json<CancelInput>>,
    auth: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();

    let booking_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Invalid booking ID format"))
        }
    };

    let reason = input
        .and_then(|body| body.into_inner().reason)
        .filter(|reason| !reason.trim().is_empty());

    let bookings = mongo::collection::<Booking>(&client, mongo::BOOKINGS);

    let booking = match bookings
        .find_one(owned_booking_filter(booking_id, auth.user_id))
        .await
    {
        Ok(Some(booking)) => booking,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::new("Booking not found"))
        }
        Err(err) => {
            log::error!("Failed to fetch booking for cancellation: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to cancel booking"));
        }
    };

    if !booking.status.can_cancel() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Booking cannot be cancelled in its current status",
        ));
    }

    let now = Utc::now().to_rfc3339();
    let update = cancellation_update(reason.as_deref(), &now);

    let cancelled = match bookings
        .find_one_and_update(owned_booking_filter(booking_id, auth.user_id), update)
        .return_document(ReturnDocument::After)
        .await
    {
        Ok(Some(booking)) => booking,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse::new("Booking not found"))
        }
        Err(err) => {
            log::error!("Cancel booking update failed: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to cancel booking"));
        }
    };

    append_activity(
        &client,
        booking_id,
        auth.user_id,
        "cancelled",
        cancellation_description(reason.as_deref()),
    )
    .await;

    HttpResponse::Ok().json(json!({
        "message": "Booking cancelled successfully",
        "booking": CancelledBooking::from_booking(&cancelled)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_list_filter_is_scoped_to_the_caller() {
        let caller = ObjectId::new();
        let other = ObjectId::new();

        let filter = my_bookings_filter(caller, None);
        assert_eq!(filter.get_object_id("user_id").unwrap(), caller);
        assert_ne!(filter.get_object_id("user_id").unwrap(), other);

        let narrowed = my_bookings_filter(caller, Some("completed"));
        assert_eq!(narrowed.get_object_id("user_id").unwrap(), caller);
        assert_eq!(narrowed.get_str("status").unwrap(), "completed");
    }

    #[test]
    fn booking_lookup_filter_requires_ownership() {
        let booking_id = ObjectId::new();
        let owner = ObjectId::new();

        let filter = owned_booking_filter(booking_id, owner);
        assert_eq!(filter.get_object_id("_id").unwrap(), booking_id);
        assert_eq!(filter.get_object_id("user_id").unwrap(), owner);
    }

    #[test]
    fn cancellation_update_stamps_time_and_default_reason() {
        let now = Utc::now().to_rfc3339();
        let update = cancellation_update(None, &now);
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("status").unwrap(), "cancelled");
        assert_eq!(
            set.get_str("cancellation_reason").unwrap(),
            DEFAULT_CANCELLATION_REASON
        );
        assert_eq!(set.get_str("cancelled_at").unwrap(), now);
        assert_eq!(set.get_str("updated_at").unwrap(), now);
    }

    #[test]
    fn cancellation_update_keeps_customer_reason() {
        let update = cancellation_update(Some("Flight delayed"), "2025-06-01T10:00:00+00:00");
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("cancellation_reason").unwrap(), "Flight delayed");
    }

    #[test]
    fn cancellation_activity_notes_reason_presence() {
        assert_eq!(
            cancellation_description(None),
            "Booking cancelled by customer. Reason: No reason provided"
        );
        assert_eq!(
            cancellation_description(Some("Flight delayed")),
            "Booking cancelled by customer. Reason: Flight delayed"
        );
    }
}
