use chrono::{DateTime, NaiveDate, Utc};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::vehicle::VehicleSummary;

/// Booking lifecycle. Transitions are one-directional
/// (pending -> confirmed -> in_progress -> completed) except cancellation,
/// which is only reachable from `pending` or `confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn can_cancel(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub vehicle_id: ObjectId,
    pub booking_number: String,
    pub status: BookingStatus,
    pub booking_type: String,
    pub service_city: String,
    pub pickup_location: String,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub dropoff_location: Option<String>,
    pub dropoff_latitude: Option<f64>,
    pub dropoff_longitude: Option<f64>,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub estimated_duration_minutes: Option<i64>,
    pub actual_duration_minutes: Option<i64>,
    pub estimated_distance_miles: Option<f64>,
    pub actual_distance_miles: Option<f64>,
    pub is_airport_transfer: bool,
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub terminal: Option<String>,
    pub meet_and_greet: bool,
    pub flight_monitoring: bool,
    pub special_requirements: Option<String>,
    pub passenger_count: i32,
    pub estimated_price: f64,
    pub final_price: Option<f64>,
    pub gratuity_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub customer_rating: Option<i32>,
    pub customer_feedback: Option<String>,
    pub driver_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// Immutable audit-log row, appended on creation and cancellation.
#[derive(Debug, Deserialize, Serialize)]
pub struct BookingActivity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub booking_id: ObjectId,
    pub activity_type: String,
    pub description: String,
    pub performed_by_user_id: ObjectId,
    pub created_at: DateTime<Utc>,
}

/// Create-booking request body, exactly the payload the frontend wizard
/// accumulates across its four steps.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInput {
    pub vehicle_id: Option<String>,
    pub booking_type: Option<String>,
    pub service_city: Option<String>,
    pub pickup_location: Option<String>,
    pub pickup_latitude: Option<f64>,
    pub pickup_longitude: Option<f64>,
    pub dropoff_location: Option<String>,
    pub dropoff_latitude: Option<f64>,
    pub dropoff_longitude: Option<f64>,
    pub pickup_date: Option<NaiveDate>,
    pub pickup_time: Option<String>,
    pub estimated_duration: Option<i64>,
    pub estimated_distance: Option<f64>,
    pub is_airport_transfer: Option<bool>,
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub terminal: Option<String>,
    pub meet_and_greet: Option<bool>,
    pub flight_monitoring: Option<bool>,
    pub special_requirements: Option<String>,
    pub passenger_count: Option<i32>,
    pub estimated_price: Option<f64>,
}

impl BookingInput {
    /// Required-field check applied before any database access.
    pub fn validate(&self) -> Result<(), &'static str> {
        let required_present = self.vehicle_id.is_some()
            && self.booking_type.is_some()
            && self.service_city.is_some()
            && self.pickup_location.is_some()
            && self.pickup_date.is_some()
            && self.pickup_time.is_some()
            && self.estimated_price.is_some();

        if required_present {
            Ok(())
        } else {
            Err("Vehicle ID, booking type, service city, pickup location, pickup date, pickup time, and estimated price are required")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelInput {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub booking_number: String,
    pub status: BookingStatus,
    pub booking_type: String,
    pub service_city: String,
    pub pickup_location: String,
    pub dropoff_location: Option<String>,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub estimated_duration: Option<i64>,
    pub estimated_distance: Option<f64>,
    pub is_airport_transfer: bool,
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub terminal: Option<String>,
    pub meet_and_greet: bool,
    pub flight_monitoring: bool,
    pub special_requirements: Option<String>,
    pub passenger_count: i32,
    pub estimated_price: f64,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub vehicle: VehicleSummary,
}

impl BookingResponse {
    pub fn from_parts(booking: &Booking, vehicle: VehicleSummary) -> Self {
        Self {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            booking_number: booking.booking_number.clone(),
            status: booking.status,
            booking_type: booking.booking_type.clone(),
            service_city: booking.service_city.clone(),
            pickup_location: booking.pickup_location.clone(),
            dropoff_location: booking.dropoff_location.clone(),
            pickup_date: booking.pickup_date,
            pickup_time: booking.pickup_time.clone(),
            estimated_duration: booking.estimated_duration_minutes,
            estimated_distance: booking.estimated_distance_miles,
            is_airport_transfer: booking.is_airport_transfer,
            flight_number: booking.flight_number.clone(),
            airline: booking.airline.clone(),
            terminal: booking.terminal.clone(),
            meet_and_greet: booking.meet_and_greet,
            flight_monitoring: booking.flight_monitoring,
            special_requirements: booking.special_requirements.clone(),
            passenger_count: booking.passenger_count,
            estimated_price: booking.estimated_price,
            payment_status: booking.payment_status,
            created_at: booking.created_at,
            vehicle,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListItem {
    pub id: String,
    pub booking_number: String,
    pub status: BookingStatus,
    pub booking_type: String,
    pub service_city: String,
    pub pickup_location: String,
    pub dropoff_location: Option<String>,
    pub pickup_date: NaiveDate,
    pub pickup_time: String,
    pub estimated_duration: Option<i64>,
    pub estimated_distance: Option<f64>,
    pub is_airport_transfer: bool,
    pub flight_number: Option<String>,
    pub airline: Option<String>,
    pub special_requirements: Option<String>,
    pub passenger_count: i32,
    pub estimated_price: f64,
    pub final_price: Option<f64>,
    pub total_amount: Option<f64>,
    pub payment_status: PaymentStatus,
    pub customer_rating: Option<i32>,
    pub customer_feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub vehicle: Option<VehicleSummary>,
}

impl BookingListItem {
    pub fn from_parts(booking: &Booking, vehicle: Option<VehicleSummary>) -> Self {
        Self {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            booking_number: booking.booking_number.clone(),
            status: booking.status,
            booking_type: booking.booking_type.clone(),
            service_city: booking.service_city.clone(),
            pickup_location: booking.pickup_location.clone(),
            dropoff_location: booking.dropoff_location.clone(),
            pickup_date: booking.pickup_date,
            pickup_time: booking.pickup_time.clone(),
            estimated_duration: booking.estimated_duration_minutes,
            estimated_distance: booking.estimated_distance_miles,
            is_airport_transfer: booking.is_airport_transfer,
            flight_number: booking.flight_number.clone(),
            airline: booking.airline.clone(),
            special_requirements: booking.special_requirements.clone(),
            passenger_count: booking.passenger_count,
            estimated_price: booking.estimated_price,
            final_price: booking.final_price,
            total_amount: booking.total_amount,
            payment_status: booking.payment_status,
            customer_rating: booking.customer_rating,
            customer_feedback: booking.customer_feedback.clone(),
            created_at: booking.created_at,
            confirmed_at: booking.confirmed_at,
            completed_at: booking.completed_at,
            cancelled_at: booking.cancelled_at,
            vehicle,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: String,
    pub activity_type: String,
    pub description: String,
    pub performed_by_user_id: String,
    pub created_at: DateTime<Utc>,
}

impl ActivityResponse {
    pub fn from_activity(activity: &BookingActivity) -> Self {
        Self {
            id: activity.id.map(|id| id.to_hex()).unwrap_or_default(),
            activity_type: activity.activity_type.clone(),
            description: activity.description.clone(),
            performed_by_user_id: activity.performed_by_user_id.to_hex(),
            created_at: activity.created_at,
        }
    }
}

/// Full single-booking view: list fields plus actuals, pricing breakdown,
/// transition timestamps, and the activity log.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    #[serde(flatten)]
    pub base: BookingListItem,
    pub terminal: Option<String>,
    pub meet_and_greet: bool,
    pub flight_monitoring: bool,
    pub actual_duration: Option<i64>,
    pub actual_distance: Option<f64>,
    pub gratuity_amount: Option<f64>,
    pub payment_method: Option<String>,
    pub driver_notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub activities: Vec<ActivityResponse>,
}

impl BookingDetail {
    pub fn from_parts(
        booking: &Booking,
        vehicle: Option<VehicleSummary>,
        activities: Vec<ActivityResponse>,
    ) -> Self {
        Self {
            base: BookingListItem::from_parts(booking, vehicle),
            terminal: booking.terminal.clone(),
            meet_and_greet: booking.meet_and_greet,
            flight_monitoring: booking.flight_monitoring,
            actual_duration: booking.actual_duration_minutes,
            actual_distance: booking.actual_distance_miles,
            gratuity_amount: booking.gratuity_amount,
            payment_method: booking.payment_method.clone(),
            driver_notes: booking.driver_notes.clone(),
            cancellation_reason: booking.cancellation_reason.clone(),
            started_at: booking.started_at,
            activities,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledBooking {
    pub id: String,
    pub status: BookingStatus,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl CancelledBooking {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            status: booking.status,
            cancellation_reason: booking.cancellation_reason.clone(),
            cancelled_at: booking.cancelled_at,
        }
    }
}
