use std::collections::HashSet;

use chrono::{NaiveTime, Timelike, Utc};
use bson::oid::ObjectId;
use rand::Rng;

use crate::models::booking::Booking;

/// Assumed ride length when a booking carries no duration estimate.
pub const DEFAULT_DURATION_MINUTES: i64 = 120;

const BOOKING_NUMBER_PREFIX: &str = "EL";
const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Half-open occupancy window on one service day, in minutes from midnight.
/// The end may run past 1440 when a ride crosses midnight; comparisons stay
/// in plain minutes so late windows never wrap onto the morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

pub struct BookingService;

impl BookingService {
    /// Human-readable booking number: `EL` + low 6 digits of Unix-time
    /// milliseconds + 3 random uppercase base-36 characters.
    pub fn generate_booking_number() -> String {
        let millis = Utc::now().timestamp_millis();
        let suffix: String = {
            let mut rng = rand::thread_rng();
            (0..3)
                .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
                .collect()
        };
        format!("{}{:06}{}", BOOKING_NUMBER_PREFIX, millis % 1_000_000, suffix)
    }

    /// Parses a wall-clock pickup time. Accepts `HH:MM` and `HH:MM:SS`.
    pub fn parse_pickup_time(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .ok()
    }

    pub fn time_window(pickup_time: &str, duration_minutes: Option<i64>) -> Option<TimeWindow> {
        let time = Self::parse_pickup_time(pickup_time)?;
        let start = (time.hour() as i64) * 60 + time.minute() as i64;
        let duration = duration_minutes
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_DURATION_MINUTES);
        Some(TimeWindow {
            start,
            end: start + duration,
        })
    }

    /// Whether an existing booking occupies any part of the requested window.
    /// A booking whose stored pickup time cannot be parsed blocks the whole
    /// day rather than silently vanishing from the conflict set.
    pub fn conflicts_with(requested: &TimeWindow, booking: &Booking) -> bool {
        match Self::time_window(&booking.pickup_time, booking.estimated_duration_minutes) {
            Some(window) => requested.overlaps(&window),
            None => true,
        }
    }

    /// Vehicle ids occupied during the requested window, from the same-date
    /// confirmed/in-progress bookings the caller already fetched.
    pub fn booked_vehicle_ids(requested: &TimeWindow, bookings: &[Booking]) -> HashSet<ObjectId> {
        bookings
            .iter()
            .filter(|booking| Self::conflicts_with(requested, booking))
            .map(|booking| booking.vehicle_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{BookingStatus, PaymentStatus};
    use chrono::NaiveDate;
    use regex::Regex;

    fn booking_at(pickup_time: &str, duration: Option<i64>, vehicle_id: ObjectId) -> Booking {
        Booking {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            vehicle_id,
            booking_number: BookingService::generate_booking_number(),
            status: BookingStatus::Confirmed,
            booking_type: "hourly".to_string(),
            service_city: "New York".to_string(),
            pickup_location: "432 Park Ave".to_string(),
            pickup_latitude: None,
            pickup_longitude: None,
            dropoff_location: None,
            dropoff_latitude: None,
            dropoff_longitude: None,
            pickup_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            pickup_time: pickup_time.to_string(),
            estimated_duration_minutes: duration,
            actual_duration_minutes: None,
            estimated_distance_miles: None,
            actual_distance_miles: None,
            is_airport_transfer: false,
            flight_number: None,
            airline: None,
            terminal: None,
            meet_and_greet: false,
            flight_monitoring: false,
            special_requirements: None,
            passenger_count: 1,
            estimated_price: 100.0,
            final_price: None,
            gratuity_amount: None,
            total_amount: None,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            customer_rating: None,
            customer_feedback: None,
            driver_notes: None,
            cancellation_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            confirmed_at: None,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
        }
    }

    #[test]
    fn booking_number_matches_expected_pattern() {
        let pattern = Regex::new(r"^EL\d{6}[A-Z0-9]{3}$").unwrap();
        for _ in 0..20 {
            let number = BookingService::generate_booking_number();
            assert!(pattern.is_match(&number), "bad booking number: {}", number);
        }
    }

    #[test]
    fn pickup_time_accepts_minutes_and_seconds_forms() {
        assert!(BookingService::parse_pickup_time("10:00").is_some());
        assert!(BookingService::parse_pickup_time("23:45:30").is_some());
        assert!(BookingService::parse_pickup_time("25:00").is_none());
        assert!(BookingService::parse_pickup_time("noon").is_none());
    }

    #[test]
    fn window_defaults_duration_when_missing_or_nonpositive() {
        let window = BookingService::time_window("10:00", None).unwrap();
        assert_eq!(window, TimeWindow { start: 600, end: 600 + DEFAULT_DURATION_MINUTES });

        let zero = BookingService::time_window("10:00", Some(0)).unwrap();
        assert_eq!(zero.end - zero.start, DEFAULT_DURATION_MINUTES);
    }

    #[test]
    fn late_window_does_not_wrap_past_midnight() {
        let late = BookingService::time_window("23:30", Some(90)).unwrap();
        assert_eq!(late.end, 23 * 60 + 30 + 90);

        let morning = BookingService::time_window("01:00", Some(60)).unwrap();
        assert!(!late.overlaps(&morning));
    }

    #[test]
    fn overlap_is_half_open() {
        let a = TimeWindow { start: 600, end: 720 };
        let b = TimeWindow { start: 720, end: 840 };
        assert!(!a.overlaps(&b), "windows that touch do not overlap");

        let c = TimeWindow { start: 700, end: 730 };
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn non_overlapping_same_day_booking_does_not_block_vehicle() {
        let vehicle = ObjectId::new();
        let morning_ride = booking_at("08:00", Some(60), vehicle);

        let requested = BookingService::time_window("14:00", Some(120)).unwrap();
        let booked = BookingService::booked_vehicle_ids(&requested, &[morning_ride]);

        assert!(!booked.contains(&vehicle));
    }

    #[test]
    fn overlapping_booking_blocks_vehicle() {
        let vehicle = ObjectId::new();
        let afternoon_ride = booking_at("13:30", Some(120), vehicle);

        let requested = BookingService::time_window("14:00", Some(120)).unwrap();
        let booked = BookingService::booked_vehicle_ids(&requested, &[afternoon_ride]);

        assert!(booked.contains(&vehicle));
    }

    #[test]
    fn unparseable_stored_time_blocks_whole_day() {
        let vehicle = ObjectId::new();
        let corrupt = booking_at("sometime", Some(60), vehicle);

        let requested = BookingService::time_window("09:00", Some(60)).unwrap();
        let booked = BookingService::booked_vehicle_ids(&requested, &[corrupt]);

        assert!(booked.contains(&vehicle));
    }
}
