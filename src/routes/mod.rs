pub mod auth;
pub mod bookings;
pub mod health;
pub mod service_areas;
pub mod testimonials;
pub mod vehicles;
