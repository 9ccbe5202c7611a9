pub mod booking;
pub mod response;
pub mod service_area;
pub mod testimonial;
pub mod user;
pub mod vehicle;
