use chrono::{DateTime, Utc};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct Testimonial {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub customer_name: String,
    pub customer_title: Option<String>,
    pub customer_company: Option<String>,
    pub rating: i32,
    pub testimonial_text: String,
    pub service_type: Option<String>,
    pub is_approved: bool,
    pub is_featured: bool,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialResponse {
    pub id: String,
    pub customer_name: String,
    pub customer_title: Option<String>,
    pub customer_company: Option<String>,
    pub rating: i32,
    pub testimonial_text: String,
    pub service_type: Option<String>,
    pub is_featured: bool,
    pub image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TestimonialResponse {
    pub fn from_testimonial(testimonial: &Testimonial) -> Self {
        Self {
            id: testimonial.id.map(|id| id.to_hex()).unwrap_or_default(),
            customer_name: testimonial.customer_name.clone(),
            customer_title: testimonial.customer_title.clone(),
            customer_company: testimonial.customer_company.clone(),
            rating: testimonial.rating,
            testimonial_text: testimonial.testimonial_text.clone(),
            service_type: testimonial.service_type.clone(),
            is_featured: testimonial.is_featured,
            image_url: testimonial.image_url.clone(),
            created_at: testimonial.created_at,
        }
    }
}
