use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use bson::{doc, Document};
use mongodb::Client;
use serde::Deserialize;
use serde_json::json;

use crate::db::mongo;
use crate::models::response::ErrorResponse;
use crate::models::testimonial::{Testimonial, TestimonialResponse};

const FEATURED_LIMIT: i64 = 6;

#[derive(Debug, Deserialize)]
pub struct TestimonialListParams {
    pub featured: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

async fn fetch_testimonials(
    client: &Client,
    filter: Document,
    limit: i64,
    offset: u64,
) -> Result<Vec<TestimonialResponse>, mongodb::error::Error> {
    let collection = mongo::collection::<Testimonial>(client, mongo::TESTIMONIALS);
    let rows = collection
        .find(filter)
        .sort(doc! { "created_at": -1 })
        .skip(offset)
        .limit(limit)
        .await?
        .try_collect::<Vec<Testimonial>>()
        .await?;

    Ok(rows.iter().map(TestimonialResponse::from_testimonial).collect())
}

pub async fn get_testimonials(
    data: web::Data<Arc<Client>>,
    params: web::Query<TestimonialListParams>,
) -> impl Responder {
    let client = data.into_inner();

    let mut filter = doc! { "is_approved": true };
    if params.featured.as_deref() == Some("true") {
        filter.insert("is_featured", true);
    }

    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0);

    match fetch_testimonials(&client, filter, limit, offset).await {
        Ok(items) => HttpResponse::Ok().json(json!({ "testimonials": items })),
        Err(err) => {
            log::error!("Failed to fetch testimonials: {:?}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch testimonials"))
        }
    }
}

pub async fn get_featured_testimonials(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let filter = doc! { "is_approved": true, "is_featured": true };

    match fetch_testimonials(&client, filter, FEATURED_LIMIT, 0).await {
        Ok(items) => HttpResponse::Ok().json(json!({ "testimonials": items })),
        Err(err) => {
            log::error!("Failed to fetch featured testimonials: {:?}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch featured testimonials"))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServiceTypeParams {
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

pub async fn get_testimonials_by_service(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    params: web::Query<ServiceTypeParams>,
) -> impl Responder {
    let client = data.into_inner();
    let service_type = path.into_inner();

    let filter = doc! { "is_approved": true, "service_type": &service_type };
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = params.offset.unwrap_or(0);

    match fetch_testimonials(&client, filter, limit, offset).await {
        Ok(items) => HttpResponse::Ok().json(json!({ "testimonials": items })),
        Err(err) => {
            log::error!("Failed to fetch testimonials by service: {:?}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch testimonials"))
        }
    }
}
