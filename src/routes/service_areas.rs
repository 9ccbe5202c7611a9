use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use bson::doc;
use mongodb::Client;
use serde_json::json;

use crate::db::mongo;
use crate::models::response::ErrorResponse;
use crate::models::service_area::{
    CityEntry, CityPricing, PrimaryMarket, ServiceArea, ServiceAreaResponse,
};

pub async fn get_service_areas(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection = mongo::collection::<ServiceArea>(&client, mongo::SERVICE_AREAS);

    match collection
        .find(doc! { "is_active": true })
        .sort(doc! { "city": 1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<ServiceArea>>().await {
            Ok(areas) => {
                let items: Vec<ServiceAreaResponse> =
                    areas.iter().map(ServiceAreaResponse::from_area).collect();
                HttpResponse::Ok().json(json!({ "serviceAreas": items }))
            }
            Err(err) => {
                log::error!("Failed to collect service areas: {:?}", err);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to fetch service areas"))
            }
        },
        Err(err) => {
            log::error!("Failed to fetch service areas: {:?}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch service areas"))
        }
    }
}

pub async fn get_cities(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection = mongo::collection::<ServiceArea>(&client, mongo::SERVICE_AREAS);

    match collection
        .find(doc! { "is_active": true })
        .sort(doc! { "city": 1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<ServiceArea>>().await {
            Ok(areas) => {
                let cities: Vec<CityEntry> = areas.iter().map(CityEntry::from_area).collect();
                HttpResponse::Ok().json(json!({ "cities": cities }))
            }
            Err(err) => {
                log::error!("Failed to collect service cities: {:?}", err);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to fetch service cities"))
            }
        },
        Err(err) => {
            log::error!("Failed to fetch service cities: {:?}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch service cities"))
        }
    }
}

pub async fn get_primary_markets(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection = mongo::collection::<ServiceArea>(&client, mongo::SERVICE_AREAS);

    match collection
        .find(doc! { "is_active": true, "is_primary_market": true })
        .sort(doc! { "city": 1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<ServiceArea>>().await {
            Ok(areas) => {
                let markets: Vec<PrimaryMarket> =
                    areas.iter().map(PrimaryMarket::from_area).collect();
                HttpResponse::Ok().json(json!({ "primaryMarkets": markets }))
            }
            Err(err) => {
                log::error!("Failed to collect primary markets: {:?}", err);
                HttpResponse::InternalServerError()
                    .json(ErrorResponse::new("Failed to fetch primary markets"))
            }
        },
        Err(err) => {
            log::error!("Failed to fetch primary markets: {:?}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch primary markets"))
        }
    }
}

pub async fn get_city_pricing(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let city = path.into_inner();

    let collection = mongo::collection::<ServiceArea>(&client, mongo::SERVICE_AREAS);

    match collection
        .find_one(doc! { "city": &city, "is_active": true })
        .await
    {
        Ok(Some(area)) => {
            HttpResponse::Ok().json(json!({ "pricing": CityPricing::from_area(&area) }))
        }
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new("Service area not found")),
        Err(err) => {
            log::error!("Failed to fetch city pricing: {:?}", err);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to fetch city pricing"))
        }
    }
}
