use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use bson::doc;
use mongodb::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::db::mongo;

const SERVICE_NAME: &str = "Empire Lane Limo API";

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    service: String,
    timestamp: DateTime<Utc>,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "OK".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    let jwt_result = check_jwt_secret();
    health
        .services
        .insert("jwt".to_string(), jwt_result.clone());

    if mongo_result.status != "ok" || jwt_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &web::Data<Arc<Client>>) -> ServiceStatus {
    match client
        .database(mongo::DB_NAME)
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Err(e) => {
            log::error!("MongoDB health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}

fn check_jwt_secret() -> ServiceStatus {
    jwt_secret_status(env::var("JWT_SECRET").is_ok())
}

/// The service still works on the built-in development secret, but running
/// unconfigured is worth surfacing as degraded.
fn jwt_secret_status(configured: bool) -> ServiceStatus {
    if configured {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some("JWT secret configured".to_string()),
        }
    } else {
        ServiceStatus {
            status: "warning".to_string(),
            details: Some("JWT_SECRET not set, using development default".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_jwt_secret_degrades_health() {
        assert_eq!(jwt_secret_status(false).status, "warning");
        assert_eq!(jwt_secret_status(true).status, "ok");
    }
}
