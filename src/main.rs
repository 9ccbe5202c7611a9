use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use empire_lane_api::{db, middleware, routes};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 3001;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

fn cors_from_env() -> Cors {
    let origins = std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string());

    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);
    for origin in origins.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        cors = cors.allowed_origin(origin);
    }
    cors
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    log::info!("Starting Empire Lane Limo API on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors_from_env())
            .app_data(web::Data::new(client.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(routes::auth::register))
                            .route("/login", web::post().to(routes::auth::login))
                            .service(
                                web::scope("")
                                    .wrap(middleware::auth::AuthMiddleware)
                                    .route("/profile", web::get().to(routes::auth::get_profile))
                                    .route("/profile", web::put().to(routes::auth::update_profile)),
                            ),
                    )
                    .service(
                        web::scope("/vehicles")
                            .route("", web::get().to(routes::vehicles::get_vehicles))
                            .route(
                                "/types/list",
                                web::get().to(routes::vehicles::get_vehicle_types),
                            )
                            .route(
                                "/availability",
                                web::post().to(routes::vehicles::check_availability),
                            )
                            .route("/{id}", web::get().to(routes::vehicles::get_vehicle_by_id)),
                    )
                    .service(
                        web::scope("/bookings")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("", web::post().to(routes::bookings::create_booking))
                            .route(
                                "/my-bookings",
                                web::get().to(routes::bookings::get_my_bookings),
                            )
                            .route("/{id}", web::get().to(routes::bookings::get_booking_by_id))
                            .route(
                                "/{id}/cancel",
                                web::put().to(routes::bookings::cancel_booking),
                            ),
                    )
                    .service(
                        web::scope("/service-areas")
                            .route("", web::get().to(routes::service_areas::get_service_areas))
                            .route("/cities", web::get().to(routes::service_areas::get_cities))
                            .route(
                                "/primary-markets",
                                web::get().to(routes::service_areas::get_primary_markets),
                            )
                            .route(
                                "/{city}/pricing",
                                web::get().to(routes::service_areas::get_city_pricing),
                            ),
                    )
                    .service(
                        web::scope("/testimonials")
                            .route("", web::get().to(routes::testimonials::get_testimonials))
                            .route(
                                "/featured",
                                web::get().to(routes::testimonials::get_featured_testimonials),
                            )
                            .route(
                                "/service/{serviceType}",
                                web::get().to(routes::testimonials::get_testimonials_by_service),
                            ),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
