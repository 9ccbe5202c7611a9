use actix_web::{middleware::Logger, web, App};
use bson::oid::ObjectId;
use mongodb::options::ClientOptions;
use std::sync::Arc;
use std::time::Duration;

use empire_lane_api::middleware::auth::{generate_token, AuthMiddleware};
use empire_lane_api::routes;

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        // Short timeouts: validation-level tests never need a live server
        let mut options = ClientOptions::parse(&mongo_uri)
            .await
            .expect("invalid MongoDB URI");
        options.connect_timeout = Some(Duration::from_secs(2));
        options.server_selection_timeout = Some(Duration::from_secs(2));

        let client =
            mongodb::Client::with_options(options).expect("failed to build MongoDB client");

        Self {
            client: Arc::new(client),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(self.client.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(routes::auth::register))
                            .route("/login", web::post().to(routes::auth::login))
                            .service(
                                web::scope("")
                                    .wrap(AuthMiddleware)
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
                            .wrap(AuthMiddleware)
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
    }
}

/// Bearer token for a synthetic authenticated user, signed with the same
/// secret the middleware verifies against.
pub fn test_bearer_token() -> String {
    let user_id = ObjectId::new();
    let token = generate_token("test@example.com", user_id).expect("token generation failed");
    format!("Bearer {}", token)
}
