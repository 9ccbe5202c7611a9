use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::sync::Arc;
use std::time::Duration;

pub const DB_NAME: &str = "EmpireLane";

pub const USERS: &str = "Users";
pub const VEHICLES: &str = "Vehicles";
pub const BOOKINGS: &str = "Bookings";
pub const BOOKING_ACTIVITIES: &str = "BookingActivities";
pub const SERVICE_AREAS: &str = "ServiceAreas";
pub const TESTIMONIALS: &str = "Testimonials";

/// Typed handle to one of the named collections in the application database.
pub fn collection<T: Send + Sync>(client: &Client, name: &str) -> Collection<T> {
    client.database(DB_NAME).collection(name)
}

pub async fn create_mongo_client(uri: &str) -> Arc<Client> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MongoDB URI may be incorrect! Failed to parse.");

    // Set a reasonable timeout for operations
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // Test the connection to make sure it works
    match client
        .database(DB_NAME)
        .run_command(bson::doc! {"ping": 1})
        .await
    {
        Ok(_) => log::info!("Successfully connected to MongoDB and verified with ping command"),
        Err(e) => {
            log::warn!("Connected to MongoDB but ping test failed: {}", e);
            log::warn!("The API may still work, but some functionality might be impaired");
        }
    }

    Arc::new(client)
}
