mod common;

use actix_web::test;
use serde_json::json;
use serial_test::serial;

use common::{test_bearer_token, TestApp};

#[actix_rt::test]
#[serial]
async fn test_create_booking_missing_required_fields() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header(("Authorization", test_bearer_token()))
        .set_json(&json!({
            "vehicleId": "665f1c0fd3a7c9a1b2c3d4e5",
            "bookingType": "hourly"
            // Missing city, location, date, time, price
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Vehicle ID, booking type, service city, pickup location, pickup date, pickup time, and estimated price are required"
    );
}

#[actix_rt::test]
#[serial]
async fn test_create_booking_invalid_vehicle_id_format() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header(("Authorization", test_bearer_token()))
        .set_json(&json!({
            "vehicleId": "not-a-vehicle-id",
            "bookingType": "hourly",
            "serviceCity": "New York",
            "pickupLocation": "432 Park Ave",
            "pickupDate": "2025-06-01",
            "pickupTime": "10:00",
            "estimatedPrice": 100.0
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid vehicle ID format");
}

#[actix_rt::test]
#[serial]
async fn test_create_booking_invalid_pickup_time() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header(("Authorization", test_bearer_token()))
        .set_json(&json!({
            "vehicleId": "665f1c0fd3a7c9a1b2c3d4e5",
            "bookingType": "hourly",
            "serviceCity": "New York",
            "pickupLocation": "432 Park Ave",
            "pickupDate": "2025-06-01",
            "pickupTime": "half past nine",
            "estimatedPrice": 100.0
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid pickup time format");
}

#[actix_rt::test]
#[serial]
async fn test_get_booking_invalid_id_format() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/bookings/not-an-object-id")
        .insert_header(("Authorization", test_bearer_token()))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid booking ID format");
}

#[actix_rt::test]
#[serial]
async fn test_cancel_booking_invalid_id_format() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri("/api/bookings/not-an-object-id/cancel")
        .insert_header(("Authorization", test_bearer_token()))
        .set_json(&json!({ "reason": "Change of plans" }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid booking ID format");
}
