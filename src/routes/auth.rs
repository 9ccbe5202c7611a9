use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use bson::doc;
use mongodb::options::ReturnDocument;
use mongodb::Client;
use serde_json::json;
use std::sync::{Arc, OnceLock};

use crate::db::mongo;
use crate::middleware::auth::generate_token;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::response::ErrorResponse;
use crate::models::user::{LoginInput, ProfileUpdateInput, RegisterInput, User, UserResponse};

const DEFAULT_MEMBERSHIP_TIER: &str = "standard";

// Compiled once, shared across requests
static EMAIL_PATTERN: OnceLock<Option<regex::Regex>> = OnceLock::new();

fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .get_or_init(|| {
            regex::Regex::new(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
            )
            .ok()
        })
        .as_ref()
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

pub async fn register(
    data: web::Data<Arc<Client>>,
    input: web::Json<RegisterInput>,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    let (email, password, full_name) = match (&input.email, &input.password, &input.full_name) {
        (Some(email), Some(password), Some(full_name)) => (email, password, full_name),
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse::new(
                "Email, password, and full name are required",
            ))
        }
    };

    if !is_valid_email(email) {
        return HttpResponse::BadRequest().json(ErrorResponse::new("Invalid email format"));
    }
    if password.len() < 8 {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Password must be at least 8 characters long",
        ));
    }

    let email = email.to_lowercase();
    let collection = mongo::collection::<User>(&client, mongo::USERS);

    match collection.find_one(doc! { "email": &email }).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(ErrorResponse::new("User already exists"))
        }
        Ok(None) => {}
        Err(err) => {
            log::error!("Database error checking for existing user: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Internal server error"));
        }
    }

    let hashed = match bcrypt::hash(password, bcrypt::DEFAULT_COST) {
        Ok(hashed) => hashed,
        Err(err) => {
            log::error!("Password hashing failed: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Internal server error"));
        }
    };

    let name_parts: Vec<&str> = full_name.trim().split_whitespace().collect();
    let first_name = name_parts.first().copied().unwrap_or_default().to_string();
    let last_name = name_parts[1..].join(" ");

    let now = Utc::now();
    let mut user = User {
        id: None,
        email: email.clone(),
        password: hashed,
        first_name,
        last_name,
        phone: input.phone.clone(),
        preferred_vehicle_type: input.preferred_vehicle.clone(),
        notifications_enabled: input.notifications.unwrap_or(true),
        membership_tier: DEFAULT_MEMBERSHIP_TIER.to_string(),
        loyalty_points: 0,
        profile_image_url: None,
        emergency_contact_name: None,
        emergency_contact_phone: None,
        special_requirements: None,
        last_signin: None,
        failed_signins: None,
        created_at: Some(now),
        updated_at: Some(now),
    };

    match collection.insert_one(&user).await {
        Ok(result) => {
            let user_id = match result.inserted_id.as_object_id() {
                Some(id) => id,
                None => {
                    log::error!("Inserted user has no ObjectId");
                    return HttpResponse::InternalServerError()
                        .json(ErrorResponse::new("Internal server error"));
                }
            };
            user.id = Some(user_id);

            match generate_token(&email, user_id) {
                Ok(token) => HttpResponse::Created().json(json!({
                    "message": "User registered successfully",
                    "user": UserResponse::from_user(&user),
                    "token": token
                })),
                Err(err) => {
                    log::error!("Token generation failed: {:?}", err);
                    HttpResponse::InternalServerError()
                        .json(ErrorResponse::new("Token generation failed"))
                }
            }
        }
        Err(err) => {
            log::error!("Failed to create user: {:?}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to create user"))
        }
    }
}

pub async fn login(data: web::Data<Arc<Client>>, input: web::Json<LoginInput>) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    let (email, password) = match (&input.email, &input.password) {
        (Some(email), Some(password)) => (email.to_lowercase(), password.clone()),
        _ => {
            return HttpResponse::BadRequest()
                .json(ErrorResponse::new("Email and password are required"))
        }
    };

    let collection = mongo::collection::<User>(&client, mongo::USERS);

    let user = match collection.find_one(doc! { "email": &email }).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(ErrorResponse::new("Invalid credentials"))
        }
        Err(err) => {
            log::error!("Database error during login: {:?}", err);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to process login"));
        }
    };

    if !bcrypt::verify(&password, &user.password).unwrap_or(false) {
        let failed_signins = user.failed_signins.unwrap_or(0) + 1;
        let update = doc! { "$set": { "failed_signins": failed_signins } };
        if let Err(err) = collection.update_one(doc! { "email": &email }, update).await {
            log::error!("Failed to update failed signins: {:?}", err);
        }
        return HttpResponse::Unauthorized().json(ErrorResponse::new("Invalid credentials"));
    }

    let update = doc! {
        "$set": {
            "last_signin": Utc::now().to_rfc3339(),
            "failed_signins": 0
        }
    };
    if let Err(err) = collection.update_one(doc! { "email": &email }, update).await {
        log::error!("Failed to record signin: {:?}", err);
    }

    let user_id = match user.id {
        Some(id) => id,
        None => {
            log::error!("Stored user has no ObjectId: {}", email);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Internal server error"));
        }
    };

    match generate_token(&email, user_id) {
        Ok(token) => HttpResponse::Ok().json(json!({
            "message": "Login successful",
            "user": UserResponse::from_user(&user),
            "token": token
        })),
        Err(err) => {
            log::error!("Token generation failed: {:?}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Token generation failed"))
        }
    }
}

pub async fn get_profile(
    data: web::Data<Arc<Client>>,
    auth: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();
    let collection = mongo::collection::<User>(&client, mongo::USERS);

    match collection.find_one(doc! { "_id": auth.user_id }).await {
        Ok(Some(user)) => HttpResponse::Ok().json(json!({ "user": UserResponse::from_user(&user) })),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new("User not found")),
        Err(err) => {
            log::error!("Failed to fetch user profile: {:?}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to fetch profile"))
        }
    }
}

pub async fn update_profile(
    data: web::Data<Arc<Client>>,
    input: web::Json<ProfileUpdateInput>,
    auth: AuthenticatedUser,
) -> impl Responder {
    let client = data.into_inner();
    let input = input.into_inner();

    if input.is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("At least one profile field must be provided"));
    }

    let mut set_doc = doc! { "updated_at": Utc::now().to_rfc3339() };
    if let Some(first_name) = &input.first_name {
        set_doc.insert("first_name", first_name.as_str());
    }
    if let Some(last_name) = &input.last_name {
        set_doc.insert("last_name", last_name.as_str());
    }
    if let Some(phone) = &input.phone {
        set_doc.insert("phone", phone.as_str());
    }
    if let Some(preferred_vehicle) = &input.preferred_vehicle {
        set_doc.insert("preferred_vehicle_type", preferred_vehicle.as_str());
    }
    if let Some(notifications) = input.notifications {
        set_doc.insert("notifications_enabled", notifications);
    }
    if let Some(name) = &input.emergency_contact_name {
        set_doc.insert("emergency_contact_name", name.as_str());
    }
    if let Some(phone) = &input.emergency_contact_phone {
        set_doc.insert("emergency_contact_phone", phone.as_str());
    }
    if let Some(requirements) = &input.special_requirements {
        set_doc.insert("special_requirements", requirements.as_str());
    }

    let collection = mongo::collection::<User>(&client, mongo::USERS);

    match collection
        .find_one_and_update(doc! { "_id": auth.user_id }, doc! { "$set": set_doc })
        .return_document(ReturnDocument::After)
        .await
    {
        Ok(Some(user)) => HttpResponse::Ok().json(json!({
            "message": "Profile updated successfully",
            "user": UserResponse::from_user(&user)
        })),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new("User not found")),
        Err(err) => {
            log::error!("Failed to update profile: {:?}", err);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to update profile"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation_accepts_and_rejects() {
        assert!(is_valid_email("rider@example.com"));
        assert!(is_valid_email("a.b+tag@sub.domain.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("two@at@signs.com"));
    }
}
