use chrono::{DateTime, Utc};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password: String, // Always hashed
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub preferred_vehicle_type: Option<String>,
    pub notifications_enabled: bool,
    // Server-owned loyalty state, never client-settable
    pub membership_tier: String,
    pub loyalty_points: i64,
    pub profile_image_url: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub special_requirements: Option<String>,
    // Security related fields
    pub last_signin: Option<DateTime<Utc>>,
    pub failed_signins: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "full_name")]
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub preferred_vehicle: Option<String>,
    pub notifications: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub preferred_vehicle: Option<String>,
    pub notifications: Option<bool>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub special_requirements: Option<String>,
}

impl ProfileUpdateInput {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone.is_none()
            && self.preferred_vehicle.is_none()
            && self.notifications.is_none()
            && self.emergency_contact_name.is_none()
            && self.emergency_contact_phone.is_none()
            && self.special_requirements.is_none()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub preferred_vehicle: Option<String>,
    pub notifications: bool,
    pub membership_tier: String,
    pub loyalty_points: i64,
    pub profile_image: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub special_requirements: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            preferred_vehicle: user.preferred_vehicle_type.clone(),
            notifications: user.notifications_enabled,
            membership_tier: user.membership_tier.clone(),
            loyalty_points: user.loyalty_points,
            profile_image: user.profile_image_url.clone(),
            emergency_contact_name: user.emergency_contact_name.clone(),
            emergency_contact_phone: user.emergency_contact_phone.clone(),
            special_requirements: user.special_requirements.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Some(ObjectId::new()),
            email: "rider@example.com".to_string(),
            password: "$2b$12$hash".to_string(),
            first_name: "Ava".to_string(),
            last_name: "Stone".to_string(),
            phone: Some("+12125550100".to_string()),
            preferred_vehicle_type: Some("sedan".to_string()),
            notifications_enabled: true,
            membership_tier: "standard".to_string(),
            loyalty_points: 120,
            profile_image_url: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            special_requirements: None,
            last_signin: None,
            failed_signins: None,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        }
    }

    #[test]
    fn user_response_never_carries_password() {
        let user = sample_user();
        let response = UserResponse::from_user(&user);
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "rider@example.com");
        assert_eq!(json["firstName"], "Ava");
        assert_eq!(json["loyaltyPoints"], 120);
    }

    #[test]
    fn profile_update_is_empty_only_without_fields() {
        let empty = ProfileUpdateInput {
            first_name: None,
            last_name: None,
            phone: None,
            preferred_vehicle: None,
            notifications: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            special_requirements: None,
        };
        assert!(empty.is_empty());

        let update = ProfileUpdateInput {
            phone: Some("+12125550101".to_string()),
            ..empty
        };
        assert!(!update.is_empty());
    }
}
