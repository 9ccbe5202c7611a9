use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::InternalError, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use bson::oid::ObjectId;

use crate::middleware::auth::Claims;
use crate::models::response::ErrorResponse;

/// Resolved identity of the caller, extracted from the claims the auth
/// middleware stored in request extensions.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user_id: ObjectId,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();

        match claims {
            Some(claims) => match ObjectId::parse_str(&claims.user_id) {
                Ok(user_id) => ready(Ok(AuthenticatedUser {
                    user_id,
                    email: claims.sub,
                })),
                Err(_) => ready(Err(reject("Invalid or expired token"))),
            },
            None => ready(Err(reject("Access token required"))),
        }
    }
}

fn reject(message: &str) -> Error {
    InternalError::from_response(
        message.to_string(),
        HttpResponse::Unauthorized().json(ErrorResponse::new(message)),
    )
    .into()
}
