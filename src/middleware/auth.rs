use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use chrono::{Duration, Utc};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::response::ErrorResponse;

const DEFAULT_JWT_SECRET: &str = "empire_lane_jwt_secret";
const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,     // subject (email)
    pub exp: usize,      // expiration time
    pub iat: usize,      // issued at
    pub user_id: String, // hex ObjectId of the authenticated user
}

fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string())
}

pub fn generate_token(email: &str, user_id: ObjectId) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        user_id: user_id.to_hex(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(jwt_secret().as_ref()))
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

/// Short-circuits with a 401 JSON body without touching the inner service.
fn reject<B>(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
    let (req, _payload) = req.into_parts();
    let response = HttpResponse::Unauthorized().json(ErrorResponse::new(message));
    ServiceResponse::new(req, response).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    let mut validation = Validation::new(Algorithm::HS256);
                    validation.validate_exp = true;
                    validation.set_required_spec_claims(&["exp", "iat", "sub", "user_id"]);

                    match decode::<Claims>(
                        token,
                        &DecodingKey::from_secret(jwt_secret().as_bytes()),
                        &validation,
                    ) {
                        Ok(token_data) => {
                            req.extensions_mut().insert(token_data.claims);
                            let fut = self.service.call(req);
                            return Box::pin(async move {
                                fut.await.map(|res| res.map_into_left_body())
                            });
                        }
                        Err(err) => {
                            log::warn!("Error decoding token: {:?}", err);
                            return Box::pin(ready(Ok(reject(req, "Invalid or expired token"))));
                        }
                    }
                }
            }
        }
        Box::pin(ready(Ok(reject(req, "Access token required"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::TokenData;

    fn decode_claims(token: &str) -> TokenData<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat", "sub", "user_id"]);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(jwt_secret().as_bytes()),
            &validation,
        )
        .expect("token should decode with the signing secret")
    }

    #[test]
    fn generated_token_round_trips() {
        let user_id = ObjectId::new();
        let token = generate_token("rider@example.com", user_id).unwrap();

        let data = decode_claims(&token);
        assert_eq!(data.claims.sub, "rider@example.com");
        assert_eq!(data.claims.user_id, user_id.to_hex());
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn token_expires_in_twenty_four_hours() {
        let token = generate_token("rider@example.com", ObjectId::new()).unwrap();
        let data = decode_claims(&token);

        let lifetime = data.claims.exp - data.claims.iat;
        assert_eq!(lifetime, (TOKEN_LIFETIME_HOURS * 3600) as usize);
    }
}
