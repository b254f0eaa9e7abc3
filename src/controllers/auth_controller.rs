use actix_web::{HttpResponse, web};
use serde::Deserialize;
use validator::Validate;

use crate::errors::ApiError;
use crate::models::user::NewUser;
use crate::service::{token_service::TokenService, user_service::UserService};

pub struct AuthController;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl AuthController {
    pub async fn login(
        users: web::Data<UserService>,
        tokens: web::Data<TokenService>,
        request: web::Json<LoginRequest>,
    ) -> Result<HttpResponse, ApiError> {
        let email = request.email.trim().to_lowercase();
        let user = users.verify_credentials(&email, &request.password).await?;
        let token = tokens.mint(&user.email)?;

        Ok(HttpResponse::Ok().json(serde_json::json!({
            "token": token,
            "user": { "id": user.id, "name": user.name, "email": user.email }
        })))
    }

    /// Direct registration, bypassing the OTP flow.
    pub async fn register(
        users: web::Data<UserService>,
        request: web::Json<NewUser>,
    ) -> Result<HttpResponse, ApiError> {
        let new_user = request.normalized();
        new_user
            .validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        users.create_profile(&new_user).await?;

        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "User Registered Successfully"
        })))
    }
}
