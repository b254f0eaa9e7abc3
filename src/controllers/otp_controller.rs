use actix_web::{HttpResponse, web};
use serde::Deserialize;
use validator::Validate;

use crate::errors::ApiError;
use crate::models::user::NewUser;
use crate::service::{otp_registry::OtpRegistry, user_service::UserService};

pub struct OtpController;

#[derive(Debug, Deserialize)]
pub struct SendOtpQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub user: NewUser,
    pub otp: String,
}

impl OtpController {
    pub async fn send(
        users: web::Data<UserService>,
        registry: web::Data<OtpRegistry>,
        query: web::Query<SendOtpQuery>,
    ) -> Result<HttpResponse, ApiError> {
        let email = query.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ApiError::BadRequest("Email is required".into()));
        }

        if users.exists_by_email(&email).await? {
            return Err(ApiError::Conflict(
                "User already exists with this email".into(),
            ));
        }

        registry.issue(&email)?;

        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Email sent successfully"
        })))
    }

    /// Validates the submitted code, then creates the profile. The email the
    /// code is checked against comes from the client-supplied profile payload,
    /// not from the earlier send step.
    pub async fn verify(
        users: web::Data<UserService>,
        registry: web::Data<OtpRegistry>,
        request: web::Json<VerifyOtpRequest>,
    ) -> Result<HttpResponse, ApiError> {
        let new_user = request.user.normalized();

        if !registry.validate(&new_user.email, request.otp.trim()) {
            return Err(ApiError::Unauthorized("Invalid OTP".into()));
        }

        new_user
            .validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        users.create_profile(&new_user).await?;

        Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "User Registered Successfully"
        })))
    }
}
