use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::ApiError;
use crate::service::{token_service::TokenService, user_service::UserService};

pub struct UserController;

impl UserController {
    pub async fn profile(
        req: HttpRequest,
        users: web::Data<UserService>,
        tokens: web::Data<TokenService>,
    ) -> Result<HttpResponse, ApiError> {
        let token = bearer_token(&req)
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".into()))?;
        let email = tokens
            .verify(token)
            .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".into()))?;

        let user = users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

        Ok(HttpResponse::Ok().json(serde_json::json!({
            "id": user.id,
            "name": user.name,
            "email": user.email
        })))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
