use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] //select false on user sql queries for the password hash
    pub password_hash: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

impl NewUser {
    /// Copy of the payload with the email lowercased and surrounding
    /// whitespace stripped, so lookups and the OTP store share one key form.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_lowercase(),
            password: self.password.clone(),
        }
    }
}
