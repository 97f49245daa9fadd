use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::accounts::repo_types::UserRecord;

/// Request body for account registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre", alias = "givenName", default)]
    pub given_name: String,
    #[serde(rename = "apellido", alias = "familyName", default)]
    pub family_name: String,
    #[serde(rename = "cedula", alias = "nationalId", default)]
    pub national_id: String,
    #[serde(rename = "codigo", alias = "code", default)]
    pub code: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for saving the profile. Empty password keeps the current one.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EvaluatePasswordRequest {
    pub password: String,
}

/// Profile as returned to the client; never carries the password.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    #[serde(rename = "nombre")]
    pub given_name: String,
    #[serde(rename = "apellido")]
    pub family_name: String,
    #[serde(rename = "cedula")]
    pub national_id: String,
    #[serde(rename = "codigo")]
    pub code: String,
    pub email: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<UserRecord> for PublicProfile {
    fn from(r: UserRecord) -> Self {
        Self {
            given_name: r.given_name,
            family_name: r.family_name,
            national_id: r.national_id,
            code: r.code,
            email: r.email,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Boot-time view of the session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub email: Option<String>,
}
