use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// User record as persisted in the `users_by_email` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "nombre", alias = "givenName")]
    pub given_name: String,
    #[serde(rename = "apellido", alias = "familyName")]
    pub family_name: String,
    #[serde(rename = "cedula", alias = "nationalId")]
    pub national_id: String,
    #[serde(rename = "codigo", alias = "code")]
    pub code: String,
    pub email: String,                // normalized, also the map key
    pub password: String,             // as sealed by the PasswordScheme
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}
