use std::{fmt, str::FromStr};

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// How the `password` field of a record is stored and compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    /// Stored as typed, compared by exact equality. Demo only, not secure.
    #[default]
    Plaintext,
    /// Argon2 PHC string with a random salt.
    Argon2,
}

impl PasswordScheme {
    /// Turns a plain password into the value stored on the record.
    pub fn seal(&self, plain: &str) -> anyhow::Result<String> {
        match self {
            PasswordScheme::Plaintext => Ok(plain.to_string()),
            PasswordScheme::Argon2 => hash_password(plain),
        }
    }

    pub fn verify(&self, plain: &str, stored: &str) -> anyhow::Result<bool> {
        match self {
            PasswordScheme::Plaintext => Ok(plain == stored),
            PasswordScheme::Argon2 => verify_password(plain, stored),
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(PasswordScheme::Plaintext),
            "argon2" => Ok(PasswordScheme::Argon2),
            other => anyhow::bail!("unknown password scheme: {}", other),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordScheme::Plaintext => f.write_str("plaintext"),
            PasswordScheme::Argon2 => f.write_str("argon2"),
        }
    }
}

fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
