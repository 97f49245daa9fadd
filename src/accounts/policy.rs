use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::accounts::{dto::RegisterRequest, error::ValidationError, repo::UserStore};

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref UPPERCASE_RE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref DIGIT_RE: Regex = Regex::new(r"[0-9]").unwrap();
    static ref SPECIAL_RE: Regex = Regex::new(r"[^A-Za-z0-9]").unwrap();
}

/// Per-rule outcome of the password policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordReport {
    pub length: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub special: bool,
    pub valid: bool,
}

pub fn evaluate_password(pwd: &str) -> PasswordReport {
    let length = pwd.chars().count() >= MIN_PASSWORD_LEN;
    let uppercase = UPPERCASE_RE.is_match(pwd);
    let digit = DIGIT_RE.is_match(pwd);
    let special = SPECIAL_RE.is_match(pwd);
    PasswordReport {
        length,
        uppercase,
        digit,
        special,
        valid: length && uppercase && digit && special,
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Checks a registration form against the policy and the current store.
pub fn validate_registration(
    form: &RegisterRequest,
    store: &UserStore,
) -> Result<(), ValidationError> {
    if !evaluate_password(&form.password).valid {
        return Err(ValidationError::WeakPassword);
    }

    if [
        &form.given_name,
        &form.family_name,
        &form.national_id,
        &form.code,
        &form.email,
    ]
    .iter()
    .any(|f| is_blank(f))
    {
        return Err(ValidationError::MissingFields);
    }

    let email = normalize_email(&form.email);
    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    if store.exists(&email) {
        return Err(ValidationError::DuplicateEmail);
    }
    Ok(())
}

/// An empty `new_password` means "keep the current one".
pub fn validate_profile_update(
    current_email: &str,
    new_email: &str,
    new_password: &str,
    store: &UserStore,
) -> Result<(), ValidationError> {
    if !new_password.is_empty() && !evaluate_password(new_password).valid {
        return Err(ValidationError::WeakPassword);
    }

    let new_email = normalize_email(new_email);
    if new_email.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(&new_email) {
        return Err(ValidationError::InvalidEmail);
    }
    if new_email != normalize_email(current_email) && store.exists(&new_email) {
        return Err(ValidationError::DuplicateEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlots;
    use proptest::prelude::*;
    use std::sync::Arc;
    use time::OffsetDateTime;

    fn form(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            given_name: "Ana".into(),
            family_name: "Diaz".into(),
            national_id: "123".into(),
            code: "X1".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn store_with(email: &str) -> UserStore {
        let store = UserStore::new(Arc::new(MemorySlots::new()));
        let now = OffsetDateTime::now_utc();
        store
            .put(
                email,
                crate::accounts::repo_types::UserRecord {
                    given_name: "Ana".into(),
                    family_name: "Diaz".into(),
                    national_id: "123".into(),
                    code: "X1".into(),
                    email: email.into(),
                    password: "Abcd123!".into(),
                    created_at: now,
                    updated_at: now,
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn password_rules_individually() {
        let r = evaluate_password("abc");
        assert!(!r.length && !r.uppercase && !r.digit && !r.special && !r.valid);

        let r = evaluate_password("Abcd123!");
        assert!(r.length && r.uppercase && r.digit && r.special && r.valid);

        let r = evaluate_password("abcd123!");
        assert!(!r.uppercase);
        assert!(!r.valid);

        // a space counts as a special character
        assert!(evaluate_password("Abcd 1234").valid);
        // non-ASCII letters are neither uppercase nor digits, but are special
        let r = evaluate_password("ÀBCDÉFGH");
        assert!(r.special && r.uppercase && !r.digit);
    }

    #[test]
    fn password_length_counts_chars_not_bytes() {
        assert!(!evaluate_password("Ñ1!aaaa").length);
        assert!(evaluate_password("Ñ1!aaaaa").length);
    }

    proptest! {
        #[test]
        fn prop_valid_iff_all_rules(pwd in "\\PC{0,16}") {
            let r = evaluate_password(&pwd);
            let expected = pwd.chars().count() >= 8
                && pwd.chars().any(|c| c.is_ascii_uppercase())
                && pwd.chars().any(|c| c.is_ascii_digit())
                && pwd.chars().any(|c| !c.is_ascii_alphanumeric());
            prop_assert_eq!(r.valid, expected);
        }
    }

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Ana@Test.COM\t"), "ana@test.com");
    }

    #[test]
    fn registration_checks_password_before_fields() {
        let store = UserStore::new(Arc::new(MemorySlots::new()));
        let mut f = form("", "weak");
        assert_eq!(
            validate_registration(&f, &store),
            Err(ValidationError::WeakPassword)
        );
        f.password = "Abcd123!".into();
        assert_eq!(
            validate_registration(&f, &store),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn registration_rejects_blank_name() {
        let store = UserStore::new(Arc::new(MemorySlots::new()));
        let mut f = form("ana@test.com", "Abcd123!");
        f.family_name = "   ".into();
        assert_eq!(
            validate_registration(&f, &store),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn registration_rejects_malformed_email() {
        let store = UserStore::new(Arc::new(MemorySlots::new()));
        assert_eq!(
            validate_registration(&form("not-an-email", "Abcd123!"), &store),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn registration_rejects_duplicate_after_normalization() {
        let store = store_with("ana@test.com");
        assert_eq!(
            validate_registration(&form(" ANA@test.com ", "Abcd123!"), &store),
            Err(ValidationError::DuplicateEmail)
        );
        assert!(validate_registration(&form("bea@test.com", "Abcd123!"), &store).is_ok());
    }

    #[test]
    fn profile_update_rules() {
        let store = store_with("ana@test.com");
        store
            .put("bea@test.com", store.get("ana@test.com").unwrap())
            .unwrap();

        // unchanged email, no new password
        assert!(validate_profile_update("ana@test.com", "ana@test.com", "", &store).is_ok());
        // weak new password
        assert_eq!(
            validate_profile_update("ana@test.com", "ana@test.com", "short", &store),
            Err(ValidationError::WeakPassword)
        );
        // taken email
        assert_eq!(
            validate_profile_update("ana@test.com", "Bea@Test.com", "", &store),
            Err(ValidationError::DuplicateEmail)
        );
        // blank email
        assert_eq!(
            validate_profile_update("ana@test.com", "  ", "", &store),
            Err(ValidationError::MissingFields)
        );
        // free email with a valid new password
        assert!(
            validate_profile_update("ana@test.com", "cid@test.com", "Newpass1!", &store).is_ok()
        );
    }
}
