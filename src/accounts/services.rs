use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::accounts::{
    dto::{RegisterRequest, UpdateProfileRequest},
    error::AccountError,
    password::PasswordScheme,
    policy::{normalize_email, validate_profile_update, validate_registration},
    repo::UserStore,
    repo_types::UserRecord,
    session::SessionPointer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountState {
    Anonymous,
    Authenticated(String),
}

/// Account lifecycle over the record store and the session pointer.
///
/// Every method is one complete action. Callers that share a service across
/// threads must serialize calls (see `AppState`), since each action is a
/// read-modify-write of the whole user map.
#[derive(Clone)]
pub struct AccountService {
    users: UserStore,
    session: SessionPointer,
    passwords: PasswordScheme,
}

impl AccountService {
    pub fn new(users: UserStore, session: SessionPointer, passwords: PasswordScheme) -> Self {
        Self {
            users,
            session,
            passwords,
        }
    }

    #[cfg(test)]
    pub fn in_memory(passwords: PasswordScheme) -> Self {
        use crate::storage::MemorySlots;
        use std::sync::Arc;

        Self::new(
            UserStore::new(Arc::new(MemorySlots::new())),
            SessionPointer::new(Arc::new(MemorySlots::new())),
            passwords,
        )
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    #[cfg(test)]
    pub fn session(&self) -> &SessionPointer {
        &self.session
    }

    pub fn register(&self, form: RegisterRequest) -> Result<UserRecord, AccountError> {
        if let Err(e) = validate_registration(&form, &self.users) {
            warn!(reason = %e, "registration rejected");
            return Err(e.into());
        }

        let email = normalize_email(&form.email);
        let now = OffsetDateTime::now_utc();
        let record = UserRecord {
            given_name: form.given_name.trim().to_string(),
            family_name: form.family_name.trim().to_string(),
            national_id: form.national_id.trim().to_string(),
            code: form.code.trim().to_string(),
            email: email.clone(),
            password: self.passwords.seal(&form.password)?,
            created_at: now,
            updated_at: now,
        };
        self.users.put(&email, record.clone())?;

        info!(email = %email, "user registered");
        Ok(record)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<UserRecord, AccountError> {
        let email = normalize_email(email);

        let Some(user) = self.users.get(&email) else {
            warn!(email = %email, "login unknown email");
            return Err(AccountError::InvalidCredentials);
        };

        match self.passwords.verify(password, &user.password) {
            Ok(true) => {}
            Ok(false) => {
                warn!(email = %email, "login invalid password");
                return Err(AccountError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, email = %email, "stored password unreadable");
                return Err(AccountError::InvalidCredentials);
            }
        }

        self.session.set(&email)?;
        info!(email = %email, "user logged in");
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), AccountError> {
        self.session.clear()?;
        info!("user logged out");
        Ok(())
    }

    /// A pointer to a record that no longer exists reads as anonymous.
    /// The pointer itself is left in place.
    pub fn state(&self) -> AccountState {
        match self.current_entry() {
            Some((email, _)) => AccountState::Authenticated(email),
            None => AccountState::Anonymous,
        }
    }

    pub fn current(&self) -> Option<UserRecord> {
        self.current_entry().map(|(_, user)| user)
    }

    fn current_entry(&self) -> Option<(String, UserRecord)> {
        let email = match self.session.get() {
            Ok(Some(email)) => email,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "reading session failed; treating as logged out");
                return None;
            }
        };
        self.users.get(&email).map(|user| (email, user))
    }

    fn require_current(&self) -> Result<(String, UserRecord), AccountError> {
        self.current_entry().ok_or(AccountError::NotAuthenticated)
    }

    /// Saves email and/or password of the logged-in user.
    ///
    /// An email change moves the record to the new key in one write and then
    /// repoints the session; if repointing fails the move is undone.
    pub fn update_profile(&self, req: UpdateProfileRequest) -> Result<UserRecord, AccountError> {
        let (current_email, user) = self.require_current()?;

        let new_email = normalize_email(&req.email);
        let new_password = req.password.trim();

        if let Err(e) = validate_profile_update(&current_email, &new_email, new_password, &self.users)
        {
            warn!(email = %current_email, reason = %e, "profile update rejected");
            return Err(e.into());
        }

        let email_changed = new_email != current_email;
        let password_changed = !new_password.is_empty();
        if !email_changed && !password_changed {
            return Ok(user);
        }

        let mut updated = user.clone();
        updated.email = new_email.clone();
        if password_changed {
            updated.password = self.passwords.seal(new_password)?;
        }
        updated.updated_at = OffsetDateTime::now_utc();

        if email_changed {
            self.users.replace(&current_email, updated.clone())?;
            if let Err(e) = self.session.set(&new_email) {
                error!(error = %e, "session update failed; undoing email change");
                if let Err(undo) = self.users.replace(&new_email, user) {
                    error!(error = %undo, "undo of email change failed");
                }
                return Err(e.into());
            }
            info!(from = %current_email, to = %new_email, "email changed");
        } else {
            self.users.put(&current_email, updated.clone())?;
        }

        if password_changed {
            info!(email = %new_email, "password changed");
        }
        Ok(updated)
    }

    /// Removes the logged-in user's record, then ends the session.
    pub fn delete_account(&self) -> Result<String, AccountError> {
        let (email, _) = self.require_current()?;
        self.users.delete(&email)?;
        self.session.clear()?;
        info!(email = %email, "account deleted");
        Ok(email)
    }
}
