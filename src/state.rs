use crate::accounts::{
    password::PasswordScheme, repo::UserStore, services::AccountService, session::SessionPointer,
};
use crate::config::AppConfig;
use crate::storage::{FileSlots, MemorySlots, SlotStorage};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    /// One action at a time: each handler holds the lock for its whole
    /// read-modify-write.
    ///
    /// There is a single session pointer per process, so the server acts on
    /// behalf of one user at a time: whoever logged in last is the user every
    /// client sees on `/me`. Do not expose it as a multi-user service.
    pub accounts: Arc<Mutex<AccountService>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let user_slots = match &config.data_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "persisting users to disk");
                Arc::new(FileSlots::open(dir)?) as Arc<dyn SlotStorage>
            }
            None => {
                tracing::warn!("DATA_DIR not set; users are kept in memory only");
                Arc::new(MemorySlots::new()) as Arc<dyn SlotStorage>
            }
        };
        // Sessions never outlive the process.
        let session_slots = Arc::new(MemorySlots::new()) as Arc<dyn SlotStorage>;

        if config.password_scheme == PasswordScheme::Plaintext {
            tracing::warn!("password scheme is plaintext; demo use only");
        }

        let accounts = AccountService::new(
            UserStore::new(user_slots),
            SessionPointer::new(session_slots),
            config.password_scheme,
        );
        Ok(Self::from_parts(config, accounts))
    }

    pub fn from_parts(config: Arc<AppConfig>, accounts: AccountService) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
            config,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: None,
            password_scheme: PasswordScheme::Plaintext,
        });
        let accounts = AccountService::in_memory(config.password_scheme);
        Self::from_parts(config, accounts)
    }
}
