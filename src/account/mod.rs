//! Account session: the signed-in user and where it is persisted.
//!
//! Only `{name, email}` survives a reload, stored as JSON under the fixed
//! key [`USER_STORAGE_KEY`]. Server records are never persisted.
//!
//! # Examples
//!
//! ```
//! use rbz_host::account::{AccountSession, MemoryStorage, RegisterForm};
//!
//! let mut session = AccountSession::load(MemoryStorage::new()).unwrap();
//! assert!(session.current_user().is_none());
//!
//! let form = RegisterForm {
//!     name: "Steve".to_string(),
//!     email: "steve@example.com".to_string(),
//!     password: "diamond".to_string(),
//!     confirm_password: "diamond".to_string(),
//! };
//! session.register(&form).unwrap();
//!
//! // A new session over the same storage sees the saved user
//! let reloaded = AccountSession::load(session.into_storage()).unwrap();
//! assert_eq!(reloaded.current_user().unwrap().name, "Steve");
//! ```
pub mod auth;
mod storage;

pub use auth::{RegisterForm, SignInForm, UserProfile};
pub use storage::{FileStorage, MemoryStorage, Storage};

use crate::error::{Error, Result};

/// Key the signed-in user is stored under
pub const USER_STORAGE_KEY: &str = "user";

/// Read the stored user, if any
pub fn load_user(storage: &dyn Storage) -> Result<Option<UserProfile>> {
    match storage.get_item(USER_STORAGE_KEY)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::Serialization(format!("Malformed stored user: {}", e))),
        None => Ok(None),
    }
}

/// Store the user under [`USER_STORAGE_KEY`]
pub fn save_user(storage: &mut dyn Storage, user: &UserProfile) -> Result<()> {
    let raw = serde_json::to_string(user)
        .map_err(|e| Error::Serialization(format!("Failed to encode user: {}", e)))?;
    storage.set_item(USER_STORAGE_KEY, &raw)
}

/// Signed-in state backed by a [`Storage`]
pub struct AccountSession<S: Storage> {
    storage: S,
    user: Option<UserProfile>,
}

impl<S: Storage> AccountSession<S> {
    /// Read the stored user once.
    ///
    /// A stored value that does not parse is treated as signed out.
    #[tracing::instrument(skip(storage))]
    pub fn load(storage: S) -> Result<Self> {
        let user = match load_user(&storage) {
            Ok(user) => user,
            Err(Error::Serialization(msg)) => {
                tracing::warn!(error = %msg, "Ignoring unreadable stored user");
                None
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(signed_in = user.is_some(), "Account session loaded");
        Ok(Self { storage, user })
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Sign in and persist the user; nothing is written when the form is incomplete
    #[tracing::instrument(skip(self, form))]
    pub fn sign_in(&mut self, form: &SignInForm) -> Result<&UserProfile> {
        let user = auth::sign_in(form)?;
        self.persist(user)
    }

    /// Register and persist the user; nothing is written when the form is rejected
    #[tracing::instrument(skip(self, form))]
    pub fn register(&mut self, form: &RegisterForm) -> Result<&UserProfile> {
        let user = auth::register(form)?;
        self.persist(user)
    }

    /// Forget the user in memory and in storage
    #[tracing::instrument(skip(self))]
    pub fn sign_out(&mut self) -> Result<()> {
        self.storage.remove_item(USER_STORAGE_KEY)?;
        self.user = None;
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self, user: UserProfile) -> Result<&UserProfile> {
        save_user(&mut self.storage, &user)?;
        tracing::info!(user = %user.name, "Signed in");
        Ok(self.user.insert(user))
    }
}
