//! Credential store and current-session identity.
//!
//! Password checks use constant-time comparison to mitigate timing attacks.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::models::{Credential, User};
use crate::storage::{keys, Storage};
use crate::store::events::{IdentityEvent, Publisher};

/// Request body for registering a new account.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Owns the registered users collection and the current-session identity.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    users: Vec<Credential>,
    current: Option<User>,
    publisher: Publisher<IdentityEvent>,
}

impl SessionStore {
    /// Hydrate users and session identity from storage.
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let users = read_users(storage.as_ref());
        let current = read_current(storage.as_ref());
        Self {
            storage,
            users,
            current,
            publisher: Publisher::new(),
        }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Register a subscriber for identity-changed events.
    pub fn subscribe(&mut self) -> Receiver<IdentityEvent> {
        self.publisher.subscribe()
    }

    /// Register a new account and establish it as the session identity.
    pub fn signup(&mut self, request: &SignupRequest) -> Result<User, AppError> {
        if request.name.trim().is_empty()
            || request.email.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(AppError::Validation(
                "Name, email, and password are required".to_string(),
            ));
        }
        if self.users.iter().any(|u| u.email == request.email) {
            return Err(AppError::Validation(
                "A user with that email already exists".to_string(),
            ));
        }

        let credential = Credential {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
        };
        let user = User {
            id: credential.id.clone(),
            name: credential.name.clone(),
            email: credential.email.clone(),
        };

        self.users.push(credential);
        self.persist_users()?;
        self.set_current(Some(user.clone()))?;
        tracing::info!("Signed up {}", user.email);
        Ok(user)
    }

    /// Check credentials and establish the session identity.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AppError> {
        let matched = self
            .users
            .iter()
            .find(|u| u.email == email && constant_time_compare(&u.password, password))
            .map(|u| User {
                id: u.id.clone(),
                name: u.name.clone(),
                email: u.email.clone(),
            });

        let Some(user) = matched else {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        };

        self.set_current(Some(user.clone()))?;
        tracing::info!("Logged in {}", user.email);
        Ok(user)
    }

    /// Clear the session identity.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.set_current(None)
    }

    /// Rehydrate from storage (cross-tab storage-change signal).
    pub fn reload(&mut self) {
        self.users = read_users(self.storage.as_ref());
        let current = read_current(self.storage.as_ref());
        if current != self.current {
            self.current = current;
            self.publisher.emit(IdentityEvent {
                user: self.current.clone(),
            });
        }
    }

    fn set_current(&mut self, user: Option<User>) -> Result<(), AppError> {
        match &user {
            Some(user) => {
                let raw = serde_json::to_string(user)?;
                self.storage.set(keys::CURRENT_USER, &raw)?;
            }
            None => self.storage.remove(keys::CURRENT_USER)?,
        }
        self.current = user;
        self.publisher.emit(IdentityEvent {
            user: self.current.clone(),
        });
        Ok(())
    }

    fn persist_users(&self) -> Result<(), AppError> {
        let raw = serde_json::to_string(&self.users)?;
        self.storage.set(keys::USERS, &raw)
    }
}

fn read_users(storage: &dyn Storage) -> Vec<Credential> {
    storage
        .get(keys::USERS)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

fn read_current(storage: &dyn Storage) -> Option<User> {
    storage
        .get(keys::CURRENT_USER)
        .and_then(|raw| serde_json::from_str(&raw).ok())
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
