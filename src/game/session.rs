//! # User Registry & Session Management
//!
//! Tracks registered users, the single active session, and online-set
//! membership. The registry is a non-secret name registry: there are no
//! passwords, and logging in as a second user implicitly logs out the first
//! (single-session model).
//!
//! ## Invariants
//!
//! - The active user, when present, exists in the registry and is online.
//! - The online set is exactly the set of users whose `is_online` flag is set.
//! - Users are never deleted; only `is_online` is mutated after registration.
//!
//! An `admin` identity is seeded pre-registered, pre-online and admin-flagged
//! at construction, so the online set is non-empty from t=0.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::game::errors::GameError;
use crate::validation::validate_username;

/// A registered user. The name is the primary key, stored lowercase.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub name: String,
    pub is_online: bool,
    pub is_admin: bool,
    pub registered_at: DateTime<Utc>,
}

/// The process-wide session singleton: user registry, active user and the
/// online set.
#[derive(Debug)]
pub struct SessionRegistry {
    users: BTreeMap<String, UserRecord>,
    active: Option<String>,
    online: BTreeSet<String>,
}

impl SessionRegistry {
    /// Create a registry seeded with the `admin` identity: registered,
    /// online, and admin-flagged, but not the active session.
    pub fn new() -> Self {
        let mut users = BTreeMap::new();
        let mut online = BTreeSet::new();
        users.insert(
            "admin".to_string(),
            UserRecord {
                name: "admin".to_string(),
                is_online: true,
                is_admin: true,
                registered_at: Utc::now(),
            },
        );
        online.insert("admin".to_string());
        SessionRegistry {
            users,
            active: None,
            online,
        }
    }

    /// Register a new user under the canonical lowercase form of `raw`.
    ///
    /// Fails with [`GameError::InvalidUsername`] on a malformed name and
    /// [`GameError::DuplicateUser`] when the name is taken. New users start
    /// offline and unprivileged.
    pub fn register(&mut self, raw: &str) -> Result<&UserRecord, GameError> {
        let name = validate_username(raw)?;
        if self.users.contains_key(&name) {
            return Err(GameError::DuplicateUser(name));
        }
        info!("registered user '{}'", name);
        let record = UserRecord {
            name: name.clone(),
            is_online: false,
            is_admin: false,
            registered_at: Utc::now(),
        };
        Ok(self.users.entry(name).or_insert(record))
    }

    /// Log in as `raw`, evicting the currently active user if any.
    ///
    /// Fails with [`GameError::UnknownUser`] when the name is not registered.
    /// The previous active user (if different) is marked offline and removed
    /// from the online set before the new user becomes active.
    pub fn login(&mut self, raw: &str) -> Result<&UserRecord, GameError> {
        let name = raw.trim().to_lowercase();
        if !self.users.contains_key(&name) {
            return Err(GameError::UnknownUser(name));
        }

        // Single-session model: a new login displaces the old one.
        if let Some(previous) = self.active.take() {
            if previous != name {
                debug!("implicit logout of '{}' (displaced by '{}')", previous, name);
                self.mark_offline(&previous)?;
            }
        }

        let record = self
            .users
            .get_mut(&name)
            .ok_or_else(|| GameError::Internal(format!("user '{}' vanished during login", name)))?;
        record.is_online = true;
        self.online.insert(name.clone());
        self.active = Some(name.clone());
        info!("user '{}' logged in", name);
        Ok(&self.users[&name])
    }

    /// Log out the active user.
    ///
    /// Fails with [`GameError::NoActiveSession`] when nobody is active.
    /// Returns the name of the user that was logged out.
    pub fn logout(&mut self) -> Result<String, GameError> {
        let name = self.active.take().ok_or(GameError::NoActiveSession)?;
        self.mark_offline(&name)?;
        info!("user '{}' logged out", name);
        Ok(name)
    }

    fn mark_offline(&mut self, name: &str) -> Result<(), GameError> {
        let record = self.users.get_mut(name).ok_or_else(|| {
            GameError::Internal(format!("active user '{}' missing from registry", name))
        })?;
        record.is_online = false;
        self.online.remove(name);
        Ok(())
    }

    /// Name of the active user, if any.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Record of the active user, if any. Errs with an internal-consistency
    /// error when the active pointer refers to a missing or offline record.
    pub fn active_user(&self) -> Result<Option<&UserRecord>, GameError> {
        match &self.active {
            None => Ok(None),
            Some(name) => {
                let record = self.users.get(name).ok_or_else(|| {
                    GameError::Internal(format!("active user '{}' missing from registry", name))
                })?;
                if !record.is_online {
                    return Err(GameError::Internal(format!(
                        "active user '{}' is not online",
                        name
                    )));
                }
                Ok(Some(record))
            }
        }
    }

    /// Whether somebody is logged in.
    pub fn is_logged_in(&self) -> bool {
        self.active.is_some()
    }

    /// Look up a user by canonical name.
    pub fn user(&self, name: &str) -> Option<&UserRecord> {
        self.users.get(name)
    }

    /// All registered users in name order.
    pub fn users(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values()
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// The online set, in name order.
    pub fn online_set(&self) -> &BTreeSet<String> {
        &self.online
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
