//! Persisted session state. Two stores are injected: the long-lived one
//! (`localStorage`) holds the role and identifiers plus the academic-session
//! cache; the per-tab one (`sessionStorage`) holds the bearer token and the
//! organization context the back office sets after login.
//!
//! `clear()` only removes the three session keys. The academic-session cache
//! and the organization context survive a logout and are invalidated by an
//! explicit user action instead, so pages must tolerate a cache left over from
//! a previous user.

use crate::{
    app_lib::{KeyValueStorage, StorageError},
    features::auth::role::Role,
};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod keys {
    pub const USER_ROLE: &str = "userRole";
    pub const USER_ID: &str = "userId";
    pub const LOGIN_ID: &str = "loginId";
    pub const ACADEMIC_SESSION_ID: &str = "academicSessionId";
    pub const ORG_ID: &str = "orgId";
    pub const BRANCH_ID: &str = "branchId";

    // per tab
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const TAB_ORGANIZATION_ID: &str = "organization_id";
    pub const TAB_BRANCH_ID: &str = "branch_id";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    pub user_id: String,
    pub login_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrganizationContext {
    pub organization_id: String,
    pub branch_id: String,
}

#[derive(Clone)]
pub struct SessionStore {
    local: Arc<dyn KeyValueStorage>,
    tab: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(local: Arc<dyn KeyValueStorage>, tab: Arc<dyn KeyValueStorage>) -> Self {
        Self { local, tab }
    }

    /// Overwrites role, user id and login id. On a failed write, keys already
    /// written by this call are removed again so no role is left behind.
    ///
    /// # Errors
    /// Returns the storage error that interrupted the write.
    pub fn write(&self, session: &Session) -> Result<(), StorageError> {
        let entries = [
            (keys::USER_ROLE, session.role.as_str()),
            (keys::USER_ID, session.user_id.as_str()),
            (keys::LOGIN_ID, session.login_id.as_str()),
        ];

        for (written, (key, value)) in entries.iter().enumerate() {
            if let Err(err) = self.local.set(key, value) {
                for (rollback, _) in &entries[..written] {
                    if let Err(rollback_err) = self.local.remove(rollback) {
                        warn!(key = rollback, "session rollback failed: {rollback_err}");
                    }
                }
                return Err(err);
            }
        }

        debug!(role = %session.role, "session written");
        Ok(())
    }

    /// Returns the persisted session; `None` when no role is stored.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub fn read(&self) -> Result<Option<Session>, StorageError> {
        let Some(role) = self.local.get(keys::USER_ROLE)? else {
            return Ok(None);
        };

        Ok(Some(Session {
            role: Role::from_key(&role),
            user_id: self.local.get(keys::USER_ID)?.unwrap_or_default(),
            login_id: self.local.get(keys::LOGIN_ID)?.unwrap_or_default(),
        }))
    }

    /// Whether a role is stored. Read failures count as logged out.
    #[must_use]
    pub fn has_role(&self) -> bool {
        matches!(self.local.get(keys::USER_ROLE), Ok(Some(_)))
    }

    /// Removes role, user id and login id. Leaves the academic-session cache and
    /// organization context in place.
    ///
    /// # Errors
    /// Returns the first storage error encountered.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.local.remove(keys::USER_ROLE)?;
        self.local.remove(keys::USER_ID)?;
        self.local.remove(keys::LOGIN_ID)?;
        debug!("session cleared");
        Ok(())
    }

    /// Removes only the role key, the logged-out signal.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be updated.
    pub fn clear_role(&self) -> Result<(), StorageError> {
        self.local.remove(keys::USER_ROLE)
    }

    /// Bearer token for protected files, if this tab holds one.
    ///
    /// # Errors
    /// Returns an error if the per-tab storage cannot be read.
    pub fn access_token(&self) -> Result<Option<SecretString>, StorageError> {
        Ok(self
            .tab
            .get(keys::ACCESS_TOKEN)?
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from))
    }

    /// # Errors
    /// Returns an error if the per-tab storage cannot be updated.
    pub fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.tab.set(keys::ACCESS_TOKEN, token)
    }

    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub fn academic_session_id(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .local
            .get(keys::ACADEMIC_SESSION_ID)?
            .filter(|id| !id.trim().is_empty()))
    }

    /// # Errors
    /// Returns an error if the storage cannot be updated.
    pub fn set_academic_session_id(&self, id: &str) -> Result<(), StorageError> {
        self.local.set(keys::ACADEMIC_SESSION_ID, id)
    }

    /// Drops the cached academic session. Only called on explicit user action.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be updated.
    pub fn clear_academic_session(&self) -> Result<(), StorageError> {
        self.local.remove(keys::ACADEMIC_SESSION_ID)
    }

    /// Organization and branch, per-tab values first, then the long-lived ones.
    /// `None` unless both are known.
    ///
    /// # Errors
    /// Returns an error if either storage cannot be read.
    pub fn organization(&self) -> Result<Option<OrganizationContext>, StorageError> {
        let organization_id = self.first_of(keys::TAB_ORGANIZATION_ID, keys::ORG_ID)?;
        let branch_id = self.first_of(keys::TAB_BRANCH_ID, keys::BRANCH_ID)?;

        Ok(match (organization_id, branch_id) {
            (Some(organization_id), Some(branch_id)) => Some(OrganizationContext {
                organization_id,
                branch_id,
            }),
            _ => None,
        })
    }

    /// Stores the organization context for this tab.
    ///
    /// # Errors
    /// Returns an error if the per-tab storage cannot be updated.
    pub fn set_organization(&self, context: &OrganizationContext) -> Result<(), StorageError> {
        self.tab
            .set(keys::TAB_ORGANIZATION_ID, &context.organization_id)?;
        self.tab.set(keys::TAB_BRANCH_ID, &context.branch_id)
    }

    fn first_of(&self, tab_key: &str, local_key: &str) -> Result<Option<String>, StorageError> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        if let Some(value) = non_empty(self.tab.get(tab_key)?) {
            return Ok(Some(value));
        }
        Ok(non_empty(self.local.get(local_key)?))
    }
}
