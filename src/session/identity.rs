//! Identity provider
//!
//! Stores never look up the signed-in user themselves; callers resolve a
//! [`UserId`] here and pass it down explicitly.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MoneyError, MoneyResult};
use crate::models::UserId;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Source of the signed-in user
pub trait IdentityProvider {
    /// The signed-in user, if any
    fn current_user(&self) -> MoneyResult<Option<UserId>>;

    /// The signed-in user, failing with `Unauthenticated` when signed out
    fn require_user(&self) -> MoneyResult<UserId> {
        self.current_user()?.ok_or_else(|| {
            MoneyError::Unauthenticated("run `moneyman auth login <email>` first".into())
        })
    }
}

/// A fixed identity (tests and embedding)
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<UserId>);

impl StaticIdentity {
    pub fn signed_in(user: UserId) -> Self {
        Self(Some(user))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> MoneyResult<Option<UserId>> {
        Ok(self.0.clone())
    }
}

/// A local account known to this machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAccount {
    pub email: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    current: Option<UserId>,
    #[serde(default)]
    accounts: Vec<LocalAccount>,
}

/// File-backed session: remembers local accounts and who is signed in
pub struct SessionIdentity {
    path: PathBuf,
}

impl SessionIdentity {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> MoneyResult<SessionFile> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Sign in as `email`, creating a local account on first use
    ///
    /// Returns the user id and whether the account was just created.
    pub fn login(&self, email: &str) -> MoneyResult<(UserId, bool)> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(MoneyError::Validation(format!(
                "Invalid email address: {}",
                email
            )));
        }

        let mut session = self.load()?;
        let (user_id, created) = match session.accounts.iter().find(|a| a.email == email) {
            Some(account) => (account.user_id.clone(), false),
            None => {
                let account = LocalAccount {
                    email: email.clone(),
                    user_id: UserId::generate(),
                    created_at: Utc::now(),
                };
                let id = account.user_id.clone();
                session.accounts.push(account);
                (id, true)
            }
        };

        session.current = Some(user_id.clone());
        write_json_atomic(&self.path, &session)?;
        info!(user = %user_id, created, "signed in");
        Ok((user_id, created))
    }

    /// Sign out; returns whether anyone was signed in
    pub fn logout(&self) -> MoneyResult<bool> {
        let mut session = self.load()?;
        let was_signed_in = session.current.take().is_some();
        write_json_atomic(&self.path, &session)?;
        Ok(was_signed_in)
    }

    /// Email of the signed-in account
    pub fn current_email(&self) -> MoneyResult<Option<String>> {
        let session = self.load()?;
        Ok(session.current.and_then(|id| {
            session
                .accounts
                .into_iter()
                .find(|a| a.user_id == id)
                .map(|a| a.email)
        }))
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> MoneyResult<Option<UserId>> {
        Ok(self.load()?.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_signed_out_requires_login() {
        let temp_dir = TempDir::new().unwrap();
        let identity = SessionIdentity::new(temp_dir.path().join("session.json"));

        assert_eq!(identity.current_user().unwrap(), None);
        assert!(identity.require_user().unwrap_err().is_unauthenticated());
    }

    #[test]
    fn test_login_reuses_account() {
        let temp_dir = TempDir::new().unwrap();
        let identity = SessionIdentity::new(temp_dir.path().join("session.json"));

        let (first, created) = identity.login("Asha@Example.com").unwrap();
        assert!(created);
        assert_eq!(identity.require_user().unwrap(), first);
        assert_eq!(
            identity.current_email().unwrap().as_deref(),
            Some("asha@example.com")
        );

        assert!(identity.logout().unwrap());
        assert!(!identity.logout().unwrap());
        assert_eq!(identity.current_user().unwrap(), None);

        let (second, created) = identity.login(" asha@example.com ").unwrap();
        assert!(!created);
        assert_eq!(first, second);

        let (other, _) = identity.login("ravi@example.com").unwrap();
        assert_ne!(other, first);
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let temp_dir = TempDir::new().unwrap();
        let identity = SessionIdentity::new(temp_dir.path().join("session.json"));
        assert!(identity.login("not-an-email").unwrap_err().is_validation());
    }

    #[test]
    fn test_static_identity() {
        let user = UserId::from("u1");
        assert_eq!(
            StaticIdentity::signed_in(user.clone()).require_user().unwrap(),
            user
        );
        assert!(StaticIdentity::signed_out().require_user().is_err());
    }
}
