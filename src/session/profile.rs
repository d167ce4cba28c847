//! Profile sync
//!
//! The profile lives in a per-user document store. Syncing is best-effort:
//! the preference cache is the source the views read, and a failed sync is
//! logged and dropped.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{MoneyError, MoneyResult};
use crate::models::{Profile, UserId};
use crate::storage::file_io::{read_json, write_json_atomic};

/// Remote (or remote-like) profile document store
pub trait ProfileSync {
    fn save_profile(&self, user: &UserId, profile: &Profile) -> MoneyResult<()>;

    fn load_profile(&self, user: &UserId) -> MoneyResult<Option<Profile>>;
}

/// One JSON document per user under a directory
pub struct JsonProfileStore {
    dir: PathBuf,
}

impl JsonProfileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn document(&self, user: &UserId) -> MoneyResult<PathBuf> {
        let id = user.as_str();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(MoneyError::Validation(format!("Unusable user id: {:?}", id)));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }
}

impl ProfileSync for JsonProfileStore {
    fn save_profile(&self, user: &UserId, profile: &Profile) -> MoneyResult<()> {
        write_json_atomic(self.document(user)?, profile)
    }

    fn load_profile(&self, user: &UserId) -> MoneyResult<Option<Profile>> {
        read_json(self.document(user)?)
    }
}

/// Save without failing the caller; returns whether the save went through
pub fn push_profile(sync: &dyn ProfileSync, user: &UserId, profile: &Profile) -> bool {
    match sync.save_profile(user, profile) {
        Ok(()) => {
            debug!(user = %user, "profile synced");
            true
        }
        Err(e) => {
            warn!(user = %user, error = %e, "profile sync failed");
            false
        }
    }
}

/// Load without failing the caller
pub fn pull_profile(sync: &dyn ProfileSync, user: &UserId) -> Option<Profile> {
    match sync.load_profile(user) {
        Ok(profile) => profile,
        Err(e) => {
            warn!(user = %user, error = %e, "profile load failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Offline;

    impl ProfileSync for Offline {
        fn save_profile(&self, _: &UserId, _: &Profile) -> MoneyResult<()> {
            Err(MoneyError::Io("offline".into()))
        }

        fn load_profile(&self, _: &UserId) -> MoneyResult<Option<Profile>> {
            Err(MoneyError::Io("offline".into()))
        }
    }

    fn profile() -> Profile {
        Profile {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: "+91 98765 43210".into(),
            currency: "USD - $ United States".into(),
        }
    }

    #[test]
    fn test_json_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonProfileStore::new(temp_dir.path().to_path_buf());
        let user = UserId::from("user-1");

        assert_eq!(store.load_profile(&user).unwrap(), None);
        store.save_profile(&user, &profile()).unwrap();
        assert_eq!(store.load_profile(&user).unwrap(), Some(profile()));
        assert_eq!(store.load_profile(&UserId::from("user-2")).unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_user_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonProfileStore::new(temp_dir.path().to_path_buf());
        assert!(store
            .save_profile(&UserId::from("../escape"), &profile())
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_best_effort_swallows_failures() {
        let user = UserId::from("user-1");
        assert!(!push_profile(&Offline, &user, &profile()));
        assert_eq!(pull_profile(&Offline, &user), None);
    }
}
