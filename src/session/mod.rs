//! Session collaborators
//!
//! Who is signed in, and where their profile document lives.

pub mod identity;
pub mod profile;

pub use identity::{IdentityProvider, LocalAccount, SessionIdentity, StaticIdentity};
pub use profile::{pull_profile, push_profile, JsonProfileStore, ProfileSync};
