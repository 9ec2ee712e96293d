#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Session persistence for the HRMS client
//!
//! [`SessionStore`] keeps the access token, the refresh token and the signed-in
//! user's [`Profile`] in a [`KeyValueStore`] backend under three fixed keys.
//! Reads are fail-soft: a missing key, a backend failure or malformed JSON all
//! read as "absent". Writes report [`StorageError`], except [`SessionStore::clear`]
//! which always succeeds.

mod backend;
mod error;
mod model;
mod secret;
mod store;

pub use backend::{FileStore, KeyValueStore, MemoryStore, SESSION_FILE_NAME};
pub use error::StorageError;
pub use model::{Profile, ProfilePatch, Role, Session};
pub use secret::SecretString;
pub use store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStore, USER_KEY};
