//! Core functionality for the nikki diary backend
//!
//! This crate holds the storage-agnostic heart of the system: the user and
//! diary-entry records, the credential/lockout lifecycle, password-reset
//! token handling, and the repository traits a storage backend must
//! implement.
//!
//! The crate is consumed by storage backends (e.g. `nikki-storage-sqlite`)
//! and by the `nikki` facade crate; application code normally depends on the
//! facade rather than on this crate directly.
pub mod crypto;
pub mod entry;
pub mod error;
pub mod outcome;
pub mod repositories;
pub mod services;
pub mod user;
pub mod validation;

pub use entry::{DiaryEntry, EntryId};
pub use error::Error;
pub use outcome::Outcome;
pub use user::{User, UserId, UserProfile};
