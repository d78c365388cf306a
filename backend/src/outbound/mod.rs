//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **store**: account document storage
//! - **crypto**: Argon2id secret hashing and HS256 session token signing
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod crypto;
pub mod store;
