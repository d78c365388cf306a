//! Cryptographic adapters: secret hashing and session token signing.

mod argon2_hasher;
mod jwt_signer;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt_signer::JwtTokenSigner;
