//! Password hashing and verification.
//!
//! # Stored forms
//! ```text
//! ""                                    → no password required
//! "hunter2"                             → legacy plaintext (migrated on save)
//! "sha256$<hex>"                        → legacy unsalted digest (migrated on login)
//! "pbkdf2_sha256$<iter>$<salt>$<key>"   → current scheme, base64 salt/key
//! ```
//!
//! # Constraints
//! - Every comparison of secret material is constant-time
//! - Malformed stored values verify as `false`, never as an error

pub mod hasher;

pub use hasher::{
    constant_time_eq, hash_password, is_hashed, is_legacy_digest, needs_migration, verify,
    HASH_ALGORITHM, HASH_ITERATIONS,
};
