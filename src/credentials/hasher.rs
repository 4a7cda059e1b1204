//! PBKDF2-HMAC-SHA256 credential hashing with legacy fallbacks.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use rand::Rng;
use ring::{digest, hmac, pbkdf2};
use std::num::NonZeroU32;

/// Algorithm tag at the start of every current-scheme hash.
pub const HASH_ALGORITHM: &str = "pbkdf2_sha256";

/// Iteration count used for new hashes. Stored per hash, so raising it
/// does not invalidate existing records.
pub const HASH_ITERATIONS: u32 = 210_000;

/// Stored values claiming more iterations than this are rejected unverified.
const MAX_ITERATIONS: u32 = HASH_ITERATIONS * 10;

/// Prefix of the unsalted digests written by older clients.
const LEGACY_DIGEST_PREFIX: &str = "sha256$";

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// How a stored password value is interpreted.
#[derive(Debug, PartialEq, Eq)]
enum StoredCredential<'a> {
    Empty,
    Plaintext(&'a str),
    LegacyDigest(&'a str),
    Pbkdf2(&'a str),
}

impl<'a> StoredCredential<'a> {
    fn classify(stored: &'a str) -> Self {
        if stored.is_empty() {
            StoredCredential::Empty
        } else if is_hashed(stored) {
            StoredCredential::Pbkdf2(stored)
        } else if let Some(hex) = stored.strip_prefix(LEGACY_DIGEST_PREFIX) {
            StoredCredential::LegacyDigest(hex)
        } else {
            StoredCredential::Plaintext(stored)
        }
    }
}

/// Decoded `pbkdf2_sha256$iter$salt$key` value.
struct EncodedHash {
    iterations: NonZeroU32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl EncodedHash {
    fn parse(encoded: &str) -> Option<Self> {
        let mut parts = encoded.split('$');
        if parts.next()? != HASH_ALGORITHM {
            return None;
        }
        let iterations: u32 = parts.next()?.parse().ok()?;
        if iterations > MAX_ITERATIONS {
            return None;
        }
        let iterations = NonZeroU32::new(iterations)?;
        let salt = B64.decode(parts.next()?).ok()?;
        let key = B64.decode(parts.next()?).ok()?;
        if parts.next().is_some() || salt.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self {
            iterations,
            salt,
            key,
        })
    }

    fn encode(&self) -> String {
        format!(
            "{}${}${}${}",
            HASH_ALGORITHM,
            self.iterations,
            B64.encode(&self.salt),
            B64.encode(&self.key)
        )
    }
}

/// Hash a password with a fresh random salt.
pub fn hash_password(plaintext: &str) -> String {
    let iterations = NonZeroU32::new(HASH_ITERATIONS).unwrap_or(NonZeroU32::MIN);
    hash_with_iterations(plaintext, iterations)
}

fn hash_with_iterations(plaintext: &str, iterations: NonZeroU32) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LEN];
    pbkdf2::derive(PBKDF2_ALG, iterations, &salt, plaintext.as_bytes(), &mut key);

    EncodedHash {
        iterations,
        salt: salt.to_vec(),
        key: key.to_vec(),
    }
    .encode()
}

/// Whether a stored value is already in the current hashed form.
pub fn is_hashed(value: &str) -> bool {
    value
        .strip_prefix(HASH_ALGORITHM)
        .is_some_and(|rest| rest.starts_with('$'))
}

/// Whether a stored value is plaintext that the store should hash on save.
///
/// Legacy digests are not included: their plaintext is unknown until the
/// user logs in again.
pub fn needs_migration(stored: &str) -> bool {
    matches!(StoredCredential::classify(stored), StoredCredential::Plaintext(_))
}

/// Whether a stored value is a legacy digest that should be rehashed after
/// the next successful login.
pub fn is_legacy_digest(stored: &str) -> bool {
    matches!(StoredCredential::classify(stored), StoredCredential::LegacyDigest(_))
}

/// Check a provided password against a stored value.
pub fn verify(stored: &str, provided: &str) -> bool {
    match StoredCredential::classify(stored) {
        StoredCredential::Empty => provided.is_empty(),
        StoredCredential::Plaintext(expected) => {
            constant_time_eq(expected.as_bytes(), provided.as_bytes())
        }
        StoredCredential::LegacyDigest(hex) => {
            let computed = to_hex(digest::digest(&digest::SHA256, provided.as_bytes()).as_ref());
            constant_time_eq(hex.to_ascii_lowercase().as_bytes(), computed.as_bytes())
        }
        StoredCredential::Pbkdf2(encoded) => match EncodedHash::parse(encoded) {
            Some(hash) => pbkdf2::verify(
                PBKDF2_ALG,
                hash.iterations,
                &hash.salt,
                provided.as_bytes(),
                &hash.key,
            )
            .is_ok(),
            None => {
                tracing::warn!("Stored password hash is malformed, rejecting");
                false
            }
        },
    }
}

/// Constant-time byte comparison.
///
/// Both inputs are MACed under a throwaway key and the tags compared with
/// `hmac::verify`, so timing depends on neither content nor length.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut key_bytes = [0u8; 32];
    rand::thread_rng().fill(&mut key_bytes);
    let key = hmac::Key::new(hmac::HMAC_SHA256, &key_bytes);
    let tag = hmac::sign(&key, a);
    hmac::verify(&key, b, tag.as_ref()).is_ok()
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
