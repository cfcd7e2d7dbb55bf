//! Salted password hashes in the form `sha256$<salt hex>$<digest hex>`.

use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Hash `password` with a fresh random salt.
pub fn create_hash(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    format!(
        "{}${}${}",
        SCHEME,
        hex::encode(salt),
        hex::encode(digest(&salt, password))
    )
}

/// Check `password` against a hash produced by [`create_hash`].
pub fn is_valid_password(hash: &str, password: &str) -> bool {
    let mut parts = hash.splitn(3, '$');
    let (Some(scheme), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    match (hex::decode(salt), hex::decode(expected)) {
        (Ok(salt), Ok(expected)) => constant_time_eq(&digest(&salt, password), &expected),
        _ => false,
    }
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

// Time depends only on the lengths, never on where the bytes differ.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |diff, (l, r)| diff | (l ^ r))
        == 0
}
