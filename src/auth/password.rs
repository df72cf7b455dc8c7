//! bcrypt hashing for both credential stores (firm users and portal
//! customers). Cost comes from config so tests and local development can
//! run with cheap hashes.

use crate::config;

pub use bcrypt::BcryptError;

pub fn hash(plain: &str) -> Result<String, BcryptError> {
    bcrypt::hash(plain, config::config().security.bcrypt_cost)
}

/// Verification failure and malformed stored hashes both read as a
/// mismatch; callers surface one uniform authentication-failure outcome.
pub fn verify(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hashed = hash("password123").unwrap();
        assert!(verify("password123", &hashed));
        assert!(!verify("password124", &hashed));
    }

    #[test]
    fn malformed_hash_reads_as_mismatch() {
        assert!(!verify("password123", "not-a-bcrypt-hash"));
    }
}
