//! Password hashing capability

use argon2::{
  Argon2,
  password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    rand_core::OsRng,
  },
};

use crate::prelude::*;

/// Opaque hashing capability; handlers never see the algorithm.
pub trait PasswordHasher: Send + Sync {
  fn hash(&self, password: &str) -> Result<String>;
  fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
  fn hash(&self, password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|err| anyhow::anyhow!("password hashing failed: {err}"))?;
    Ok(hash.to_string())
  }

  fn verify(&self, password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|err| {
      anyhow::anyhow!("stored password hash is malformed: {err}")
    })?;
    Ok(
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_hash_roundtrip() {
    let hasher = Argon2Hasher;
    let hash = hasher.hash("hunter22").unwrap();

    assert_ne!(hash, "hunter22");
    assert!(hasher.verify("hunter22", &hash).unwrap());
    assert!(!hasher.verify("wrong", &hash).unwrap());
  }

  #[test]
  fn test_malformed_hash_is_an_error() {
    let hasher = Argon2Hasher;
    assert!(hasher.verify("whatever", "not-a-phc-string").is_err());
  }
}
