//! License key generation

use rand::Rng;

use crate::{entity::license, prelude::*};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SEGMENTS: usize = 3;
const SEGMENT_LEN: usize = 4;

/// Draws a fresh `XXXX-XXXX-XXXX` key. ThreadRng is cryptographically
/// secure; keys act as bearer secrets for activation.
pub fn raw_key() -> String {
  let mut rng = rand::rng();

  let mut segments = Vec::with_capacity(SEGMENTS);
  for _ in 0..SEGMENTS {
    let segment: String = (0..SEGMENT_LEN)
      .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
      .collect();
    segments.push(segment);
  }

  segments.join("-")
}

/// Draws keys until one is unused by any live license. There is no retry
/// cap; collisions are logged so a filling keyspace becomes visible long
/// before the loop degenerates.
pub async fn unique_key<C: ConnectionTrait>(db: &C) -> Result<String> {
  let mut collisions = 0u32;

  loop {
    let key = raw_key();
    if license::Entity::find_by_id(key.as_str()).one(db).await?.is_none() {
      return Ok(key);
    }

    collisions += 1;
    warn!("license key collision ({collisions} in this draw)");
  }
}
