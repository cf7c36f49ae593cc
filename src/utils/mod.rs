//! Utility functions and helpers.

pub mod http;

use sha2::{Digest, Sha256};

/// SHA-256 of the UTF-8 bytes of `content`, as 64 lowercase hex characters.
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
