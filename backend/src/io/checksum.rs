//! Dataset fingerprinting.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use crate::error::{AnalysisError, AnalysisResult, ErrorContext};

/// Hex SHA-256 of `content`.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Fingerprint of a set of input files: one SHA-256 over every file's bytes,
/// in the given order, each preceded by its length.
pub fn fingerprint_files<P: AsRef<Path>>(paths: &[P]) -> AnalysisResult<String> {
    let mut hasher = Sha256::new();
    for path in paths {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            AnalysisError::load(
                format!("cannot read input: {}", e),
                ErrorContext::new("fingerprint").with_entity_id(path.display()),
            )
        })?;
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(&bytes);
    }
    Ok(hex::encode(hasher.finalize()))
}
