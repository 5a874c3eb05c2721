//! Item name normalization
//!
//! Names are compared in one canonical form everywhere: trimmed, runs of
//! whitespace collapsed to a single space, lower-cased. "Iron  Ingot" and
//! "iron ingot" are the same item.

use super::error::{Result, ShopError};

/// Normalize an item name, rejecting names that are empty once trimmed.
pub fn normalize(raw: &str) -> Result<String> {
    let name = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if name.is_empty() {
        return Err(ShopError::validation("item name cannot be empty"));
    }

    Ok(name)
}
