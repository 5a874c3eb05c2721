//! Parsing of `[<count>] <item>` lists
//!
//! Two flavours share the same count rules (a count is all ASCII digits, at
//! least 1, and applies to the item that follows it):
//!
//! - [`parse_make_args`]: command-line tokens, one item per token
//!   (`2 sword shield` is two swords and one shield).
//! - [`parse_ingredient_line`]: a line typed at the ingredient prompt, where
//!   consecutive words form one name (`2 iron ingot 1 wood`).

use super::error::{Result, ShopError};
use super::name::normalize;

/// One requested item with its count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub name: String,
    pub count: u64,
}

impl Request {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

fn is_count(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_count(token: &str) -> Result<u64> {
    let count: u64 = token
        .parse()
        .map_err(|_| ShopError::validation(format!("count '{}' is too large", token)))?;
    if count == 0 {
        return Err(ShopError::validation("count must be a natural number"));
    }
    Ok(count)
}

fn dangling(count: u64) -> ShopError {
    ShopError::validation(format!("count {} is not followed by an item name", count))
}

/// Parse `make` arguments. Items without a preceding count get `default_count`.
pub fn parse_make_args<S: AsRef<str>>(tokens: &[S], default_count: u64) -> Result<Vec<Request>> {
    if default_count == 0 {
        return Err(ShopError::validation("count must be a natural number"));
    }

    let mut requests = Vec::new();
    let mut pending: Option<u64> = None;

    for token in tokens {
        let token = token.as_ref().trim();
        if is_count(token) {
            if let Some(count) = pending {
                return Err(dangling(count));
            }
            pending = Some(parse_count(token)?);
        } else {
            let count = pending.take().unwrap_or(default_count);
            requests.push(Request::new(normalize(token)?, count));
        }
    }

    if let Some(count) = pending {
        return Err(dangling(count));
    }
    if requests.is_empty() {
        return Err(ShopError::validation("nothing to make"));
    }

    Ok(requests)
}

/// Parse an ingredient line. Names without a count default to 1.
///
/// An empty line parses to an empty list.
pub fn parse_ingredient_line(line: &str) -> Result<Vec<Request>> {
    let mut requests = Vec::new();
    let mut pending: Option<u64> = None;
    let mut words: Vec<&str> = Vec::new();

    for token in line.split_whitespace() {
        if is_count(token) {
            if !words.is_empty() {
                let count = pending.take().unwrap_or(1);
                requests.push(Request::new(normalize(&words.join(" "))?, count));
                words.clear();
            } else if let Some(count) = pending {
                return Err(dangling(count));
            }
            pending = Some(parse_count(token)?);
        } else {
            words.push(token);
        }
    }

    if !words.is_empty() {
        let count = pending.take().unwrap_or(1);
        requests.push(Request::new(normalize(&words.join(" "))?, count));
    }
    if let Some(count) = pending {
        return Err(dangling(count));
    }

    Ok(requests)
}
