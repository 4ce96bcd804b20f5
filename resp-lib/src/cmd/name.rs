//! Mapping a lower-camel call name onto command tokens.
//!
//! `set` → `SET`, `configRewrite` → `CONFIG REWRITE`,
//! `clusterSetConfigEpoch` → `CLUSTER SET-CONFIG-EPOCH`.

use crate::Error;
use bytes::Bytes;
use std::mem;

/// Resolve `name` into the primary token and, if the name has more than one
/// word, the secondary token.
pub(crate) fn resolve(name: &str) -> crate::Result<Vec<Bytes>> {
    let words = split_words(name);

    let (primary, rest) = words
        .split_first()
        .ok_or_else(|| Error::InvalidCommand(name.to_string()))?;

    let mut tokens = Vec::with_capacity(2);
    tokens.push(Bytes::from(primary.to_ascii_uppercase()));

    // All remaining words form a single dash separated subcommand.
    if !rest.is_empty() {
        tokens.push(Bytes::from(rest.join("-").to_ascii_uppercase()));
    }

    Ok(tokens)
}

/// Split at every uppercase letter, lowercasing each word.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();

    for c in name.chars() {
        if c.is_ascii_uppercase() && !word.is_empty() {
            words.push(mem::take(&mut word));
        }
        word.push(c.to_ascii_lowercase());
    }

    if !word.is_empty() {
        words.push(word);
    }

    words
}
