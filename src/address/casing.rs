//! Post-parse casing rules.
//!
//! # Responsibilities
//! - Rewrite a declared subset of [`ParsedAddress`] fields in place
//! - Leave every other field untouched
//!
//! # Design Decisions
//! - Rules run in declaration order, so `Province` is title-cased and then
//!   upper-cased, the upper-case result winning
//! - Absent fields stay `None`; no sentinel string is ever substituted

use crate::address::types::{AddressField, ParsedAddress};
use crate::config::schema::PostProcessConfig;

/// A casing transformation applied to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    Title,
    Upper,
}

impl Casing {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Casing::Title => title_case(value),
            Casing::Upper => value.to_uppercase(),
        }
    }
}

/// Ordered list of `(field, casing)` rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasingPolicy {
    rules: Vec<(AddressField, Casing)>,
}

impl CasingPolicy {
    pub fn new(rules: Vec<(AddressField, Casing)>) -> Self {
        Self { rules }
    }

    /// Title-case rules first, then upper-case rules.
    pub fn from_config(config: &PostProcessConfig) -> Self {
        let rules = config
            .title_case
            .iter()
            .map(|field| (*field, Casing::Title))
            .chain(config.upper_case.iter().map(|field| (*field, Casing::Upper)))
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[(AddressField, Casing)] {
        &self.rules
    }

    pub fn apply(&self, mut parsed: ParsedAddress) -> ParsedAddress {
        for (field, casing) in &self.rules {
            if let Some(value) = parsed.slot_mut(*field) {
                *value = casing.apply(value);
            }
        }
        parsed
    }
}

impl Default for CasingPolicy {
    fn default() -> Self {
        Self::from_config(&PostProcessConfig::default())
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A letter starts a word when the character before it is not
/// alphanumeric, so `saint-denis` becomes `Saint-Denis` and `3rd` stays `3rd`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        in_word = c.is_alphanumeric();
    }
    out
}
