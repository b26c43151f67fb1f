//! Text normalization applied to raw addresses before parsing.
//!
//! # Pipeline
//! ```text
//! raw → comma cleaning → lowercase → trim → whitespace collapse → hyphen cleaning
//! ```
//!
//! # Design Decisions
//! - Every step is a pure `&str → String` function and idempotent on its own
//! - The composed pipeline is a fixed point on its own output
//! - No input is rejected here; empty strings flow through to the backend

use std::sync::LazyLock;

use regex::Regex;

static COMMAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,[\s,]*").expect("comma pattern is valid"));

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static SPACED_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-\s*").expect("hyphen pattern is valid"));

/// `unit-civic` prefix such as `3-350 rue des lilas`.
static UNIT_CIVIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+[a-z]?)-(\d+[a-z]?) ").expect("unit prefix pattern is valid")
});

/// Replace every comma run, including surrounding whitespace, with a single space.
pub fn comma_cleaning(address: &str) -> String {
    COMMAS.replace_all(address, " ").into_owned()
}

pub fn lower_cleaning(address: &str) -> String {
    address.to_lowercase()
}

pub fn trailing_whitespace_cleaning(address: &str) -> String {
    address.trim().to_string()
}

/// Collapse every whitespace run into one ASCII space.
pub fn double_whitespaces_cleaning(address: &str) -> String {
    WHITESPACE_RUNS.replace_all(address, " ").into_owned()
}

/// Glue hyphens to their neighbours (`saint - denis` → `saint-denis`), then
/// split a leading `unit-civic` pair into two tokens (`3-350 rue` → `3 350 rue`).
pub fn hyphen_cleaning(address: &str) -> String {
    let glued = SPACED_HYPHEN.replace_all(address, "-");
    UNIT_CIVIC_PREFIX.replace(&glued, "$1 $2 ").into_owned()
}

/// Run the full normalization pipeline.
pub fn normalize(raw: &str) -> String {
    let address = comma_cleaning(raw);
    let address = lower_cleaning(&address);
    let address = trailing_whitespace_cleaning(&address);
    let address = double_whitespaces_cleaning(&address);
    hyphen_cleaning(&address)
}
