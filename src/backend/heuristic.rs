//! Rule-based address tagger.
//!
//! Peels components off a normalized address in a fixed order:
//!
//! ```text
//! tail:  postal code → province
//! any:   general delivery → marked unit (apt 5, #5)
//! head:  unit + civic number
//! rest:  street name [orientation] municipality
//! ```
//!
//! Tuned for Canadian addresses in English and French. Expects the output
//! of [`crate::address::normalize`] (lowercase, no commas, single spaces).

use crate::address::types::ParsedAddress;
use crate::backend::{AddressParser, ParseFailure};

const MODEL_ID: &str = "heuristic";

/// Provinces and territories: English and French names, postal abbreviations.
const PROVINCES: &[&str] = &[
    "newfoundland and labrador",
    "territoires du nord-ouest",
    "prince edward island",
    "northwest territories",
    "british columbia",
    "nova scotia",
    "new brunswick",
    "colombie-britannique",
    "nouvelle-écosse",
    "nouveau-brunswick",
    "terre-neuve-et-labrador",
    "île-du-prince-édouard",
    "quebec",
    "québec",
    "ontario",
    "manitoba",
    "saskatchewan",
    "alberta",
    "yukon",
    "nunavut",
    "nl",
    "pe",
    "ns",
    "nb",
    "qc",
    "on",
    "mb",
    "sk",
    "ab",
    "bc",
    "yt",
    "nt",
    "nu",
];

const ORIENTATIONS: &[&str] = &[
    "n", "s", "e", "w", "ne", "nw", "se", "sw", "no", "so", "north", "south", "east", "west",
    "nord", "sud", "est", "ouest",
];

/// Street types that follow the street name (`main st`).
const SUFFIX_STREET_TYPES: &[&str] = &[
    "st", "street", "ave", "av", "avenue", "rd", "road", "dr", "drive", "blvd", "boulevard",
    "cres", "crescent", "crt", "ct", "court", "ln", "lane", "way", "pl", "place", "terr",
    "terrace", "hwy", "highway", "pkwy", "parkway", "cir", "circle", "sq", "square", "trail",
    "trl",
];

/// Street types that precede the street name (`rue des lilas`).
const PREFIX_STREET_TYPES: &[&str] = &[
    "rue", "avenue", "av", "boulevard", "boul", "chemin", "ch", "place", "route", "rang",
    "montée", "côte", "impasse", "allée", "promenade", "croissant", "carré", "terrasse",
    "autoroute",
];

const UNIT_MARKERS: &[&str] = &["apt", "app", "apartment", "appartement", "unit", "suite", "bureau"];

/// Deterministic rule-based [`AddressParser`]. Stateless, so safe to share
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct HeuristicParser;

impl HeuristicParser {
    pub fn new() -> Self {
        Self
    }
}

impl AddressParser for HeuristicParser {
    fn model(&self) -> &str {
        MODEL_ID
    }

    fn parse(&self, normalized: &str) -> Result<ParsedAddress, ParseFailure> {
        let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
        if tokens.is_empty() {
            return Err(ParseFailure::EmptyInput);
        }
        if !normalized.chars().any(char::is_alphanumeric) {
            return Err(ParseFailure::Unrecognized(
                "no alphanumeric content".to_string(),
            ));
        }

        let mut parsed = ParsedAddress {
            postal_code: take_postal_code(&mut tokens),
            ..ParsedAddress::default()
        };
        parsed.province = take_province(&mut tokens, parsed.postal_code.is_some());
        parsed.general_delivery = take_general_delivery(&mut tokens);
        parsed.unit = take_marked_unit(&mut tokens);
        take_civic_numbers(&mut tokens, &mut parsed);

        if parsed.general_delivery.is_some() && parsed.street_number.is_none() {
            parsed.municipality = join(&tokens);
        } else {
            split_street(&tokens, &mut parsed);
        }

        Ok(parsed)
    }
}

/// Compare a token to a shape made of `L` (ASCII letter) and `D` (digit).
fn has_shape(token: &str, shape: &str) -> bool {
    token.len() == shape.len()
        && token.chars().zip(shape.chars()).all(|(c, s)| match s {
            'L' => c.is_ascii_alphabetic(),
            'D' => c.is_ascii_digit(),
            _ => false,
        })
}

fn is_zip(token: &str) -> bool {
    match token.split_once('-') {
        Some((head, tail)) => has_shape(head, "DDDDD") && has_shape(tail, "DDDD"),
        None => has_shape(token, "DDDDD"),
    }
}

/// Digits with at most one trailing letter: `350`, `12a`.
fn is_civic(token: &str) -> bool {
    let digits = token.chars().take_while(char::is_ascii_digit).count();
    let rest = &token[digits..];
    let suffix_ok = rest.is_empty() || (rest.len() == 1 && rest.chars().all(|c| c.is_ascii_alphabetic()));
    digits > 0 && digits <= 6 && suffix_ok
}

fn join(tokens: &[&str]) -> Option<String> {
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(" "))
    }
}

fn take_postal_code(tokens: &mut Vec<&str>) -> Option<String> {
    let n = tokens.len();
    if n >= 2 && has_shape(tokens[n - 2], "LDL") && has_shape(tokens[n - 1], "DLD") {
        let code = tokens[n - 2..].join(" ");
        tokens.truncate(n - 2);
        return Some(code);
    }
    // A lone trailing number is more likely a civic number than a ZIP.
    if (n >= 1 && has_shape(tokens[n - 1], "LDLDLD")) || (n >= 2 && is_zip(tokens[n - 1])) {
        return tokens.pop().map(str::to_string);
    }
    None
}

/// `quebec` is also a city: a bare trailing one is only the province when a
/// postal code follows it or the city precedes it (`québec québec`).
fn take_province(tokens: &mut Vec<&str>, after_postal: bool) -> Option<String> {
    for width in (1..=3).rev() {
        if tokens.len() <= width {
            continue;
        }
        let start = tokens.len() - width;
        let candidate = tokens[start..].join(" ");
        if width == 1 && is_quebec(&candidate) && !after_postal && !is_quebec(tokens[start - 1]) {
            return None;
        }
        if PROVINCES.contains(&candidate.as_str()) {
            tokens.truncate(start);
            return Some(candidate);
        }
    }
    None
}

fn is_quebec(token: &str) -> bool {
    matches!(token, "quebec" | "québec")
}

fn take_general_delivery(tokens: &mut Vec<&str>) -> Option<String> {
    if let Some(i) = tokens.windows(2).position(|w| w == ["general", "delivery"]) {
        tokens.drain(i..i + 2);
        return Some("general delivery".to_string());
    }
    let i = tokens.iter().position(|t| *t == "gd")?;
    tokens.remove(i);
    Some("gd".to_string())
}

fn take_marked_unit(tokens: &mut Vec<&str>) -> Option<String> {
    if let Some(i) = tokens
        .iter()
        .position(|t| UNIT_MARKERS.contains(t))
        .filter(|i| i + 1 < tokens.len())
    {
        let unit = tokens[i + 1].to_string();
        tokens.drain(i..i + 2);
        return Some(unit);
    }
    let i = tokens.iter().position(|t| t.len() > 1 && t.starts_with('#'))?;
    let unit = tokens.remove(i)[1..].to_string();
    Some(unit)
}

/// A leading `unit civic` pair or a lone civic number.
fn take_civic_numbers(tokens: &mut Vec<&str>, parsed: &mut ParsedAddress) {
    if !matches!(tokens.first(), Some(t) if is_civic(t)) {
        return;
    }
    if parsed.unit.is_none() && tokens.len() >= 3 && is_civic(tokens[1]) {
        parsed.unit = Some(tokens[0].to_string());
        parsed.street_number = Some(tokens[1].to_string());
        tokens.drain(..2);
    } else {
        parsed.street_number = Some(tokens.remove(0).to_string());
    }
}

/// Split what is left into street name, orientation and municipality.
fn split_street(tokens: &[&str], parsed: &mut ParsedAddress) {
    if tokens.is_empty() {
        return;
    }

    let orientation = tokens[1..]
        .iter()
        .position(|t| ORIENTATIONS.contains(t))
        .map(|i| i + 1);
    if let Some(o) = orientation {
        parsed.street_name = join(&tokens[..o]);
        parsed.orientation = Some(tokens[o].to_string());
        parsed.municipality = join(&tokens[o + 1..]);
        return;
    }

    let street_end = if PREFIX_STREET_TYPES.contains(&tokens[0]) {
        // French order: the type leads, so only the last token is left for the city.
        if tokens.len() >= 3 {
            tokens.len() - 1
        } else {
            tokens.len()
        }
    } else if let Some(k) = tokens
        .iter()
        .rposition(|t| SUFFIX_STREET_TYPES.contains(t))
        .filter(|k| *k > 0)
    {
        k + 1
    } else if tokens.len() >= 2 {
        tokens.len() - 1
    } else {
        tokens.len()
    };

    parsed.street_name = join(&tokens[..street_end]);
    parsed.municipality = join(&tokens[street_end..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::normalize;

    fn parse(raw: &str) -> ParsedAddress {
        HeuristicParser::new().parse(&normalize(raw)).unwrap()
    }

    #[test]
    fn test_french_address_with_orientation() {
        let parsed = parse("350 rue des Lilas Ouest, Québec, QC G1L 1B6");
        assert_eq!(parsed.street_number.as_deref(), Some("350"));
        assert_eq!(parsed.street_name.as_deref(), Some("rue des lilas"));
        assert_eq!(parsed.orientation.as_deref(), Some("ouest"));
        assert_eq!(parsed.municipality.as_deref(), Some("québec"));
        assert_eq!(parsed.province.as_deref(), Some("qc"));
        assert_eq!(parsed.postal_code.as_deref(), Some("g1l 1b6"));
    }

    #[test]
    fn test_trailing_quebec_is_the_city() {
        let parsed = parse("123 Main St, Quebec");
        assert_eq!(parsed.street_name.as_deref(), Some("main st"));
        assert_eq!(parsed.municipality.as_deref(), Some("quebec"));
        assert_eq!(parsed.province, None);

        let parsed = parse("123 Main St, Québec, Québec");
        assert_eq!(parsed.municipality.as_deref(), Some("québec"));
        assert_eq!(parsed.province.as_deref(), Some("québec"));

        let parsed = parse("500 Sherbrooke St, Montréal, Quebec H3A 1B6");
        assert_eq!(parsed.municipality.as_deref(), Some("montréal"));
        assert_eq!(parsed.province.as_deref(), Some("quebec"));
    }

    #[test]
    fn test_unit_civic_prefix() {
        let parsed = parse("3-350 rue des Lilas, Montréal, QC");
        assert_eq!(parsed.unit.as_deref(), Some("3"));
        assert_eq!(parsed.street_number.as_deref(), Some("350"));
        assert_eq!(parsed.street_name.as_deref(), Some("rue des lilas"));
        assert_eq!(parsed.municipality.as_deref(), Some("montréal"));
    }

    #[test]
    fn test_english_suffix_street() {
        let parsed = parse("123 Main St, Toronto, Ontario M5V3L9");
        assert_eq!(parsed.street_number.as_deref(), Some("123"));
        assert_eq!(parsed.street_name.as_deref(), Some("main st"));
        assert_eq!(parsed.municipality.as_deref(), Some("toronto"));
        assert_eq!(parsed.province.as_deref(), Some("ontario"));
        assert_eq!(parsed.postal_code.as_deref(), Some("m5v3l9"));
    }

    #[test]
    fn test_multi_word_province() {
        let parsed = parse("55 water st vancouver british columbia");
        assert_eq!(parsed.province.as_deref(), Some("british columbia"));
        assert_eq!(parsed.municipality.as_deref(), Some("vancouver"));
    }

    #[test]
    fn test_marked_unit() {
        let parsed = parse("apt 5 1200 boulevard René-Lévesque Montréal");
        assert_eq!(parsed.unit.as_deref(), Some("5"));
        assert_eq!(parsed.street_number.as_deref(), Some("1200"));
        assert_eq!(parsed.street_name.as_deref(), Some("boulevard rené-lévesque"));
        assert_eq!(parsed.municipality.as_deref(), Some("montréal"));

        let parsed = parse("1200 main st #12 ottawa");
        assert_eq!(parsed.unit.as_deref(), Some("12"));
        assert_eq!(parsed.municipality.as_deref(), Some("ottawa"));
    }

    #[test]
    fn test_general_delivery() {
        let parsed = parse("General Delivery, Toronto ON M5W 1E6");
        assert_eq!(parsed.general_delivery.as_deref(), Some("general delivery"));
        assert_eq!(parsed.municipality.as_deref(), Some("toronto"));
        assert_eq!(parsed.province.as_deref(), Some("on"));
        assert_eq!(parsed.street_name, None);
    }

    #[test]
    fn test_us_zip_needs_context() {
        let parsed = parse("90210");
        assert_eq!(parsed.street_number.as_deref(), Some("90210"));
        assert_eq!(parsed.postal_code, None);

        let parsed = parse("9 elm st springfield 12345-6789");
        assert_eq!(parsed.postal_code.as_deref(), Some("12345-6789"));
    }

    #[test]
    fn test_empty_and_symbol_input_fail() {
        let parser = HeuristicParser::new();
        assert_eq!(parser.parse(""), Err(ParseFailure::EmptyInput));
        assert!(matches!(parser.parse("- -"), Err(ParseFailure::Unrecognized(_))));
    }

    #[test]
    fn test_is_civic() {
        assert!(is_civic("350"));
        assert!(is_civic("12a"));
        assert!(!is_civic("3rd"));
        assert!(!is_civic("a12"));
    }
}
