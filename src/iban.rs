use crate::reference::{iban_segments, lookup_country};
use crate::util::normalize_compact;
use serde::Serialize;

// Legal IBAN length bounds across all registries.
const MIN_IBAN_LEN: usize = 15;
const MAX_IBAN_LEN: usize = 34;

/// ISO 7064 MOD 97-10 check of a candidate IBAN. Spaces and case are
/// tolerated; any malformed input returns `false`, never an error.
///
/// This is a syntactic check only: it does not consult the country table,
/// so a checksum-valid string with an unregistered country code or an
/// off-registry length still passes.
pub fn validate_iban(candidate: &str) -> bool {
    let iban = normalize_compact(candidate);
    if iban.len() < MIN_IBAN_LEN || iban.len() > MAX_IBAN_LEN {
        return false;
    }
    if !has_iban_shape(&iban) {
        return false;
    }
    mod97_remainder(&iban) == 1
}

/// Group a candidate IBAN into 4-character blocks for display. Purely a
/// formatting transform; no validation is performed.
pub fn format_iban(input: &str) -> String {
    let compact = normalize_compact(input);
    let mut out = String::with_capacity(compact.len() + compact.len() / 4);
    for (idx, ch) in compact.chars().enumerate() {
        if idx > 0 && idx % 4 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Structural breakdown of a candidate IBAN. The bank code / account number
/// split follows the per-country segment conventions of the reference table.
#[derive(Debug, Clone, Serialize)]
pub struct IbanInfo {
    pub iban: String,
    pub is_valid: bool,
    pub country_code: String,
    pub check_digits: String,
    pub bank_code: String,
    pub account_number: String,
    pub formatted: String,
}

pub fn inspect_iban(input: &str) -> IbanInfo {
    let compact = normalize_compact(input);
    let is_valid = validate_iban(input);

    let country_code = compact.get(0..2).unwrap_or_default().to_string();
    let check_digits = compact.get(2..4).unwrap_or_default().to_string();
    let body = compact.get(4..).unwrap_or_default();
    let (bank_len, _) = iban_segments(&country_code);
    let bank_code = body.get(..bank_len.min(body.len())).unwrap_or_default();
    let account_number = body.get(bank_code.len()..).unwrap_or_default();

    IbanInfo {
        formatted: format_iban(&compact),
        iban: compact.clone(),
        is_valid,
        country_code,
        check_digits,
        bank_code: bank_code.to_string(),
        account_number: account_number.to_string(),
    }
}

/// Whether the country table expects exactly this length for the claimed
/// country. `None` when the country is not in the table or does not use
/// IBAN at all.
pub fn length_matches_country(compact_iban: &str) -> Option<bool> {
    let country = lookup_country(compact_iban.get(0..2)?)?;
    if country.iban_length == 0 {
        return None;
    }
    Some(compact_iban.len() == country.iban_length)
}

// 2 uppercase letters, 2 digits, then at least one alphanumeric.
fn has_iban_shape(iban: &str) -> bool {
    let bytes = iban.as_bytes();
    bytes.len() > 4
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..]
            .iter()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}

// Move the head (country + check digits) to the tail, expand letters to
// their two-digit values (A=10 .. Z=35) and fold mod 97 one digit at a
// time so arbitrarily long inputs never overflow.
fn mod97_remainder(iban: &str) -> u32 {
    let (head, tail) = iban.split_at(4);
    let mut remainder: u32 = 0;
    for ch in tail.chars().chain(head.chars()) {
        if let Some(digit) = ch.to_digit(10) {
            remainder = (remainder * 10 + digit) % 97;
        } else {
            let value = ch as u32 - 'A' as u32 + 10;
            remainder = (remainder * 10 + value / 10) % 97;
            remainder = (remainder * 10 + value % 10) % 97;
        }
    }
    remainder
}
