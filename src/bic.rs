use crate::util::normalize_compact;
use serde::Serialize;

/// Decomposed BIC/SWIFT code: 4-char bank code, 2-char country, 2-char
/// location, optional 3-char branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BicInfo {
    pub bic: String,
    pub bank_code: String,
    pub country_code: String,
    pub location_code: String,
    pub branch_code: Option<String>,
}

/// Shape check only: 8 or 11 alphanumeric characters with an alphabetic
/// country segment. No registry lookup.
pub fn is_valid_bic(bic: &str) -> bool {
    let bic = normalize_compact(bic);
    if !(bic.len() == 8 || bic.len() == 11) {
        return false;
    }
    if !bic.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return false;
    }
    bic[4..6].chars().all(|ch| ch.is_ascii_alphabetic())
}

pub fn bic_country_code(bic: &str) -> Option<String> {
    let bic = normalize_compact(bic);
    if is_valid_bic(&bic) {
        Some(bic[4..6].to_string())
    } else {
        None
    }
}

pub fn parse_bic(bic: &str) -> Option<BicInfo> {
    let bic = normalize_compact(bic);
    if !is_valid_bic(&bic) {
        return None;
    }
    let branch_code = if bic.len() == 11 {
        Some(bic[8..11].to_string())
    } else {
        None
    };
    Some(BicInfo {
        bank_code: bic[0..4].to_string(),
        country_code: bic[4..6].to_string(),
        location_code: bic[6..8].to_string(),
        branch_code,
        bic,
    })
}
