use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Checking,
    Savings,
    Business,
    Investment,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "CHECKING",
            AccountType::Savings => "SAVINGS",
            AccountType::Business => "BUSINESS",
            AccountType::Investment => "INVESTMENT",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "CHECKING" => Ok(AccountType::Checking),
            "SAVINGS" => Ok(AccountType::Savings),
            "BUSINESS" => Ok(AccountType::Business),
            "INVESTMENT" => Ok(AccountType::Investment),
            other => Err(format!(
                "unknown account type '{}' (expected checking/savings/business/investment)",
                other
            )),
        }
    }
}

/// A synthesised set of banking credentials. Pure value object: built per
/// request, replaced wholesale by the next request, never persisted by the
/// core (the CLI may export a batch to CSV for inspection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAccount {
    pub iban: String,
    pub bic: String,
    pub swift_code: String,
    pub bank_name: String,
    pub bank_address: String,
    pub account_holder: String,
    pub country: String,
    pub country_name: String,
    pub currency: String,
    pub account_type: AccountType,
    pub account_number: String,
    pub sort_code: String,
    pub routing_number: String,
}
