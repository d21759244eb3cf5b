use crate::bic::{bic_country_code, is_valid_bic};
use crate::currency::lookup_currency;
use crate::iban::{length_matches_country, validate_iban};
use crate::models::GeneratedAccount;
use crate::reference::lookup_country;
use crate::util::normalize_compact;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct AuditIssue {
    pub level: IssueLevel,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AuditReport {
    pub total_records: usize,
    pub records_with_issues: usize,
    pub issues: Vec<AuditIssue>,
}

impl AuditReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.level == IssueLevel::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.level == IssueLevel::Warning)
            .count()
    }
}

/// Check every credential record in a CSV export against the reference
/// tables. Note that the IBAN generator intentionally emits random check
/// digits, so its own output is expected to trip the checksum error here.
pub fn audit_csv(path: &Path) -> Result<AuditReport, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
    let mut total_records = 0usize;
    let mut records_with_issues = 0usize;
    let mut issues = Vec::new();

    for result in reader.deserialize() {
        let record: GeneratedAccount = result.map_err(|err| err.to_string())?;
        total_records += 1;
        let before = issues.len();
        check_record(&record, &mut issues);
        if issues.len() > before {
            records_with_issues += 1;
        }
    }

    Ok(AuditReport {
        total_records,
        records_with_issues,
        issues,
    })
}

pub fn check_record(record: &GeneratedAccount, issues: &mut Vec<AuditIssue>) {
    if record.account_holder.trim().is_empty() {
        issues.push(issue(IssueLevel::Error, "account_holder is required"));
    }
    if record.bank_name.trim().is_empty() {
        issues.push(issue(IssueLevel::Error, "bank_name is required"));
    }

    let country_known = match lookup_country(&record.country) {
        Some(_) => true,
        None => {
            issues.push(issue(
                IssueLevel::Error,
                "country must be a known ISO-3166 alpha-2 code",
            ));
            false
        }
    };

    check_iban(record, country_known, issues);
    check_bic(record, issues);
    check_currency(record, country_known, issues);
}

fn check_iban(record: &GeneratedAccount, country_known: bool, issues: &mut Vec<AuditIssue>) {
    let iban = normalize_compact(&record.iban);
    let country = record.country.trim().to_ascii_uppercase();
    if iban.is_empty() {
        issues.push(issue(IssueLevel::Error, "iban is required"));
        return;
    }
    if !validate_iban(&iban) {
        issues.push(issue(IssueLevel::Error, "IBAN fails checksum validation"));
    }
    if iban.get(0..2) != Some(country.as_str()) {
        issues.push(issue(
            IssueLevel::Error,
            "IBAN country prefix does not match record country",
        ));
    }
    if country_known {
        match length_matches_country(&iban) {
            Some(true) => {}
            Some(false) => issues.push(issue(
                IssueLevel::Error,
                "IBAN length does not match country specification",
            )),
            None => issues.push(issue(
                IssueLevel::Warning,
                "IBAN length not known for country",
            )),
        }
    }
}

fn check_bic(record: &GeneratedAccount, issues: &mut Vec<AuditIssue>) {
    if !is_valid_bic(&record.bic) {
        issues.push(issue(IssueLevel::Error, "BIC is not a valid 8/11 format"));
        return;
    }
    let country = record.country.trim().to_ascii_uppercase();
    if bic_country_code(&record.bic).as_deref() != Some(country.as_str()) {
        issues.push(issue(
            IssueLevel::Warning,
            "BIC country does not match record country",
        ));
    }
    let head: String = record.bic.chars().take(8).collect();
    if record.swift_code != head {
        issues.push(issue(
            IssueLevel::Warning,
            "swift_code is not the BIC primary office prefix",
        ));
    }
}

fn check_currency(record: &GeneratedAccount, country_known: bool, issues: &mut Vec<AuditIssue>) {
    let Some(currency) = lookup_currency(&record.currency) else {
        issues.push(issue(
            IssueLevel::Error,
            "currency must be a known ISO-4217 code",
        ));
        return;
    };
    if country_known {
        let listed = lookup_country(&record.country)
            .map(|country| country.currencies.contains(&currency.code))
            .unwrap_or(false);
        if !listed {
            issues.push(issue(
                IssueLevel::Warning,
                "currency is not listed for the record country",
            ));
        }
    }
}

fn issue(level: IssueLevel, message: &str) -> AuditIssue {
    AuditIssue {
        level,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;

    fn clean_record() -> GeneratedAccount {
        GeneratedAccount {
            iban: "DE89370400440532013000".to_string(),
            bic: "COBADE2LXXX".to_string(),
            swift_code: "COBADE2L".to_string(),
            bank_name: "Global Trust Bank".to_string(),
            bank_address: "Global Trust Bank Headquarters, Germany".to_string(),
            account_holder: "John Doe".to_string(),
            country: "DE".to_string(),
            country_name: "Germany".to_string(),
            currency: "EUR".to_string(),
            account_type: AccountType::Checking,
            account_number: "A1B2C3D4E5".to_string(),
            sort_code: "QW12ER".to_string(),
            routing_number: "123ABC456".to_string(),
        }
    }

    fn run_check(record: &GeneratedAccount) -> Vec<AuditIssue> {
        let mut issues = Vec::new();
        check_record(record, &mut issues);
        issues
    }

    #[test]
    fn clean_record_has_no_issues() {
        assert!(run_check(&clean_record()).is_empty());
    }

    #[test]
    fn checksum_failure_is_an_error() {
        let mut record = clean_record();
        record.iban = "DE89370400440532013001".to_string();
        let issues = run_check(&record);
        assert!(issues
            .iter()
            .any(|i| i.level == IssueLevel::Error && i.message.contains("checksum")));
    }

    #[test]
    fn country_prefix_mismatch_is_flagged() {
        let mut record = clean_record();
        record.country = "FR".to_string();
        let issues = run_check(&record);
        assert!(issues
            .iter()
            .any(|i| i.message.contains("prefix does not match")));
    }

    #[test]
    fn wrong_length_for_country_is_flagged() {
        let mut record = clean_record();
        // Valid checksum, but 16 chars is Belgium's length, not Germany's.
        record.iban = "DE27123412341234".to_string();
        let issues = run_check(&record);
        assert!(validate_iban(&record.iban));
        assert!(issues
            .iter()
            .any(|i| i.message.contains("length does not match")));
    }

    #[test]
    fn malformed_bic_and_unknown_currency_are_errors() {
        let mut record = clean_record();
        record.bic = "COBA".to_string();
        record.currency = "XYZ".to_string();
        let issues = run_check(&record);
        assert!(issues.iter().any(|i| i.message.contains("BIC")));
        assert!(issues.iter().any(|i| i.message.contains("ISO-4217")));
    }

    #[test]
    fn off_country_currency_is_a_warning() {
        let mut record = clean_record();
        record.currency = "JPY".to_string();
        let issues = run_check(&record);
        assert!(issues
            .iter()
            .any(|i| i.level == IssueLevel::Warning && i.message.contains("not listed")));
    }

    #[test]
    fn missing_fields_are_errors() {
        let mut record = clean_record();
        record.account_holder.clear();
        record.iban = "  ".to_string();
        let issues = run_check(&record);
        assert!(issues.iter().any(|i| i.message.contains("account_holder")));
        assert!(issues.iter().any(|i| i.message.contains("iban is required")));
    }
}
