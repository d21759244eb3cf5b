mod audit;
mod bic;
mod currency;
mod generator;
mod iban;
mod logging;
mod models;
mod reference;
mod util;

use audit::{AuditIssue, IssueLevel};
use clap::{Parser, Subcommand};
use currency::CURRENCIES;
use generator::{generate_accounts, GeneratorConfig};
use iban::{format_iban, inspect_iban};
use models::{AccountType, GeneratedAccount};
use rand::Rng;
use reference::COUNTRIES;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "banksim")]
#[command(about = "Synthetic banking credentials toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Generate(GenerateArgs),
    Validate(ValidateArgs),
    Format(FormatArgs),
    Bic(BicArgs),
    Audit(AuditArgs),
    Countries,
    Currencies,
}

#[derive(Parser)]
struct GenerateArgs {
    #[arg(long, default_value_t = 1)]
    count: usize,
    #[arg(long, default_value = "DE")]
    country: String,
    #[arg(long, default_value = "John Doe")]
    holder: String,
    /// Bank name to derive the BIC from; random reference bank if omitted.
    #[arg(long)]
    bank: Option<String>,
    /// Currency override; the country default applies if omitted.
    #[arg(long)]
    currency: Option<String>,
    #[arg(long, default_value = "checking")]
    account_type: AccountType,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value = "data/synthetic/accounts.csv")]
    output: PathBuf,
}

#[derive(Parser)]
struct ValidateArgs {
    iban: String,
}

#[derive(Parser)]
struct FormatArgs {
    iban: String,
}

#[derive(Parser)]
struct BicArgs {
    bic: String,
}

#[derive(Parser)]
struct AuditArgs {
    #[arg(long, default_value = "data/synthetic/accounts.csv")]
    input: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    logging::init_logging("banksim")?;
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
        Command::Format(args) => run_format(args),
        Command::Bic(args) => run_bic(args),
        Command::Audit(args) => run_audit(args),
        Command::Countries => run_countries(),
        Command::Currencies => run_currencies(),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let seed = args.seed.unwrap_or_else(random_seed);
    let config = GeneratorConfig {
        count: args.count,
        country: args.country,
        account_holder: args.holder,
        bank_name: args.bank,
        currency: args.currency,
        account_type: args.account_type,
    };

    log::info!(
        "Generating {} account(s) for {} (seed {})",
        config.count,
        config.country,
        seed
    );
    let start = Instant::now();
    let accounts = generate_accounts(&config, seed)?;
    write_csv(&args.output, &accounts)?;

    for account in &accounts {
        emit_info_line(&format!(
            "{} | {} | {} | {}",
            format_iban(&account.iban),
            account.bic,
            account.currency,
            account.bank_name
        ));
    }
    emit_info_line(&format!(
        "Wrote {} account(s) to {} in {} ms",
        accounts.len(),
        args.output.display(),
        start.elapsed().as_millis()
    ));
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let info = inspect_iban(&args.iban);
    emit_info_line(&format!("IBAN:           {}", info.formatted));
    emit_info_line(&format!("Country code:   {}", info.country_code));
    emit_info_line(&format!("Check digits:   {}", info.check_digits));
    emit_info_line(&format!("Bank code:      {}", info.bank_code));
    emit_info_line(&format!("Account number: {}", info.account_number));
    emit_info_line(&format!("Valid:          {}", info.is_valid));

    if info.is_valid {
        Ok(())
    } else {
        Err("IBAN failed validation".to_string())
    }
}

fn run_format(args: FormatArgs) -> Result<(), String> {
    println!("{}", format_iban(&args.iban));
    Ok(())
}

fn run_bic(args: BicArgs) -> Result<(), String> {
    let info = bic::parse_bic(&args.bic)
        .ok_or_else(|| format!("not a valid BIC: {}", args.bic))?;
    emit_info_line(&format!("BIC:           {}", info.bic));
    emit_info_line(&format!("Bank code:     {}", info.bank_code));
    emit_info_line(&format!("Country code:  {}", info.country_code));
    emit_info_line(&format!("Location code: {}", info.location_code));
    emit_info_line(&format!(
        "Branch code:   {}",
        info.branch_code.as_deref().unwrap_or("- (primary office)")
    ));
    Ok(())
}

fn run_audit(args: AuditArgs) -> Result<(), String> {
    let report = audit::audit_csv(&args.input)?;

    emit_info_line(&format!(
        "Audit: records={} with_issues={} errors={} warnings={}",
        report.total_records,
        report.records_with_issues,
        report.error_count(),
        report.warning_count()
    ));
    emit_issue_summary("error", &report.issues, IssueLevel::Error);
    emit_issue_summary("warning", &report.issues, IssueLevel::Warning);

    if report.error_count() > 0 {
        return Err(format!("audit failed with {} error(s)", report.error_count()));
    }
    Ok(())
}

fn run_countries() -> Result<(), String> {
    for country in COUNTRIES {
        let length = if country.iban_length > 0 {
            country.iban_length.to_string()
        } else {
            "-".to_string()
        };
        println!(
            "{}  {:<22} len={:<3} {:<4} {}",
            country.code,
            country.name,
            length,
            country.currencies.first().unwrap_or(&"?"),
            country.example
        );
    }
    Ok(())
}

fn run_currencies() -> Result<(), String> {
    for currency in CURRENCIES {
        println!(
            "{}  {:<18} {:<10} ({})",
            currency.code,
            currency.name,
            currency::format_amount(1234.5, currency),
            currency.country
        );
    }
    Ok(())
}

fn emit_issue_summary(label: &str, issues: &[AuditIssue], level: IssueLevel) {
    let mut counts = std::collections::HashMap::new();
    for issue in issues.iter().filter(|issue| issue.level == level) {
        *counts.entry(issue.message.as_str()).or_insert(0usize) += 1;
    }
    if counts.is_empty() {
        return;
    }

    let mut items: Vec<(&str, usize)> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let max_items = 5usize;
    for (message, count) in items.iter().take(max_items) {
        emit_info_line(&format!("Audit {}s: {} = {}", label, message, count));
    }
    if items.len() > max_items {
        emit_info_line(&format!(
            "Audit {}s: {} additional issue types not shown",
            label,
            items.len() - max_items
        ));
    }
}

fn random_seed() -> u64 {
    let mut rng = rand::rngs::OsRng;
    rng.gen()
}

fn write_csv(output: &Path, accounts: &[GeneratedAccount]) -> Result<(), String> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    let mut writer = csv::Writer::from_path(output).map_err(|err| err.to_string())?;
    for account in accounts {
        writer.serialize(account).map_err(|err| err.to_string())?;
    }
    writer.flush().map_err(|err| err.to_string())
}

fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}
