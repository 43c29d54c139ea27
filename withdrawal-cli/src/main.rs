use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use withdrawal_cli::{input, logging, prompt, render};
use withdrawal_core::{PlanType, WithdrawalCalculator, WithdrawalRequest};
use withdrawal_data::ConfigLoader;

// ─── CLI definition ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Tax, penalty and net proceeds of a US retirement-fund withdrawal for an
/// Indian tax resident, for every residency status.
///
/// Without `--amount` the request is collected interactively.
#[derive(Debug, Parser)]
#[command(name = "withdrawal-tax")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Withdrawal amount in USD, e.g. `50,000` or `$12500.50`.
    #[arg(short, long)]
    amount: Option<String>,

    /// The withdrawal happens before age 59½.
    #[arg(short, long, default_value_t = false)]
    early: bool,

    /// Plan type: 401k, IRA, Roth 401k or Roth IRA.
    #[arg(short, long, value_parser = parse_plan)]
    plan: Option<PlanType>,

    /// TOML file overriding rates and bracket tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file of bracket tables (`jurisdiction,upper_limit,rate`).
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Default log level when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_plan(s: &str) -> Result<PlanType, String> {
    PlanType::parse(s)
        .ok_or_else(|| format!("unrecognized plan '{s}' (expected 401k, IRA, Roth 401k or Roth IRA)"))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(&cli.log_level);
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let config = ConfigLoader::load(cli.config.as_deref(), cli.brackets.as_deref())
        .context("Failed to load configuration")?;
    debug!(?config, "configuration loaded");

    let request = match &cli.amount {
        Some(text) => WithdrawalRequest {
            principal: input::parse_amount(text)?,
            is_early: cli.early,
            plan: cli.plan.unwrap_or_default(),
        },
        None => {
            let stdin = io::stdin();
            prompt::collect_request(&mut stdin.lock(), &mut io::stdout())
                .context("Failed to read withdrawal details")?
        }
    };

    let report = WithdrawalCalculator::new(&config).compute_report(&request);
    info!(principal = %report.principal, "computed withdrawal report");

    match cli.format {
        OutputFormat::Text => print!("{}", render::render_text(&report, &request)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["withdrawal-tax"]).unwrap();

        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.early);
        assert!(cli.amount.is_none());
        assert!(cli.plan.is_none());
    }

    #[test]
    fn parses_request_flags() {
        let cli = Cli::try_parse_from([
            "withdrawal-tax",
            "--amount",
            "50,000",
            "--early",
            "--plan",
            "Roth IRA",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.amount.as_deref(), Some("50,000"));
        assert!(cli.early);
        assert_eq!(cli.plan, Some(PlanType::RothIra));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn rejects_unknown_plan() {
        let err = Cli::try_parse_from(["withdrawal-tax", "--plan", "403b"]).unwrap_err();

        assert!(err.to_string().contains("unrecognized plan '403b'"));
    }
}
