use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fincalc_core::calculations::common::round_half_up;
use fincalc_core::calculations::{IncomeTaxEngine, LoanAmortizationEngine, RegimeComparator};
use fincalc_core::db::InMemorySnapshotRepository;
use fincalc_core::{
    CalculationConfig, HouseholdSituation, RealCharges, SnapshotRepository, TaxSnapshot,
};
use fincalc_data::{load_config, loans, profiles};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run tax, loan interest and rental regime calculations from exported data.
#[derive(Parser, Debug)]
#[command(name = "fincalc-report")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML file overriding the built-in 2025 parameters
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute income tax for every profile in a CSV file
    Tax {
        /// Path to the profiles CSV
        #[arg(short, long)]
        profiles: PathBuf,

        /// Fiscal year recorded on the snapshots
        #[arg(short = 'y', long, default_value_t = 2025)]
        fiscal_year: i32,
    },

    /// Report deductible loan interest per year
    Interest {
        /// Path to the loans CSV
        #[arg(short, long)]
        loans: PathBuf,

        /// First year of the report
        #[arg(long)]
        from: i32,

        /// Last year of the report (inclusive)
        #[arg(long)]
        to: i32,
    },

    /// Compare micro-foncier with the régime réel
    Regime {
        /// Gross annual rental income
        #[arg(short, long)]
        rental_income: Decimal,

        /// Deductible real charges
        #[arg(long, default_value = "0")]
        charges: Decimal,

        /// single, couple (pacs) or family
        #[arg(short, long, default_value = "single", value_parser = parse_situation)]
        situation: HouseholdSituation,
    },
}

fn parse_situation(value: &str) -> Result<HouseholdSituation, String> {
    HouseholdSituation::parse(value).ok_or_else(|| format!("unknown household situation '{value}'"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => CalculationConfig::default(),
    };

    match cli.command {
        Command::Tax {
            profiles,
            fiscal_year,
        } => run_tax(&config, &profiles, fiscal_year).await,
        Command::Interest { loans, from, to } => run_interest(&loans, from, to),
        Command::Regime {
            rental_income,
            charges,
            situation,
        } => run_regime(&config, rental_income, charges, situation),
    }
}

async fn run_tax(
    config: &CalculationConfig,
    path: &Path,
    fiscal_year: i32,
) -> Result<()> {
    let profiles = profiles::load_from_file(path)
        .with_context(|| format!("Failed to load profiles: {}", path.display()))?;
    info!(count = profiles.len(), "Loaded profiles");

    let engine = IncomeTaxEngine::new(&config.income_tax);
    let repo = InMemorySnapshotRepository::new();
    let mut total = Decimal::ZERO;

    println!(
        "{:<8} {:>10} {:>12} {:>10} {:>8}",
        "profile", "situation", "taxable", "tax", "rate %"
    );
    for (idx, profile) in profiles.iter().enumerate() {
        let user_id = format!("row-{}", idx + 1);
        let result = engine
            .compute(profile)
            .with_context(|| format!("Failed to compute tax for {user_id}"))?;
        total += result.tax;

        println!(
            "{:<8} {:>10} {:>12} {:>10} {:>8}",
            user_id,
            profile.situation.as_str(),
            round_half_up(result.taxable_income),
            result.tax,
            result.effective_rate,
        );

        repo.save_snapshot(&TaxSnapshot::from_result(&user_id, fiscal_year, profile, &result))
            .await
            .context("Failed to record snapshot")?;
    }

    info!(fiscal_year, %total, "Total tax across profiles");

    Ok(())
}

fn run_interest(
    path: &Path,
    from: i32,
    to: i32,
) -> Result<()> {
    let loans = loans::load_from_file(path)
        .with_context(|| format!("Failed to load loans: {}", path.display()))?;
    info!(count = loans.len(), "Loaded loans");

    let engine = LoanAmortizationEngine::new(&loans).context("Invalid loan set")?;
    let rows = engine
        .yearly_interest(from, to)
        .context("Failed to compute yearly interest")?;

    for row in rows {
        println!("{}: {}", row.year, round_half_up(row.total_interest));
        for detail in row.details {
            println!(
                "  {:<12} interest {:>10}  principal {:>10}  insurance {:>8}  remaining {:>12}",
                detail.loan_name,
                round_half_up(detail.interest),
                round_half_up(detail.principal_repaid),
                round_half_up(detail.insurance),
                round_half_up(detail.remaining_capital),
            );
        }
    }

    Ok(())
}

fn run_regime(
    config: &CalculationConfig,
    rental_income: Decimal,
    charges: Decimal,
    situation: HouseholdSituation,
) -> Result<()> {
    let comparison = RegimeComparator::new(&config.regime)
        .compare(rental_income, &RealCharges::lump_sum(charges), situation)
        .context("Failed to compare regimes")?;

    for (label, result) in [("micro-foncier", &comparison.micro), ("réel", &comparison.reel)] {
        println!(
            "{:<14} taxable {:>10}  total tax {:>10}  rate {:>6}%",
            label,
            round_half_up(result.taxable_income),
            round_half_up(result.total_tax),
            round_half_up(result.effective_rate),
        );
    }
    println!(
        "recommended: {:?} (saves {})",
        comparison.recommended,
        round_half_up(comparison.savings)
    );
    if !comparison.micro_eligible {
        println!("note: rental income exceeds the micro-foncier ceiling");
    }
    if comparison.reel_deficit > Decimal::ZERO {
        println!("land deficit under réel: {}", round_half_up(comparison.reel_deficit));
    }

    Ok(())
}
