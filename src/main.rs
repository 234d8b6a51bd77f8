//! Loan Amortization CLI
//!
//! Command-line interface for payment, schedule, and portfolio calculations

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use loan_amortization::affordability::{Debt, DebtToIncome};
use loan_amortization::amortization::{
    loan_summary, NegativeAmortization, Schedule, ScheduleConfig, ScheduleGenerator,
};
use loan_amortization::loan::{load_loans_csv, load_loans_json, load_scenarios_json};
use loan_amortization::report::{format_amount, write_schedule_csv, Currency, ShareReport};
use loan_amortization::{LoanRecord, LoanTerms, PortfolioRunner, PrepaymentPolicy};

/// Fixed-rate loan amortization with prepayment scenarios
#[derive(Parser)]
#[command(name = "amortize", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Currency code used for display (USD, EUR, INR, GBP, JPY, CAD)
    #[arg(long, default_value = "USD", global = true, value_parser = parse_currency)]
    currency: Currency,

    /// Floor months that do not cover interest at interest-only instead of growing the balance
    #[arg(long, global = true)]
    interest_only_floor: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and total cost for a loan
    Payment(TermsArgs),
    /// Amortization schedule for a single loan
    Schedule(ScheduleArgs),
    /// Schedules for saved loans with their prepayment scenarios
    Portfolio(PortfolioArgs),
    /// Savings from each prepayment scenario
    Savings(PortfolioArgs),
    /// Debt-to-income affordability check
    Dti(DtiArgs),
}

#[derive(Args)]
struct TermsArgs {
    /// Amount borrowed
    #[arg(long)]
    principal: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    rate: f64,
    /// Term in years
    #[arg(long)]
    term: u32,
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    terms: TermsArgs,
    /// Extra payment every month
    #[arg(long, default_value_t = 0.0)]
    extra_monthly: f64,
    /// One-time prepayment at origination
    #[arg(long, default_value_t = 0.0)]
    upfront: f64,
    /// Number of rows to print
    #[arg(long, default_value_t = 24)]
    rows: usize,
    /// Write the full schedule as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write a plain-text share report
    #[arg(long)]
    report: Option<PathBuf>,
    /// Title used in the share report
    #[arg(long, default_value = "Loan")]
    name: String,
}

#[derive(Args)]
struct PortfolioArgs {
    /// Saved loans (.json array or .csv)
    #[arg(long)]
    loans: PathBuf,
    /// Prepayment scenarios (.json array)
    #[arg(long)]
    scenarios: Option<PathBuf>,
    /// Write the combined schedule as CSV
    #[arg(long)]
    combined_csv: Option<PathBuf>,
}

#[derive(Args)]
struct DtiArgs {
    /// Gross monthly income
    #[arg(long)]
    income: f64,
    /// Existing monthly debt as NAME=AMOUNT (repeatable)
    #[arg(long = "debt", value_parser = parse_debt)]
    debts: Vec<Debt>,
    /// Monthly payment of the loan being considered
    #[arg(long, default_value_t = 0.0)]
    new_payment: f64,
}

fn parse_currency(s: &str) -> std::result::Result<Currency, String> {
    s.parse::<Currency>().map_err(|e| format!("{:?}", e))
}

fn parse_debt(s: &str) -> std::result::Result<Debt, String> {
    let (name, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{}'", s))?;
    let monthly_payment = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad amount '{}': {}", amount, e))?;
    Ok(Debt {
        name: name.trim().to_string(),
        monthly_payment,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = ScheduleConfig {
        negative_amortization: if cli.interest_only_floor {
            NegativeAmortization::InterestOnly
        } else {
            NegativeAmortization::Allow
        },
    };

    match cli.command {
        Commands::Payment(args) => run_payment(&args, &cli.currency),
        Commands::Schedule(args) => run_schedule(&args, config, &cli.currency),
        Commands::Portfolio(args) => run_portfolio(&args, config, &cli.currency),
        Commands::Savings(args) => run_savings(&args, config, &cli.currency),
        Commands::Dti(args) => run_dti(&args, &cli.currency),
    }
}

fn run_payment(args: &TermsArgs, currency: &Currency) -> Result<()> {
    let terms = LoanTerms::new(args.principal, args.rate, args.term)?;
    let summary = loan_summary(terms.principal, terms.annual_rate_percent, terms.term_years);

    println!("Monthly Payment: {}", format_amount(summary.monthly_payment, currency));
    println!("Total Cost:      {}", format_amount(summary.total_cost, currency));
    println!(
        "Total Interest:  {}",
        format_amount(summary.total_cost - terms.principal, currency)
    );
    Ok(())
}

fn run_schedule(args: &ScheduleArgs, config: ScheduleConfig, currency: &Currency) -> Result<()> {
    let terms = LoanTerms::new(args.terms.principal, args.terms.rate, args.terms.term)?;
    let policy = PrepaymentPolicy::new(args.extra_monthly, args.upfront)?;
    let schedule = ScheduleGenerator::new(config).generate(&terms, &policy);

    print_schedule(&schedule, args.rows, currency);
    print_summary(&schedule, currency);

    if let Some(path) = &args.csv {
        write_csv(path, &schedule)?;
    }

    if let Some(path) = &args.report {
        let today = chrono::Local::now().date_naive();
        let report = ShareReport::new(args.name.as_str(), &schedule, today)
            .currency(currency.clone())
            .prepayment(policy)
            .render();
        std::fs::write(path, report)
            .with_context(|| format!("Unable to write report to {}", path.display()))?;
        println!("\nShare report written to: {}", path.display());
    }

    Ok(())
}

fn run_portfolio(args: &PortfolioArgs, config: ScheduleConfig, currency: &Currency) -> Result<()> {
    let runner = load_runner(args)?.with_config(config);
    if runner.loans().is_empty() {
        bail!("No saved loans in {}", args.loans.display());
    }

    println!(
        "{:<40} {:>16} {:>8} {:>16} {:>16}",
        "Loan", "Payment", "Months", "Total Cost", "Total Interest"
    );
    println!("{}", "-".repeat(100));
    for loan_schedule in runner.schedules()? {
        let loan = runner.loan(&loan_schedule.loan_id)?;
        let summary = loan_schedule.summary();
        println!(
            "{:<40} {:>16} {:>8} {:>16} {:>16}",
            loan_schedule.display_name,
            format_amount(loan.monthly_payment, currency),
            summary.months,
            format_amount(summary.total_payment, currency),
            format_amount(summary.total_interest, currency),
        );
    }

    let combined = runner.combined()?;
    println!("\n{}", runner.combined_display_name());
    print_summary(&combined, currency);

    if let Some(path) = &args.combined_csv {
        write_csv(path, &combined)?;
    }
    Ok(())
}

fn run_savings(args: &PortfolioArgs, config: ScheduleConfig, currency: &Currency) -> Result<()> {
    let runner = load_runner(args)?.with_config(config);
    if runner.scenarios().is_empty() {
        println!("No prepayment scenarios found.");
        return Ok(());
    }

    for scenario in runner.scenarios() {
        let loan = runner.loan(&scenario.loan_id)?;
        let savings = runner.scenario_savings(&scenario.id)?;
        println!("{} / {}", loan.name, scenario.name);
        println!("  Extra Monthly:      {}", format_amount(scenario.extra_monthly, currency));
        println!("  Initial Prepayment: {}", format_amount(scenario.prepayments, currency));
        println!("  Cost Saved:         {}", format_amount(savings.cost_saved, currency));
        println!("  Interest Saved:     {}", format_amount(savings.interest_saved, currency));
        println!(
            "  Time Saved:         {} months ({:.1} years)",
            savings.months_saved,
            savings.years_saved()
        );
    }
    Ok(())
}

fn run_dti(args: &DtiArgs, currency: &Currency) -> Result<()> {
    let dti = DebtToIncome::evaluate(args.income, &args.debts, args.new_payment)?;

    println!("Current Debts:       {}", format_amount(dti.total_current_debts, currency));
    println!("Current DTI:         {:.1}% ({:?})", dti.current_ratio, dti.current_qualification);
    println!("DTI With New Loan:   {:.1}% ({:?})", dti.new_ratio, dti.qualification);
    println!("Max Loan Payment:    {}", format_amount(dti.max_loan_payment, currency));
    println!("Recommended Payment: {}", format_amount(dti.recommended_payment, currency));
    Ok(())
}

fn load_runner(args: &PortfolioArgs) -> Result<PortfolioRunner> {
    let loans = load_loans(&args.loans)?;
    let scenarios = match &args.scenarios {
        Some(path) => load_scenarios_json(path)
            .with_context(|| format!("Failed to load scenarios from {}", path.display()))?,
        None => Vec::new(),
    };
    info!("loaded {} loans and {} scenarios", loans.len(), scenarios.len());
    Ok(PortfolioRunner::new(loans, scenarios))
}

fn load_loans(path: &Path) -> Result<Vec<LoanRecord>> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    let loans = if is_csv {
        load_loans_csv(path)
    } else {
        load_loans_json(path)
    };
    loans.with_context(|| format!("Failed to load loans from {}", path.display()))
}

fn print_schedule(schedule: &Schedule, limit: usize, currency: &Currency) {
    println!(
        "{:>5} {:>16} {:>16} {:>16} {:>18}",
        "Month", "Payment", "Interest", "Principal", "Balance"
    );
    println!("{}", "-".repeat(75));

    for row in schedule.iter().take(limit) {
        println!(
            "{:>5} {:>16} {:>16} {:>16} {:>18}",
            row.period_index,
            format_amount(row.payment_amount, currency),
            format_amount(row.interest_portion, currency),
            format_amount(row.principal_portion, currency),
            format_amount(row.ending_balance, currency),
        );
    }

    if schedule.len() > limit {
        println!("... ({} more months)", schedule.len() - limit);
    }
}

fn print_summary(schedule: &Schedule, currency: &Currency) {
    let summary = schedule.summary();
    println!("\nSummary:");
    println!("  Total Payments: {} months", summary.months);
    println!("  Total Cost:     {}", format_amount(summary.total_payment, currency));
    println!("  Total Interest: {}", format_amount(summary.total_interest, currency));
    if !schedule.is_paid_off() {
        println!("  Balance Left:   {}", format_amount(summary.final_balance, currency));
    }
}

fn write_csv(path: &Path, schedule: &Schedule) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Unable to create CSV file {}", path.display()))?;
    write_schedule_csv(&mut file, schedule)?;
    file.flush()?;
    println!("\nFull schedule written to: {}", path.display());
    Ok(())
}
