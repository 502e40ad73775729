//! Mortgage Engine CLI
//!
//! Calculates one French-method mortgage and prints its schedule

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::info;
use mortgage_engine::{
    resolve_term_periods, BankProfile, Currency, GraceKind, LoanTerms, MortgageCalculator,
    RateKind, ScheduleResult, SolverConfig, DEFAULT_DAYS_IN_YEAR, DEFAULT_PAYMENT_FREQUENCY_DAYS,
};
use std::fs::File;
use std::path::PathBuf;

/// French-method mortgage calculator
#[derive(Parser, Debug)]
#[command(name = "mortgage_engine", version, about, long_about = None)]
struct Args {
    /// Read the loan terms from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["property_price", "down_payment", "loan_amount", "rate"])]
    input: Option<PathBuf>,

    /// Price of the property
    #[arg(long, required_unless_present = "input")]
    property_price: Option<f64>,

    /// Down payment
    #[arg(long, required_unless_present = "input")]
    down_payment: Option<f64>,

    /// Loan amount requested
    #[arg(long, required_unless_present = "input")]
    loan_amount: Option<f64>,

    /// Housing subsidy deducted from the loan amount
    #[arg(long, default_value_t = 0.0)]
    subsidy: f64,

    /// Annual interest rate (0.10 or 10 for 10%)
    #[arg(long, required_unless_present = "input")]
    rate: Option<f64>,

    /// NOMINAL or EFFECTIVE; taken from the bank when omitted
    #[arg(long)]
    rate_kind: Option<RateKind>,

    /// Bank preset fixing rate kind and calendar (e.g. INTERBANK)
    #[arg(long)]
    bank: Option<String>,

    /// Term in months
    #[arg(long, default_value_t = 0)]
    term_months: u32,

    /// Term in years, used when no months are given
    #[arg(long, default_value_t = 0)]
    term_years: u32,

    /// Grace periods at the start of the loan
    #[arg(long, default_value_t = 0)]
    grace_periods: u32,

    /// NONE, TOTAL or PARTIAL
    #[arg(long, default_value = "NONE")]
    grace_kind: GraceKind,

    /// Days between installments
    #[arg(long)]
    payment_frequency_days: Option<u32>,

    /// Days in the financial year
    #[arg(long)]
    days_in_year: Option<u32>,

    /// PEN or USD
    #[arg(long, default_value = "PEN")]
    currency: Currency,

    #[arg(long, default_value_t = 0.0)]
    administration_fee: f64,

    #[arg(long, default_value_t = 0.0)]
    portes_fee: f64,

    #[arg(long, default_value_t = 0.0)]
    additional_costs: f64,

    /// Life insurance rate per period on the balance
    #[arg(long, default_value_t = 0.0)]
    life_insurance_rate: f64,

    /// Property insurance rate per year on the property price
    #[arg(long, default_value_t = 0.0)]
    property_insurance_rate: f64,

    #[arg(long, default_value_t = 0.0)]
    evaluation_fee: f64,

    #[arg(long, default_value_t = 0.0)]
    disbursement_fee: f64,

    /// Annual discount rate for NPV
    #[arg(long)]
    npv_rate: Option<f64>,

    /// Write every period to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Rows of the schedule to print
    #[arg(long, default_value_t = 24)]
    rows: usize,
}

impl Args {
    fn to_terms(&self) -> Result<LoanTerms> {
        if let Some(path) = &self.input {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            let terms: LoanTerms = serde_json::from_reader(file)
                .with_context(|| format!("Failed to parse loan terms from {}", path.display()))?;
            return Ok(terms);
        }

        let bank = match &self.bank {
            Some(id) => Some(
                BankProfile::find_preset(id).ok_or_else(|| anyhow!("Unknown bank: {id}"))?,
            ),
            None => None,
        };

        let rate_kind = match (self.rate_kind, &bank) {
            (Some(kind), _) => kind,
            (None, Some(bank)) => bank.rate_kind,
            (None, None) => bail!("--rate-kind is required without --bank"),
        };

        let payment_frequency_days = self
            .payment_frequency_days
            .or(bank.as_ref().map(|b| b.payment_frequency_days))
            .unwrap_or(DEFAULT_PAYMENT_FREQUENCY_DAYS);
        let days_in_year = self
            .days_in_year
            .or(bank.as_ref().map(|b| b.days_in_year))
            .unwrap_or(DEFAULT_DAYS_IN_YEAR);

        let term_periods = resolve_term_periods(
            self.term_months,
            self.term_years,
            payment_frequency_days,
            days_in_year,
        )?;

        let terms = LoanTerms {
            property_price: required(self.property_price, "--property-price")?,
            down_payment: required(self.down_payment, "--down-payment")?,
            loan_amount: required(self.loan_amount, "--loan-amount")?,
            subsidy_amount: self.subsidy,
            annual_interest_rate: required(self.rate, "--rate")?,
            rate_kind,
            term_periods,
            grace_periods: self.grace_periods,
            grace_kind: self.grace_kind,
            payment_frequency_days,
            days_in_year,
            currency: self.currency,
            administration_fee: self.administration_fee,
            portes_fee: self.portes_fee,
            additional_monthly_costs: self.additional_costs,
            life_insurance_rate: self.life_insurance_rate,
            property_insurance_rate: self.property_insurance_rate,
            evaluation_fee: self.evaluation_fee,
            disbursement_fee: self.disbursement_fee,
            npv_discount_rate_annual: self.npv_rate,
        };
        terms.validate()?;
        Ok(terms)
    }
}

fn required(value: Option<f64>, flag: &str) -> Result<f64> {
    value.ok_or_else(|| anyhow!("{flag} is required"))
}

fn print_table(terms: &LoanTerms, result: &ScheduleResult, rows: usize) {
    println!("Mortgage Engine v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    println!("Loan:");
    println!("  Principal Financed: {} {:.2}", terms.currency, result.principal_financed());
    println!("  Rate: {} {:.4}", terms.rate_kind, terms.annual_interest_rate);
    println!("  Periods: {} ({:.2} per year)", terms.term_periods, result.periods_per_year());
    if terms.effective_grace_periods() > 0 {
        println!("  Grace: {} x {}", terms.effective_grace_periods(), terms.grace_kind);
        println!("  Adjusted Principal: {:.2}", result.adjusted_principal());
    }
    println!();

    println!("{:>6} {:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14} {:>6}",
        "Period", "Year", "Installment", "Interest", "Amort", "Charges", "Total", "Balance", "Grace");
    println!("{}", "-".repeat(100));

    for item in result.items().iter().take(rows) {
        println!("{:>6} {:>4} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>6}",
            item.period,
            item.year_number,
            item.base_installment,
            item.interest,
            item.amortization,
            item.charges(),
            item.total_installment,
            item.remaining_balance,
            item.grace_kind_applied.map(|kind| kind.as_str()).unwrap_or(""),
        );
    }

    if result.items().len() > rows {
        println!("... ({} more periods)", result.items().len() - rows);
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Periodic Rate: {:.6}", summary.periodic_rate);
    println!("  Fixed Installment: {:.2}", summary.fixed_installment);
    println!("  Total Interest: {:.2}", summary.totals.total_interest_paid);
    println!("  Total Paid (base): {:.2}", summary.totals.total_paid_base);
    println!("  Total Paid (with charges): {:.2}", summary.totals.total_paid_with_charges);
    println!("  Total Insurance: {:.2}", summary.totals.total_insurance);
    println!("  Total Administrative: {:.2}", summary.totals.total_administrative);
    if let Some(npv) = summary.npv {
        println!("  NPV: {:.2}", npv);
    }
    println!("  IRR (base, periodic): {:.6}", summary.irr_base);
    println!("  IRR (with charges, periodic): {:.6}", summary.irr_with_charges);
    println!("  TCEA: {:.4}%", summary.tcea * 100.0);
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let terms = args.to_terms()?;
    info!(
        "Calculating {} periods at {} {}",
        terms.term_periods, terms.annual_interest_rate, terms.rate_kind
    );

    let calculator = MortgageCalculator::new(SolverConfig::default());
    let result = calculator.calculate(&terms).context("Mortgage calculation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_table(&terms, &result, args.rows);
    }

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        result.write_csv(file)?;
        println!("\nFull schedule written to: {}", path.display());
    }

    Ok(())
}
