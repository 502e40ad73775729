//! Load loan terms from CSV

use super::bank::BankProfile;
use super::terms::{resolve_term_periods, Currency, GraceKind, LoanTerms, RateKind};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// One loan read from a batch file
#[derive(Debug, Clone)]
pub struct LoanRecord {
    pub loan_id: u32,
    pub terms: LoanTerms,
}

/// Raw CSV row. Either `term_months` or `term_years` must be positive.
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    loan_id: u32,
    property_price: f64,
    down_payment: f64,
    loan_amount: f64,
    #[serde(default)]
    subsidy_amount: Option<f64>,
    annual_interest_rate: f64,
    #[serde(default)]
    rate_kind: String,
    #[serde(default)]
    bank: String,
    #[serde(default)]
    term_months: Option<u32>,
    #[serde(default)]
    term_years: Option<u32>,
    #[serde(default)]
    grace_periods: Option<u32>,
    #[serde(default)]
    grace_kind: String,
    #[serde(default)]
    payment_frequency_days: Option<u32>,
    #[serde(default)]
    days_in_year: Option<u32>,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    administration_fee: Option<f64>,
    #[serde(default)]
    portes_fee: Option<f64>,
    #[serde(default)]
    additional_monthly_costs: Option<f64>,
    #[serde(default)]
    life_insurance_rate: Option<f64>,
    #[serde(default)]
    property_insurance_rate: Option<f64>,
    #[serde(default)]
    evaluation_fee: Option<f64>,
    #[serde(default)]
    disbursement_fee: Option<f64>,
    #[serde(default)]
    npv_discount_rate_annual: Option<f64>,
}

impl CsvRow {
    fn to_record(self) -> Result<LoanRecord, Box<dyn Error + Send + Sync>> {
        let bank = if self.bank.trim().is_empty() {
            None
        } else {
            let bank = BankProfile::find_preset(&self.bank)
                .ok_or_else(|| format!("Unknown bank: {}", self.bank))?;
            Some(bank)
        };

        let rate_kind = match (&bank, self.rate_kind.trim()) {
            (Some(bank), "") => bank.rate_kind,
            (None, "") => return Err("rate_kind is required without a bank".into()),
            (_, raw) => raw.parse::<RateKind>()?,
        };

        let payment_frequency_days = self
            .payment_frequency_days
            .or(bank.as_ref().map(|b| b.payment_frequency_days))
            .unwrap_or(super::terms::DEFAULT_PAYMENT_FREQUENCY_DAYS);
        let days_in_year = self
            .days_in_year
            .or(bank.as_ref().map(|b| b.days_in_year))
            .unwrap_or(super::terms::DEFAULT_DAYS_IN_YEAR);

        let term_periods = resolve_term_periods(
            self.term_months.unwrap_or(0),
            self.term_years.unwrap_or(0),
            payment_frequency_days,
            days_in_year,
        )?;

        let currency = if self.currency.trim().is_empty() {
            Currency::Pen
        } else {
            self.currency.parse::<Currency>()?
        };

        let terms = LoanTerms {
            property_price: self.property_price,
            down_payment: self.down_payment,
            loan_amount: self.loan_amount,
            subsidy_amount: self.subsidy_amount.unwrap_or(0.0),
            annual_interest_rate: self.annual_interest_rate,
            rate_kind,
            term_periods,
            grace_periods: self.grace_periods.unwrap_or(0),
            grace_kind: self.grace_kind.parse::<GraceKind>()?,
            payment_frequency_days,
            days_in_year,
            currency,
            administration_fee: self.administration_fee.unwrap_or(0.0),
            portes_fee: self.portes_fee.unwrap_or(0.0),
            additional_monthly_costs: self.additional_monthly_costs.unwrap_or(0.0),
            life_insurance_rate: self.life_insurance_rate.unwrap_or(0.0),
            property_insurance_rate: self.property_insurance_rate.unwrap_or(0.0),
            evaluation_fee: self.evaluation_fee.unwrap_or(0.0),
            disbursement_fee: self.disbursement_fee.unwrap_or(0.0),
            npv_discount_rate_annual: self.npv_discount_rate_annual,
        };
        terms.validate()?;

        Ok(LoanRecord {
            loan_id: self.loan_id,
            terms,
        })
    }
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<LoanRecord>, Box<dyn Error + Send + Sync>> {
    let reader = Reader::from_path(path.as_ref())?;
    let loans = read_records(reader)?;
    log::info!("Loaded {} loans from {}", loans.len(), path.as_ref().display());
    Ok(loans)
}

/// Load loans from any reader (e.g., string buffer, network stream)
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<LoanRecord>, Box<dyn Error + Send + Sync>> {
    read_records(Reader::from_reader(reader))
}

fn read_records<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<LoanRecord>, Box<dyn Error + Send + Sync>> {
    let mut loans = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let loan_id = row.loan_id;
        let record = row
            .to_record()
            .map_err(|e| format!("Loan {}: {}", loan_id, e))?;
        log::debug!("Loan {}: {} periods", loan_id, record.terms.term_periods);
        loans.push(record);
    }

    Ok(loans)
}
