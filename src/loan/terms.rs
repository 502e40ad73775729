//! Loan terms: the immutable input to a mortgage calculation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{MortgageError, MortgageResult};

/// Default payment frequency in days (monthly installments)
pub const DEFAULT_PAYMENT_FREQUENCY_DAYS: u32 = 30;

/// Default commercial year length in days
pub const DEFAULT_DAYS_IN_YEAR: u32 = 360;

/// Convention of the quoted annual interest rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateKind {
    /// Nominal annual rate (TNA), split evenly across periods
    Nominal,
    /// Effective annual rate (TEA), compounded down to the period
    Effective,
}

impl RateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateKind::Nominal => "NOMINAL",
            RateKind::Effective => "EFFECTIVE",
        }
    }
}

impl FromStr for RateKind {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOMINAL" => Ok(RateKind::Nominal),
            "EFFECTIVE" => Ok(RateKind::Effective),
            other => Err(MortgageError::invalid_input(
                "rate_kind",
                format!("unknown rate kind {other:?}, must be NOMINAL or EFFECTIVE"),
            )),
        }
    }
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grace period treatment at the start of the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GraceKind {
    /// No grace period
    None,
    /// Nothing is paid; interest capitalizes into the balance
    Total,
    /// Interest-only installments; principal untouched
    Partial,
}

impl GraceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraceKind::None => "NONE",
            GraceKind::Total => "TOTAL",
            GraceKind::Partial => "PARTIAL",
        }
    }
}

impl FromStr for GraceKind {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" | "" => Ok(GraceKind::None),
            "TOTAL" => Ok(GraceKind::Total),
            "PARTIAL" => Ok(GraceKind::Partial),
            other => Err(MortgageError::invalid_input(
                "grace_kind",
                format!("unknown grace kind {other:?}, must be NONE, TOTAL or PARTIAL"),
            )),
        }
    }
}

impl fmt::Display for GraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency the loan is stated in. Amounts are never converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Peruvian sol
    #[serde(rename = "PEN")]
    Pen,
    /// US dollar
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Pen => "PEN",
            Currency::Usd => "USD",
        }
    }
}

impl FromStr for Currency {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PEN" => Ok(Currency::Pen),
            "USD" => Ok(Currency::Usd),
            other => Err(MortgageError::invalid_input(
                "currency",
                format!("unknown currency {other:?}, must be PEN or USD"),
            )),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the number of installment periods from a term in months or years.
///
/// Months win when positive. Otherwise years are scaled by the periods per
/// year implied by the payment frequency and rounded to the nearest period.
pub fn resolve_term_periods(
    term_months: u32,
    term_years: u32,
    payment_frequency_days: u32,
    days_in_year: u32,
) -> MortgageResult<u32> {
    if term_months > 0 {
        return Ok(term_months);
    }
    if term_years > 0 && payment_frequency_days > 0 && days_in_year > 0 {
        let periods_per_year = days_in_year as f64 / payment_frequency_days as f64;
        let periods = (periods_per_year * term_years as f64).round();
        if periods >= 1.0 {
            return Ok(periods as u32);
        }
    }
    Err(MortgageError::InvalidTerm(format!(
        "term resolves to zero periods (months={term_months}, years={term_years})"
    )))
}

/// Full set of loan parameters for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Price of the property being financed
    pub property_price: f64,

    /// Down payment made by the borrower
    pub down_payment: f64,

    /// Loan amount requested from the bank
    pub loan_amount: f64,

    /// Housing subsidy (bono) deducted from the loan amount
    #[serde(default)]
    pub subsidy_amount: f64,

    /// Annual interest rate. Values above 1 are read as percentages.
    pub annual_interest_rate: f64,

    /// Whether the annual rate is nominal or effective
    pub rate_kind: RateKind,

    /// Number of installment periods, grace included
    pub term_periods: u32,

    /// Number of grace periods at the start of the loan
    #[serde(default)]
    pub grace_periods: u32,

    /// Grace treatment
    #[serde(default = "default_grace_kind")]
    pub grace_kind: GraceKind,

    /// Days between installments
    #[serde(default = "default_payment_frequency_days")]
    pub payment_frequency_days: u32,

    /// Days in the financial year (360 or 365)
    #[serde(default = "default_days_in_year")]
    pub days_in_year: u32,

    /// Currency of every monetary field
    #[serde(default = "default_currency")]
    pub currency: Currency,

    /// Administrative fee charged every period
    #[serde(default)]
    pub administration_fee: f64,

    /// Postage (portes) fee charged every period
    #[serde(default)]
    pub portes_fee: f64,

    /// Other fixed costs charged every period
    #[serde(default)]
    pub additional_monthly_costs: f64,

    /// Life (desgravamen) insurance rate per period, applied to the balance
    #[serde(default)]
    pub life_insurance_rate: f64,

    /// Property insurance rate per year, applied to the property price
    #[serde(default)]
    pub property_insurance_rate: f64,

    /// One-time evaluation commission paid at disbursement
    #[serde(default)]
    pub evaluation_fee: f64,

    /// One-time disbursement commission paid at disbursement
    #[serde(default)]
    pub disbursement_fee: f64,

    /// Annual discount rate for NPV; no NPV is computed when absent
    #[serde(default)]
    pub npv_discount_rate_annual: Option<f64>,
}

fn default_grace_kind() -> GraceKind {
    GraceKind::None
}

fn default_payment_frequency_days() -> u32 {
    DEFAULT_PAYMENT_FREQUENCY_DAYS
}

fn default_days_in_year() -> u32 {
    DEFAULT_DAYS_IN_YEAR
}

fn default_currency() -> Currency {
    Currency::Pen
}

impl LoanTerms {
    /// Create terms for a plain monthly loan (30/360, no grace, no charges)
    pub fn new(
        property_price: f64,
        down_payment: f64,
        loan_amount: f64,
        annual_interest_rate: f64,
        rate_kind: RateKind,
        term_periods: u32,
    ) -> Self {
        Self {
            property_price,
            down_payment,
            loan_amount,
            subsidy_amount: 0.0,
            annual_interest_rate,
            rate_kind,
            term_periods,
            grace_periods: 0,
            grace_kind: GraceKind::None,
            payment_frequency_days: DEFAULT_PAYMENT_FREQUENCY_DAYS,
            days_in_year: DEFAULT_DAYS_IN_YEAR,
            currency: Currency::Pen,
            administration_fee: 0.0,
            portes_fee: 0.0,
            additional_monthly_costs: 0.0,
            life_insurance_rate: 0.0,
            property_insurance_rate: 0.0,
            evaluation_fee: 0.0,
            disbursement_fee: 0.0,
            npv_discount_rate_annual: None,
        }
    }

    /// Same terms with a grace period
    pub fn with_grace(mut self, grace_periods: u32, grace_kind: GraceKind) -> Self {
        self.grace_periods = grace_periods;
        self.grace_kind = grace_kind;
        self
    }

    /// Same terms with a housing subsidy
    pub fn with_subsidy(mut self, subsidy_amount: f64) -> Self {
        self.subsidy_amount = subsidy_amount;
        self
    }

    /// Same terms with a different payment calendar
    pub fn with_calendar(mut self, payment_frequency_days: u32, days_in_year: u32) -> Self {
        self.payment_frequency_days = payment_frequency_days;
        self.days_in_year = days_in_year;
        self
    }

    /// Same terms with an NPV discount rate
    pub fn with_npv_discount_rate(mut self, annual_rate: f64) -> Self {
        self.npv_discount_rate_annual = Some(annual_rate);
        self
    }

    /// Installment periods per year (12 for a 30/360 calendar)
    pub fn periods_per_year(&self) -> f64 {
        if self.payment_frequency_days > 0 && self.days_in_year > 0 {
            self.days_in_year as f64 / self.payment_frequency_days as f64
        } else {
            12.0
        }
    }

    /// Principal financed after the subsidy
    pub fn principal_financed(&self) -> f64 {
        self.loan_amount - self.subsidy_amount
    }

    /// Grace periods that actually apply (zero when the grace kind is NONE)
    pub fn effective_grace_periods(&self) -> u32 {
        match self.grace_kind {
            GraceKind::None => 0,
            GraceKind::Total | GraceKind::Partial => self.grace_periods,
        }
    }

    /// One-time charges deducted from the disbursement
    pub fn upfront_charges(&self) -> f64 {
        self.evaluation_fee + self.disbursement_fee
    }

    /// Check the cross-field rules a command layer enforces before calculating
    pub fn validate(&self) -> MortgageResult<()> {
        if !(self.property_price > 0.0) {
            return Err(MortgageError::invalid_input(
                "property_price",
                "must be greater than zero",
            ));
        }
        if !(self.loan_amount > 0.0) {
            return Err(MortgageError::invalid_input("loan_amount", "must be greater than zero"));
        }
        if self.down_payment < 0.0 || self.subsidy_amount < 0.0 {
            return Err(MortgageError::invalid_input(
                "down_payment",
                "down payment and subsidy cannot be negative",
            ));
        }
        if self.annual_interest_rate < 0.0 {
            return Err(MortgageError::InvalidRate {
                annual_rate: self.annual_interest_rate,
                periods_per_year: self.periods_per_year(),
            });
        }
        if self.payment_frequency_days == 0 {
            return Err(MortgageError::invalid_input(
                "payment_frequency_days",
                "must be greater than zero",
            ));
        }
        if self.days_in_year == 0 {
            return Err(MortgageError::invalid_input("days_in_year", "must be greater than zero"));
        }
        if self.term_periods == 0 {
            return Err(MortgageError::InvalidTerm(
                "term periods must be greater than zero".to_string(),
            ));
        }
        if self.grace_periods >= self.term_periods {
            return Err(MortgageError::InvalidGracePeriod {
                grace_periods: self.grace_periods,
                term_periods: self.term_periods,
            });
        }
        if self.administration_fee < 0.0 || self.portes_fee < 0.0 || self.additional_monthly_costs < 0.0 {
            return Err(MortgageError::invalid_input(
                "administration_fee",
                "fees and additional costs cannot be negative",
            ));
        }
        if self.life_insurance_rate < 0.0 || self.property_insurance_rate < 0.0 {
            return Err(MortgageError::invalid_input(
                "life_insurance_rate",
                "insurance rates cannot be negative",
            ));
        }
        if self.evaluation_fee < 0.0 || self.disbursement_fee < 0.0 {
            return Err(MortgageError::invalid_input(
                "evaluation_fee",
                "commissions cannot be negative",
            ));
        }
        if self.principal_financed() <= 0.0 {
            return Err(MortgageError::InvalidPrincipal {
                principal_financed: self.principal_financed(),
            });
        }
        Ok(())
    }
}
