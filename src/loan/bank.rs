//! Bank profiles fixing the rate convention and payment calendar of an offer

use serde::{Deserialize, Serialize};

use super::terms::{LoanTerms, RateKind};
use crate::error::{MortgageError, MortgageResult};

/// How a bank quotes and schedules its mortgage offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankProfile {
    /// Short identifier (e.g. "INTERBANK")
    pub id: String,

    /// Display name
    pub name: String,

    /// Convention of the quoted annual rate
    pub rate_kind: RateKind,

    /// Days between installments
    pub payment_frequency_days: u32,

    /// Days in the bank's financial year
    pub days_in_year: u32,

    /// Whether quoted rates already include inflation
    #[serde(default)]
    pub includes_inflation_rate: bool,
}

impl BankProfile {
    pub fn new(
        id: &str,
        name: &str,
        rate_kind: RateKind,
        payment_frequency_days: u32,
        days_in_year: u32,
        includes_inflation_rate: bool,
    ) -> MortgageResult<Self> {
        if name.trim().is_empty() {
            return Err(MortgageError::invalid_input("bank.name", "cannot be empty"));
        }
        if payment_frequency_days == 0 {
            return Err(MortgageError::invalid_input(
                "bank.payment_frequency_days",
                "must be greater than zero",
            ));
        }
        if days_in_year == 0 {
            return Err(MortgageError::invalid_input(
                "bank.days_in_year",
                "must be greater than zero",
            ));
        }
        Ok(Self {
            id: id.trim().to_ascii_uppercase(),
            name: name.trim().to_string(),
            rate_kind,
            payment_frequency_days,
            days_in_year,
            includes_inflation_rate,
        })
    }

    /// Interbank: effective rates, monthly installments, 360-day year
    pub fn interbank() -> Self {
        Self {
            id: "INTERBANK".to_string(),
            name: "Interbank".to_string(),
            rate_kind: RateKind::Effective,
            payment_frequency_days: 30,
            days_in_year: 360,
            includes_inflation_rate: false,
        }
    }

    /// Built-in profiles
    pub fn presets() -> Vec<BankProfile> {
        vec![Self::interbank()]
    }

    /// Look up a built-in profile by id, case-insensitively
    pub fn find_preset(id: &str) -> Option<BankProfile> {
        let wanted = id.trim().to_ascii_uppercase();
        Self::presets().into_iter().find(|bank| bank.id == wanted)
    }

    /// Installment periods per year under this bank's calendar
    pub fn periods_per_year(&self) -> f64 {
        self.days_in_year as f64 / self.payment_frequency_days as f64
    }
}

impl LoanTerms {
    /// Same terms re-quoted under a bank's rate convention and calendar
    pub fn with_bank(mut self, bank: &BankProfile) -> Self {
        self.rate_kind = bank.rate_kind;
        self.payment_frequency_days = bank.payment_frequency_days;
        self.days_in_year = bank.days_in_year;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interbank_preset() {
        let bank = BankProfile::find_preset("interbank").unwrap();
        assert_eq!(bank.rate_kind, RateKind::Effective);
        assert_eq!(bank.periods_per_year(), 12.0);
        assert!(BankProfile::find_preset("UNKNOWN").is_none());
    }

    #[test]
    fn test_new_rejects_bad_profiles() {
        assert!(BankProfile::new("X", "  ", RateKind::Nominal, 30, 360, false).is_err());
        assert!(BankProfile::new("X", "Bank X", RateKind::Nominal, 0, 360, false).is_err());
        assert!(BankProfile::new("X", "Bank X", RateKind::Nominal, 30, 0, false).is_err());
        let bank = BankProfile::new(" bcp ", "BCP", RateKind::Nominal, 60, 360, false).unwrap();
        assert_eq!(bank.id, "BCP");
    }

    #[test]
    fn test_with_bank_overrides_calendar() {
        let bank = BankProfile::new("BIM", "Bimonthly", RateKind::Nominal, 60, 360, false).unwrap();
        let terms = LoanTerms::new(100_000.0, 10_000.0, 90_000.0, 0.08, RateKind::Effective, 60)
            .with_bank(&bank);
        assert_eq!(terms.rate_kind, RateKind::Nominal);
        assert_eq!(terms.periods_per_year(), 6.0);
    }
}
