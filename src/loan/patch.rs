//! Sparse updates to loan terms
//!
//! A patch never touches a calculated result. It produces new `LoanTerms`
//! from a full snapshot, and the whole engine runs again on them.

use serde::{Deserialize, Serialize};

use super::bank::BankProfile;
use super::terms::{Currency, GraceKind, LoanTerms, RateKind};
use crate::error::{MortgageError, MortgageResult};

/// Fields to replace; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanTermsPatch {
    pub property_price: Option<f64>,
    pub down_payment: Option<f64>,
    pub loan_amount: Option<f64>,
    pub subsidy_amount: Option<f64>,
    pub annual_interest_rate: Option<f64>,
    pub rate_kind: Option<RateKind>,
    /// Applied before the explicit calendar and rate kind fields
    pub bank: Option<BankProfile>,
    pub term_periods: Option<u32>,
    pub grace_periods: Option<u32>,
    pub grace_kind: Option<GraceKind>,
    pub payment_frequency_days: Option<u32>,
    pub days_in_year: Option<u32>,
    pub currency: Option<Currency>,
    pub administration_fee: Option<f64>,
    pub portes_fee: Option<f64>,
    pub additional_monthly_costs: Option<f64>,
    pub life_insurance_rate: Option<f64>,
    pub property_insurance_rate: Option<f64>,
    pub evaluation_fee: Option<f64>,
    pub disbursement_fee: Option<f64>,
    pub npv_discount_rate_annual: Option<f64>,
}

impl LoanTermsPatch {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == LoanTermsPatch::default()
    }

    /// Produce new terms from `current` with this patch applied.
    ///
    /// Changing the currency requires restating property price, down payment
    /// and loan amount in the same patch.
    pub fn apply(&self, current: &LoanTerms) -> MortgageResult<LoanTerms> {
        if self.is_empty() {
            return Err(MortgageError::InvalidPatch(
                "at least one field must be provided".to_string(),
            ));
        }

        if let Some(currency) = self.currency {
            let restates_amounts = self.property_price.is_some()
                && self.down_payment.is_some()
                && self.loan_amount.is_some();
            if currency != current.currency && !restates_amounts {
                return Err(MortgageError::InvalidPatch(
                    "changing currency requires property_price, down_payment and loan_amount".to_string(),
                ));
            }
        }

        let mut next = match &self.bank {
            Some(bank) => current.clone().with_bank(bank),
            None => current.clone(),
        };

        replace(&mut next.property_price, self.property_price);
        replace(&mut next.down_payment, self.down_payment);
        replace(&mut next.loan_amount, self.loan_amount);
        replace(&mut next.subsidy_amount, self.subsidy_amount);
        replace(&mut next.annual_interest_rate, self.annual_interest_rate);
        replace(&mut next.rate_kind, self.rate_kind);
        replace(&mut next.term_periods, self.term_periods);
        replace(&mut next.grace_periods, self.grace_periods);
        replace(&mut next.grace_kind, self.grace_kind);
        replace(&mut next.payment_frequency_days, self.payment_frequency_days);
        replace(&mut next.days_in_year, self.days_in_year);
        replace(&mut next.currency, self.currency);
        replace(&mut next.administration_fee, self.administration_fee);
        replace(&mut next.portes_fee, self.portes_fee);
        replace(&mut next.additional_monthly_costs, self.additional_monthly_costs);
        replace(&mut next.life_insurance_rate, self.life_insurance_rate);
        replace(&mut next.property_insurance_rate, self.property_insurance_rate);
        replace(&mut next.evaluation_fee, self.evaluation_fee);
        replace(&mut next.disbursement_fee, self.disbursement_fee);
        if self.npv_discount_rate_annual.is_some() {
            next.npv_discount_rate_annual = self.npv_discount_rate_annual;
        }

        next.validate()?;
        Ok(next)
    }
}

fn replace<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
