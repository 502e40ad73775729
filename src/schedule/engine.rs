//! Mortgage calculator: terms in, schedule and metrics out

use super::generator::{generate_schedule, InstallmentPlan};
use super::grace::adjust_for_grace;
use super::installment::fixed_installment;
use super::rows::ScheduleResult;
use crate::error::{MortgageError, MortgageResult};
use crate::loan::{LoanTerms, LoanTermsPatch};
use crate::metrics::{npv, solve_irr, CashFlowVariant, SolverConfig};
use crate::rates::{periodic_rate, tcea};

/// Runs the full calculation for one set of loan terms.
///
/// Holds only solver settings, so one calculator can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct MortgageCalculator {
    config: SolverConfig,
}

impl MortgageCalculator {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Calculate the schedule, NPV, both IRRs and the TCEA.
    ///
    /// Either every figure is produced or the first failure is returned.
    pub fn calculate(&self, terms: &LoanTerms) -> MortgageResult<ScheduleResult> {
        let principal_financed = terms.principal_financed();
        if !(principal_financed > 0.0) {
            return Err(MortgageError::InvalidPrincipal { principal_financed });
        }

        let periods_per_year = terms.periods_per_year();
        let rate = periodic_rate(terms.annual_interest_rate, terms.rate_kind, periods_per_year)?;

        let grace = adjust_for_grace(
            principal_financed,
            rate,
            terms.grace_periods,
            terms.grace_kind,
            terms.term_periods,
        )?;

        let normal_periods = terms.term_periods as i64 - grace.grace_periods as i64;
        let installment = fixed_installment(grace.adjusted_principal, rate, normal_periods)?;

        let plan = InstallmentPlan {
            principal_financed,
            periodic_rate: rate,
            fixed_installment: installment,
            periods_per_year,
            grace,
        };
        let schedule = generate_schedule(terms, &plan);

        let base_flows = schedule.cash_flows(CashFlowVariant::Base);
        let charged_flows = schedule.cash_flows(CashFlowVariant::WithCharges);

        let npv_value = match terms.npv_discount_rate_annual {
            Some(annual) => Some(npv(&base_flows, annual, periods_per_year)?),
            None => None,
        };

        let seed = self.config.seed_for(rate);
        let irr_base = solve_irr(&base_flows, seed, &self.config)?;
        let irr_with_charges = solve_irr(&charged_flows, seed, &self.config)?;
        let tcea = tcea(irr_with_charges, periods_per_year);

        Ok(ScheduleResult::new(schedule, npv_value, irr_base, irr_with_charges, tcea))
    }

    /// Apply `patch` to `terms` and run the whole calculation again.
    ///
    /// Returns the new terms alongside their result; the inputs are untouched.
    pub fn recalculate(
        &self,
        terms: &LoanTerms,
        patch: &LoanTermsPatch,
    ) -> MortgageResult<(LoanTerms, ScheduleResult)> {
        let next = patch.apply(terms)?;
        let result = self.calculate(&next)?;
        Ok((next, result))
    }

    /// NPV of a finished result's cash flows at another annual discount rate
    pub fn npv_for(
        &self,
        result: &ScheduleResult,
        annual_discount_rate: f64,
        variant: CashFlowVariant,
    ) -> MortgageResult<f64> {
        npv(&result.cash_flows(variant), annual_discount_rate, result.periods_per_year())
    }
}

/// Calculate with the default solver settings
pub fn calculate(terms: &LoanTerms) -> MortgageResult<ScheduleResult> {
    MortgageCalculator::default().calculate(terms)
}
