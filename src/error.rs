//! Error types for the mortgage engine

use thiserror::Error;

/// Failures returned by the engine and its input model.
///
/// Every variant is a local validation or computation failure. Nothing here is
/// transient, so callers should not retry the same input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MortgageError {
    #[error("Invalid principal: financed amount {principal_financed} must be greater than zero")]
    InvalidPrincipal { principal_financed: f64 },

    #[error("Invalid rate: annual rate {annual_rate} with {periods_per_year} periods per year")]
    InvalidRate {
        annual_rate: f64,
        periods_per_year: f64,
    },

    #[error("Invalid grace period: {grace_periods} grace periods must be fewer than {term_periods} term periods")]
    InvalidGracePeriod {
        grace_periods: u32,
        term_periods: u32,
    },

    #[error("Invalid term: {0}")]
    InvalidTerm(String),

    #[error("Empty cash flow: no schedule to evaluate")]
    EmptyCashFlow,

    #[error("IRR derivative is zero at rate {rate} (iteration {iteration})")]
    DerivativeZero { rate: f64, iteration: u32 },

    #[error("IRR diverged to {rate} at iteration {iteration}")]
    Diverged { rate: f64, iteration: u32 },

    #[error("IRR did not converge after {iterations} iterations (residual {residual})")]
    DidNotConverge { iterations: u32, residual: f64 },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),
}

impl MortgageError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        MortgageError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the IRR solver failures, where a different seed may succeed.
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self,
            MortgageError::DerivativeZero { .. }
                | MortgageError::Diverged { .. }
                | MortgageError::DidNotConverge { .. }
        )
    }
}

pub type MortgageResult<T> = Result<T, MortgageError>;
