//! Scenario runner for batch mortgage calculations
//!
//! Every calculation is independent, so batches are spread across the rayon
//! thread pool with no shared state beyond the solver settings.

use log::{debug, warn};
use rayon::prelude::*;

use crate::error::MortgageResult;
use crate::loan::{LoanRecord, LoanTerms, LoanTermsPatch};
use crate::metrics::SolverConfig;
use crate::schedule::{MortgageCalculator, ScheduleResult};

/// Result of one loan in a batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub loan_id: u32,
    pub result: MortgageResult<ScheduleResult>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs many calculations with one set of solver settings
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let loans = load_loans("loans.csv")?;
/// for outcome in runner.run_batch(&loans) {
///     println!("{}: {:?}", outcome.loan_id, outcome.result.map(|r| r.tcea()));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    calculator: MortgageCalculator,
}

impl ScenarioRunner {
    /// Create runner with default solver settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create runner with specific solver settings
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            calculator: MortgageCalculator::new(config),
        }
    }

    /// Calculate a single loan
    pub fn run(&self, terms: &LoanTerms) -> MortgageResult<ScheduleResult> {
        self.calculator.calculate(terms)
    }

    /// Calculate every loan in parallel, keeping input order
    pub fn run_batch(&self, loans: &[LoanRecord]) -> Vec<BatchOutcome> {
        debug!("Running batch of {} loans", loans.len());

        let outcomes: Vec<BatchOutcome> = loans
            .par_iter()
            .map(|record| BatchOutcome {
                loan_id: record.loan_id,
                result: self.calculator.calculate(&record.terms),
            })
            .collect();

        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                warn!("Loan {} failed: {}", outcome.loan_id, e);
            }
        }

        outcomes
    }

    /// Run one loan under several patched variants (rates, terms, grace).
    ///
    /// Each variant is applied to the base terms, never to another variant.
    pub fn run_scenarios(
        &self,
        base: &LoanTerms,
        variants: &[LoanTermsPatch],
    ) -> Vec<MortgageResult<ScheduleResult>> {
        variants
            .par_iter()
            .map(|patch| {
                let terms = patch.apply(base)?;
                self.calculator.calculate(&terms)
            })
            .collect()
    }

    pub fn calculator(&self) -> &MortgageCalculator {
        &self.calculator
    }
}
