//! Mortgage Engine - French-method amortization with grace periods and cost metrics
//!
//! This library provides:
//! - Annual to periodic rate conversion (nominal and effective)
//! - Total and partial grace periods with interest capitalization
//! - Period-by-period schedules with insurance and fee charges
//! - NPV, IRR (base and with charges) and TCEA
//! - Loan term patches, bank presets and parallel batch runs

pub mod error;
pub mod loan;
pub mod rates;
pub mod schedule;
pub mod metrics;
pub mod scenario;

// Re-export commonly used types
pub use error::{MortgageError, MortgageResult};
pub use loan::{
    load_loans, load_loans_from_reader, resolve_term_periods, BankProfile, Currency, GraceKind,
    LoanRecord, LoanTerms, LoanTermsPatch, RateKind, DEFAULT_DAYS_IN_YEAR,
    DEFAULT_PAYMENT_FREQUENCY_DAYS,
};
pub use schedule::{calculate, MortgageCalculator, ScheduleItem, ScheduleResult, ScheduleSummary};
pub use metrics::{CashFlowVariant, SolverConfig};
pub use scenario::{BatchOutcome, ScenarioRunner};
