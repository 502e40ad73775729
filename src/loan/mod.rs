//! Loan input model, bank profiles, patches and batch loading

mod terms;
mod bank;
mod patch;
pub mod loader;

pub use terms::{
    resolve_term_periods, Currency, GraceKind, LoanTerms, RateKind,
    DEFAULT_DAYS_IN_YEAR, DEFAULT_PAYMENT_FREQUENCY_DAYS,
};
pub use bank::BankProfile;
pub use patch::LoanTermsPatch;
pub use loader::{load_loans, load_loans_from_reader, LoanRecord};
