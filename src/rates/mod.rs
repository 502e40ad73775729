//! Rate conventions: annual to periodic and back

mod conversion;
mod annualize;

pub use conversion::{normalize_annual_rate, periodic_rate};
pub use annualize::{annualize, tcea, DEFAULT_PERIODS_PER_YEAR};
