//! Profitability metrics over the borrower's cash flows

mod cashflows;
mod npv;
mod irr;

pub use cashflows::{build_cash_flows, CashFlowVariant};
pub use npv::{npv, npv_at_periodic_rate};
pub use irr::{
    calculate_irr, solve_irr, SolverConfig, DEFAULT_IRR_MAX_ITERATIONS, DEFAULT_IRR_TOLERANCE,
    FALLBACK_IRR_SEED, IRR_LOWER_BOUND, IRR_UPPER_BOUND,
};
