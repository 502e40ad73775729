//! Grace period adjustment of the principal the installment is built on

use serde::{Deserialize, Serialize};

use crate::error::{MortgageError, MortgageResult};
use crate::loan::GraceKind;

/// Principal and period split after applying the grace treatment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraceAdjustment {
    /// Principal the fixed installment amortizes
    pub adjusted_principal: f64,

    /// Grace periods in effect (zero for NONE)
    pub grace_periods: u32,

    /// Grace treatment in effect
    pub grace_kind: GraceKind,
}

impl GraceAdjustment {
    pub fn is_grace_period(&self, period: u32) -> bool {
        self.grace_periods > 0 && period <= self.grace_periods
    }
}

/// Apply the grace treatment to the financed principal.
///
/// TOTAL capitalizes interest over the grace periods:
/// `P * (1 + i)^g`. PARTIAL and NONE leave the principal as is.
pub fn adjust_for_grace(
    principal_financed: f64,
    periodic_rate: f64,
    grace_periods: u32,
    grace_kind: GraceKind,
    term_periods: u32,
) -> MortgageResult<GraceAdjustment> {
    if grace_periods >= term_periods {
        return Err(MortgageError::InvalidGracePeriod {
            grace_periods,
            term_periods,
        });
    }

    let grace_periods = match grace_kind {
        GraceKind::None => 0,
        GraceKind::Total | GraceKind::Partial => grace_periods,
    };

    let adjusted_principal = match grace_kind {
        GraceKind::Total if grace_periods > 0 => {
            principal_financed * (1.0 + periodic_rate).powi(grace_periods as i32)
        }
        _ => principal_financed,
    };

    Ok(GraceAdjustment {
        adjusted_principal,
        grace_periods,
        grace_kind,
    })
}
