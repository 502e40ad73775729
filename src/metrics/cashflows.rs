//! Borrower cash-flow vectors built from a schedule

use serde::{Deserialize, Serialize};

use crate::schedule::{AmortizationSchedule, ScheduleItem, ScheduleResult};

/// Which installment amount the periodic outflows use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowVariant {
    /// Full disbursement against base installments
    Base,
    /// Disbursement net of upfront commissions against total installments
    WithCharges,
}

/// Build the signed flow vector: index 0 is the (net) disbursement received,
/// indices `1..=n` are the installments paid.
pub fn build_cash_flows(
    principal_financed: f64,
    upfront_charges: f64,
    items: &[ScheduleItem],
    variant: CashFlowVariant,
) -> Vec<f64> {
    let mut flows = Vec::with_capacity(items.len() + 1);

    flows.push(match variant {
        CashFlowVariant::Base => principal_financed,
        CashFlowVariant::WithCharges => principal_financed - upfront_charges,
    });

    flows.extend(items.iter().map(|item| match variant {
        CashFlowVariant::Base => -item.base_installment,
        CashFlowVariant::WithCharges => -item.total_installment,
    }));

    flows
}

impl AmortizationSchedule {
    pub fn cash_flows(&self, variant: CashFlowVariant) -> Vec<f64> {
        build_cash_flows(self.principal_financed, self.upfront_charges, &self.items, variant)
    }
}

impl ScheduleResult {
    pub fn cash_flows(&self, variant: CashFlowVariant) -> Vec<f64> {
        self.schedule().cash_flows(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(base: f64, total: f64) -> ScheduleItem {
        ScheduleItem {
            period: 1,
            year_number: 1,
            periodic_rate_applied: 0.01,
            base_installment: base,
            total_installment: total,
            interest: 0.0,
            amortization: 0.0,
            life_insurance: total - base,
            property_insurance: 0.0,
            administration_fee: 0.0,
            portes_fee: 0.0,
            additional_costs: 0.0,
            remaining_balance: 0.0,
            is_grace_period: false,
            grace_kind_applied: None,
        }
    }

    #[test]
    fn test_base_flows() {
        let items = vec![item(510.0, 530.0), item(510.0, 525.0)];
        let flows = build_cash_flows(1000.0, 50.0, &items, CashFlowVariant::Base);
        assert_eq!(flows, vec![1000.0, -510.0, -510.0]);
    }

    #[test]
    fn test_flows_with_charges() {
        let items = vec![item(510.0, 530.0), item(510.0, 525.0)];
        let flows = build_cash_flows(1000.0, 50.0, &items, CashFlowVariant::WithCharges);
        assert_eq!(flows, vec![950.0, -530.0, -525.0]);
    }

    #[test]
    fn test_empty_schedule_keeps_disbursement() {
        let flows = build_cash_flows(1000.0, 0.0, &[], CashFlowVariant::Base);
        assert_eq!(flows, vec![1000.0]);
    }
}
