//! Period-by-period schedule generation

use super::grace::GraceAdjustment;
use super::rows::{AmortizationSchedule, ScheduleItem, ScheduleTotals};
use crate::loan::{GraceKind, LoanTerms};

/// Balances closer to zero than this are floating-point residue
pub const BALANCE_EPSILON: f64 = 0.01;

/// Numbers the generator needs besides the loan terms
#[derive(Debug, Clone, Copy)]
pub struct InstallmentPlan {
    pub principal_financed: f64,
    pub periodic_rate: f64,
    pub fixed_installment: f64,
    pub periods_per_year: f64,
    pub grace: GraceAdjustment,
}

/// Ancillary charges of one period
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PeriodCharges {
    life_insurance: f64,
    property_insurance: f64,
    administration_fee: f64,
    portes_fee: f64,
    additional_costs: f64,
}

impl PeriodCharges {
    /// Life insurance follows the balance; property insurance is a flat
    /// share of the annual premium on the property price.
    fn for_balance(terms: &LoanTerms, balance: f64, periods_per_year: f64) -> Self {
        Self {
            life_insurance: balance * terms.life_insurance_rate,
            property_insurance: terms.property_price * (terms.property_insurance_rate / periods_per_year),
            administration_fee: terms.administration_fee,
            portes_fee: terms.portes_fee,
            additional_costs: terms.additional_monthly_costs,
        }
    }

    fn total(&self) -> f64 {
        self.life_insurance
            + self.property_insurance
            + self.administration_fee
            + self.portes_fee
            + self.additional_costs
    }
}

/// Walk periods `1..=term_periods` and emit one row per period.
///
/// The balance starts at the unadjusted financed principal. Under TOTAL grace
/// it grows by the unpaid interest, so it reaches the adjusted principal when
/// the grace phase ends.
pub fn generate_schedule(terms: &LoanTerms, plan: &InstallmentPlan) -> AmortizationSchedule {
    let mut items = Vec::with_capacity(terms.term_periods as usize);
    let mut balance = plan.principal_financed;

    for period in 1..=terms.term_periods {
        let is_grace_period = plan.grace.is_grace_period(period);
        let interest = balance * plan.periodic_rate;

        let (installment, amortization) = match (is_grace_period, plan.grace.grace_kind) {
            (true, GraceKind::Total) => {
                balance += interest;
                (0.0, 0.0)
            }
            (true, GraceKind::Partial) => (interest, 0.0),
            _ => {
                let amortization = plan.fixed_installment - interest;
                balance -= amortization;
                (plan.fixed_installment, amortization)
            }
        };

        if balance.abs() < BALANCE_EPSILON {
            balance = 0.0;
        }

        let charges = PeriodCharges::for_balance(terms, balance, plan.periods_per_year);

        items.push(ScheduleItem {
            period,
            year_number: year_number(period, plan.periods_per_year),
            periodic_rate_applied: plan.periodic_rate,
            base_installment: installment,
            total_installment: installment + charges.total(),
            interest,
            amortization,
            life_insurance: charges.life_insurance,
            property_insurance: charges.property_insurance,
            administration_fee: charges.administration_fee,
            portes_fee: charges.portes_fee,
            additional_costs: charges.additional_costs,
            remaining_balance: balance,
            is_grace_period,
            grace_kind_applied: is_grace_period.then_some(plan.grace.grace_kind),
        });
    }

    let totals = ScheduleTotals::from_items(&items);

    AmortizationSchedule {
        principal_financed: plan.principal_financed,
        adjusted_principal: plan.grace.adjusted_principal,
        periodic_rate: plan.periodic_rate,
        fixed_installment: plan.fixed_installment,
        periods_per_year: plan.periods_per_year,
        upfront_charges: terms.upfront_charges(),
        items,
        totals,
    }
}

/// Loan year a period falls in (1-based)
pub fn year_number(period: u32, periods_per_year: f64) -> u32 {
    if periods_per_year <= 0.0 {
        return 1;
    }
    ((period as f64 / periods_per_year).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::RateKind;
    use crate::schedule::grace::adjust_for_grace;
    use crate::schedule::installment::fixed_installment;
    use approx::assert_abs_diff_eq;

    fn plan_for(terms: &LoanTerms, periodic_rate: f64) -> InstallmentPlan {
        let principal = terms.principal_financed();
        let grace = adjust_for_grace(
            principal,
            periodic_rate,
            terms.grace_periods,
            terms.grace_kind,
            terms.term_periods,
        )
        .unwrap();
        let normal = terms.term_periods as i64 - grace.grace_periods as i64;
        InstallmentPlan {
            principal_financed: principal,
            periodic_rate,
            fixed_installment: fixed_installment(grace.adjusted_principal, periodic_rate, normal).unwrap(),
            periods_per_year: terms.periods_per_year(),
            grace,
        }
    }

    fn terms(term: u32) -> LoanTerms {
        LoanTerms::new(150_000.0, 30_000.0, 120_000.0, 0.12, RateKind::Nominal, term)
    }

    #[test]
    fn test_schedule_length_and_order() {
        let terms = terms(24);
        let schedule = generate_schedule(&terms, &plan_for(&terms, 0.01));
        assert_eq!(schedule.items.len(), 24);
        for (index, item) in schedule.items.iter().enumerate() {
            assert_eq!(item.period, index as u32 + 1);
        }
        assert_eq!(schedule.items[11].year_number, 1);
        assert_eq!(schedule.items[12].year_number, 2);
    }

    #[test]
    fn test_balance_reaches_zero() {
        let terms = terms(36);
        let schedule = generate_schedule(&terms, &plan_for(&terms, 0.01));
        assert_eq!(schedule.items.last().unwrap().remaining_balance, 0.0);
    }

    #[test]
    fn test_first_period_split() {
        let terms = terms(12);
        let schedule = generate_schedule(&terms, &plan_for(&terms, 0.01));
        let first = &schedule.items[0];
        assert_abs_diff_eq!(first.interest, 1200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.amortization, first.base_installment - 1200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.remaining_balance, 120_000.0 - first.amortization, epsilon = 1e-9);
    }

    #[test]
    fn test_total_grace_capitalizes() {
        let terms = terms(24).with_grace(3, GraceKind::Total);
        let plan = plan_for(&terms, 0.01);
        let schedule = generate_schedule(&terms, &plan);

        for item in &schedule.items[..3] {
            assert!(item.is_grace_period);
            assert_eq!(item.grace_kind_applied, Some(GraceKind::Total));
            assert_eq!(item.base_installment, 0.0);
            assert_eq!(item.amortization, 0.0);
        }
        assert_abs_diff_eq!(
            schedule.items[2].remaining_balance,
            plan.grace.adjusted_principal,
            epsilon = 1e-6
        );
        assert!(!schedule.items[3].is_grace_period);
        assert_eq!(schedule.items[3].grace_kind_applied, None);
        assert_eq!(schedule.items.last().unwrap().remaining_balance, 0.0);
    }

    #[test]
    fn test_partial_grace_pays_interest_only() {
        let terms = terms(24).with_grace(4, GraceKind::Partial);
        let schedule = generate_schedule(&terms, &plan_for(&terms, 0.01));

        for item in &schedule.items[..4] {
            assert_abs_diff_eq!(item.base_installment, 1200.0, epsilon = 1e-9);
            assert_eq!(item.amortization, 0.0);
            assert_eq!(item.remaining_balance, 120_000.0);
        }
        assert_eq!(schedule.items.last().unwrap().remaining_balance, 0.0);
    }

    #[test]
    fn test_charges_per_period() {
        let mut terms = terms(12);
        terms.life_insurance_rate = 0.0005;
        terms.property_insurance_rate = 0.0024;
        terms.administration_fee = 10.0;
        terms.portes_fee = 3.5;
        terms.additional_monthly_costs = 1.5;

        let schedule = generate_schedule(&terms, &plan_for(&terms, 0.01));
        let first = &schedule.items[0];

        assert_abs_diff_eq!(first.life_insurance, first.remaining_balance * 0.0005, epsilon = 1e-9);
        assert_abs_diff_eq!(first.property_insurance, 150_000.0 * 0.0024 / 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            first.total_installment,
            first.base_installment + first.life_insurance + first.property_insurance + 15.0,
            epsilon = 1e-9
        );
        // property insurance does not follow the balance
        assert_eq!(schedule.items[11].property_insurance, first.property_insurance);
        assert_abs_diff_eq!(
            schedule.totals.total_administrative,
            15.0 * 12.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_year_number_with_fractional_periods() {
        // 30/365 calendar: ~12.17 periods per year
        let ppy = 365.0 / 30.0;
        assert_eq!(year_number(12, ppy), 1);
        assert_eq!(year_number(13, ppy), 2);
        assert_eq!(year_number(4, 4.0), 1);
        assert_eq!(year_number(5, 4.0), 2);
    }
}
