//! Schedule output structures

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::loan::GraceKind;

/// A single installment period of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    // Timing
    pub period: u32,
    pub year_number: u32,
    pub periodic_rate_applied: f64,

    // Installment
    pub base_installment: f64,
    pub total_installment: f64,
    pub interest: f64,
    pub amortization: f64,

    // Charges
    pub life_insurance: f64,
    pub property_insurance: f64,
    pub administration_fee: f64,
    pub portes_fee: f64,
    pub additional_costs: f64,

    // Balance after the payment
    pub remaining_balance: f64,

    // Grace
    pub is_grace_period: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub grace_kind_applied: Option<GraceKind>,
}

impl ScheduleItem {
    /// Everything paid on top of the base installment
    pub fn charges(&self) -> f64 {
        self.total_installment - self.base_installment
    }

    pub fn insurance(&self) -> f64 {
        self.life_insurance + self.property_insurance
    }

    pub fn administrative(&self) -> f64 {
        self.administration_fee + self.portes_fee + self.additional_costs
    }
}

/// Sums over every period of a schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTotals {
    pub total_interest_paid: f64,
    pub total_paid_base: f64,
    pub total_paid_with_charges: f64,
    pub total_charges: f64,
    pub total_insurance: f64,
    pub total_administrative: f64,
}

impl ScheduleTotals {
    pub fn from_items(items: &[ScheduleItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total_interest_paid: acc.total_interest_paid + item.interest,
            total_paid_base: acc.total_paid_base + item.base_installment,
            total_paid_with_charges: acc.total_paid_with_charges + item.total_installment,
            total_charges: acc.total_charges + item.charges(),
            total_insurance: acc.total_insurance + item.insurance(),
            total_administrative: acc.total_administrative + item.administrative(),
        })
    }
}

/// Amortization schedule before any profitability metric is derived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Loan amount minus subsidy
    pub principal_financed: f64,

    /// Principal the fixed installment is built on (grows under TOTAL grace)
    pub adjusted_principal: f64,

    /// Effective rate per installment period
    pub periodic_rate: f64,

    /// Installment paid after the grace phase
    pub fixed_installment: f64,

    pub periods_per_year: f64,

    /// Evaluation plus disbursement commissions, netted from the disbursement
    pub upfront_charges: f64,

    /// Periods in chronological order
    pub items: Vec<ScheduleItem>,

    pub totals: ScheduleTotals,
}

/// Complete result of one mortgage calculation.
///
/// Built once by the calculator and never updated; recalculating means
/// running the engine again on new terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    #[serde(flatten)]
    schedule: AmortizationSchedule,

    /// NPV of the base cash flows, when a discount rate was given
    npv: Option<f64>,

    /// Periodic IRR of disbursement against base installments
    irr_base: f64,

    /// Periodic IRR of net disbursement against total installments
    irr_with_charges: f64,

    /// Annual effective cost rate
    tcea: f64,
}

impl ScheduleResult {
    pub(crate) fn new(
        schedule: AmortizationSchedule,
        npv: Option<f64>,
        irr_base: f64,
        irr_with_charges: f64,
        tcea: f64,
    ) -> Self {
        Self {
            schedule,
            npv,
            irr_base,
            irr_with_charges,
            tcea,
        }
    }

    pub fn schedule(&self) -> &AmortizationSchedule {
        &self.schedule
    }

    pub fn items(&self) -> &[ScheduleItem] {
        &self.schedule.items
    }

    pub fn totals(&self) -> &ScheduleTotals {
        &self.schedule.totals
    }

    pub fn principal_financed(&self) -> f64 {
        self.schedule.principal_financed
    }

    pub fn adjusted_principal(&self) -> f64 {
        self.schedule.adjusted_principal
    }

    pub fn periodic_rate(&self) -> f64 {
        self.schedule.periodic_rate
    }

    pub fn fixed_installment(&self) -> f64 {
        self.schedule.fixed_installment
    }

    pub fn periods_per_year(&self) -> f64 {
        self.schedule.periods_per_year
    }

    pub fn total_interest_paid(&self) -> f64 {
        self.schedule.totals.total_interest_paid
    }

    pub fn total_paid_base(&self) -> f64 {
        self.schedule.totals.total_paid_base
    }

    pub fn total_paid_with_charges(&self) -> f64 {
        self.schedule.totals.total_paid_with_charges
    }

    pub fn total_charges(&self) -> f64 {
        self.schedule.totals.total_charges
    }

    pub fn total_insurance(&self) -> f64 {
        self.schedule.totals.total_insurance
    }

    pub fn total_administrative(&self) -> f64 {
        self.schedule.totals.total_administrative
    }

    pub fn npv(&self) -> Option<f64> {
        self.npv
    }

    pub fn irr_base(&self) -> f64 {
        self.irr_base
    }

    pub fn irr_with_charges(&self) -> f64 {
        self.irr_with_charges
    }

    pub fn tcea(&self) -> f64 {
        self.tcea
    }

    /// Headline figures without the period rows
    pub fn summary(&self) -> ScheduleSummary {
        let final_balance = self
            .schedule
            .items
            .last()
            .map(|item| item.remaining_balance)
            .unwrap_or(self.schedule.principal_financed);

        ScheduleSummary {
            total_periods: self.schedule.items.len() as u32,
            principal_financed: self.schedule.principal_financed,
            periodic_rate: self.schedule.periodic_rate,
            fixed_installment: self.schedule.fixed_installment,
            totals: self.schedule.totals,
            final_balance,
            npv: self.npv,
            irr_base: self.irr_base,
            irr_with_charges: self.irr_with_charges,
            tcea: self.tcea,
        }
    }

    /// Write the period rows as CSV with a header line
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for item in &self.schedule.items {
            csv_writer.serialize(CsvItem::from(item))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Summary statistics for a calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_periods: u32,
    pub principal_financed: f64,
    pub periodic_rate: f64,
    pub fixed_installment: f64,
    #[serde(flatten)]
    pub totals: ScheduleTotals,
    pub final_balance: f64,
    pub npv: Option<f64>,
    pub irr_base: f64,
    pub irr_with_charges: f64,
    pub tcea: f64,
}

/// Flat CSV row; the grace kind is written as an empty cell outside grace
#[derive(Serialize)]
struct CsvItem<'a> {
    period: u32,
    year_number: u32,
    periodic_rate_applied: f64,
    base_installment: f64,
    total_installment: f64,
    interest: f64,
    amortization: f64,
    life_insurance: f64,
    property_insurance: f64,
    administration_fee: f64,
    portes_fee: f64,
    additional_costs: f64,
    remaining_balance: f64,
    is_grace_period: bool,
    grace_kind_applied: &'a str,
}

impl<'a> From<&'a ScheduleItem> for CsvItem<'a> {
    fn from(item: &'a ScheduleItem) -> Self {
        Self {
            period: item.period,
            year_number: item.year_number,
            periodic_rate_applied: item.periodic_rate_applied,
            base_installment: item.base_installment,
            total_installment: item.total_installment,
            interest: item.interest,
            amortization: item.amortization,
            life_insurance: item.life_insurance,
            property_insurance: item.property_insurance,
            administration_fee: item.administration_fee,
            portes_fee: item.portes_fee,
            additional_costs: item.additional_costs,
            remaining_balance: item.remaining_balance,
            is_grace_period: item.is_grace_period,
            grace_kind_applied: item.grace_kind_applied.map(|kind| kind.as_str()).unwrap_or(""),
        }
    }
}
