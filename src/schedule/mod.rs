//! French-method schedule: grace adjustment, installment and period rows

mod grace;
mod installment;
mod rows;
mod generator;
mod engine;

pub use grace::{adjust_for_grace, GraceAdjustment};
pub use installment::fixed_installment;
pub use rows::{AmortizationSchedule, ScheduleItem, ScheduleResult, ScheduleSummary, ScheduleTotals};
pub use generator::{generate_schedule, year_number, InstallmentPlan, BALANCE_EPSILON};
pub use engine::{calculate, MortgageCalculator};
