//! Amortization engine: payment calculation, schedule generation, aggregation, and combination

mod payment;
mod state;
mod engine;
mod schedule;
mod combine;

pub use payment::{compute_monthly_payment, loan_summary, LoanSummary};
pub use state::AmortizationState;
pub use engine::{generate_schedule, NegativeAmortization, ScheduleConfig, ScheduleGenerator};
pub use schedule::{AggregateView, CombinedSchedule, PrepaymentSavings, Schedule, ScheduleRow};
pub use combine::combine;
