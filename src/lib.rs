//! Loan Amortization - fixed-rate amortization engine with prepayment scenarios
//!
//! This library provides:
//! - Level monthly payment calculation (with a linear fallback at zero interest)
//! - Month-by-month schedules under extra-monthly and upfront prepayment
//! - Aggregate totals, prepayment savings, and month-aligned multi-loan schedules
//! - Scenario accumulation for saved loans
//! - Share-report and CSV export, plus a debt-to-income check
//!
//! The engine functions are pure: identical inputs always produce identical output.

pub mod error;
pub mod loan;
pub mod amortization;
pub mod portfolio;
pub mod report;
pub mod affordability;

// Re-export commonly used types
pub use error::{LoanError, Result};
pub use loan::{LoanRecord, LoanTerms, PrepaymentPolicy, PrepaymentScenario};
pub use amortization::{
    combine, compute_monthly_payment, generate_schedule, AggregateView, Schedule, ScheduleRow,
    ScheduleGenerator,
};
pub use portfolio::PortfolioRunner;
