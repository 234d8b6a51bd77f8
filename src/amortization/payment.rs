//! Level monthly payment for a fixed-rate amortizing loan

use serde::{Deserialize, Serialize};

/// Contractual payment figures for a loan with no prepayment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_payment: f64,
    /// Monthly payment times the number of periods
    pub total_cost: f64,
}

/// Calculate the level monthly payment that retires `principal` over `term_years`.
///
/// Uses the annuity formula `P·r·(1+r)^n / ((1+r)^n − 1)` with `r` the monthly
/// rate and `n = term_years × 12`. At a zero rate the annuity formula divides
/// zero by zero, so the loan amortizes linearly instead: `P / n`.
///
/// # Arguments
/// * `principal` - Amount borrowed
/// * `annual_rate_percent` - Nominal annual rate in percent (6.0 = 6%)
/// * `term_years` - Term in whole years
pub fn compute_monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let months = term_years.saturating_mul(12);

    if monthly_rate <= 0.0 {
        return principal / f64::from(months);
    }

    annuity_payment(principal, monthly_rate, months)
}

/// Raw annuity formula with no zero-rate guard (NaN at `monthly_rate == 0`)
///
/// Written as `P·r / (1 − (1+r)^−n)` so very long terms converge on the
/// interest-only payment `P·r` instead of overflowing to `inf / inf`.
pub(crate) fn annuity_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    let growth = match i32::try_from(months) {
        Ok(n) => (1.0 + monthly_rate).powi(n),
        Err(_) => (1.0 + monthly_rate).powf(f64::from(months)),
    };
    principal * monthly_rate / (1.0 - growth.recip())
}

/// Monthly payment and total contractual cost of a loan
pub fn loan_summary(principal: f64, annual_rate_percent: f64, term_years: u32) -> LoanSummary {
    let monthly_payment = compute_monthly_payment(principal, annual_rate_percent, term_years);
    LoanSummary {
        monthly_payment,
        total_cost: monthly_payment * f64::from(term_years.saturating_mul(12)),
    }
}
