//! Running state of a loan while its schedule is generated

use crate::loan::{LoanTerms, PrepaymentPolicy};
use super::payment::compute_monthly_payment;

/// State of a loan at a point in time during schedule generation
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Current month (1-indexed, 0 before the first payment)
    pub period_index: u32,

    /// Outstanding balance
    pub balance: f64,

    /// Contractual payment, fixed from the original principal and term
    pub base_payment: f64,

    /// Monthly interest rate as a decimal
    pub monthly_rate: f64,

    /// Months in which the payment did not cover accrued interest
    pub negative_amortization_periods: u32,
}

impl AmortizationState {
    /// Initialize state at origination, after any upfront prepayment
    pub fn from_terms(terms: &LoanTerms, policy: &PrepaymentPolicy) -> Self {
        Self {
            period_index: 0,
            balance: terms.principal - policy.upfront_prepayment,
            base_payment: compute_monthly_payment(
                terms.principal,
                terms.annual_rate_percent,
                terms.term_years,
            ),
            monthly_rate: terms.monthly_rate(),
            negative_amortization_periods: 0,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.period_index += 1;
    }

    pub fn has_balance(&self) -> bool {
        self.balance > 0.0
    }

    /// Interest accrued on the current balance for one month
    pub fn accrued_interest(&self) -> f64 {
        self.balance * self.monthly_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_upfront_prepayment_reduces_starting_balance_not_payment() {
        let terms = LoanTerms::new(100_000.0, 6.0, 30).unwrap();
        let plain = AmortizationState::from_terms(&terms, &PrepaymentPolicy::default());
        let prepaid = AmortizationState::from_terms(
            &terms,
            &PrepaymentPolicy::new(0.0, 10_000.0).unwrap(),
        );

        assert_eq!(prepaid.balance, 90_000.0);
        assert_eq!(plain.base_payment, prepaid.base_payment);
        assert_abs_diff_eq!(plain.accrued_interest(), 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_prepayment_beyond_principal_leaves_nothing_to_pay() {
        let terms = LoanTerms::new(10_000.0, 5.0, 5).unwrap();
        let state = AmortizationState::from_terms(
            &terms,
            &PrepaymentPolicy::new(0.0, 10_000.0).unwrap(),
        );
        assert!(!state.has_balance());
    }
}
