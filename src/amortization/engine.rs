//! Core schedule generator for monthly amortization

use log::{debug, warn};

use crate::loan::{LoanTerms, PrepaymentPolicy, MAX_TERM_YEARS};
use super::schedule::{Schedule, ScheduleRow};
use super::state::AmortizationState;

/// How to treat a month whose payment does not cover the accrued interest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NegativeAmortization {
    /// Let the principal portion go negative so the unpaid interest is added
    /// to the balance. Matches the long-standing behaviour of saved schedules.
    #[default]
    Allow,
    /// Floor the principal portion at zero: the month is interest-only and the
    /// balance stays where it was.
    InterestOnly,
}

/// Configuration for schedule generation
#[derive(Debug, Clone, Default)]
pub struct ScheduleConfig {
    pub negative_amortization: NegativeAmortization,
}

/// Main schedule generator
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    config: ScheduleConfig,
}

impl ScheduleGenerator {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Generate the month-by-month schedule for a loan under a prepayment policy.
    ///
    /// The base payment always comes from the original principal and term, so
    /// prepayments shorten the loan rather than lowering the payment. The
    /// schedule ends when the balance reaches zero or the term runs out.
    pub fn generate(&self, terms: &LoanTerms, policy: &PrepaymentPolicy) -> Schedule {
        let mut state = AmortizationState::from_terms(terms, policy);
        let total_months = terms.total_months();
        let mut rows = Vec::with_capacity(total_months.min(MAX_TERM_YEARS * 12) as usize);

        for _month in 1..=total_months {
            if !state.has_balance() {
                break;
            }

            state.advance_month();
            let row = self.calculate_month(&mut state, policy.extra_monthly);
            rows.push(row);
        }

        if state.negative_amortization_periods > 0 {
            warn!(
                "payment of {:.2} (+{:.2} extra) does not cover interest in {} of {} months \
                 ({:?}); ending balance {:.2}",
                state.base_payment,
                policy.extra_monthly,
                state.negative_amortization_periods,
                rows.len(),
                self.config.negative_amortization,
                state.balance,
            );
        }

        debug!(
            "generated {} rows for {:.2} at {}% over {} years (extra {:.2}, upfront {:.2})",
            rows.len(),
            terms.principal,
            terms.annual_rate_percent,
            terms.term_years,
            policy.extra_monthly,
            policy.upfront_prepayment,
        );

        Schedule::new(rows)
    }

    /// Calculate one month's payment split and roll the balance forward
    fn calculate_month(&self, state: &mut AmortizationState, extra_monthly: f64) -> ScheduleRow {
        let interest = state.accrued_interest();
        let mut scheduled_principal = state.base_payment + extra_monthly - interest;

        if scheduled_principal < 0.0 {
            state.negative_amortization_periods += 1;
            if self.config.negative_amortization == NegativeAmortization::InterestOnly {
                scheduled_principal = 0.0;
            }
        }

        // Final payment never overshoots the remaining balance
        let principal = scheduled_principal.min(state.balance);
        let payment = interest + principal;
        state.balance = (state.balance - principal).max(0.0);

        ScheduleRow {
            period_index: state.period_index,
            payment_amount: payment,
            interest_portion: interest,
            principal_portion: principal,
            ending_balance: state.balance,
        }
    }
}

/// Generate a schedule from plain inputs with the default configuration.
///
/// Inputs are not validated; callers check them with [`LoanTerms::new`] and
/// [`PrepaymentPolicy::new`] first.
pub fn generate_schedule(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    extra_monthly: f64,
    upfront_prepayment: f64,
) -> Schedule {
    let terms = LoanTerms {
        principal,
        annual_rate_percent,
        term_years,
    };
    let policy = PrepaymentPolicy {
        extra_monthly,
        upfront_prepayment,
    };
    ScheduleGenerator::default().generate(&terms, &policy)
}
