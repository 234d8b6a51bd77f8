//! Schedule output structures and aggregate figures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Month number (1-indexed)
    pub period_index: u32,
    /// Total paid this month (interest + principal)
    pub payment_amount: f64,
    pub interest_portion: f64,
    pub principal_portion: f64,
    /// Outstanding balance after this month's payment, never negative
    pub ending_balance: f64,
}

/// Ordered month-by-month payment breakdown for one loan (or a combination of loans)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    rows: Vec<ScheduleRow>,
}

/// Schedule summed across several loans, aligned by month
pub type CombinedSchedule = Schedule;

impl Schedule {
    pub fn new(rows: Vec<ScheduleRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<ScheduleRow> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleRow> {
        self.rows.iter()
    }

    /// Number of monthly rows, i.e. months until payoff or term exhaustion
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&ScheduleRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&ScheduleRow> {
        self.rows.last()
    }

    /// True when the last row retires the balance
    pub fn is_paid_off(&self) -> bool {
        self.rows.last().map(|r| r.ending_balance <= 0.0).unwrap_or(true)
    }

    /// Map from month number to row
    pub fn index_by_period(&self) -> HashMap<u32, &ScheduleRow> {
        self.rows.iter().map(|r| (r.period_index, r)).collect()
    }

    /// Aggregate totals for this schedule
    pub fn summary(&self) -> AggregateView {
        AggregateView::of(self)
    }
}

impl FromIterator<ScheduleRow> for Schedule {
    fn from_iter<I: IntoIterator<Item = ScheduleRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a ScheduleRow;
    type IntoIter = std::slice::Iter<'a, ScheduleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Totals derived from one or more schedules
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    /// Sum of all payments (total cost)
    pub total_payment: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    /// Months to payoff (longest schedule when aggregating several)
    pub months: u32,
    pub final_balance: f64,
}

impl AggregateView {
    pub fn of(schedule: &Schedule) -> Self {
        let total_payment: f64 = schedule.iter().map(|r| r.payment_amount).sum();
        let total_interest: f64 = schedule.iter().map(|r| r.interest_portion).sum();
        let total_principal: f64 = schedule.iter().map(|r| r.principal_portion).sum();
        let final_balance = schedule.last().map(|r| r.ending_balance).unwrap_or(0.0);

        Self {
            total_payment,
            total_interest,
            total_principal,
            months: schedule.len() as u32,
            final_balance,
        }
    }

    /// Sum totals across schedules. Months is the longest schedule's length.
    pub fn across<'a, I>(schedules: I) -> Self
    where
        I: IntoIterator<Item = &'a Schedule>,
    {
        schedules
            .into_iter()
            .map(AggregateView::of)
            .fold(AggregateView::default(), |acc, view| AggregateView {
                total_payment: acc.total_payment + view.total_payment,
                total_interest: acc.total_interest + view.total_interest,
                total_principal: acc.total_principal + view.total_principal,
                months: acc.months.max(view.months),
                final_balance: acc.final_balance + view.final_balance,
            })
    }
}

/// What a prepayment strategy saves compared to a baseline schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentSavings {
    /// Baseline total payments minus prepaid total payments
    pub cost_saved: f64,
    pub interest_saved: f64,
    /// Negative if the prepaid schedule runs longer
    pub months_saved: i64,
}

impl PrepaymentSavings {
    pub fn compare(baseline: &AggregateView, prepaid: &AggregateView) -> Self {
        Self {
            cost_saved: baseline.total_payment - prepaid.total_payment,
            interest_saved: baseline.total_interest - prepaid.total_interest,
            months_saved: baseline.months as i64 - prepaid.months as i64,
        }
    }

    pub fn years_saved(&self) -> f64 {
        self.months_saved as f64 / 12.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(period_index: u32, interest: f64, principal: f64, balance: f64) -> ScheduleRow {
        ScheduleRow {
            period_index,
            payment_amount: interest + principal,
            interest_portion: interest,
            principal_portion: principal,
            ending_balance: balance,
        }
    }

    #[test]
    fn test_summary_folds_rows() {
        let schedule: Schedule = vec![row(1, 10.0, 90.0, 110.0), row(2, 5.0, 110.0, 0.0)]
            .into_iter()
            .collect();
        let view = schedule.summary();

        assert_relative_eq!(view.total_payment, 215.0);
        assert_relative_eq!(view.total_interest, 15.0);
        assert_relative_eq!(view.total_principal, 200.0);
        assert_eq!(view.months, 2);
        assert_eq!(view.final_balance, 0.0);
        assert!(schedule.is_paid_off());
    }

    #[test]
    fn test_empty_schedule_summary() {
        let view = Schedule::default().summary();
        assert_eq!(view, AggregateView::default());
    }

    #[test]
    fn test_across_uses_longest_month_count() {
        let a = Schedule::new(vec![row(1, 1.0, 9.0, 0.0)]);
        let b = Schedule::new(vec![row(1, 2.0, 8.0, 10.0), row(2, 1.0, 10.0, 0.0)]);
        let view = AggregateView::across([&a, &b]);

        assert_eq!(view.months, 2);
        assert_relative_eq!(view.total_payment, 31.0);
        assert_relative_eq!(view.total_interest, 4.0);
    }

    #[test]
    fn test_savings_compare() {
        let baseline = AggregateView {
            total_payment: 1200.0,
            total_interest: 200.0,
            total_principal: 1000.0,
            months: 24,
            final_balance: 0.0,
        };
        let prepaid = AggregateView {
            total_payment: 1100.0,
            total_interest: 100.0,
            total_principal: 1000.0,
            months: 18,
            final_balance: 0.0,
        };
        let savings = PrepaymentSavings::compare(&baseline, &prepaid);

        assert_relative_eq!(savings.cost_saved, 100.0);
        assert_relative_eq!(savings.interest_saved, 100.0);
        assert_eq!(savings.months_saved, 6);
        assert_relative_eq!(savings.years_saved(), 0.5);
    }
}
