//! Month-aligned combination of several loans' schedules

use super::schedule::{CombinedSchedule, Schedule, ScheduleRow};

/// Sum several schedules month by month.
///
/// Each combined row adds up the rows that share its month number; a loan
/// contributes nothing after its payoff month. The result runs to the latest
/// month of any schedule (the longest schedule's length when months are
/// contiguous), skipping months where both the total payment and the total
/// balance are zero.
pub fn combine<'a, I>(schedules: I) -> CombinedSchedule
where
    I: IntoIterator<Item = &'a Schedule>,
{
    let indexed: Vec<_> = schedules.into_iter().map(Schedule::index_by_period).collect();
    let last_period = indexed
        .iter()
        .filter_map(|index| index.keys().copied().max())
        .max()
        .unwrap_or(0);

    let mut rows = Vec::new();
    for period_index in 1..=last_period {
        let mut combined = ScheduleRow {
            period_index,
            payment_amount: 0.0,
            interest_portion: 0.0,
            principal_portion: 0.0,
            ending_balance: 0.0,
        };

        for row in indexed.iter().filter_map(|index| index.get(&period_index)) {
            combined.payment_amount += row.payment_amount;
            combined.interest_portion += row.interest_portion;
            combined.principal_portion += row.principal_portion;
            combined.ending_balance += row.ending_balance;
        }

        if combined.payment_amount > 0.0 || combined.ending_balance > 0.0 {
            rows.push(combined);
        }
    }

    Schedule::new(rows)
}
