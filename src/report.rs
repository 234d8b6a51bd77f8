//! Display formatting and export for schedules
//!
//! Nothing here feeds back into the engine. Amounts are rendered for people
//! (currency symbols, thousands separators) or written out as CSV.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{AggregateView, Schedule};
use crate::error::Result;
use crate::loan::PrepaymentPolicy;

/// Display currency
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    INR,
    GBP,
    JPY,
    CAD,
    /// Any other code, shown with a dollar sign
    Other(String),
}

impl Currency {
    pub fn symbol(&self) -> &str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::INR => "₹",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::Other(_) => "$",
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::INR => "INR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::Other(code) => code,
        }
    }
}

impl FromStr for Currency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Ok(match code.as_str() {
            "USD" => Currency::USD,
            "EUR" => Currency::EUR,
            "INR" => Currency::INR,
            "GBP" => Currency::GBP,
            "JPY" => Currency::JPY,
            "CAD" => Currency::CAD,
            _ => Currency::Other(code),
        })
    }
}

/// Render an amount as `<symbol><grouped integer>.<two decimals>`, e.g. `$1,234.56`
pub fn format_amount(amount: f64, currency: &Currency) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", currency.symbol(), sign, grouped, fraction)
}

/// Plain-text schedule report suitable for sharing
#[derive(Debug, Clone)]
pub struct ShareReport<'a> {
    pub title: String,
    pub schedule: &'a Schedule,
    pub currency: Currency,
    /// Prepayment shown under the summary when present and non-zero
    pub prepayment: Option<PrepaymentPolicy>,
    pub generated_on: NaiveDate,
}

impl<'a> ShareReport<'a> {
    pub fn new(title: impl Into<String>, schedule: &'a Schedule, generated_on: NaiveDate) -> Self {
        Self {
            title: title.into(),
            schedule,
            currency: Currency::default(),
            prepayment: None,
            generated_on,
        }
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn prepayment(mut self, policy: PrepaymentPolicy) -> Self {
        self.prepayment = Some(policy);
        self
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ShareReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = |value: f64| format_amount(value, &self.currency);

        writeln!(f, "Amortization Schedule - {}", self.title)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<8}{:<16}{:<16}{:<16}{}",
            "Month", "Payment", "Interest", "Principal", "Balance"
        )?;
        writeln!(f, "{}", "─".repeat(72))?;

        for row in self.schedule {
            writeln!(
                f,
                "{:<8}{:<16}{:<16}{:<16}{}",
                row.period_index,
                amount(row.payment_amount),
                amount(row.interest_portion),
                amount(row.principal_portion),
                amount(row.ending_balance),
            )?;
        }

        let summary: AggregateView = self.schedule.summary();
        writeln!(f)?;
        writeln!(f, "Summary:")?;
        writeln!(f, "Total Payments: {} months", summary.months)?;
        writeln!(f, "Total Cost: {}", amount(summary.total_payment))?;
        writeln!(f, "Total Interest: {}", amount(summary.total_interest))?;

        if let Some(policy) = self.prepayment.filter(|p| !p.is_empty()) {
            writeln!(f)?;
            writeln!(f, "Prepayment Details:")?;
            writeln!(f, "Extra Monthly: {}", amount(policy.extra_monthly))?;
            writeln!(f, "Initial Prepayment: {}", amount(policy.upfront_prepayment))?;
        }

        writeln!(f)?;
        write!(f, "Generated on {}", self.generated_on.format("%Y-%m-%d"))
    }
}

/// CSV row for schedule export, amounts rounded to cents
#[derive(Debug, Serialize)]
struct CsvRow {
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Payment")]
    payment: f64,
    #[serde(rename = "Interest")]
    interest: f64,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "Balance")]
    balance: f64,
}

fn cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Write a schedule as CSV with `Month,Payment,Interest,Principal,Balance` columns
pub fn write_schedule_csv<W: Write>(writer: W, schedule: &Schedule) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in schedule {
        csv_writer.serialize(CsvRow {
            month: row.period_index,
            payment: cents(row.payment_amount),
            interest: cents(row.interest_portion),
            principal: cents(row.principal_portion),
            balance: cents(row.ending_balance),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}
