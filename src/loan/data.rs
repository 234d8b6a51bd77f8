//! Loan and prepayment data structures matching the saved-loan record format

use std::iter::Sum;
use std::ops::Add;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amortization::loan_summary;
use crate::error::{LoanError, Result};

/// Longest accepted term in years
pub const MAX_TERM_YEARS: u32 = 100;

/// Contractual terms of a fixed-rate, monthly-compounding loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Original amount borrowed
    pub principal: f64,
    /// Nominal annual rate in percent (6.0 = 6%)
    pub annual_rate_percent: f64,
    /// Term in whole years
    pub term_years: u32,
}

impl LoanTerms {
    /// Build validated terms. The engine accepts unvalidated terms as well;
    /// this is the check callers run before handing user input over.
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: u32) -> Result<Self> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(LoanError::invalid(
                "principal",
                format!("must be positive, got {}", principal),
            ));
        }
        if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
            return Err(LoanError::invalid(
                "annual_rate_percent",
                format!("must be zero or positive, got {}", annual_rate_percent),
            ));
        }
        if term_years == 0 || term_years > MAX_TERM_YEARS {
            return Err(LoanError::invalid(
                "term_years",
                format!("must be between 1 and {} years, got {}", MAX_TERM_YEARS, term_years),
            ));
        }

        Ok(Self {
            principal,
            annual_rate_percent,
            term_years,
        })
    }

    /// Number of monthly payment periods in the contractual term
    ///
    /// Saturates for unvalidated terms too long to count in a `u32`.
    pub fn total_months(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    /// Periodic (monthly) interest rate as a decimal
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }
}

/// Prepayment strategy applied on top of the contractual payment
///
/// Both amounts default to zero, so a missing policy is the same as
/// `PrepaymentPolicy::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentPolicy {
    /// Paid every period in addition to the base payment
    pub extra_monthly: f64,
    /// Paid once at period 0, before the first month's interest accrues
    pub upfront_prepayment: f64,
}

impl PrepaymentPolicy {
    pub fn new(extra_monthly: f64, upfront_prepayment: f64) -> Result<Self> {
        if !extra_monthly.is_finite() || extra_monthly < 0.0 {
            return Err(LoanError::invalid(
                "extra_monthly",
                format!("must be zero or positive, got {}", extra_monthly),
            ));
        }
        if !upfront_prepayment.is_finite() || upfront_prepayment < 0.0 {
            return Err(LoanError::invalid(
                "upfront_prepayment",
                format!("must be zero or positive, got {}", upfront_prepayment),
            ));
        }

        Ok(Self {
            extra_monthly,
            upfront_prepayment,
        })
    }

    /// Reduce any number of policies into one by summing their amounts
    pub fn fold<I>(policies: I) -> Self
    where
        I: IntoIterator<Item = PrepaymentPolicy>,
    {
        policies.into_iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.extra_monthly == 0.0 && self.upfront_prepayment == 0.0
    }
}

impl Add for PrepaymentPolicy {
    type Output = PrepaymentPolicy;

    fn add(self, other: PrepaymentPolicy) -> PrepaymentPolicy {
        PrepaymentPolicy {
            extra_monthly: self.extra_monthly + other.extra_monthly,
            upfront_prepayment: self.upfront_prepayment + other.upfront_prepayment,
        }
    }
}

impl Sum for PrepaymentPolicy {
    fn sum<I: Iterator<Item = PrepaymentPolicy>>(iter: I) -> Self {
        iter.fold(PrepaymentPolicy::default(), |acc, p| acc + p)
    }
}

/// A saved loan as stored by the loan list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub id: String,
    pub name: String,
    pub amount: f64,
    /// Annual rate in percent
    pub rate: f64,
    /// Term in years
    pub term: u32,
    pub monthly_payment: f64,
    pub total_cost: f64,
    /// Baseline one-time prepayment
    #[serde(default)]
    pub prepayments: f64,
    /// Baseline extra monthly payment
    #[serde(default)]
    pub extra_monthly: f64,
}

impl LoanRecord {
    /// Create a record from validated terms, filling in the derived payment figures
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        terms: LoanTerms,
        baseline: PrepaymentPolicy,
    ) -> Self {
        let summary = loan_summary(terms.principal, terms.annual_rate_percent, terms.term_years);
        Self {
            id: id.into(),
            name: name.into(),
            amount: terms.principal,
            rate: terms.annual_rate_percent,
            term: terms.term_years,
            monthly_payment: summary.monthly_payment,
            total_cost: summary.total_cost,
            prepayments: baseline.upfront_prepayment,
            extra_monthly: baseline.extra_monthly,
        }
    }

    /// Validated loan terms for this record
    pub fn terms(&self) -> Result<LoanTerms> {
        LoanTerms::new(self.amount, self.rate, self.term)
    }

    /// Prepayment stored on the loan itself, before any scenarios
    pub fn baseline_policy(&self) -> PrepaymentPolicy {
        PrepaymentPolicy {
            extra_monthly: self.extra_monthly,
            upfront_prepayment: self.prepayments,
        }
    }
}

/// A named what-if prepayment attached to a saved loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaymentScenario {
    pub id: String,
    pub loan_id: String,
    pub name: String,
    #[serde(default)]
    pub extra_monthly: f64,
    /// One-time prepayment amount
    #[serde(default)]
    pub prepayments: f64,
    pub created_at: DateTime<Utc>,
}

impl PrepaymentScenario {
    /// Create a scenario. The name must be non-blank and at least one amount non-zero.
    pub fn new(
        id: impl Into<String>,
        loan_id: impl Into<String>,
        name: &str,
        policy: PrepaymentPolicy,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let scenario = Self {
            id: id.into(),
            loan_id: loan_id.into(),
            name: name.trim().to_string(),
            extra_monthly: policy.extra_monthly,
            prepayments: policy.upfront_prepayment,
            created_at,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check a scenario built or deserialized without going through `new`
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LoanError::invalid("name", "scenario name is required"));
        }
        let policy = PrepaymentPolicy::new(self.extra_monthly, self.prepayments)?;
        if policy.is_empty() {
            return Err(LoanError::invalid(
                "policy",
                "at least one prepayment amount is required",
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> PrepaymentPolicy {
        PrepaymentPolicy {
            extra_monthly: self.extra_monthly,
            upfront_prepayment: self.prepayments,
        }
    }
}
