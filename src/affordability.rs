//! Debt-to-income affordability check
//!
//! Ratio bands follow common mortgage underwriting: 36% of gross monthly
//! income is the recommended ceiling for total debt payments, 43% the hard
//! maximum.

use serde::{Deserialize, Serialize};

use crate::error::{LoanError, Result};

/// Recommended ceiling for total debt payments as a share of income
pub const RECOMMENDED_DTI: f64 = 0.36;

/// Hard ceiling for total debt payments as a share of income
pub const MAX_DTI: f64 = 0.43;

/// An existing monthly debt payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,
    pub monthly_payment: f64,
}

/// Qualification band for a debt-to-income ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualification {
    /// 20% or less
    Excellent,
    /// Up to 36%
    Good,
    /// Up to 43%
    Fair,
    Poor,
}

impl Qualification {
    /// Band for a ratio expressed in percent
    pub fn from_ratio_percent(ratio: f64) -> Self {
        if ratio <= 20.0 {
            Qualification::Excellent
        } else if ratio <= 36.0 {
            Qualification::Good
        } else if ratio <= 43.0 {
            Qualification::Fair
        } else {
            Qualification::Poor
        }
    }
}

/// Result of a debt-to-income evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtToIncome {
    pub total_current_debts: f64,
    /// Existing debts as percent of income
    pub current_ratio: f64,
    /// Existing debts plus the new loan payment as percent of income
    pub new_ratio: f64,
    pub current_qualification: Qualification,
    pub qualification: Qualification,
    /// Largest new payment that keeps the ratio at or under 43%
    pub max_loan_payment: f64,
    /// Largest new payment that keeps the ratio at or under 36%
    pub recommended_payment: f64,
}

impl DebtToIncome {
    pub fn evaluate(monthly_income: f64, debts: &[Debt], new_loan_payment: f64) -> Result<Self> {
        if !monthly_income.is_finite() || monthly_income <= 0.0 {
            return Err(LoanError::invalid("monthly_income", "monthly income is required"));
        }
        if !new_loan_payment.is_finite() || new_loan_payment < 0.0 {
            return Err(LoanError::invalid(
                "new_loan_payment",
                format!("must be zero or positive, got {}", new_loan_payment),
            ));
        }

        let total_current_debts: f64 = debts.iter().map(|d| d.monthly_payment).sum();
        let current_ratio = total_current_debts / monthly_income * 100.0;
        let new_ratio = (total_current_debts + new_loan_payment) / monthly_income * 100.0;

        Ok(Self {
            total_current_debts,
            current_ratio,
            new_ratio,
            current_qualification: Qualification::from_ratio_percent(current_ratio),
            qualification: Qualification::from_ratio_percent(new_ratio),
            max_loan_payment: (monthly_income * MAX_DTI - total_current_debts).max(0.0),
            recommended_payment: (monthly_income * RECOMMENDED_DTI - total_current_debts).max(0.0),
        })
    }
}
