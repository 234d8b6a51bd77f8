//! Storage seam for saved loans and prepayment scenarios
//!
//! The amortization engine never touches storage. Hosts implement
//! [`LoanRepository`] over whatever store they use and hand plain records to
//! the portfolio runner.

use super::{LoanRecord, PrepaymentScenario};
use crate::error::Result;

pub trait LoanRepository {
    fn load_loans(&self) -> Result<Vec<LoanRecord>>;
    fn save_loans(&mut self, loans: &[LoanRecord]) -> Result<()>;
    fn load_scenarios(&self) -> Result<Vec<PrepaymentScenario>>;
    fn save_scenarios(&mut self, scenarios: &[PrepaymentScenario]) -> Result<()>;
}

/// Repository that keeps everything in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    loans: Vec<LoanRecord>,
    scenarios: Vec<PrepaymentScenario>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(loans: Vec<LoanRecord>, scenarios: Vec<PrepaymentScenario>) -> Self {
        Self { loans, scenarios }
    }
}

impl LoanRepository for MemoryRepository {
    fn load_loans(&self) -> Result<Vec<LoanRecord>> {
        Ok(self.loans.clone())
    }

    fn save_loans(&mut self, loans: &[LoanRecord]) -> Result<()> {
        self.loans = loans.to_vec();
        Ok(())
    }

    fn load_scenarios(&self) -> Result<Vec<PrepaymentScenario>> {
        Ok(self.scenarios.clone())
    }

    fn save_scenarios(&mut self, scenarios: &[PrepaymentScenario]) -> Result<()> {
        self.scenarios = scenarios.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{LoanTerms, PrepaymentPolicy};

    #[test]
    fn test_memory_repository_round_trip() {
        let mut repo = MemoryRepository::new();
        assert!(repo.load_loans().unwrap().is_empty());

        let terms = LoanTerms::new(50_000.0, 5.0, 10).unwrap();
        let loan = LoanRecord::new("1", "Boat", terms, PrepaymentPolicy::default());
        repo.save_loans(&[loan.clone()]).unwrap();

        assert_eq!(repo.load_loans().unwrap(), vec![loan]);
        assert!(repo.load_scenarios().unwrap().is_empty());
    }
}
