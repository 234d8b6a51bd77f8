//! Portfolio runner for saved loans and their prepayment scenarios
//!
//! Resolves each loan's baseline prepayment plus every scenario attached to it
//! into one effective policy, then hands a single policy per loan to the
//! schedule generator.

use log::info;
use rayon::prelude::*;

use crate::amortization::{
    combine, AggregateView, CombinedSchedule, PrepaymentSavings, Schedule, ScheduleConfig,
    ScheduleGenerator,
};
use crate::error::{LoanError, Result};
use crate::loan::{LoanRecord, LoanRepository, PrepaymentPolicy, PrepaymentScenario};

/// Schedule generated for one saved loan
#[derive(Debug, Clone)]
pub struct LoanSchedule {
    pub loan_id: String,
    /// Loan name with its scenario names appended
    pub display_name: String,
    pub policy: PrepaymentPolicy,
    pub schedule: Schedule,
}

impl LoanSchedule {
    pub fn summary(&self) -> AggregateView {
        self.schedule.summary()
    }
}

/// Saved loans and scenarios, ready to generate schedules from
///
/// # Example
/// ```ignore
/// let runner = PortfolioRunner::new(loans, scenarios);
/// let house = runner.schedule_for("house")?;
/// let everything = runner.combined()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PortfolioRunner {
    loans: Vec<LoanRecord>,
    scenarios: Vec<PrepaymentScenario>,
    generator: ScheduleGenerator,
}

impl PortfolioRunner {
    pub fn new(loans: Vec<LoanRecord>, scenarios: Vec<PrepaymentScenario>) -> Self {
        Self {
            loans,
            scenarios,
            generator: ScheduleGenerator::default(),
        }
    }

    /// Load loans and scenarios from a repository
    pub fn from_repository<R: LoanRepository>(repository: &R) -> Result<Self> {
        Ok(Self::new(repository.load_loans()?, repository.load_scenarios()?))
    }

    pub fn with_config(mut self, config: ScheduleConfig) -> Self {
        self.generator = ScheduleGenerator::new(config);
        self
    }

    /// Write the current loans and scenarios back to a repository
    pub fn save_to<R: LoanRepository>(&self, repository: &mut R) -> Result<()> {
        repository.save_loans(&self.loans)?;
        repository.save_scenarios(&self.scenarios)
    }

    pub fn loans(&self) -> &[LoanRecord] {
        &self.loans
    }

    pub fn scenarios(&self) -> &[PrepaymentScenario] {
        &self.scenarios
    }

    pub fn loan(&self, loan_id: &str) -> Result<&LoanRecord> {
        self.loans
            .iter()
            .find(|l| l.id == loan_id)
            .ok_or_else(|| LoanError::UnknownLoan(loan_id.to_string()))
    }

    pub fn scenario(&self, scenario_id: &str) -> Result<&PrepaymentScenario> {
        self.scenarios
            .iter()
            .find(|s| s.id == scenario_id)
            .ok_or_else(|| LoanError::UnknownScenario(scenario_id.to_string()))
    }

    pub fn scenarios_for<'a>(
        &'a self,
        loan_id: &'a str,
    ) -> impl Iterator<Item = &'a PrepaymentScenario> + 'a {
        self.scenarios.iter().filter(move |s| s.loan_id == loan_id)
    }

    /// Attach a scenario to a saved loan
    ///
    /// Rejects scenarios with a blank name or no prepayment amount.
    pub fn add_scenario(&mut self, scenario: PrepaymentScenario) -> Result<()> {
        scenario.validate()?;
        self.loan(&scenario.loan_id)?;
        info!("adding scenario '{}' to loan {}", scenario.name, scenario.loan_id);
        self.scenarios.push(scenario);
        Ok(())
    }

    pub fn remove_scenario(&mut self, scenario_id: &str) -> Result<PrepaymentScenario> {
        let position = self
            .scenarios
            .iter()
            .position(|s| s.id == scenario_id)
            .ok_or_else(|| LoanError::UnknownScenario(scenario_id.to_string()))?;
        Ok(self.scenarios.remove(position))
    }

    /// Loan baseline plus every scenario attached to the loan
    pub fn effective_policy(&self, loan_id: &str) -> Result<PrepaymentPolicy> {
        let loan = self.loan(loan_id)?;
        Ok(self.policy_for(loan))
    }

    fn policy_for(&self, loan: &LoanRecord) -> PrepaymentPolicy {
        let scenarios = self.scenarios_for(&loan.id).map(PrepaymentScenario::policy);
        PrepaymentPolicy::fold(std::iter::once(loan.baseline_policy()).chain(scenarios))
    }

    /// Schedule for one loan under its effective policy
    pub fn schedule_for(&self, loan_id: &str) -> Result<LoanSchedule> {
        let loan = self.loan(loan_id)?;
        self.build(loan)
    }

    fn build(&self, loan: &LoanRecord) -> Result<LoanSchedule> {
        let terms = loan.terms()?;
        let policy = self.policy_for(loan);
        Ok(LoanSchedule {
            loan_id: loan.id.clone(),
            display_name: self.name_with_scenarios(loan),
            policy,
            schedule: self.generator.generate(&terms, &policy),
        })
    }

    /// Schedules for every saved loan, in loan order
    pub fn schedules(&self) -> Result<Vec<LoanSchedule>> {
        let schedules = self
            .loans
            .par_iter()
            .map(|loan| self.build(loan))
            .collect::<Result<Vec<_>>>()?;
        info!("generated schedules for {} loans", schedules.len());
        Ok(schedules)
    }

    /// All loans viewed together as one month-aligned schedule
    pub fn combined(&self) -> Result<CombinedSchedule> {
        let schedules = self.schedules()?;
        Ok(combine(schedules.iter().map(|s| &s.schedule)))
    }

    /// Savings from a single scenario, measured against the loan with no prepayment at all
    pub fn scenario_savings(&self, scenario_id: &str) -> Result<PrepaymentSavings> {
        let scenario = self.scenario(scenario_id)?;
        let terms = self.loan(&scenario.loan_id)?.terms()?;

        let baseline = self.generator.generate(&terms, &PrepaymentPolicy::default());
        let prepaid = self.generator.generate(&terms, &scenario.policy());

        Ok(PrepaymentSavings::compare(&baseline.summary(), &prepaid.summary()))
    }

    /// Loan name followed by its scenario names, e.g. "House (Bonus, Raise)"
    pub fn display_name(&self, loan_id: &str) -> Result<String> {
        Ok(self.name_with_scenarios(self.loan(loan_id)?))
    }

    fn name_with_scenarios(&self, loan: &LoanRecord) -> String {
        let names: Vec<&str> = self.scenarios_for(&loan.id).map(|s| s.name.as_str()).collect();
        if names.is_empty() {
            loan.name.clone()
        } else {
            format!("{} ({})", loan.name, names.join(", "))
        }
    }

    /// Title for the combined view, e.g. "Combined (2 loans, 3 scenarios)"
    pub fn combined_display_name(&self) -> String {
        if self.scenarios.is_empty() {
            format!("Combined ({} loans)", self.loans.len())
        } else {
            format!(
                "Combined ({} loans, {} scenarios)",
                self.loans.len(),
                self.scenarios.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::generate_schedule;
    use crate::loan::{LoanTerms, MemoryRepository};
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn loan(
        id: &str,
        name: &str,
        principal: f64,
        rate: f64,
        term: u32,
        baseline: PrepaymentPolicy,
    ) -> LoanRecord {
        LoanRecord::new(id, name, LoanTerms::new(principal, rate, term).unwrap(), baseline)
    }

    fn scenario(
        id: &str,
        loan_id: &str,
        name: &str,
        extra: f64,
        upfront: f64,
    ) -> PrepaymentScenario {
        PrepaymentScenario::new(
            id,
            loan_id,
            name,
            PrepaymentPolicy::new(extra, upfront).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn test_runner() -> PortfolioRunner {
        PortfolioRunner::new(
            vec![
                loan(
                    "house",
                    "House",
                    200_000.0,
                    6.0,
                    30,
                    PrepaymentPolicy::new(50.0, 0.0).unwrap(),
                ),
                loan("car", "Car", 25_000.0, 4.0, 5, PrepaymentPolicy::default()),
            ],
            vec![
                scenario("s1", "house", "Bonus", 0.0, 10_000.0),
                scenario("s2", "house", "Raise", 150.0, 0.0),
            ],
        )
    }

    #[test]
    fn test_effective_policy_sums_baseline_and_scenarios() {
        let runner = test_runner();

        let house = runner.effective_policy("house").unwrap();
        assert_relative_eq!(house.extra_monthly, 200.0);
        assert_relative_eq!(house.upfront_prepayment, 10_000.0);

        assert!(runner.effective_policy("car").unwrap().is_empty());
        assert!(matches!(runner.effective_policy("boat"), Err(LoanError::UnknownLoan(_))));
    }

    #[test]
    fn test_schedule_for_uses_single_folded_policy() {
        let runner = test_runner();
        let house = runner.schedule_for("house").unwrap();
        let expected = generate_schedule(200_000.0, 6.0, 30, 200.0, 10_000.0);

        assert_eq!(house.schedule, expected);
        assert_eq!(house.display_name, "House (Bonus, Raise)");
    }

    #[test]
    fn test_schedules_preserve_loan_order() {
        let runner = test_runner();
        let schedules = runner.schedules().unwrap();

        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].loan_id, "house");
        assert_eq!(schedules[1].loan_id, "car");
        assert_eq!(schedules[1].display_name, "Car");
        assert_eq!(schedules[1].schedule.len(), 60);
    }

    #[test]
    fn test_combined_runs_to_longest_loan() {
        let runner = test_runner();
        let house_len = runner.schedule_for("house").unwrap().schedule.len();
        let combined = runner.combined().unwrap();

        assert_eq!(combined.len(), house_len);
        assert_eq!(runner.combined_display_name(), "Combined (2 loans, 2 scenarios)");
    }

    #[test]
    fn test_scenario_savings_against_bare_loan() {
        let runner = test_runner();
        let savings = runner.scenario_savings("s2").unwrap();

        let bare = generate_schedule(200_000.0, 6.0, 30, 0.0, 0.0).summary();
        let raised = generate_schedule(200_000.0, 6.0, 30, 150.0, 0.0).summary();

        assert_eq!(savings.months_saved, bare.months as i64 - raised.months as i64);
        assert!(savings.months_saved > 0);
        assert_relative_eq!(savings.interest_saved, bare.total_interest - raised.total_interest);
        assert_relative_eq!(savings.cost_saved, bare.total_payment - raised.total_payment);
    }

    #[test]
    fn test_add_and_remove_scenarios() {
        let mut runner = test_runner();

        let orphan = scenario("s3", "boat", "Windfall", 0.0, 1_000.0);
        assert!(matches!(runner.add_scenario(orphan), Err(LoanError::UnknownLoan(_))));

        runner.add_scenario(scenario("s3", "car", "Windfall", 0.0, 1_000.0)).unwrap();
        assert_eq!(runner.display_name("car").unwrap(), "Car (Windfall)");

        let removed = runner.remove_scenario("s1").unwrap();
        assert_eq!(removed.name, "Bonus");
        assert_eq!(runner.display_name("house").unwrap(), "House (Raise)");
        assert!(runner.remove_scenario("s1").is_err());
    }

    #[test]
    fn test_add_scenario_rejects_blank_or_empty_records() {
        let mut runner = test_runner();
        let valid = scenario("s3", "car", "Windfall", 0.0, 1_000.0);

        let unnamed = PrepaymentScenario {
            name: "  ".to_string(),
            ..valid.clone()
        };
        assert!(matches!(
            runner.add_scenario(unnamed),
            Err(LoanError::InvalidInput { .. })
        ));

        let no_amounts = PrepaymentScenario {
            prepayments: 0.0,
            ..valid
        };
        assert!(matches!(
            runner.add_scenario(no_amounts),
            Err(LoanError::InvalidInput { .. })
        ));

        assert_eq!(runner.scenarios().len(), 2);
        assert_eq!(runner.display_name("car").unwrap(), "Car");
    }

    #[test]
    fn test_repository_round_trip() {
        let runner = test_runner();
        let mut repo = MemoryRepository::new();
        runner.save_to(&mut repo).unwrap();

        let reloaded = PortfolioRunner::from_repository(&repo).unwrap();
        assert_eq!(reloaded.loans(), runner.loans());
        assert_eq!(reloaded.scenarios(), runner.scenarios());

        let seeded = MemoryRepository::with_records(
            runner.loans().to_vec(),
            runner.scenarios().to_vec(),
        );
        let from_seeded = PortfolioRunner::from_repository(&seeded).unwrap();
        assert_eq!(
            from_seeded.effective_policy("house").unwrap(),
            runner.effective_policy("house").unwrap()
        );
        assert_eq!(
            PortfolioRunner::default().combined_display_name(),
            "Combined (0 loans)"
        );
    }
}
