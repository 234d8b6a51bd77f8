//! Load saved loans and prepayment scenarios from JSON or CSV input

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;
use log::debug;

use super::{LoanRecord, LoanTerms, PrepaymentPolicy, PrepaymentScenario};
use crate::error::Result;

/// Raw CSV row for a loan list export
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Amount")]
    amount: f64,
    #[serde(rename = "Rate")]
    rate: f64,
    #[serde(rename = "Term")]
    term: u32,
    #[serde(rename = "ExtraMonthly", default)]
    extra_monthly: Option<f64>,
    #[serde(rename = "Prepayments", default)]
    prepayments: Option<f64>,
}

impl CsvRow {
    fn into_record(self) -> Result<LoanRecord> {
        let terms = LoanTerms::new(self.amount, self.rate, self.term)?;
        let baseline = PrepaymentPolicy::new(
            self.extra_monthly.unwrap_or(0.0),
            self.prepayments.unwrap_or(0.0),
        )?;
        Ok(LoanRecord::new(self.id, self.name, terms, baseline))
    }
}

/// Load loans from a CSV file with `Id,Name,Amount,Rate,Term[,ExtraMonthly,Prepayments]` columns
pub fn load_loans_csv<P: AsRef<Path>>(path: P) -> Result<Vec<LoanRecord>> {
    load_loans_csv_from_reader(File::open(path)?)
}

/// Load loans in CSV form from any reader
pub fn load_loans_csv_from_reader<R: Read>(reader: R) -> Result<Vec<LoanRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut loans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        loans.push(row.into_record()?);
    }

    debug!("loaded {} loans from CSV", loans.len());
    Ok(loans)
}

/// Load a JSON array of saved loan records
pub fn load_loans_json<P: AsRef<Path>>(path: P) -> Result<Vec<LoanRecord>> {
    load_loans_json_from_reader(BufReader::new(File::open(path)?))
}

pub fn load_loans_json_from_reader<R: Read>(reader: R) -> Result<Vec<LoanRecord>> {
    let loans: Vec<LoanRecord> = serde_json::from_reader(reader)?;
    for loan in &loans {
        loan.terms()?;
        PrepaymentPolicy::new(loan.extra_monthly, loan.prepayments)?;
    }
    debug!("loaded {} loans from JSON", loans.len());
    Ok(loans)
}

/// Load a JSON array of prepayment scenarios
pub fn load_scenarios_json<P: AsRef<Path>>(path: P) -> Result<Vec<PrepaymentScenario>> {
    load_scenarios_json_from_reader(BufReader::new(File::open(path)?))
}

pub fn load_scenarios_json_from_reader<R: Read>(reader: R) -> Result<Vec<PrepaymentScenario>> {
    let scenarios: Vec<PrepaymentScenario> = serde_json::from_reader(reader)?;
    for scenario in &scenarios {
        scenario.validate()?;
    }
    debug!("loaded {} prepayment scenarios from JSON", scenarios.len());
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanError;
    use approx::assert_relative_eq;

    #[test]
    fn test_load_loans_csv() {
        let data = "Id,Name,Amount,Rate,Term,ExtraMonthly,Prepayments\n\
                    1,House,100000,6,30,,\n\
                    2,Car,20000,4.5,5,50,1000\n";
        let loans = load_loans_csv_from_reader(data.as_bytes()).unwrap();

        assert_eq!(loans.len(), 2);
        assert_eq!(loans[0].name, "House");
        assert_relative_eq!(loans[0].monthly_payment, 599.55, epsilon = 0.01);
        assert_relative_eq!(loans[1].extra_monthly, 50.0);
        assert_relative_eq!(loans[1].prepayments, 1000.0);
    }

    #[test]
    fn test_load_loans_csv_rejects_bad_terms() {
        let data = "Id,Name,Amount,Rate,Term\n1,Broken,-5,6,30\n";
        let err = load_loans_csv_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { .. }));
    }

    #[test]
    fn test_load_scenarios_json() {
        let data = r#"[
            {"id":"s1","loanId":"1","name":"Bonus","extraMonthly":0,"prepayments":5000,
             "createdAt":"2024-03-01T10:00:00.000Z"},
            {"id":"s2","loanId":"1","name":"Raise","extraMonthly":150,
             "createdAt":"2024-04-01T10:00:00Z"}
        ]"#;
        let scenarios = load_scenarios_json_from_reader(data.as_bytes()).unwrap();

        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].loan_id, "1");
        assert_relative_eq!(scenarios[1].prepayments, 0.0);
        assert_relative_eq!(scenarios[1].extra_monthly, 150.0);
    }

    #[test]
    fn test_load_scenarios_json_rejects_blank_or_empty() {
        let unnamed = r#"[{"id":"s1","loanId":"1","name":"","prepayments":5000,
                          "createdAt":"2024-03-01T10:00:00Z"}]"#;
        assert!(matches!(
            load_scenarios_json_from_reader(unnamed.as_bytes()),
            Err(LoanError::InvalidInput { ref field, .. }) if field == "name"
        ));

        let no_amounts = r#"[{"id":"s1","loanId":"1","name":"Nothing",
                             "createdAt":"2024-03-01T10:00:00Z"}]"#;
        assert!(matches!(
            load_scenarios_json_from_reader(no_amounts.as_bytes()),
            Err(LoanError::InvalidInput { ref field, .. }) if field == "policy"
        ));
    }

    #[test]
    fn test_load_loans_json_rejects_malformed() {
        let err = load_loans_json_from_reader("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, LoanError::Json(_)));
    }
}
