//! Loan data structures, input loading, and the storage seam

mod data;
pub mod loader;
pub mod repository;

pub use data::{LoanRecord, LoanTerms, PrepaymentPolicy, PrepaymentScenario, MAX_TERM_YEARS};
pub use loader::{load_loans_csv, load_loans_json, load_scenarios_json};
pub use repository::{LoanRepository, MemoryRepository};
