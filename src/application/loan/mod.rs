mod errors;
mod loan_service;

pub use errors::{LoanApplicationError, Result};
pub use loan_service::register_loan;
