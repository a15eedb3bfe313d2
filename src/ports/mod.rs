pub mod book_repository;
pub mod error;
pub mod loan_repository;

pub use book_repository::*;
pub use error::*;
pub use loan_repository::*;
