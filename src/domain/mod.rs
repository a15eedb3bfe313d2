pub mod book;
pub mod commands;
pub mod errors;
pub mod loan;
pub mod pagination;
pub mod value_objects;

pub use book::{Book, BookField, BookFilter};
pub use errors::*;
pub use loan::Loan;
pub use pagination::{Page, PageRequest};
pub use value_objects::*;
