pub mod catalog;
mod dependencies;
pub mod failure;
pub mod loan;

pub use dependencies::ServiceDependencies;
pub use failure::{ErrorEnvelope, Failure};
