pub mod loan_repo;

pub use loan_repo::*;
