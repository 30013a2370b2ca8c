pub mod loan_service;

pub use loan_service::*;
