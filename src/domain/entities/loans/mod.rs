//! Loans Entity Module

pub mod loan;

pub use loan::*;
