//! Documents Entity Module

pub mod document;

pub use document::*;
