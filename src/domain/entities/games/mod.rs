//! Games Entity Module

pub mod game;

pub use game::*;
