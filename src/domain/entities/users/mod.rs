//! Users Entity Module
//!
//! ```rust,ignore
//! use crate::domain::entities::users::User;
//!
//! let user = User::new_local(
//!     "user@example.com".to_string(),
//!     "username".to_string(),
//!     "Display Name".to_string(),
//!     hashed_password,
//! );
//! ```

pub mod user;

pub use user::*;
