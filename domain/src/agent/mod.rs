//! Agent domain
//!
//! Typed role actions and the thoughts agents record while working.

pub mod actions;
pub mod thought;
