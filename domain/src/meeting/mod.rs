//! Meeting domain
//!
//! A meeting runs its participants through two phases:
//!
//! 1. **Async Preparation** - each participant prepares independently
//! 2. **Sync Decision** - two round-robin discussion rounds, then the
//!    facilitator synthesizes decisions and action items
//!
//! The synthesis is free text; [`synthesis::parse_synthesis`] extracts the
//! structured items from it.

pub mod artifacts;
pub mod synthesis;
pub mod types;
pub mod validation;
pub mod value_objects;
