//! Discount rule matching.
//!
//! Pure selection logic for quantity-threshold discount rules. The
//! database-facing resolver lives in `db::repository::discount_rule`; this
//! module decides which of the candidate rules, if any, wins.

pub mod matcher;

pub use matcher::select_rule;
