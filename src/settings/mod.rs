//! User-editable adapter settings: validation and application.
//!
//! This module provides:
//! - Address validation ([`is_valid_ipv4_like`])
//! - The desired state of one adapter ([`AdapterSettings`])
//! - Planning and executing changes ([`plan`], [`Applier`])

mod apply;
mod validate;

#[cfg(test)]
mod apply_tests;

pub use apply::{
    AddressField, AdapterSettings, Applier, ApplyError, ApplyPlan, ApplyStep, ValidationError,
    plan,
};
pub use validate::is_valid_ipv4_like;
