//! Payroll policy resolution and validation.
//!
//! - [`resolver`] finds the rates that apply to a business
//! - [`validation`] checks policy edits before they are saved

pub mod resolver;
pub mod validation;

pub use resolver::{
    resolve_or_default, resolve_policy, PolicyOrigin, ResolvedPolicy, DEFAULT_POLICY_WARNING_CODE,
};
pub use validation::{validate_policy, PolicyDraft};
