//! Security subsystem.
//!
//! Client authentication and rate limiting are absent; the only
//! browser-facing control is the cross-origin policy.

pub mod cors;
