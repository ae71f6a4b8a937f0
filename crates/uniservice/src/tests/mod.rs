//! Test suites for the service lifecycle.

mod lifecycle_unit;
pub(crate) mod support;
