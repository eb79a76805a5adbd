//! Test suites for the docgate daemon.

mod support;
mod unit;
