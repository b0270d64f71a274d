//! Shared fixtures for the unit-checking integration tests.

pub mod column;
