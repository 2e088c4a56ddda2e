//! Property-based tests for the series helpers.
