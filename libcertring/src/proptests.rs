//! Property-based tests for the certifying ring.
