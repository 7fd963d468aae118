//! Unit tests for the GitHub gathering module.
