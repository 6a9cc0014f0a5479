//! Test support code and fixtures

pub mod collector;
