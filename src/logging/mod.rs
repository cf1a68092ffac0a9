//! Structured logging with run context.

pub mod structured;

pub use structured::RunContext;
