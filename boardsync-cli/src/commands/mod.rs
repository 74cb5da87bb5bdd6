//! Command implementations for the boardsync CLI

pub mod serve;

pub use serve::run_serve;
