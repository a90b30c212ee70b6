//! Terminal front end for Quotr.

pub mod cli;

pub use cli::CliChannel;
