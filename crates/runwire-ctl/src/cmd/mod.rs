//! CLI command modules.

pub mod http;
pub mod run;
