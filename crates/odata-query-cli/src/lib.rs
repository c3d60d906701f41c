//! Command-line inspector for OData query options.
//!
//! The `odata-query` binary parses one option value and writes it to stdout
//! as a tree, a postfix sequence, a token listing or JSON. Engine
//! diagnostics are routed to stderr through `tracing`.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
