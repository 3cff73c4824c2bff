// werview - util/mod.rs
//
// Cross-cutting utilities: constants, error types, logging.

pub mod constants;
pub mod error;
pub mod logging;
