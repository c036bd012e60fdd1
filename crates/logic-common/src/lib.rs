//! Shared building blocks for the Logic language crates.
//!
//! - [`span`]: byte-offset spans and line/column lookup
//! - [`token`]: the token vocabulary of the textual syntax
//! - [`error`]: lexer errors

pub mod error;
pub mod span;
pub mod token;
