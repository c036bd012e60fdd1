//! Printers and codecs for Logic programs.
//!
//! Three concrete syntaxes share the one AST:
//!
//! - [`text`]: Swift-like source, laid out through a Wadler-Lindig document
//!   IR ([`ir`], [`printer`]).
//! - [`json`]: the `{ "type", "data" }` document form, with sorted keys.
//! - [`xml`]: element-per-node documents with attribute-encoded names and
//!   types.

pub mod ir;
pub mod json;
pub mod printer;
pub mod text;
pub mod xml;

pub use json::JsonError;
pub use printer::PrintOptions;
pub use text::{print, ToDoc};
pub use xml::XmlError;
