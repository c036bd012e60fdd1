//! JSON codec for Logic documents.
//!
//! The AST's serde derives already produce the `{ "type", "data" }` shape;
//! encoding goes through [`serde_json::Value`] so object keys come out
//! sorted.

use std::fmt;

use logic_parser::ast::{Program, TopLevelDeclarations};
use logic_parser::visit;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A document that failed to encode or decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonError {
    pub message: String,
    /// 1-based; 0 when the error has no position.
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "invalid JSON document: {}", self.message)
        } else {
            write!(
                f,
                "invalid JSON document at {}:{}: {}",
                self.line, self.column, self.message
            )
        }
    }
}

impl std::error::Error for JsonError {}

impl From<serde_json::Error> for JsonError {
    fn from(err: serde_json::Error) -> Self {
        // serde_json appends " at line L column C" to its message.
        let message = err.to_string();
        let message = match message.rfind(" at line ") {
            Some(cut) if err.line() > 0 => message[..cut].to_string(),
            _ => message,
        };
        JsonError {
            message,
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Encode any node as pretty-printed JSON with sorted keys.
pub fn encode<T: Serialize + ?Sized>(node: &T) -> Result<String, JsonError> {
    let value = serde_json::to_value(node)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Decode any node.
pub fn decode<T: DeserializeOwned>(source: &str) -> Result<T, JsonError> {
    Ok(serde_json::from_str(source)?)
}

#[derive(Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
enum RootRef<'a> {
    Program(&'a Program),
}

#[derive(Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
enum Root {
    Program(Program),
    TopLevelDeclarations(TopLevelDeclarations),
}

/// Encode a program document, wrapped in its `program` root tag.
pub fn encode_program(program: &Program) -> Result<String, JsonError> {
    encode(&RootRef::Program(program))
}

/// Decode a `program` or `topLevelDeclarations` document. An untagged
/// `{ "id", "block" }` object is accepted as a program.
///
/// Call arguments of the form `Optional.value(x)` are unwrapped, as the
/// text parser does. Binary expressions nested in ways text cannot write,
/// such as a comparison of comparisons, are rejected.
pub fn decode_program(source: &str) -> Result<Program, JsonError> {
    let value: serde_json::Value = serde_json::from_str(source)?;
    let tagged = value.get("type").is_some() && value.get("data").is_some();
    let mut program = if tagged {
        match serde_json::from_value::<Root>(value)? {
            Root::Program(program) => program,
            Root::TopLevelDeclarations(top) => top.into(),
        }
    } else {
        serde_json::from_value::<Program>(value)?
    };
    if let Some((binary, message)) = visit::find_nested_binary(&program) {
        return Err(JsonError {
            message: format!("binary expression `{}`: {}", binary.id.as_str(), message),
            line: 0,
            column: 0,
        });
    }
    visit::unwrap_optional_arguments(&mut program);
    Ok(program)
}
