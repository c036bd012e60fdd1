//! XML codec for Logic documents.
//!
//! Documents are a tree of [`Element`]s with string attributes and no text
//! content. [`reader`] and [`writer`] convert between text and elements;
//! [`convert`] maps elements to and from the AST.
//!
//! Node ids are not written. Decoding mints fresh ids, so a document
//! round-trips modulo ids and placeholders.

mod convert;
pub mod reader;
pub mod writer;

use std::fmt;

use logic_parser::ast::Program;
use logic_parser::visit;

/// An XML element: name, ordered attributes and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Byte offset of the start tag in the source, 0 for built elements.
    pub offset: usize,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            offset: 0,
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.push((key.to_string(), value.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The attribute `key`, or an error naming the element.
    pub fn require(&self, key: &str) -> Result<&str, XmlError> {
        self.get(key).ok_or_else(|| {
            XmlError::new(
                format!("<{}> is missing the `{}` attribute", self.name, key),
                self.offset,
            )
        })
    }
}

/// A malformed document, or one that does not describe a Logic program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError {
    pub message: String,
    /// Byte offset into the source.
    pub offset: usize,
}

impl XmlError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        XmlError {
            message: message.into(),
            offset,
        }
    }
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid XML document at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for XmlError {}

/// Encode a program as an XML document.
pub fn encode_program(program: &Program) -> String {
    writer::write(&convert::program(program))
}

/// Decode a `<Program>` or `<Declarations>` document.
pub fn decode_program(source: &str) -> Result<Program, XmlError> {
    let root = reader::parse(source)?;
    let mut program = convert::to_program(&root)?;
    visit::unwrap_optional_arguments(&mut program);
    Ok(program)
}
