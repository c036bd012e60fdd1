//! Wadler-Lindig document IR for printing Logic programs.
//!
//! The text printer builds a `FormatIR` tree from the AST; the layout is
//! only decided by [`crate::printer`], which renders each `Group` flat when
//! it fits in the remaining width and broken otherwise.

/// A document IR node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatIR {
    /// Literal text to emit verbatim.
    Text(String),
    /// A space in flat mode; a newline + indent in broken mode.
    Space,
    /// Nothing in flat mode; a newline + indent in broken mode.
    SoftLine,
    /// Always emits a newline + current indentation.
    Hardline,
    /// Increase indentation for the child by the configured indent size.
    Indent(Box<FormatIR>),
    /// Render the child flat if it fits, broken otherwise.
    Group(Box<FormatIR>),
    /// Select content by the enclosing group's mode.
    IfBreak {
        flat: Box<FormatIR>,
        broken: Box<FormatIR>,
    },
    Concat(Vec<FormatIR>),
    Empty,
}

// ── Helper constructors ─────────────────────────────────────────────────

pub fn text(s: impl Into<String>) -> FormatIR {
    FormatIR::Text(s.into())
}

pub fn space() -> FormatIR {
    FormatIR::Space
}

pub fn soft_line() -> FormatIR {
    FormatIR::SoftLine
}

pub fn hardline() -> FormatIR {
    FormatIR::Hardline
}

pub fn indent(ir: FormatIR) -> FormatIR {
    FormatIR::Indent(Box::new(ir))
}

pub fn group(ir: FormatIR) -> FormatIR {
    FormatIR::Group(Box::new(ir))
}

pub fn concat(parts: Vec<FormatIR>) -> FormatIR {
    FormatIR::Concat(parts)
}

pub fn if_break(flat: FormatIR, broken: FormatIR) -> FormatIR {
    FormatIR::IfBreak {
        flat: Box::new(flat),
        broken: Box::new(broken),
    }
}

/// Interleave `items` with `separator`.
pub fn join(items: Vec<FormatIR>, separator: impl Fn() -> FormatIR) -> FormatIR {
    let mut parts = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            parts.push(separator());
        }
        parts.push(item);
    }
    concat(parts)
}

/// `open` items `close`, one item per line when the group breaks.
pub fn delimited(open: &str, items: Vec<FormatIR>, close: &str) -> FormatIR {
    if items.is_empty() {
        return text(format!("{}{}", open, close));
    }
    group(concat(vec![
        text(open),
        indent(concat(vec![
            soft_line(),
            join(items, || concat(vec![text(","), space()])),
        ])),
        soft_line(),
        text(close),
    ]))
}
