//! XML text to element tree.
//!
//! Covers the subset Logic documents use: a prolog, comments, elements
//! with single- or double-quoted attributes, self-closing tags and
//! character references. Text content other than whitespace is rejected.

use logic_lexer::Cursor;

use super::{Element, XmlError};

/// Parse a document with a single root element.
pub fn parse(source: &str) -> Result<Element, XmlError> {
    let mut reader = Reader {
        cursor: Cursor::new(source),
    };
    reader.misc()?;
    if reader.cursor.is_eof() {
        return Err(reader.error("document has no root element"));
    }
    let root = reader.element()?;
    reader.misc()?;
    if !reader.cursor.is_eof() {
        return Err(reader.error("content after the root element"));
    }
    Ok(root)
}

struct Reader<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Reader<'src> {
    fn offset(&self) -> usize {
        self.cursor.pos() as usize
    }

    fn error(&self, message: impl Into<String>) -> XmlError {
        XmlError::new(message, self.offset())
    }

    fn at(&self, prefix: &str) -> bool {
        self.cursor.rest().starts_with(prefix)
    }

    fn skip(&mut self, prefix: &str) {
        for _ in prefix.chars() {
            self.cursor.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(char::is_whitespace);
    }

    /// Consume everything up to and including `terminator`.
    fn skip_past(&mut self, terminator: &str, what: &str) -> Result<(), XmlError> {
        let start = self.offset();
        while !self.at(terminator) {
            if self.cursor.advance().is_none() {
                return Err(XmlError::new(format!("unterminated {}", what), start));
            }
        }
        self.skip(terminator);
        Ok(())
    }

    /// Whitespace, comments, processing instructions and doctypes.
    fn misc(&mut self) -> Result<(), XmlError> {
        loop {
            self.skip_whitespace();
            if self.at("<!--") {
                self.skip_past("-->", "comment")?;
            } else if self.at("<?") {
                self.skip_past("?>", "processing instruction")?;
            } else if self.at("<!") {
                self.skip_past(">", "declaration")?;
            } else {
                return Ok(());
            }
        }
    }

    fn name(&mut self) -> Result<String, XmlError> {
        let start = self.cursor.pos();
        self.cursor
            .eat_while(|c| !c.is_whitespace() && !matches!(c, '/' | '>' | '=' | '<' | '"' | '\''));
        let name = self.cursor.slice(start, self.cursor.pos());
        if name.is_empty() {
            return Err(self.error("expected a name"));
        }
        Ok(name.to_string())
    }

    fn element(&mut self) -> Result<Element, XmlError> {
        let offset = self.offset();
        if !self.cursor.eat('<') {
            return Err(self.error("expected `<`"));
        }
        let mut element = Element::new(self.name()?);
        element.offset = offset;

        loop {
            self.skip_whitespace();
            if self.cursor.eat('/') {
                if !self.cursor.eat('>') {
                    return Err(self.error("expected `>` after `/`"));
                }
                return Ok(element);
            }
            if self.cursor.eat('>') {
                break;
            }
            let key = self.name()?;
            self.skip_whitespace();
            if !self.cursor.eat('=') {
                return Err(self.error(format!("expected `=` after attribute `{}`", key)));
            }
            self.skip_whitespace();
            let value = self.attribute_value()?;
            element.attributes.push((key, value));
        }

        loop {
            self.misc()?;
            if self.at("</") {
                self.skip("</");
                let close = self.name()?;
                if close != element.name {
                    return Err(self.error(format!(
                        "`</{}>` does not close `<{}>`",
                        close, element.name
                    )));
                }
                self.skip_whitespace();
                if !self.cursor.eat('>') {
                    return Err(self.error("expected `>`"));
                }
                return Ok(element);
            }
            match self.cursor.peek() {
                Some('<') => element.children.push(self.element()?),
                Some(_) => return Err(self.error("unexpected text content")),
                None => {
                    return Err(XmlError::new(
                        format!("unclosed element `<{}>`", element.name),
                        offset,
                    ))
                }
            }
        }
    }

    fn attribute_value(&mut self) -> Result<String, XmlError> {
        let start = self.offset();
        let quote = match self.cursor.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected a quoted attribute value")),
        };
        self.cursor.advance();

        let mut value = String::new();
        loop {
            match self.cursor.advance() {
                Some(c) if c == quote => return Ok(value),
                Some('&') => value.push(self.reference()?),
                Some('<') => return Err(self.error("`<` in attribute value")),
                Some(c) => value.push(c),
                None => return Err(XmlError::new("unterminated attribute value", start)),
            }
        }
    }

    /// The character for `&name;` or `&#N;` / `&#xN;`; the `&` is consumed.
    fn reference(&mut self) -> Result<char, XmlError> {
        let start = self.cursor.pos();
        self.cursor.eat_while(|c| c != ';' && c != '"' && c != '\'');
        let body = self.cursor.slice(start, self.cursor.pos());
        if !self.cursor.eat(';') {
            return Err(self.error("unterminated character reference"));
        }
        let c = match body {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                let code = if let Some(hex) = body.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = body.strip_prefix('#') {
                    dec.parse::<u32>().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32)
            }
        };
        c.ok_or_else(|| {
            XmlError::new(format!("unknown reference `&{};`", body), start as usize - 1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prolog_comments_and_self_closing() {
        let root = parse(
            "<?xml version=\"1.0\"?>\n<!-- tokens -->\n<Program>\n  <Declaration.Variable name='a' type=\"Number\" value=\"1\"/>\n</Program>\n",
        )
        .unwrap();
        assert_eq!(root.name, "Program");
        assert_eq!(root.children.len(), 1);
        let variable = &root.children[0];
        assert_eq!(variable.name, "Declaration.Variable");
        assert_eq!(variable.get("name"), Some("a"));
        assert_eq!(variable.get("value"), Some("1"));
        assert!(variable.children.is_empty());
    }

    #[test]
    fn character_references() {
        let root = parse("<A v=\"&lt;&amp;&#65;&#x42;&quot;\"/>").unwrap();
        assert_eq!(root.get("v"), Some("<&AB\""));
    }

    #[test]
    fn mismatched_close_tag() {
        let err = parse("<A><B></A>").unwrap_err();
        assert_eq!(err.message, "`</A>` does not close `<B>`");
    }

    #[test]
    fn unclosed_element_points_at_its_start() {
        let err = parse("<A>\n  <B>").unwrap_err();
        assert_eq!(err.offset, 6);
        assert_eq!(err.message, "unclosed element `<B>`");
    }

    #[test]
    fn text_content_is_rejected() {
        let err = parse("<A>hello</A>").unwrap_err();
        assert_eq!(err.message, "unexpected text content");
    }
}
