//! Element tree to XML text, two spaces per level.

use super::Element;

pub fn write(root: &Element) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n");
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    out.extend(std::iter::repeat("  ").take(depth));
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(out, value);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }

    out.push_str(">\n");
    for child in &element.children {
        write_element(out, child, depth + 1);
    }
    out.extend(std::iter::repeat("  ").take(depth));
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

fn escape_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' => out.push_str("&#10;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_elements_and_escaping() {
        let root = Element::new("Program").child(
            Element::new("Declaration.Variable")
                .attr("name", "a")
                .attr("value", "<\"&\">"),
        );
        insta::assert_snapshot!(write(&root), @r#"
        <?xml version="1.0"?>
        <Program>
          <Declaration.Variable name="a" value="&lt;&quot;&amp;&quot;&gt;"/>
        </Program>
        "#);
    }
}
