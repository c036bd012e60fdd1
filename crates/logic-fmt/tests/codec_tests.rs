//! JSON and XML codecs.

use logic_fmt::{json, print, xml, PrintOptions};
use logic_parser::ast::{Literal, Program};
use logic_parser::{parse, NodeId};

const SAMPLE: &str = r##"/// Brand palette
enum Colors {
  static let primary: Color = #color(css: "#123456")
}

enum Result<T> {
  case ok(T)
  case failure(String, Number)
}

struct Shape {
  static let paths: Array<Path> = []
  static let fill: Optional<Color>
}

func isDark(_ c: Color, threshold: Number = 0.5) -> Boolean {
  if c == Colors.primary {
    return true
  }
  return false
}

let accent: Color = #color(css: "#FF0000")

let style: TextStyle = TextStyle(color: accent, fontWeight: FontWeight.bold)

let handler: (Number, Number) -> Boolean = isLess
"##;

fn text(program: &Program) -> String {
    print(program, &PrintOptions::default())
}

// ── JSON ───────────────────────────────────────────────────────────────

#[test]
fn json_round_trip_preserves_the_tree() {
    let program = parse(SAMPLE).unwrap();
    let encoded = json::encode_program(&program).unwrap();
    let decoded = json::decode_program(&encoded).unwrap();
    assert_eq!(decoded, program);
}

#[test]
fn json_keys_are_sorted_and_whole_numbers_are_integers() {
    let literal = Literal::Number {
        id: NodeId::new("A1"),
        value: 5.0,
    };
    insta::assert_snapshot!(json::encode(&literal).unwrap(), @r#"
    {
      "data": {
        "id": "A1",
        "value": 5
      },
      "type": "number"
    }
    "#);

    let fractional = Literal::Number {
        id: NodeId::new("A2"),
        value: 0.25,
    };
    assert!(json::encode(&fractional).unwrap().contains("\"value\": 0.25"));
}

#[test]
fn json_top_level_declarations_root() {
    let source = r##"{
      "type": "topLevelDeclarations",
      "data": {
        "id": "ROOT",
        "declarations": [{
          "type": "variable",
          "data": {
            "id": "V",
            "name": { "id": "P", "name": "primary" },
            "annotation": {
              "type": "typeIdentifier",
              "data": { "id": "T", "identifier": { "id": "I", "string": "Color" } }
            },
            "initializer": {
              "type": "literalExpression",
              "data": {
                "id": "E",
                "literal": { "type": "color", "data": { "id": "L", "value": "#FF0000" } }
              }
            }
          }
        }]
      }
    }"##;
    let program = json::decode_program(source).unwrap();
    assert_eq!(program.id, NodeId::new("ROOT"));
    assert_eq!(text(&program), "let primary: Color = #color(css: \"#FF0000\")\n");
}

#[test]
fn json_bare_program_and_optional_unwrap() {
    let wrapped = parse("let s: TextStyle = f(x)").unwrap();
    let mut encoded = serde_json::to_value(&wrapped).unwrap();
    // Swap the argument `x` for `Optional.value(x)` directly in the document.
    let argument = &mut encoded["block"][0]["data"]["content"]["data"]["initializer"]["data"]
        ["arguments"][0]["data"]["expression"];
    let inner = argument.clone();
    *argument = serde_json::json!({
        "type": "functionCallExpression",
        "data": {
            "id": "CALL",
            "expression": {
                "type": "memberExpression",
                "data": {
                    "id": "M",
                    "expression": {
                        "type": "identifierExpression",
                        "data": { "id": "O", "identifier": { "id": "OI", "string": "Optional" } }
                    },
                    "memberName": { "id": "VI", "string": "value" }
                }
            },
            "arguments": [{ "type": "argument", "data": { "id": "A", "expression": inner } }]
        }
    });

    let decoded = json::decode_program(&encoded.to_string()).unwrap();
    assert_eq!(decoded, wrapped);
}

#[test]
fn json_errors() {
    let err = json::decode_program("{\"type\": \"program\", \"data\": {\"block\": []}}").unwrap_err();
    assert!(err.message.contains("missing field `id`"), "{}", err.message);
}

// ── XML ────────────────────────────────────────────────────────────────

#[test]
fn xml_encoding() {
    let program = parse(
        "let accent: Color = #color(css: \"#FF0000\")\nlet style: TextStyle = TextStyle(color: accent, fontWeight: FontWeight.bold)\nfunc isDark(_ c: Color) -> Boolean {\n  return c == Colors.black\n}",
    )
    .unwrap();
    insta::assert_snapshot!(xml::encode_program(&program), @r##"
    <?xml version="1.0"?>
    <Program>
      <Declaration.Variable name="accent" type="Color" value="#FF0000"/>
      <Declaration.Variable name="style" type="TextStyle">
        <FunctionCallExpression>
          <IdentifierExpression name="TextStyle"/>
          <Argument label="color">
            <IdentifierExpression name="accent"/>
          </Argument>
          <Argument label="fontWeight">
            <MemberExpression name="bold">
              <IdentifierExpression name="FontWeight"/>
            </MemberExpression>
          </Argument>
        </FunctionCallExpression>
      </Declaration.Variable>
      <Declaration.Function name="isDark" returnType="Boolean">
        <Parameter label="_" name="c" type="Color"/>
        <ReturnStatement>
          <BinaryExpression operator="isEqualTo">
            <IdentifierExpression name="c"/>
            <MemberExpression name="black">
              <IdentifierExpression name="Colors"/>
            </MemberExpression>
          </BinaryExpression>
        </ReturnStatement>
      </Declaration.Function>
    </Program>
    "##);
}

#[test]
fn xml_round_trips_modulo_ids() {
    let program = parse(SAMPLE).unwrap();
    let decoded = xml::decode_program(&xml::encode_program(&program)).unwrap();
    assert_ne!(decoded.id, program.id);
    assert_eq!(text(&decoded), text(&program));
    assert_eq!(text(&decoded), SAMPLE);
}

#[test]
fn xml_declarations_root() {
    let source = r##"<?xml version="1.0"?>
<!-- generated -->
<Declarations>
  <Namespace name="Colors" comment="Brand palette">
    <Variable name="primary" type="Color" value="#123456"/>
    <Variable name="fallback" type="Optional(Color)">
      <FunctionCallExpression>
        <MemberExpression name="value"><IdentifierExpression name="Optional"/></MemberExpression>
        <Argument><IdentifierExpression name="primary"/></Argument>
      </FunctionCallExpression>
    </Variable>
  </Namespace>
  <Enumeration name="Result" genericParameters="T">
    <Case name="ok" associatedValues="T"/>
    <Case name="failure" associatedValues="String,Number"/>
  </Enumeration>
  <Record name="Shape">
    <Variable name="paths" type="Array(Path)"/>
    <Function name="area" returnType="(Number)-&gt;Number"/>
  </Record>
</Declarations>
"##;
    let program = xml::decode_program(source).unwrap();
    insta::assert_snapshot!(text(&program), @r##"
    /// Brand palette
    enum Colors {
      static let primary: Color = #color(css: "#123456")
      static let fallback: Optional<Color> = Optional.value(primary)
    }

    enum Result<T> {
      case ok(T)
      case failure(String, Number)
    }

    struct Shape {
      static let paths: Array<Path>
      static func area() -> (Number) -> Number {}
    }
    "##);
}

#[test]
fn xml_decoding_unwraps_optional_arguments() {
    let source = r#"<Program>
  <Expression>
    <FunctionCallExpression>
      <IdentifierExpression name="TextStyle"/>
      <Argument label="color">
        <FunctionCallExpression>
          <MemberExpression name="value"><IdentifierExpression name="Optional"/></MemberExpression>
          <Argument><Literal type="Color" value="red"/></Argument>
        </FunctionCallExpression>
      </Argument>
    </FunctionCallExpression>
  </Expression>
</Program>"#;
    let program = xml::decode_program(source).unwrap();
    assert_eq!(text(&program), "TextStyle(color: #color(css: \"red\"))\n");
}

#[test]
fn xml_structural_errors() {
    let err = xml::decode_program("<Program><Loop/></Program>").unwrap_err();
    assert_eq!(err.message, "unexpected <Loop>, expected a statement");
    assert_eq!(err.offset, 9);

    let err = xml::decode_program("<Program><Declaration.Variable type=\"Number\"/></Program>")
        .unwrap_err();
    assert_eq!(
        err.message,
        "<Declaration.Variable> is missing the `name` attribute"
    );

    let err = xml::decode_program("<Module/>").unwrap_err();
    assert!(err.to_string().contains("found <Module>"));

    let err = xml::decode_program(
        "<Program><Declaration.Variable name=\"n\" type=\"Number\" value=\"ten\"/></Program>",
    )
    .unwrap_err();
    assert_eq!(err.message, "invalid Number value `ten`");

    let err = xml::decode_program(
        "<Program><Declaration.Variable name=\"n\" type=\"Number\" value=\"inf\"/></Program>",
    )
    .unwrap_err();
    assert_eq!(err.message, "invalid Number value `inf`");
}

#[test]
fn extreme_number_literals_round_trip() {
    let source = "let big: Number = 1e300\n\nlet tiny: Number = 0.000001\n\nlet negative: Number = -1e20\n";
    let program = parse(source).unwrap();

    let decoded = json::decode_program(&json::encode_program(&program).unwrap()).unwrap();
    assert_eq!(decoded, program);

    let from_xml = xml::decode_program(&xml::encode_program(&program)).unwrap();
    assert_eq!(text(&from_xml), text(&program));

    let reparsed = parse(&text(&program)).unwrap();
    assert_eq!(text(&reparsed), text(&program));
    let values: Vec<f64> = reparsed
        .declarations()
        .filter_map(|d| match d {
            logic_parser::ast::Declaration::Variable(v) => match &v.initializer {
                Some(logic_parser::ast::Expression::LiteralExpression(e)) => match e.literal {
                    Literal::Number { value, .. } => Some(value),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![1e300, 0.000001, -1e20]);
}

#[test]
fn out_of_range_numbers_never_reach_the_codecs() {
    assert!(parse("let x: Number = 1e400").is_err());
    let err = json::decode_program(
        r#"{"type": "program", "data": {"id": "P", "block": [{"type": "expression", "data": {"id": "S", "expression": {"type": "literalExpression", "data": {"id": "E", "literal": {"type": "number", "data": {"id": "L", "value": 1e400}}}}}}]}}"#,
    )
    .unwrap_err();
    assert!(err.message.contains("out of range"), "{}", err.message);
}

// ── Nesting without a text form ────────────────────────────────────────

/// `(x == y) == y`, which text cannot write.
fn nested_comparison() -> Program {
    let mut program = parse("let a: Boolean = x == y").unwrap();
    let mut nested = false;
    logic_parser::visit::walk_expressions_mut(&mut program, &mut |expression| {
        if let logic_parser::ast::Expression::BinaryExpression(binary) = expression {
            if !nested {
                nested = true;
                binary.left = Box::new(logic_parser::ast::Expression::BinaryExpression(
                    binary.clone(),
                ));
            }
        }
    });
    program
}

#[test]
fn nested_comparisons_are_rejected_on_decode() {
    let program = nested_comparison();

    let encoded = json::encode_program(&program).unwrap();
    let err = json::decode_program(&encoded).unwrap_err();
    assert!(
        err.message
            .ends_with("a comparison operand cannot be a comparison or an assignment"),
        "{}",
        err.message
    );

    let encoded = xml::encode_program(&program);
    let err = xml::decode_program(&encoded).unwrap_err();
    assert!(
        err.to_string()
            .contains("a comparison operand cannot be a comparison or an assignment"),
        "{err}"
    );
}

#[test]
fn assignments_of_comparisons_still_decode() {
    let program = parse("func f() {\n  let b: Boolean = true\n  b = 1 < 2\n}").unwrap();
    let decoded = json::decode_program(&json::encode_program(&program).unwrap()).unwrap();
    assert_eq!(text(&decoded), text(&program));
    let decoded = xml::decode_program(&xml::encode_program(&program)).unwrap();
    assert_eq!(text(&decoded), text(&program));
}
