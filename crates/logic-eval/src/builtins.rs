//! Native implementations of the prelude's body-less functions.
//!
//! A builtin is identified by the qualified path of its declaration
//! (`Number.add`, `unwrap`). Arguments arrive already bound to parameters,
//! in declaration order.

use crate::error::EvaluationError;
use crate::value::{Memory, Value};

/// Namespaces whose body-less functions must be native.
const BUILTIN_NAMESPACES: &[&str] = &[
    "Boolean",
    "Number",
    "WholeNumber",
    "String",
    "Array",
    "Optional",
    "Color",
];

pub const BUILTINS: &[&str] = &[
    "Boolean.and",
    "Boolean.or",
    "Boolean.not",
    "Number.add",
    "Number.subtract",
    "Number.multiply",
    "Number.divide",
    "String.concat",
    "Array.at",
    "Array.count",
    "Color.saturate",
    "unwrap",
];

pub fn is_builtin(path: &str) -> bool {
    BUILTINS.contains(&path)
}

/// Whether a body-less function at `path` is expected to be native.
pub fn is_builtin_namespace(path: &[String]) -> bool {
    match path {
        [name] => is_builtin(name),
        [namespace, ..] => BUILTIN_NAMESPACES.contains(&namespace.as_str()),
        [] => false,
    }
}

pub fn apply(path: &str, args: Vec<Value>) -> Result<Value, EvaluationError> {
    match path {
        "Boolean.and" => {
            let (a, b) = bools(path, &args)?;
            Ok(Value::bool(a && b))
        }
        "Boolean.or" => {
            let (a, b) = bools(path, &args)?;
            Ok(Value::bool(a || b))
        }
        "Boolean.not" => {
            let a = arg(path, &args, 0)?
                .as_bool()
                .ok_or_else(|| EvaluationError::operands(path, "expected a Boolean"))?;
            Ok(Value::bool(!a))
        }
        "Number.add" => numbers(path, &args).map(|(a, b)| Value::number(a + b)),
        "Number.subtract" => numbers(path, &args).map(|(a, b)| Value::number(a - b)),
        "Number.multiply" => numbers(path, &args).map(|(a, b)| Value::number(a * b)),
        "Number.divide" => {
            let (a, b) = numbers(path, &args)?;
            if b == 0.0 {
                return Err(EvaluationError::operands(path, "division by zero"));
            }
            Ok(Value::number(a / b))
        }
        "String.concat" => {
            let a = arg(path, &args, 0)?.as_str();
            let b = arg(path, &args, 1)?.as_str();
            match (a, b) {
                (Some(a), Some(b)) => Ok(Value::string(format!("{}{}", a, b))),
                _ => Err(EvaluationError::operands(path, "expected two Strings")),
            }
        }
        "Array.at" => {
            let Memory::Array(items) = &arg(path, &args, 0)?.memory else {
                return Err(EvaluationError::operands(path, "expected an Array"));
            };
            let index = arg(path, &args, 1)?
                .as_number()
                .ok_or_else(|| EvaluationError::operands(path, "expected a Number index"))?;
            if index.fract() != 0.0 || index < 0.0 {
                return Err(EvaluationError::operands(path, "index must be a whole number"));
            }
            items
                .get(index as usize)
                .cloned()
                .ok_or_else(|| {
                    EvaluationError::operands(
                        path,
                        format!("index {} out of bounds for length {}", index, items.len()),
                    )
                })
        }
        "Array.count" => match &arg(path, &args, 0)?.memory {
            Memory::Array(items) => Ok(Value::number(items.len() as f64)),
            _ => Err(EvaluationError::operands(path, "expected an Array")),
        },
        "Color.saturate" => {
            let css = arg(path, &args, 0)?
                .as_color()
                .ok_or_else(|| EvaluationError::operands(path, "expected a Color"))?;
            let percent = arg(path, &args, 1)?
                .as_number()
                .ok_or_else(|| EvaluationError::operands(path, "expected a Number"))?;
            let parsed = csscolorparser::parse(css).map_err(|e| {
                EvaluationError::operands(path, format!("invalid CSS color `{}`: {}", css, e))
            })?;
            let [r, g, b, _] = parsed.to_rgba8();
            let (h, s, l) = rgb_to_hsl(r, g, b);
            let (r, g, b) = hsl_to_rgb(h, (s + s * percent).clamp(0.0, 1.0), l);
            Ok(Value::color(format!("#{:02X}{:02X}{:02X}", r, g, b)))
        }
        "unwrap" => {
            let optional = arg(path, &args, 0)?;
            let fallback = arg(path, &args, 1)?;
            match &optional.memory {
                Memory::Enum { case, payload } if case == "value" => payload
                    .first()
                    .cloned()
                    .ok_or_else(|| EvaluationError::operands(path, "`value` without a payload")),
                Memory::Enum { case, .. } if case == "none" => Ok(fallback.clone()),
                _ => Err(EvaluationError::operands(path, "expected an Optional")),
            }
        }
        _ => Err(EvaluationError::UnknownBuiltin {
            path: path.to_string(),
        }),
    }
}

fn arg<'a>(path: &str, args: &'a [Value], index: usize) -> Result<&'a Value, EvaluationError> {
    args.get(index).ok_or_else(|| EvaluationError::ArityMismatch {
        function: path.to_string(),
        expected: index + 1,
        found: args.len(),
    })
}

fn bools(path: &str, args: &[Value]) -> Result<(bool, bool), EvaluationError> {
    match (arg(path, args, 0)?.as_bool(), arg(path, args, 1)?.as_bool()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(EvaluationError::operands(path, "expected two Booleans")),
    }
}

fn numbers(path: &str, args: &[Value]) -> Result<(f64, f64), EvaluationError> {
    match (arg(path, args, 0)?.as_number(), arg(path, args, 1)?.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(EvaluationError::operands(path, "expected two Numbers")),
    }
}

/// Hue in degrees, saturation and lightness in `0..=1`.
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;
    if delta == 0.0 {
        return (0.0, 0.0, l);
    }
    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let h = if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    ((h * 60.0).rem_euclid(360.0), s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}
