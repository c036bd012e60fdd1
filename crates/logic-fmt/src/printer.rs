//! Wadler-Lindig printer for the format IR.
//!
//! Converts a `FormatIR` tree into a string, deciding at each `Group`
//! boundary whether to render flat (all on one line) or broken (with line
//! breaks and indentation).

use crate::ir::FormatIR;

/// Layout options for the text printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Spaces per indentation level. Default: 2.
    pub indent: usize,
    /// Maximum line width before groups break. Default: 100.
    pub max_width: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            max_width: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

/// A command on the printer's work stack.
#[derive(Debug)]
struct PrintCmd<'a> {
    indent: usize,
    mode: Mode,
    ir: &'a FormatIR,
}

/// Render `ir`. No trailing newline is added.
pub fn render(ir: &FormatIR, options: &PrintOptions) -> String {
    let mut out = String::new();
    let mut col: usize = 0;
    let mut stack: Vec<PrintCmd> = vec![PrintCmd {
        indent: 0,
        mode: Mode::Break,
        ir,
    }];

    while let Some(cmd) = stack.pop() {
        match cmd.ir {
            FormatIR::Empty => {}

            FormatIR::Text(s) => {
                out.push_str(s);
                col += s.chars().count();
            }

            FormatIR::Space | FormatIR::SoftLine if cmd.mode == Mode::Flat => {
                if matches!(cmd.ir, FormatIR::Space) {
                    out.push(' ');
                    col += 1;
                }
            }

            FormatIR::Space | FormatIR::SoftLine | FormatIR::Hardline => {
                newline(&mut out, cmd.indent);
                col = cmd.indent;
            }

            FormatIR::Indent(child) => {
                stack.push(PrintCmd {
                    indent: cmd.indent + options.indent,
                    mode: cmd.mode,
                    ir: child,
                });
            }

            FormatIR::Group(child) => {
                let fits = col.saturating_add(measure_flat(child)) <= options.max_width;
                stack.push(PrintCmd {
                    indent: cmd.indent,
                    mode: if fits { Mode::Flat } else { Mode::Break },
                    ir: child,
                });
            }

            FormatIR::IfBreak { flat, broken } => {
                let ir = match cmd.mode {
                    Mode::Flat => flat,
                    Mode::Break => broken,
                };
                stack.push(PrintCmd {
                    indent: cmd.indent,
                    mode: cmd.mode,
                    ir,
                });
            }

            FormatIR::Concat(parts) => {
                // Reverse so the first part is processed first.
                for part in parts.iter().rev() {
                    stack.push(PrintCmd {
                        indent: cmd.indent,
                        mode: cmd.mode,
                        ir: part,
                    });
                }
            }
        }
    }

    out
}

/// Newline plus indentation; blank lines carry no trailing spaces.
fn newline(out: &mut String, indent: usize) {
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
    out.extend(std::iter::repeat(' ').take(indent));
}

/// Width of `ir` rendered flat. `usize::MAX` if it contains a `Hardline`.
fn measure_flat(ir: &FormatIR) -> usize {
    match ir {
        FormatIR::Empty | FormatIR::SoftLine => 0,
        FormatIR::Text(s) => s.chars().count(),
        FormatIR::Space => 1,
        FormatIR::Hardline => usize::MAX,
        FormatIR::Indent(child) | FormatIR::Group(child) => measure_flat(child),
        FormatIR::IfBreak { flat, .. } => measure_flat(flat),
        FormatIR::Concat(parts) => {
            let mut total: usize = 0;
            for part in parts {
                let w = measure_flat(part);
                if w == usize::MAX {
                    return usize::MAX;
                }
                total = total.saturating_add(w);
            }
            total
        }
    }
}
