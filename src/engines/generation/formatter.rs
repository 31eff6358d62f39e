use crate::engines::generation::command_stack::{Command, CommandStack};
use crate::engines::simplification::utilized_commands;
use crate::functions::operators::Opcode;

/// Output flavour of an infix rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Console,
    Latex,
}

/// Render the expression computed by `stack` as an infix string.
///
/// Constants whose slot is unassigned or beyond `constants` print as `?`.
pub fn format_expression(stack: &CommandStack, constants: &[f64], notation: Notation) -> String {
    let utilized = utilized_commands(stack);
    let mut rendered: Vec<String> = Vec::with_capacity(stack.len());

    for (position, command) in stack.iter().enumerate() {
        if !utilized[position] {
            rendered.push(String::new());
            continue;
        }
        let text = match command.op {
            Opcode::Variable => match notation {
                Notation::Console => format!("X_{}", command.a),
                Notation::Latex => format!("X_{{{}}}", command.a),
            },
            Opcode::Constant => constant_value(command, constants)
                .map_or_else(|| "?".to_string(), |value| value.to_string()),
            Opcode::Operator(op) => {
                let a = operand_text(&rendered, command.a);
                let b = operand_text(&rendered, command.b);
                match notation {
                    Notation::Console => op.format_console(a, b),
                    Notation::Latex => op.format_latex(a, b),
                }
            }
        };
        rendered.push(text);
    }

    rendered.pop().unwrap_or_default()
}

/// One line per command: `(i) <= ...`.
///
/// An unassigned constant prints as `C_?`; an assigned slot with no value
/// in `constants` prints as `C_k = ?`.
pub fn format_stack(stack: &CommandStack, constants: &[f64]) -> String {
    let mut out = String::new();
    for (position, command) in stack.iter().enumerate() {
        let body = match command.op {
            Opcode::Variable => format!("X_{}", command.a),
            Opcode::Constant => match (command.constant_slot(), constant_value(command, constants)) {
                (Some(slot), Some(value)) => format!("C_{} = {}", slot, value),
                (Some(slot), None) => format!("C_{} = ?", slot),
                (None, _) => "C_?".to_string(),
            },
            Opcode::Operator(op) => op.format_stack(command.a, command.b),
        };
        out.push_str(&format!("({}) <= {}\n", position, body));
    }
    out
}

fn constant_value(command: &Command, constants: &[f64]) -> Option<f64> {
    command
        .constant_slot()
        .and_then(|slot| constants.get(slot).copied())
}

fn operand_text(rendered: &[String], operand: i32) -> &str {
    usize::try_from(operand)
        .ok()
        .and_then(|i| rendered.get(i))
        .map_or("", String::as_str)
}
