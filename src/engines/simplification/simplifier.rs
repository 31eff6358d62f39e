use crate::engines::generation::command_stack::{Command, CommandStack};
use crate::functions::operators::Opcode;

/// Mark the commands that contribute to the stack's final value.
///
/// The last command is always utilized; operands of a utilized operator are
/// utilized too. `b` is only followed for binary operators.
pub fn utilized_commands(stack: &CommandStack) -> Vec<bool> {
    let mut utilized = vec![false; stack.len()];
    if let Some(last) = utilized.last_mut() {
        *last = true;
    }

    for (position, command) in stack.iter().enumerate().rev() {
        if !utilized[position] {
            continue;
        }
        let arity = command.op.arity();
        if arity >= 1 {
            if let Ok(lhs) = command.lhs(position) {
                utilized[lhs.get()] = true;
            }
        }
        if arity == 2 {
            if let Ok(rhs) = command.rhs(position) {
                utilized[rhs.get()] = true;
            }
        }
    }

    utilized
}

/// Number of commands that contribute to the final value.
pub fn count_utilized(stack: &CommandStack) -> usize {
    utilized_commands(stack).into_iter().filter(|&u| u).count()
}

/// Remove dead commands and compact the survivors into `0..M`.
///
/// Loads keep their feature/constant indices; operator operands are remapped
/// through the old-to-new position map and unary operators get `b = a`.
pub fn simplify_stack(stack: &CommandStack) -> CommandStack {
    let utilized = utilized_commands(stack);
    let mut reindex = vec![0i32; stack.len()];
    let mut commands = Vec::with_capacity(utilized.iter().filter(|&&u| u).count());
    let mut next = 0i32;

    for (position, command) in stack.iter().enumerate() {
        if !utilized[position] {
            continue;
        }
        reindex[position] = next;
        next += 1;

        let remap = |raw: i32| usize::try_from(raw).map_or(raw, |old| reindex[old]);
        let compacted = match command.op {
            Opcode::Variable | Opcode::Constant => *command,
            Opcode::Operator(op) => {
                let a = remap(command.a);
                let b = if op.arity() == 2 { remap(command.b) } else { a };
                Command { op: command.op, a, b }
            }
        };
        commands.push(compacted);
    }

    CommandStack::from_valid(commands)
}

/// Give every constant load a fresh sequential slot, in stack order.
///
/// Returns the renumbered stack and the number of constants it needs.
pub fn reindex_constants(stack: &CommandStack) -> (CommandStack, usize) {
    let mut next = 0i32;
    let commands: Vec<Command> = stack
        .iter()
        .map(|command| match command.op {
            Opcode::Constant => {
                let renumbered = Command::constant(next);
                next += 1;
                renumbered
            }
            _ => *command,
        })
        .collect();
    let count = commands.iter().filter(|c| c.op == Opcode::Constant).count();
    (CommandStack::from_valid(commands), count)
}
