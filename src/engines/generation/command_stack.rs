//! Linear encoding of an expression for genetic programming
//!
//! A command stack is an ordered list of `(opcode, a, b)` triples. Operators
//! address the results of earlier commands by position, so the list is an
//! acyclic graph that evaluates in a single forward sweep. The value of the
//! whole stack is the value of its last command.
//!
//! # Properties
//!
//! - **Crossover**: swapping a suffix between two equal-length stacks keeps
//!   every operand pointing backwards
//! - **Evaluation**: one pass in index order, no recursion
//! - **Reuse**: a sub-expression can feed several later commands
//!
//! # Example
//!
//! ```
//! use stackgp::engines::generation::{Command, CommandStack};
//! use stackgp::functions::operators::Operator;
//!
//! // X_0 * (C_0 + X_1)
//! let stack = CommandStack::new(vec![
//!     Command::variable(0),
//!     Command::variable(1),
//!     Command::constant(0),
//!     Command::binary(Operator::Add, 2, 1),
//!     Command::binary(Operator::Mul, 0, 3),
//! ]).unwrap();
//! assert_eq!(stack.len(), 5);
//! ```

use crate::error::{Result, StackgpError};
use crate::functions::operators::{Opcode, Operator};
use serde::{Deserialize, Serialize};

/// Marks a constant load that has not been given a slot yet.
pub const UNASSIGNED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[i32; 3]", try_from = "[i32; 3]")]
pub struct Command {
    pub op: Opcode,
    pub a: i32,
    pub b: i32,
}

impl Command {
    pub fn variable(feature: i32) -> Self {
        Self {
            op: Opcode::Variable,
            a: feature,
            b: feature,
        }
    }

    pub fn constant(slot: i32) -> Self {
        Self {
            op: Opcode::Constant,
            a: slot,
            b: slot,
        }
    }

    pub fn unassigned_constant() -> Self {
        Self::constant(UNASSIGNED)
    }

    /// Unary operator; `b` repeats `a`.
    pub fn unary(op: Operator, operand: i32) -> Self {
        Self {
            op: op.into(),
            a: operand,
            b: operand,
        }
    }

    pub fn binary(op: Operator, lhs: i32, rhs: i32) -> Self {
        Self {
            op: op.into(),
            a: lhs,
            b: rhs,
        }
    }

    pub fn to_codes(self) -> [i32; 3] {
        [self.op.code(), self.a, self.b]
    }

    /// Feature column of a Variable load.
    pub fn feature(&self) -> Option<usize> {
        match self.op {
            Opcode::Variable => usize::try_from(self.a).ok(),
            _ => None,
        }
    }

    /// Slot of a Constant load; `None` while unassigned.
    pub fn constant_slot(&self) -> Option<usize> {
        match self.op {
            Opcode::Constant => usize::try_from(self.a).ok(),
            _ => None,
        }
    }

    /// Check the operands of this command when it sits at `position`.
    fn validate(&self, position: usize) -> Result<()> {
        match self.op {
            Opcode::Variable => {
                if self.a < 0 {
                    return Err(StackgpError::InvalidStructure(format!(
                        "command {} loads negative feature {}",
                        position, self.a
                    )));
                }
            }
            Opcode::Constant => {
                if self.a < UNASSIGNED {
                    return Err(StackgpError::InvalidStructure(format!(
                        "command {} loads invalid constant slot {}",
                        position, self.a
                    )));
                }
            }
            Opcode::Operator(_) => {
                StackIndex::new(self.a, position)?;
                StackIndex::new(self.b, position)?;
            }
        }
        Ok(())
    }

    pub(crate) fn lhs(&self, position: usize) -> Result<StackIndex> {
        StackIndex::new(self.a, position)
    }

    pub(crate) fn rhs(&self, position: usize) -> Result<StackIndex> {
        StackIndex::new(self.b, position)
    }
}

impl From<Command> for [i32; 3] {
    fn from(command: Command) -> Self {
        command.to_codes()
    }
}

impl TryFrom<[i32; 3]> for Command {
    type Error = StackgpError;

    fn try_from(codes: [i32; 3]) -> Result<Self> {
        Ok(Self {
            op: Opcode::from_code(codes[0])?,
            a: codes[1],
            b: codes[2],
        })
    }
}

/// Position of an earlier command, checked against the referencing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StackIndex(usize);

impl StackIndex {
    pub fn new(raw: i32, position: usize) -> Result<Self> {
        match usize::try_from(raw) {
            Ok(index) if index < position => Ok(Self(index)),
            _ => Err(StackgpError::InvalidStructure(format!(
                "command {} references operand {}, which is not an earlier command",
                position, raw
            ))),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

/// A validated, backward-referencing command stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Command>", try_from = "Vec<Command>")]
pub struct CommandStack {
    commands: Vec<Command>,
}

impl CommandStack {
    pub fn new(commands: Vec<Command>) -> Result<Self> {
        for (position, command) in commands.iter().enumerate() {
            command.validate(position)?;
        }
        Ok(Self { commands })
    }

    /// Build from raw `[opcode, a, b]` rows.
    pub fn from_codes(rows: &[[i32; 3]]) -> Result<Self> {
        let commands = rows
            .iter()
            .map(|row| Command::try_from(*row))
            .collect::<Result<Vec<_>>>()?;
        Self::new(commands)
    }

    /// Wrap commands produced by a structure-preserving transformation.
    pub(crate) fn from_valid(commands: Vec<Command>) -> Self {
        debug_assert!(commands
            .iter()
            .enumerate()
            .all(|(i, c)| c.validate(i).is_ok()));
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn get(&self, position: usize) -> Option<&Command> {
        self.commands.get(position)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn to_codes(&self) -> Vec<[i32; 3]> {
        self.commands.iter().map(|c| c.to_codes()).collect()
    }
}

impl From<CommandStack> for Vec<Command> {
    fn from(stack: CommandStack) -> Self {
        stack.commands
    }
}

impl TryFrom<Vec<Command>> for CommandStack {
    type Error = StackgpError;

    fn try_from(commands: Vec<Command>) -> Result<Self> {
        Self::new(commands)
    }
}

impl<'a> IntoIterator for &'a CommandStack {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
