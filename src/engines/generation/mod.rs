pub mod agraph;
pub mod command_stack;
pub mod formatter;
pub mod operators;

pub use agraph::{AGraph, UNSET_FITNESS};
pub use command_stack::{Command, CommandStack, StackIndex, UNASSIGNED};
pub use formatter::{format_expression, format_stack, Notation};
pub use operators::{crossover, crossover_at, AGraphCrossover};
