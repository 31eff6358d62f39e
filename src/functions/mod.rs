pub mod operators;

pub use operators::{Opcode, Operator};
