//! Expression core for symbolic regression by genetic programming.
//!
//! Candidate expressions are linear command stacks. The crate evaluates them
//! over batches of samples, differentiates them with reverse-mode autodiff
//! (with respect to inputs or free constants), removes dead code, and
//! recombines them with single-point crossover.
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   AGraph (cached individual)        │
//! ├──────────────────┬──────────────────┤
//! │    Crossover     │    Formatter     │
//! ├──────────────────┴──────────────────┤
//! │   Evaluator (forward / reverse)     │
//! ├─────────────────────────────────────┤
//! │   Simplifier (liveness, compaction) │
//! ├─────────────────────────────────────┤
//! │   Command stack │ Operator table    │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use ndarray;

pub use engines::generation::{AGraph, AGraphCrossover, Command, CommandStack};
pub use error::{Result, StackgpError};
pub use functions::{Opcode, Operator};
pub use types::{DerivativeTarget, OverflowPolicy};
