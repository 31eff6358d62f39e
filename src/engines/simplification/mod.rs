pub mod simplifier;

pub use simplifier::{count_utilized, reindex_constants, simplify_stack, utilized_commands};
