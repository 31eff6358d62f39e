pub mod evaluator;

pub use evaluator::{
    evaluate, evaluate_with_derivative, simplify_and_evaluate,
    simplify_and_evaluate_with_derivative,
};
