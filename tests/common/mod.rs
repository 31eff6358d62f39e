#![allow(dead_code)]

use proptest::prelude::*;
use ndarray::{array, Array2};
use stackgp::{Command, CommandStack, Operator};

pub const FEATURES: usize = 2;
pub const CONSTANTS: usize = 3;

/// Turn raw draws into a valid stack: terminals anywhere, operators only
/// after the first command, operands always pointing backwards.
pub fn build_stack(genes: &[(u8, u32, u32)]) -> CommandStack {
    let commands = genes
        .iter()
        .enumerate()
        .map(|(i, &(kind, r1, r2))| {
            if i == 0 || kind < 4 {
                if kind % 2 == 0 {
                    Command::variable(pick(r1, FEATURES))
                } else {
                    Command::constant(pick(r1, CONSTANTS))
                }
            } else {
                let op = Operator::ALL[(kind as usize - 4) % Operator::ALL.len()];
                let a = pick(r1, i);
                if op.arity() == 2 {
                    Command::binary(op, a, pick(r2, i))
                } else {
                    Command::unary(op, a)
                }
            }
        })
        .collect();
    CommandStack::new(commands).expect("generated stack is valid")
}

/// `raw` reduced into `0..bound`.
fn pick(raw: u32, bound: usize) -> i32 {
    i32::try_from(raw as usize % bound).expect("test bounds fit in i32")
}

pub fn arb_stack(max_len: usize) -> impl Strategy<Value = CommandStack> {
    prop::collection::vec((0u8..16, any::<u32>(), any::<u32>()), 1..max_len)
        .prop_map(|genes| build_stack(&genes))
}

pub fn sample_x() -> Array2<f64> {
    array![[0.5, 1.2], [1.1, 0.8], [1.7, 1.5]]
}

pub fn sample_constants() -> Vec<f64> {
    vec![1.3, 0.7, 2.1]
}

/// Equal up to a relative tolerance; NaNs match NaNs and infinities match
/// infinities of the same sign.
pub fn close(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
}

pub fn matrices_close(a: &Array2<f64>, b: &Array2<f64>, tol: f64) -> bool {
    a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(x, y)| close(*x, *y, tol))
}
