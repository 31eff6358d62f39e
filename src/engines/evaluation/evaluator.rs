use crate::{
    engines::generation::command_stack::{Command, CommandStack},
    engines::simplification::simplify_stack,
    error::{Result, StackgpError},
    functions::operators::Opcode,
    types::DerivativeTarget,
};
use ndarray::{Array1, Array2, ArrayView2, Axis, Zip};

/// Value of `stack` for every row of `x`, as a samples x 1 array.
pub fn evaluate(stack: &CommandStack, x: ArrayView2<'_, f64>, constants: &[f64]) -> Result<Array2<f64>> {
    let forward = forward_eval(stack, x, constants)?;
    output_column(forward)
}

/// Value of `stack` plus its Jacobian with respect to `wrt`.
///
/// The Jacobian has one row per sample and one column per feature of `x`
/// (`DerivativeTarget::Features`) or per entry of `constants`
/// (`DerivativeTarget::Constants`).
pub fn evaluate_with_derivative(
    stack: &CommandStack,
    x: ArrayView2<'_, f64>,
    constants: &[f64],
    wrt: DerivativeTarget,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let forward = forward_eval(stack, x, constants)?;
    let width = match wrt {
        DerivativeTarget::Features => x.ncols(),
        DerivativeTarget::Constants => constants.len(),
    };
    let derivative = reverse_eval(stack, &forward, wrt, x.nrows(), width)?;
    let value = output_column(forward)?;
    Ok((value, derivative))
}

pub fn simplify_and_evaluate(
    stack: &CommandStack,
    x: ArrayView2<'_, f64>,
    constants: &[f64],
) -> Result<Array2<f64>> {
    evaluate(&simplify_stack(stack), x, constants)
}

pub fn simplify_and_evaluate_with_derivative(
    stack: &CommandStack,
    x: ArrayView2<'_, f64>,
    constants: &[f64],
    wrt: DerivativeTarget,
) -> Result<(Array2<f64>, Array2<f64>)> {
    evaluate_with_derivative(&simplify_stack(stack), x, constants, wrt)
}

/// Per-command value buffers, each one value per sample.
fn forward_eval(
    stack: &CommandStack,
    x: ArrayView2<'_, f64>,
    constants: &[f64],
) -> Result<Vec<Array1<f64>>> {
    if stack.is_empty() {
        return Err(StackgpError::InvalidStructure(
            "cannot evaluate an empty command stack".to_string(),
        ));
    }

    let samples = x.nrows();
    let mut buffers: Vec<Array1<f64>> = Vec::with_capacity(stack.len());

    for (position, command) in stack.iter().enumerate() {
        let values = match command.op {
            Opcode::Variable => {
                let feature = feature_column(command, x.ncols())?;
                x.column(feature).to_owned()
            }
            Opcode::Constant => {
                let slot = constant_slot(command, position, constants.len())?;
                Array1::from_elem(samples, constants[slot])
            }
            Opcode::Operator(op) => {
                let lhs = &buffers[command.lhs(position)?.get()];
                let rhs = &buffers[command.rhs(position)?.get()];
                Zip::from(lhs).and(rhs).map_collect(|&a, &b| op.forward(a, b))
            }
        };
        buffers.push(values);
    }

    Ok(buffers)
}

/// Reverse sweep seeded with unit sensitivity at the last command.
///
/// Only commands reachable from the output propagate, so dead commands
/// cannot leak NaNs into the accumulated derivative.
fn reverse_eval(
    stack: &CommandStack,
    forward: &[Array1<f64>],
    wrt: DerivativeTarget,
    samples: usize,
    width: usize,
) -> Result<Array2<f64>> {
    let mut reverse = vec![Array1::<f64>::zeros(samples); stack.len()];
    let mut reached = vec![false; stack.len()];
    if let (Some(seed), Some(last)) = (reverse.last_mut(), reached.last_mut()) {
        seed.fill(1.0);
        *last = true;
    }

    let mut jacobian = Array2::<f64>::zeros((samples, width));

    for (position, command) in stack.iter().enumerate().rev() {
        if !reached[position] {
            continue;
        }

        match (command.op, wrt) {
            (Opcode::Variable, DerivativeTarget::Features) => {
                let feature = feature_column(command, width)?;
                let mut column = jacobian.column_mut(feature);
                column += &reverse[position];
            }
            (Opcode::Constant, DerivativeTarget::Constants) => {
                let slot = constant_slot(command, position, width)?;
                let mut column = jacobian.column_mut(slot);
                column += &reverse[position];
            }
            (Opcode::Variable, _) | (Opcode::Constant, _) => {}
            (Opcode::Operator(op), _) => {
                let lhs = command.lhs(position)?.get();
                let rhs = command.rhs(position)?.get();

                let mut lhs_part = Array1::<f64>::zeros(samples);
                let mut rhs_part = Array1::<f64>::zeros(samples);
                Zip::from(&mut lhs_part)
                    .and(&mut rhs_part)
                    .and(&reverse[position])
                    .and(&forward[lhs])
                    .and(&forward[rhs])
                    .and(&forward[position])
                    .for_each(|da, db, &upstream, &a, &b, &result| {
                        (*da, *db) = op.reverse(upstream, a, b, result);
                    });

                reverse[lhs] += &lhs_part;
                reached[lhs] = true;
                if op.arity() == 2 {
                    reverse[rhs] += &rhs_part;
                    reached[rhs] = true;
                }
            }
        }
    }

    Ok(jacobian)
}

fn feature_column(command: &Command, features: usize) -> Result<usize> {
    match command.feature() {
        Some(index) if index < features => Ok(index),
        Some(index) => Err(StackgpError::FeatureOutOfRange { index, features }),
        None => Err(StackgpError::InvalidStructure(format!(
            "variable load with invalid feature {}",
            command.a
        ))),
    }
}

fn constant_slot(command: &Command, position: usize, available: usize) -> Result<usize> {
    match command.constant_slot() {
        Some(index) if index < available => Ok(index),
        Some(index) => Err(StackgpError::ConstantOutOfRange { index, available }),
        None => Err(StackgpError::UnassignedConstant { position }),
    }
}

/// Last command's buffer as a samples x 1 column.
fn output_column(mut forward: Vec<Array1<f64>>) -> Result<Array2<f64>> {
    let last = forward.pop().ok_or_else(|| {
        StackgpError::InvalidStructure("cannot evaluate an empty command stack".to_string())
    })?;
    Ok(last.insert_axis(Axis(1)))
}
