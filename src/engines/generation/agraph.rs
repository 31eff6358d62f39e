use crate::config::EvaluationConfig;
use crate::engines::evaluation::evaluator;
use crate::engines::generation::command_stack::CommandStack;
use crate::engines::generation::formatter::{self, Notation};
use crate::engines::simplification::{count_utilized, reindex_constants, simplify_stack, utilized_commands};
use crate::error::{Result, StackgpError};
use crate::functions::operators::Opcode;
use crate::types::{DerivativeTarget, OverflowPolicy};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fitness value held while no fitness has been assigned.
pub const UNSET_FITNESS: f64 = f64::MAX;

/// Value every constant slot starts at when the expression needs more constants.
const INITIAL_CONSTANT: f64 = 1.0;

/// An evolvable expression individual.
///
/// Owns the full command stack and a lazily derived simplified stack. Any
/// change to the full stack marks the graph as modified and clears the
/// fitness; the simplified stack and constant bookkeeping are rebuilt on the
/// next call that needs semantics (evaluation, optimisation queries, printing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AGraph {
    command_stack: CommandStack,
    simplified_stack: CommandStack,
    constants: Vec<f64>,
    needs_optimization: bool,
    num_constants: usize,
    fitness: f64,
    fitness_set: bool,
    genetic_age: u64,
    modified: bool,
    #[serde(default)]
    overflow_policy: OverflowPolicy,
}

impl Default for AGraph {
    fn default() -> Self {
        Self {
            command_stack: CommandStack::default(),
            simplified_stack: CommandStack::default(),
            constants: Vec::new(),
            needs_optimization: false,
            num_constants: 0,
            fitness: UNSET_FITNESS,
            fitness_set: false,
            genetic_age: 0,
            modified: false,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl AGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stack(stack: CommandStack) -> Self {
        let mut graph = Self::default();
        graph.set_command_stack(stack);
        graph
    }

    pub fn with_evaluation_config(mut self, config: &EvaluationConfig) -> Self {
        self.overflow_policy = config.overflow_policy;
        self
    }

    pub fn command_stack(&self) -> &CommandStack {
        &self.command_stack
    }

    pub fn set_command_stack(&mut self, stack: CommandStack) {
        self.command_stack = stack;
        self.notify_modification();
    }

    /// Mark the full stack as changed without replacing it.
    pub fn notify_modification(&mut self) {
        self.modified = true;
        self.fitness = UNSET_FITNESS;
        self.fitness_set = false;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Simplified stack, rebuilt first if the full stack changed.
    pub fn simplified_stack(&mut self) -> &CommandStack {
        self.refresh();
        &self.simplified_stack
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
        self.fitness_set = true;
    }

    pub fn is_fitness_set(&self) -> bool {
        self.fitness_set
    }

    pub fn genetic_age(&self) -> u64 {
        self.genetic_age
    }

    pub fn set_genetic_age(&mut self, age: u64) {
        self.genetic_age = age;
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    pub fn set_overflow_policy(&mut self, policy: OverflowPolicy) {
        self.overflow_policy = policy;
    }

    pub fn needs_local_optimization(&mut self) -> bool {
        self.refresh();
        self.needs_optimization
    }

    pub fn number_local_optimization_params(&mut self) -> usize {
        self.refresh();
        self.num_constants
    }

    pub fn constants(&self) -> &[f64] {
        &self.constants
    }

    /// Install optimised constants; clears the needs-optimisation flag.
    ///
    /// The vector must hold exactly one value per constant of the simplified
    /// stack.
    pub fn set_constants(&mut self, constants: Vec<f64>) -> Result<()> {
        self.refresh();
        if constants.len() != self.num_constants {
            return Err(StackgpError::DimensionMismatch(format!(
                "expression takes {} constants, got {}",
                self.num_constants,
                constants.len()
            )));
        }
        self.constants = constants;
        self.needs_optimization = false;
        Ok(())
    }

    pub fn evaluate_at(&mut self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.refresh();
        let value = evaluator::evaluate(&self.simplified_stack, x, &self.constants)?;
        Ok(self.mask_overflow(value))
    }

    pub fn evaluate_with_x_gradient_at(
        &mut self,
        x: ArrayView2<'_, f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        self.evaluate_with_gradient_at(x, DerivativeTarget::Features)
    }

    pub fn evaluate_with_constant_gradient_at(
        &mut self,
        x: ArrayView2<'_, f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        self.evaluate_with_gradient_at(x, DerivativeTarget::Constants)
    }

    fn evaluate_with_gradient_at(
        &mut self,
        x: ArrayView2<'_, f64>,
        wrt: DerivativeTarget,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        self.refresh();
        let (mut value, mut derivative) =
            evaluator::evaluate_with_derivative(&self.simplified_stack, x, &self.constants, wrt)?;
        if self.overflow_policy == OverflowPolicy::MaskAsNan
            && (has_infinite(&value) || has_infinite(&derivative))
        {
            log::warn!("Overflow in stack evaluation, masking value and gradient as NaN");
            value.fill(f64::NAN);
            derivative.fill(f64::NAN);
        }
        Ok((value, derivative))
    }

    fn mask_overflow(&self, mut value: Array2<f64>) -> Array2<f64> {
        if self.overflow_policy == OverflowPolicy::MaskAsNan && has_infinite(&value) {
            log::warn!("Overflow in stack evaluation, masking value as NaN");
            value.fill(f64::NAN);
        }
        value
    }

    /// Number of commands in the full stack that affect the result.
    pub fn complexity(&self) -> usize {
        count_utilized(&self.command_stack)
    }

    /// Cell-wise mismatches between the two full stacks.
    ///
    /// Commands past the end of the shorter stack count as three mismatches.
    pub fn distance(&self, other: &AGraph) -> usize {
        let ours = self.command_stack.commands();
        let theirs = other.command_stack.commands();
        let overlap: usize = ours
            .iter()
            .zip(theirs)
            .map(|(x, y)| {
                let (x, y) = (x.to_codes(), y.to_codes());
                x.iter().zip(&y).filter(|(p, q)| p != q).count()
            })
            .sum();
        overlap + 3 * ours.len().abs_diff(theirs.len())
    }

    pub fn console_string(&mut self) -> String {
        self.refresh();
        formatter::format_expression(&self.simplified_stack, &self.constants, Notation::Console)
    }

    pub fn latex_string(&mut self) -> String {
        self.refresh();
        formatter::format_expression(&self.simplified_stack, &self.constants, Notation::Latex)
    }

    pub fn stack_string(&mut self) -> String {
        self.refresh();
        formatter::format_stack(&self.simplified_stack, &self.constants)
    }

    /// Listing of the full stack, dead commands included.
    pub fn stack_string_full(&self) -> String {
        formatter::format_stack(&self.command_stack, &self.constants)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn refresh(&mut self) {
        if self.modified {
            self.update();
        }
    }

    fn update(&mut self) {
        let simplified = simplify_stack(&self.command_stack);
        let (renumbered, count) = reindex_constants(&simplified);

        let unassigned = self
            .command_stack
            .iter()
            .zip(utilized_commands(&self.command_stack))
            .any(|(command, used)| {
                used && command.op == Opcode::Constant && command.constant_slot().is_none()
            });

        if count <= self.constants.len() {
            self.constants.truncate(count);
        } else {
            self.constants = vec![INITIAL_CONSTANT; count];
            self.needs_optimization = true;
        }
        if unassigned {
            self.needs_optimization = true;
        }

        log::debug!(
            "Re-simplified command stack: {} -> {} commands, {} constants",
            self.command_stack.len(),
            renumbered.len(),
            count
        );

        self.simplified_stack = renumbered;
        self.num_constants = count;
        self.modified = false;
    }
}

fn has_infinite(values: &Array2<f64>) -> bool {
    values.iter().any(|v| v.is_infinite())
}

impl fmt::Display for AGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modified {
            let mut fresh = self.clone();
            return write!(f, "{}", fresh.console_string());
        }
        write!(
            f,
            "{}",
            formatter::format_expression(&self.simplified_stack, &self.constants, Notation::Console)
        )
    }
}
