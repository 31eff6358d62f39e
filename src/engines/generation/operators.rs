use crate::config::CrossoverConfig;
use crate::engines::generation::agraph::AGraph;
use crate::engines::generation::command_stack::CommandStack;
use crate::error::{Result, StackgpError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Single-point crossover: swap command-stack suffixes
///
/// The cut index is drawn uniformly from `1..len`. Both children get the
/// older parent's genetic age and an unset fitness.
pub fn crossover<R: Rng>(
    parent1: &AGraph,
    parent2: &AGraph,
    rng: &mut R,
) -> Result<(AGraph, AGraph)> {
    let len = equal_length(parent1, parent2)?;
    if len <= 1 {
        return Ok(copy_parents(parent1, parent2));
    }

    let point = rng.gen_range(1..len);
    log::trace!("Crossover of {}-command stacks at {}", len, point);
    crossover_at(parent1, parent2, point)
}

/// Crossover with an explicit cut index in `1..len`.
pub fn crossover_at(parent1: &AGraph, parent2: &AGraph, point: usize) -> Result<(AGraph, AGraph)> {
    let len = equal_length(parent1, parent2)?;
    if point == 0 || point >= len {
        return Err(StackgpError::Generation(format!(
            "crossover point {} outside 1..{}",
            point, len
        )));
    }

    let commands1 = parent1.command_stack().commands();
    let commands2 = parent2.command_stack().commands();

    let mut stack1 = commands1.to_vec();
    let mut stack2 = commands2.to_vec();
    stack1[point..].copy_from_slice(&commands2[point..]);
    stack2[point..].copy_from_slice(&commands1[point..]);

    let age = parent1.genetic_age().max(parent2.genetic_age());

    let mut child1 = parent1.clone();
    child1.set_command_stack(CommandStack::new(stack1)?);
    child1.set_genetic_age(age);

    let mut child2 = parent2.clone();
    child2.set_command_stack(CommandStack::new(stack2)?);
    child2.set_genetic_age(age);

    Ok((child1, child2))
}

fn equal_length(parent1: &AGraph, parent2: &AGraph) -> Result<usize> {
    let len = parent1.command_stack().len();
    if len != parent2.command_stack().len() {
        return Err(StackgpError::Generation(format!(
            "crossover needs equal stack lengths, got {} and {}",
            len,
            parent2.command_stack().len()
        )));
    }
    Ok(len)
}

fn copy_parents(parent1: &AGraph, parent2: &AGraph) -> (AGraph, AGraph) {
    let age = parent1.genetic_age().max(parent2.genetic_age());
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();
    for child in [&mut child1, &mut child2] {
        child.notify_modification();
        child.set_genetic_age(age);
    }
    (child1, child2)
}

/// Crossover operator owning its random source.
pub struct AGraphCrossover {
    rng: StdRng,
}

impl AGraphCrossover {
    pub fn new(config: &CrossoverConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn apply(&mut self, parent1: &AGraph, parent2: &AGraph) -> Result<(AGraph, AGraph)> {
        crossover(parent1, parent2, &mut self.rng)
    }
}
