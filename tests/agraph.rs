mod common;

use common::*;
use proptest::prelude::*;
use stackgp::config::EvaluationConfig;
use stackgp::engines::generation::UNSET_FITNESS;
use ndarray::{array, Array2};
use stackgp::{AGraph, Command, CommandStack, Operator, OverflowPolicy, StackgpError};

fn legacy_graph() -> AGraph {
    AGraph::from_stack(
        CommandStack::from_codes(&[
            [0, 0, 0],
            [0, 1, 1],
            [1, 0, 0],
            [1, 1, 1],
            [5, 3, 1],
            [2, 4, 2],
            [4, 5, 0],
            [3, 6, 0],
        ])
        .unwrap(),
    )
}

fn legacy_x() -> Array2<f64> {
    array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]
}

#[test_log::test]
fn test_legacy_fixture_through_agraph() -> anyhow::Result<()> {
    let mut graph = legacy_graph();
    assert_eq!(graph.number_local_optimization_params(), 2);
    graph.set_constants(vec![3.14, 10.0])?;

    let y = graph.evaluate_at(legacy_x().view())?;
    for (value, want) in y.iter().zip([4.64, 8.28, 11.42]) {
        assert!((value - want).abs() < 1e-3);
    }
    assert_eq!(graph.complexity(), 8);

    let (y_again, dx) = graph.evaluate_with_x_gradient_at(legacy_x().view())?;
    assert_eq!(y_again, y);
    assert_eq!(dx.dim(), (3, 2));

    let (_, dc) = graph.evaluate_with_constant_gradient_at(legacy_x().view())?;
    assert_eq!(dc.column(0), array![1.0, 2.0, 3.0]);
    Ok(())
}

#[test_log::test]
fn test_fitness_invalidated_by_stack_replacement() {
    let mut graph = legacy_graph();
    assert!(!graph.is_fitness_set());

    graph.set_fitness(0.5);
    assert!(graph.is_fitness_set());
    assert_eq!(graph.fitness(), 0.5);

    graph.set_command_stack(CommandStack::new(vec![Command::variable(0)]).unwrap());
    assert!(!graph.is_fitness_set());
    assert_eq!(graph.fitness(), UNSET_FITNESS);
}

#[test_log::test]
fn test_dirty_until_semantics_are_read() {
    let mut graph = legacy_graph();
    assert!(graph.is_modified());
    graph.set_fitness(1.0);
    graph.set_genetic_age(4);
    assert!(graph.is_modified());

    let _ = graph.console_string();
    assert!(!graph.is_modified());
    assert!(graph.is_fitness_set());
}

#[test_log::test]
fn test_complexity_counts_only_utilized_commands() {
    let graph = AGraph::from_stack(
        CommandStack::new(vec![
            Command::variable(0),
            Command::variable(1),
            Command::unary(Operator::Exp, 1),
            Command::unary(Operator::Cos, 0),
        ])
        .unwrap(),
    );
    assert_eq!(graph.command_stack().len(), 4);
    assert_eq!(graph.complexity(), 2);
}

#[test_log::test]
fn test_simplified_stack_drops_dead_code() {
    let mut graph = AGraph::from_stack(
        CommandStack::new(vec![
            Command::constant(4),
            Command::variable(0),
            Command::constant(7),
            Command::binary(Operator::Pow, 1, 2),
        ])
        .unwrap(),
    );
    assert_eq!(
        graph.simplified_stack().to_codes(),
        vec![[0, 0, 0], [1, 0, 0], [10, 0, 1]]
    );
    assert_eq!(graph.constants(), &[1.0]);
}

#[test_log::test]
fn test_renderers() {
    let mut graph = legacy_graph();
    graph.set_constants(vec![3.0, 10.0]).unwrap();
    assert_eq!(graph.console_string(), "((10)/(X_1) + 3)(X_0) - (X_0)");
    assert!(graph.latex_string().starts_with("\\left( \\frac{ 10 }{ X_{1} } + 3 \\right)"));
    let listing = graph.stack_string();
    assert_eq!(listing.lines().count(), 8);
    assert!(listing.contains("(3) <= C_1 = 10"));
    assert_eq!(graph.stack_string_full(), listing);
}

#[test_log::test]
fn test_unassigned_constant_prints_placeholder() {
    let mut graph = AGraph::from_stack(
        CommandStack::new(vec![
            Command::variable(0),
            Command::unassigned_constant(),
            Command::binary(Operator::Mul, 0, 1),
        ])
        .unwrap(),
    );
    assert!(graph.stack_string_full().contains("(1) <= C_?\n"));
    assert!(graph.needs_local_optimization());
    assert_eq!(graph.console_string(), "(X_0)(1)");
}

#[test_log::test]
fn test_json_round_trip_keeps_state() -> anyhow::Result<()> {
    let mut graph = legacy_graph()
        .with_evaluation_config(&EvaluationConfig { overflow_policy: OverflowPolicy::MaskAsNan });
    graph.set_constants(vec![3.14, 10.0])?;
    graph.set_fitness(0.125);
    graph.set_genetic_age(9);

    let json = graph.to_json()?;
    let mut restored = AGraph::from_json(&json)?;
    assert_eq!(restored, graph);
    assert!(!restored.is_modified());
    assert_eq!(restored.overflow_policy(), OverflowPolicy::MaskAsNan);
    assert_eq!(
        restored.evaluate_at(legacy_x().view())?,
        graph.evaluate_at(legacy_x().view())?
    );
    Ok(())
}

#[test_log::test]
fn test_json_with_invalid_stack_rejected() {
    let mut value = serde_json::to_value(legacy_graph()).unwrap();
    value["command_stack"] = serde_json::json!([[0, 0, 0], [2, 0, 3]]);
    assert!(AGraph::from_json(&value.to_string()).is_err());
}

#[test_log::test]
fn test_copy_is_independent() {
    let mut original = legacy_graph();
    original.set_fitness(2.0);
    original.set_genetic_age(3);
    let mut copy = original.clone();
    assert_eq!(copy, original);

    copy.set_constants(vec![5.0, 6.0]).unwrap();
    copy.set_command_stack(CommandStack::new(vec![Command::variable(1)]).unwrap());
    assert_ne!(original.constants(), &[5.0, 6.0][..]);
    assert_eq!(original.fitness(), 2.0);
    assert_eq!(original.command_stack().len(), 8);
    assert_eq!(original.genetic_age(), 3);
}

#[test_log::test]
fn test_constants_must_match_simplified_stack() {
    let mut graph = legacy_graph();
    assert!(matches!(
        graph.set_constants(vec![5.0]),
        Err(StackgpError::DimensionMismatch(_))
    ));
    assert!(graph.set_constants(vec![1.0, 2.0, 3.0]).is_err());
    assert!(graph.needs_local_optimization());

    graph.set_constants(vec![2.0, 4.0]).unwrap();
    assert!(!graph.needs_local_optimization());
    let (_, dc) = graph.evaluate_with_constant_gradient_at(legacy_x().view()).unwrap();
    assert_eq!(dc.ncols(), 2);
}

proptest! {
    #[test]
    fn prop_distance_symmetry(a in arb_stack(12), b in arb_stack(12)) {
        let a = AGraph::from_stack(a);
        let b = AGraph::from_stack(b);
        prop_assert_eq!(a.distance(&a), 0);
        prop_assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn prop_agraph_matches_simplified_evaluation(stack in arb_stack(16)) {
        let mut graph = AGraph::from_stack(stack);
        let k = graph.number_local_optimization_params();
        prop_assert_eq!(graph.constants().len(), k);
        prop_assert_eq!(graph.simplified_stack().len(), graph.complexity());

        let y = graph.evaluate_at(sample_x().view()).unwrap();
        let (_, dc) = graph.evaluate_with_constant_gradient_at(sample_x().view()).unwrap();
        prop_assert_eq!(y.dim(), (3, 1));
        prop_assert_eq!(dc.dim(), (3, k));
    }
}
