//! End-to-end translation: frontends, merge, scheduling, passes

mod common;

use codegraph_cpg::config::{FrontendFailurePolicy, PipelineConfig, Preset};
use codegraph_cpg::features::passes::{TypeHierarchyPass, UnreachableCodePass};
use codegraph_cpg::shared::models::{NodeKind, TypeRef, View};
use codegraph_cpg::shared::ports::{FrontendError, FrontendSet, Language, SourceUnit};
use codegraph_cpg::{PipelineError, TranslationManager};
use common::*;
use pretty_assertions::assert_eq;

fn manager(config: PipelineConfig) -> TranslationManager {
    TranslationManager::new(config.build().unwrap(), frontends())
}

#[test]
fn test_full_preset_enriches_across_units() {
    let result = manager(PipelineConfig::preset(Preset::Full))
        .translate(&units(LIB))
        .unwrap();
    let graph = &result.graph;

    assert_eq!(result.order.len(), 6);
    assert_eq!(result.order.first(), Some(&TypeHierarchyPass::ID));
    assert_eq!(result.order.last(), Some(&UnreachableCodePass::ID));
    assert!(!result.run.cancelled);

    // Call into the other unit, typed by its callee
    let call = find(graph, NodeKind::Call, "add");
    let add = find(graph, NodeKind::Function, "add");
    assert_eq!(labelled_targets(graph, call, View::Call, "invokes"), vec![add]);
    assert_eq!(graph.node(call).unwrap().type_ref, TypeRef::named("int"));

    // Construction binds the record and its constructor
    let construct = find(graph, NodeKind::Construct, "Point");
    let record = find(graph, NodeKind::Record, "Point");
    let constructor = find(graph, NodeKind::Constructor, "Point");
    assert_eq!(labelled_targets(graph, construct, View::Call, "instantiates"), vec![record]);
    assert_eq!(labelled_targets(graph, construct, View::Call, "invokes"), vec![constructor]);

    // Member access through the declared type of its base
    let member = find(graph, NodeKind::MemberAccess, "y");
    let field = find(graph, NodeKind::Field, "y");
    assert_eq!(labelled_targets(graph, member, View::Reference, "refers_to"), vec![field]);
    assert_eq!(graph.node(member).unwrap().type_ref, TypeRef::named("int"));

    // Declaration flows into its read
    let s = find(graph, NodeKind::Variable, "s");
    let read = find(graph, NodeKind::Reference, "s");
    assert!(graph.targets(s, View::DataFlow).any(|t| t == read));
    assert!(graph.targets(call, View::DataFlow).any(|t| t == s));

    let main = find(graph, NodeKind::Function, "main");
    assert!(graph.outgoing(main, View::ControlFlow).next().is_some());
    assert_references_resolved(graph, main);
    assert_references_resolved(graph, add);
    assert_no_dangling_edges(graph);
}

#[test]
fn test_call_edges_export_with_their_labels() {
    let result = manager(PipelineConfig::preset(Preset::Full))
        .translate(&units(LIB))
        .unwrap();
    let call = find(&result.graph, NodeKind::Call, "add");
    let add = find(&result.graph, NodeKind::Function, "add");

    let exported = result.export_edges(View::Call);

    assert_eq!(exported.len(), result.graph.stats().edges_in(View::Call));
    let record = exported
        .iter()
        .find(|edge| edge["source"] == call.index())
        .expect("call edge exported");
    assert_eq!(record["view"], "call");
    assert_eq!(record["target"], add.index());
    assert_eq!(record["properties"], serde_json::json!({"name": "invokes"}));
}

#[test]
fn test_structural_preset_leaves_flow_views_empty() {
    let result = manager(PipelineConfig::preset(Preset::Structural))
        .translate(&units(LIB))
        .unwrap();

    let stats = result.graph.stats();
    assert_eq!(stats.edges_in(View::ControlFlow), 0);
    assert_eq!(stats.edges_in(View::DataFlow), 0);
    assert!(stats.edges_in(View::Reference) > 0);
}

#[test]
fn test_hard_dependencies_are_injected() {
    let result = manager(PipelineConfig::default().passes(["data-flow"]))
        .translate(&units(LIB))
        .unwrap();

    let order: Vec<&str> = result.order.iter().map(|id| id.as_str()).collect();
    assert_eq!(
        order,
        vec!["type-hierarchy", "symbol-resolver", "control-flow", "data-flow"]
    );
    assert_eq!(result.injected.len(), 3);
}

#[test]
fn test_parallel_and_sequential_frontends_agree() {
    let units = chain_units(16);
    let translate = |parallel: bool| {
        let config = PipelineConfig::preset(Preset::Full)
            .frontends(|f| f.parallel(parallel).threads(4))
            .build()
            .unwrap();
        TranslationManager::new(config, FrontendSet::new().with(ChainFrontend))
            .translate(&units)
            .unwrap()
    };

    let parallel = translate(true);
    let sequential = translate(false);

    assert_eq!(parallel.graph.stats(), sequential.graph.stats());
    let nodes = |r: &codegraph_cpg::TranslationResult| {
        r.graph.nodes().map(|(id, n)| (id, n.clone())).collect::<Vec<_>>()
    };
    assert_eq!(nodes(&parallel), nodes(&sequential));

    // f<i> calls f<i-1> in the previous unit
    for i in 1..16 {
        let call = find(&parallel.graph, NodeKind::Call, &format!("f{}", i - 1));
        let callee = find(&parallel.graph, NodeKind::Function, &format!("f{}", i - 1));
        assert_eq!(labelled_targets(&parallel.graph, call, View::Call, "invokes"), vec![callee]);
    }
}

#[test]
fn test_frontend_failure_aborts_by_default() {
    let mut units = units(LIB);
    units.push(SourceUnit::new("bad.c", Language::C, BROKEN));

    let err = manager(PipelineConfig::default()).translate(&units).unwrap_err();
    match err {
        PipelineError::FrontendFailed { unit, source } => {
            assert_eq!(unit, "bad.c");
            assert!(matches!(source, FrontendError::Syntax { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_skip_policy_drops_failed_units() {
    let mut units = units(LIB);
    units.insert(0, SourceUnit::new("Main.java", Language::Java, "class Main {}"));

    let result = manager(
        PipelineConfig::default().frontends(|f| f.failure(FrontendFailurePolicy::Skip)),
    )
    .translate(&units)
    .unwrap();

    assert_eq!(result.skipped_units, vec!["Main.java".to_string()]);
    assert_eq!(result.graph.units().len(), 2);
    let call = find(&result.graph, NodeKind::Call, "add");
    assert_eq!(labelled_targets(&result.graph, call, View::Call, "invokes").len(), 1);
}

#[test]
fn test_cancellation_skips_remaining_passes() {
    let manager = manager(PipelineConfig::preset(Preset::Full));
    manager.cancellation().cancel();

    let result = manager.translate(&units(LIB)).unwrap();

    assert!(result.run.cancelled);
    assert!(result.run.executed.is_empty());
    assert_eq!(result.run.skipped, result.order);
    // Frontend output is still merged
    assert_eq!(result.graph.units().len(), 2);
    assert_eq!(result.graph.stats().edges_in(View::Call), 0);
}

#[test]
fn test_unknown_pass_is_reported_before_any_work() {
    let err = manager(PipelineConfig::default().passes(["symbol-resolver", "dataflow"]))
        .translate(&units(BROKEN))
        .unwrap_err();

    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("data-flow"));
}
