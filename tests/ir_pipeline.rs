//! Property tests of the front end over generated compilation units.
//!
//! Units come from `test_utils::ir::generator` and are turned into trees with
//! the shared fixtures; every property is checked with quickcheck.

mod common;

use std::sync::Arc;

use quickcheck::{QuickCheck, TestResult};
use test_utils::ir::generator::{TypeExpr, UnitSketch};
use thorium_frontend::config::FrontendConfig;
use thorium_frontend::ir::compilation_unit::CompilationUnit;
use thorium_frontend::ir::context::ContextStore;
use thorium_frontend::ir::pipeline::{Pipeline, SYMBOL_TABLE, TYPE_FLATTENING};
use thorium_frontend::ir::relatives::Relatives;
use thorium_frontend::ir::symbol_table::{DuplicatePolicy, SymbolTable};
use thorium_frontend::ir::thorium_node::*;
use thorium_frontend::ir::transforms::flatten_types;
use thorium_frontend::ir::visitor::{CopyVisitor, count_nodes, flat_map, nodes_matching};
use tracing::debug;

fn setup() {
    let config = FrontendConfig { log_level: Some("warn".to_string()), ..FrontendConfig::default() };
    let _ = config.init_logging(true, None);
}

fn build(sketch: &UnitSketch) -> (NodeFactory, Arc<ThoriumNode>) {
    let factory = NodeFactory::new();
    let root = common::build_unit(&factory, sketch).expect("generated units are well formed");
    (factory, root)
}

/// A union or intersection is normalized when it has at least two members,
/// none of its own kind and no two equal.
fn is_normalized(node: &Arc<ThoriumNode>) -> bool {
    let (NodeKind::TypeSpecUnion(list) | NodeKind::TypeSpecIntersection(list)) = node.kind() else {
        return true;
    };
    let members: Vec<&Arc<ThoriumNode>> = list.types.iter().collect();
    members.len() >= 2
        && members.iter().all(|m| m.node_type() != node.node_type())
        && members.iter().enumerate().all(|(i, m)| !members[..i].contains(m))
}

#[test]
fn test_copy_equals_original() {
    setup();
    fn prop(sketch: UnitSketch) -> TestResult {
        let (factory, root) = build(&sketch);
        let visitor = CopyVisitor::new(&factory);
        let copy = root.accept(&visitor);
        if copy != root || Arc::ptr_eq(&copy, &root) {
            debug!("Copy differs for:\n{}", sketch.to_code());
            return TestResult::failed();
        }
        TestResult::from_bool(visitor.into_copies().len() == count_nodes(&root))
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(UnitSketch) -> TestResult);
}

#[test]
fn test_matching_everything_finds_all_descendants() {
    setup();
    fn prop(sketch: UnitSketch) -> bool {
        let (_, root) = build(&sketch);
        nodes_matching(&root, |_| true).len() == count_nodes(&root) - 1
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(UnitSketch) -> bool);
}

#[test]
fn test_ids_are_unique_within_a_unit() {
    setup();
    fn prop(sketch: UnitSketch) -> bool {
        let (factory, root) = build(&sketch);
        let mut ids: Vec<_> = flat_map(&root, |node| vec![node.id()]).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        ids.len() == total && total as u64 <= factory.minted()
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(UnitSketch) -> bool);
}

#[test]
fn test_pipeline_output_contract() {
    setup();
    fn prop(sketch: UnitSketch) -> TestResult {
        let (factory, root) = build(&sketch);
        let mut unit = CompilationUnit::new(factory, root);
        if let Err(error) = Pipeline::standard(&FrontendConfig::default()).apply(&mut unit) {
            debug!("Pipeline failed with {} for:\n{}", error, sketch.to_code());
            return TestResult::failed();
        }
        let contexts = &unit.contexts;
        let annotated = flat_map(&unit.root, |node| {
            vec![contexts.contains::<Relatives>(node.id()) && contexts.contains::<SymbolTable>(node.id())]
        })
        .all(|ok| ok);
        let normalized = flat_map(&unit.root, |node| vec![is_normalized(node)]).all(|ok| ok);
        TestResult::from_bool(annotated && normalized && unit.global_scope.is_some())
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(UnitSketch) -> TestResult);
}

#[test]
fn test_flattening_is_idempotent() {
    setup();
    fn prop(ty: TypeExpr) -> bool {
        let factory = NodeFactory::new();
        let node = common::build_type(&factory, &ty).expect("generated types are well formed");
        let mut contexts = ContextStore::new();
        let once = flatten_types(&node, &factory, &mut contexts);
        let twice = flatten_types(&once, &factory, &mut contexts);
        once == twice && count_nodes(&once) <= ty.node_count()
    }
    QuickCheck::new().tests(500).quickcheck(prop as fn(TypeExpr) -> bool);
}

#[test]
fn test_shadowing_pipeline_without_flattening() {
    setup();
    let config = FrontendConfig::from_json_str(r#"{"duplicate_policy": "shadow", "flatten_types": false}"#).unwrap();
    let pipeline = Pipeline::standard(&config);
    assert_eq!(pipeline.order().unwrap().last().map(String::as_str), Some(SYMBOL_TABLE));
    assert!(!pipeline.order().unwrap().iter().any(|id| id == TYPE_FLATTENING));

    let fixture = common::class_fixture();
    let root = Arc::clone(&fixture.root);
    let mut unit = CompilationUnit::new(fixture.factory, Arc::clone(&root));
    pipeline.apply(&mut unit).unwrap();

    assert!(Arc::ptr_eq(&unit.root, &root));
    let global = unit.global_scope.unwrap();
    assert_eq!(global.duplicate_policy(), DuplicatePolicy::Shadow);
    assert_eq!(global.scopes().len(), 1);
}
