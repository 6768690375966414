//! Tests for union and intersection normalization

mod common;

use std::sync::Arc;

use common::{class_fixture, simple};
use thorium_frontend::config::FrontendConfig;
use thorium_frontend::ir::compilation_unit::CompilationUnit;
use thorium_frontend::ir::context::ContextStore;
use thorium_frontend::ir::node_id::NodeId;
use thorium_frontend::ir::pipeline::{Pass, Pipeline};
use thorium_frontend::ir::predicates::is_class;
use thorium_frontend::ir::relatives::Relatives;
use thorium_frontend::ir::source_position::{Position, SourcePosition};
use thorium_frontend::ir::symbol_table::{SymbolKind, SymbolTable};
use thorium_frontend::ir::thorium_node::*;
use thorium_frontend::ir::transforms::{TypeFlatteningPass, flatten_types};
use thorium_frontend::ir::visitor::{flat_map, nodes_matching};

fn union(factory: &NodeFactory, types: Vec<Arc<ThoriumNode>>) -> Arc<ThoriumNode> {
    factory.type_spec_union(types).unwrap()
}

fn intersection(factory: &NodeFactory, types: Vec<Arc<ThoriumNode>>) -> Arc<ThoriumNode> {
    factory.type_spec_intersection(types).unwrap()
}

fn simples(factory: &NodeFactory, names: &[&str]) -> Vec<Arc<ThoriumNode>> {
    names.iter().map(|name| simple(factory, name)).collect()
}

fn position(line: usize) -> SourcePosition {
    SourcePosition::new(Position::new(line, 1), Position::new(line, 10), vec![]).unwrap()
}

fn flatten(node: &Arc<ThoriumNode>, factory: &NodeFactory) -> Arc<ThoriumNode> {
    flatten_types(node, factory, &mut ContextStore::new())
}

#[test]
fn test_nested_intersections_are_merged() {
    let f = NodeFactory::new();
    let innermost = intersection(&f, simples(&f, &["TD", "TE"]));
    let inner = intersection(&f, vec![simple(&f, "TB"), simple(&f, "TC"), innermost]);
    let outer = intersection(&f, vec![simple(&f, "TA"), inner]);

    let flattened = flatten(&outer, &f);
    assert_eq!(flattened, intersection(&f, simples(&f, &["TA", "TB", "TC", "TD", "TE"])));
    assert_eq!(flattened.to_string(), "(TA & TB & TC & TD & TE)");
}

#[test]
fn test_single_member_after_dedup_replaces_the_wrapper() {
    let f = NodeFactory::new();
    let flattened = flatten(&intersection(&f, simples(&f, &["T", "T"])), &f);
    assert_eq!(flattened, simple(&f, "T"));
    assert_eq!(flattened.node_type(), NodeType::TypeSpecSimple);
}

#[test]
fn test_duplicates_keep_the_first_occurrence() {
    let f = NodeFactory::new();
    let flattened = flatten(&union(&f, simples(&f, &["TA", "TB", "TB"])), &f);
    assert_eq!(flattened, union(&f, simples(&f, &["TA", "TB"])));

    let flattened = flatten(&union(&f, simples(&f, &["TB", "TA", "TB", "TA"])), &f);
    assert_eq!(flattened.to_string(), "(TB | TA)");
}

#[test]
fn test_intersection_inside_union_stays_a_single_member() {
    let f = NodeFactory::new();
    let inner = intersection(&f, vec![simple(&f, "TB"), intersection(&f, simples(&f, &["TC", "TD"]))]);
    let outer = union(&f, vec![simple(&f, "TA"), inner, union(&f, simples(&f, &["TE"]))]);

    let flattened = flatten(&outer, &f);
    let expected = union(
        &f,
        vec![simple(&f, "TA"), intersection(&f, simples(&f, &["TB", "TC", "TD"])), simple(&f, "TE")],
    );
    assert_eq!(flattened, expected);
    assert_eq!(flattened.to_string(), "(TA | (TB & TC & TD) | TE)");
}

#[test]
fn test_members_deduplicate_after_their_own_flattening() {
    // (A | B) | (A | (B | C)) and generic arguments are normalized too
    let f = NodeFactory::new();
    let left = union(&f, simples(&f, &["A", "B"]));
    let right = union(&f, vec![simple(&f, "A"), union(&f, simples(&f, &["B", "C"]))]);
    let list = f
        .type_spec_simple("List", vec![union(&f, vec![left, right])])
        .unwrap();

    let flattened = flatten(&list, &f);
    assert_eq!(flattened.to_string(), "List[(A | B | C)]");
}

#[test]
fn test_flattened_node_keeps_the_outer_position() {
    let f = NodeFactory::new();
    let mut contexts = ContextStore::new();
    let members = simples(&f, &["TA", "TB"]);
    contexts.put(members[0].id(), position(2));
    contexts.put(members[1].id(), position(3));
    let inner = union(&f, members);
    contexts.put(inner.id(), position(4));
    let outer = union(&f, vec![inner, simple(&f, "TC")]);
    contexts.put(outer.id(), position(1));

    let flattened = flatten_types(&outer, &f, &mut contexts);
    assert_eq!(flattened.to_string(), "(TA | TB | TC)");
    assert_eq!(*contexts.get::<SourcePosition>(flattened.id()).unwrap(), position(1));

    let NodeKind::TypeSpecUnion(list) = flattened.kind() else { panic!("still a union") };
    assert_eq!(contexts.get::<SourcePosition>(list.types[0].id()).map(|p| p.start_line()), Some(2));
    assert!(contexts.get::<SourcePosition>(list.types[2].id()).is_none());
}

#[test]
fn test_collapsed_member_takes_the_outer_position() {
    let f = NodeFactory::new();
    let mut contexts = ContextStore::new();
    let members = simples(&f, &["T", "T"]);
    contexts.put(members[0].id(), position(7));
    let outer = intersection(&f, members);
    contexts.put(outer.id(), position(5));

    let flattened = flatten_types(&outer, &f, &mut contexts);
    assert_eq!(*contexts.get::<SourcePosition>(flattened.id()).unwrap(), position(5));

    // Without an outer position, the survivor keeps none either.
    let members = simples(&f, &["U", "U"]);
    contexts.put(members[0].id(), position(8));
    let flattened = flatten_types(&intersection(&f, members), &f, &mut contexts);
    assert!(contexts.get::<SourcePosition>(flattened.id()).is_none());
}

#[test]
fn test_input_tree_is_left_untouched() {
    let f = NodeFactory::new();
    let nested = union(&f, vec![simple(&f, "A"), union(&f, simples(&f, &["A", "B"]))]);
    let before = nested.to_string();
    let flattened = flatten(&nested, &f);

    assert_eq!(nested.to_string(), before);
    assert_ne!(flattened, nested);
    assert_ne!(flattened.id(), nested.id());
}

#[test]
fn test_pass_replaces_the_tree_and_refreshes_relatives() {
    let f = NodeFactory::new();
    let nested = union(&f, vec![simple(&f, "Int"), union(&f, simples(&f, &["Int", "String"]))]);
    let attribute = f.attribute("value", nested, f.none_value(), Mode::Val).unwrap();
    let class = f
        .class(Visibility::Public, "Holder", vec![], f.type_spec_inferred(), vec![], vec![attribute])
        .unwrap();
    let root = f.root("ns", vec![], class).unwrap();
    let old_ids: Vec<NodeId> = flat_map(&root, |n| vec![n.id()]).collect();

    let mut unit = CompilationUnit::new(f, Arc::clone(&root));
    for id in &old_ids {
        unit.contexts.put(*id, position(1));
    }
    TypeFlatteningPass.run(&mut unit).unwrap();

    let types: Vec<String> = flat_map(&unit.root, |n| match n.kind() {
        NodeKind::Attribute(attr) => vec![attr.type_spec.to_string()],
        _ => vec![],
    })
    .collect();
    assert_eq!(types, vec!["(Int | String)"]);

    let new_ids: Vec<NodeId> = flat_map(&unit.root, |n| vec![n.id()]).collect();
    assert!(new_ids.iter().all(|id| !old_ids.contains(id)));
    assert_eq!(unit.contexts.len(), new_ids.len());
    for id in &new_ids {
        let relatives = unit.contexts.require::<Relatives>(*id).unwrap();
        assert_eq!(relatives.node().id(), *id);
        assert!(unit.contexts.contains::<SourcePosition>(*id));
    }
}

#[test]
fn test_fixture_without_composites_is_only_renumbered() {
    let fixture = class_fixture();
    let flattened = flatten(&fixture.root, &fixture.factory);
    assert_eq!(flattened, fixture.root);
    assert!(!Arc::ptr_eq(&flattened, &fixture.root));
}

#[test]
fn test_symbols_point_into_the_flattened_tree() {
    let f = NodeFactory::new();
    let nested = union(&f, vec![simple(&f, "Int"), union(&f, simples(&f, &["Int", "String"]))]);
    let attribute = f.attribute("value", nested, f.none_value(), Mode::Val).unwrap();
    let class = f
        .class(Visibility::Public, "Holder", vec![], f.type_spec_inferred(), vec![], vec![attribute])
        .unwrap();
    let root = f.root("ns", vec![], class).unwrap();

    let mut unit = CompilationUnit::new(f, root);
    Pipeline::standard(&FrontendConfig::default()).apply(&mut unit).unwrap();

    let class = nodes_matching(&unit.root, is_class).pop().unwrap();
    let class_scope = unit.contexts.require::<SymbolTable>(class.id()).unwrap();
    let symbol = class_scope.lookup("value").unwrap();
    assert_eq!(symbol.kind, SymbolKind::Attribute);

    let NodeKind::Attribute(attr) = symbol.node.kind() else { panic!("attribute symbol") };
    assert_eq!(attr.type_spec.to_string(), "(Int | String)");
    let relatives = unit.contexts.require::<Relatives>(symbol.node.id()).unwrap();
    assert_eq!(relatives.parent().unwrap().node().id(), class.id());

    let holder = class_scope.lookup("Holder").unwrap();
    assert_eq!(holder.node.id(), class.id());
}

#[test]
fn test_every_fixture_symbol_is_reachable_after_the_pipeline() {
    let fixture = class_fixture();
    let mut unit = CompilationUnit::new(fixture.factory, Arc::clone(&fixture.root));
    Pipeline::standard(&FrontendConfig::default()).apply(&mut unit).unwrap();

    let ids: Vec<NodeId> = flat_map(&unit.root, |n| vec![n.id()]).collect();
    let mut pending = vec![Arc::clone(unit.global_scope.as_ref().unwrap())];
    let mut checked = 0;
    while let Some(scope) = pending.pop() {
        for symbol in scope.symbols() {
            assert!(ids.contains(&symbol.node.id()), "'{}' is not in the tree", symbol.name);
            assert!(unit.contexts.require::<Relatives>(symbol.node.id()).is_ok());
            checked += 1;
        }
        pending.extend(scope.scopes());
    }
    assert_eq!(checked, 9);
    assert!(!ids.contains(&fixture.attribute.id()));
}
