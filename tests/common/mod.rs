//! Shared fixtures: hand-written trees and conversion of generated sketches
//! into nodes.
#![allow(dead_code)]

use std::sync::Arc;

use test_utils::ir::generator::{MethodSketch, ParamSketch, TypeExpr, UnitSketch, ValueExpr};
use thorium_frontend::ir::errors::ConstructionError;
use thorium_frontend::ir::thorium_node::{Mode, NodeFactory, ThoriumNode, Visibility};

type Built = Result<Arc<ThoriumNode>, ConstructionError>;

pub fn build_type(factory: &NodeFactory, ty: &TypeExpr) -> Built {
    let all = |types: &[TypeExpr]| types.iter().map(|t| build_type(factory, t)).collect::<Result<Vec<_>, _>>();
    match ty {
        TypeExpr::Simple(name, args) => factory.type_spec_simple(name.as_str(), all(args)?),
        TypeExpr::Union(members) => factory.type_spec_union(all(members)?),
        TypeExpr::Intersection(members) => factory.type_spec_intersection(all(members)?),
        TypeExpr::Function(args, ret) => factory.type_spec_function(all(args)?, build_type(factory, ret)?),
        TypeExpr::Inferred => Ok(factory.type_spec_inferred()),
    }
}

fn mode(var: bool) -> Mode {
    if var { Mode::Var } else { Mode::Val }
}

pub fn build_value(factory: &NodeFactory, value: &ValueExpr) -> Built {
    match value {
        ValueExpr::Str(text) => Ok(factory.string_value(text.as_str())),
        ValueExpr::Number(text) => factory.number_value(text.as_str()),
        ValueExpr::Bool(b) => Ok(factory.boolean_value(*b)),
        ValueExpr::None => Ok(factory.none_value()),
        ValueExpr::Identifier(name) => factory.identifier(name.as_str()),
        ValueExpr::Call { method, arguments } => {
            let arguments = arguments.iter().map(|a| build_value(factory, a)).collect::<Result<Vec<_>, _>>()?;
            factory.method_call_value(factory.reference(method.as_str(), true)?, vec![], arguments)
        }
        ValueExpr::Nested(outer, inner) => {
            factory.nested_value(build_value(factory, outer)?, build_value(factory, inner)?)
        }
        ValueExpr::Assign { name, value } => {
            factory.direct_assignment_value(factory.reference(name.as_str(), false)?, build_value(factory, value)?)
        }
        ValueExpr::SetMember { target, member, value } => factory.indirect_assignment_value(
            build_value(factory, target)?,
            factory.reference(member.as_str(), false)?,
            build_value(factory, value)?,
        ),
        ValueExpr::NewVariable { var, name, ty, value } => factory.new_assignment_value(
            mode(*var),
            name.as_str(),
            build_type(factory, ty)?,
            build_value(factory, value)?,
        ),
        ValueExpr::Function { parameters, return_type, body } => factory.function_value(
            vec![],
            build_parameters(factory, parameters)?,
            build_type(factory, return_type)?,
            build_statements(factory, body)?,
        ),
    }
}

fn build_parameters(factory: &NodeFactory, parameters: &[ParamSketch]) -> Result<Vec<Arc<ThoriumNode>>, ConstructionError> {
    parameters
        .iter()
        .map(|p| factory.parameter(p.name.as_str(), build_type(factory, &p.ty)?))
        .collect()
}

fn build_type_parameters(factory: &NodeFactory, names: &[String]) -> Result<Vec<Arc<ThoriumNode>>, ConstructionError> {
    names.iter().map(|name| factory.type_parameter(name.as_str())).collect()
}

fn build_statements(factory: &NodeFactory, body: &[ValueExpr]) -> Result<Vec<Arc<ThoriumNode>>, ConstructionError> {
    body.iter()
        .enumerate()
        .map(|(i, value)| factory.statement(build_value(factory, value)?, i + 1 == body.len()))
        .collect()
}

fn build_signature(factory: &NodeFactory, method: &MethodSketch) -> Built {
    factory.method_signature(
        Visibility::Public,
        method.name.as_str(),
        build_type_parameters(factory, &method.type_parameters)?,
        build_parameters(factory, &method.parameters)?,
        build_type(factory, &method.return_type)?,
    )
}

/// Turns a generated unit into a tree rooted at a `Root` node.
pub fn build_unit(factory: &NodeFactory, unit: &UnitSketch) -> Built {
    let uses = unit.uses.iter().map(|u| factory.use_(u.as_str())).collect::<Result<Vec<_>, _>>()?;
    let type_parameters = build_type_parameters(factory, &unit.type_parameters)?;
    let super_type = build_type(factory, &unit.super_type)?;
    let top_level = if unit.is_class {
        let methods = unit
            .methods
            .iter()
            .map(|m| factory.method(build_signature(factory, m)?, build_statements(factory, &m.body)?))
            .collect::<Result<Vec<_>, _>>()?;
        let attributes = unit
            .attributes
            .iter()
            .map(|a| {
                factory.attribute(
                    a.name.as_str(),
                    build_type(factory, &a.ty)?,
                    build_value(factory, &a.value)?,
                    mode(a.var),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        factory.class(Visibility::Public, unit.name.as_str(), type_parameters, super_type, methods, attributes)?
    } else {
        let methods = unit.methods.iter().map(|m| build_signature(factory, m)).collect::<Result<Vec<_>, _>>()?;
        factory.type_decl(Visibility::Public, unit.name.as_str(), type_parameters, super_type, methods)?
    };
    factory.root(unit.namespace.as_str(), uses, top_level)
}

pub fn simple(factory: &NodeFactory, name: &str) -> Arc<ThoriumNode> {
    factory.type_spec_simple(name, vec![]).unwrap()
}

/// The class used across tests:
///
/// ```text
/// namespace org.thorium.test
/// use org.thorium.Collections;
///
/// class Counter[T] {
///     var count: Int = 0;
///     public increment(by: Int): Int { val next: Int = by; next }
///     public increment(): Int { increment(1) }
///     private reset(): None { count = 0 }
/// }
/// ```
pub struct ClassFixture {
    pub factory: NodeFactory,
    pub root: Arc<ThoriumNode>,
    pub class: Arc<ThoriumNode>,
    pub type_parameter: Arc<ThoriumNode>,
    pub attribute: Arc<ThoriumNode>,
    /// `increment(Int)`, `increment()`, `reset()`.
    pub methods: Vec<Arc<ThoriumNode>>,
    /// Signatures of `methods`, same order.
    pub signatures: Vec<Arc<ThoriumNode>>,
    /// The parameter `by` of the first method.
    pub parameter: Arc<ThoriumNode>,
    /// The statements of the first method.
    pub statements: Vec<Arc<ThoriumNode>>,
}

pub fn class_fixture() -> ClassFixture {
    let factory = NodeFactory::new();

    let type_parameter = factory.type_parameter("T").unwrap();
    let attribute = factory
        .attribute("count", simple(&factory, "Int"), factory.number_value("0").unwrap(), Mode::Var)
        .unwrap();

    let parameter = factory.parameter("by", simple(&factory, "Int")).unwrap();
    let first_sig = factory
        .method_signature(Visibility::Public, "increment", vec![], vec![Arc::clone(&parameter)], simple(&factory, "Int"))
        .unwrap();
    let declare = factory
        .new_assignment_value(Mode::Val, "next", simple(&factory, "Int"), factory.identifier("by").unwrap())
        .unwrap();
    let statements = vec![
        factory.statement(declare, false).unwrap(),
        factory.statement(factory.identifier("next").unwrap(), true).unwrap(),
    ];
    let first = factory.method(Arc::clone(&first_sig), statements.clone()).unwrap();

    let second_sig = factory
        .method_signature(Visibility::Public, "increment", vec![], vec![], simple(&factory, "Int"))
        .unwrap();
    let call = factory
        .method_call_value(
            factory.reference("increment", true).unwrap(),
            vec![],
            vec![factory.number_value("1").unwrap()],
        )
        .unwrap();
    let second = factory
        .method(Arc::clone(&second_sig), vec![factory.statement(call, true).unwrap()])
        .unwrap();

    let third_sig = factory
        .method_signature(Visibility::Private, "reset", vec![], vec![], simple(&factory, "None"))
        .unwrap();
    let reset = factory
        .direct_assignment_value(factory.reference("count", false).unwrap(), factory.number_value("0").unwrap())
        .unwrap();
    let third = factory
        .method(Arc::clone(&third_sig), vec![factory.statement(reset, true).unwrap()])
        .unwrap();

    let methods = vec![first, second, third];
    let class = factory
        .class(
            Visibility::Public,
            "Counter",
            vec![Arc::clone(&type_parameter)],
            factory.type_spec_inferred(),
            methods.clone(),
            vec![Arc::clone(&attribute)],
        )
        .unwrap();
    let uses = vec![factory.use_("org.thorium.Collections").unwrap()];
    let root = factory.root("org.thorium.test", uses, Arc::clone(&class)).unwrap();

    ClassFixture {
        factory,
        root,
        class,
        type_parameter,
        attribute,
        methods,
        signatures: vec![first_sig, second_sig, third_sig],
        parameter,
        statements,
    }
}
