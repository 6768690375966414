//! Module for generating random Thorium compilation units for property-based testing.
//!
//! The generator produces *sketches*: plain descriptions of a namespace with its
//! uses and one top-level type or class, independent of the AST types so that
//! this crate does not depend on the front end. Tests turn a sketch into nodes
//! with a `NodeFactory`.
//!
//! Names are unique per scope (methods `m0, m1, ..`, parameters `p0, p1, ..`,
//! and so on), so every generated unit passes symbol table construction with
//! duplicate rejection on. Overloads are generated on purpose: a method may
//! reuse the name of the previous one with a different parameter list.
//!
//! Generation functions use a depth parameter to bound type and value nesting.

use quickcheck::{Arbitrary, Gen};

const MAX_DEPTH: usize = 3;

/// A type expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    Simple(String, Vec<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Function(Vec<TypeExpr>, Box<TypeExpr>),
    Inferred,
}

/// A value expression.
#[derive(Clone, Debug)]
pub enum ValueExpr {
    Str(String),
    Number(String),
    Bool(bool),
    None,
    Identifier(String),
    Call { method: String, arguments: Vec<ValueExpr> },
    Nested(Box<ValueExpr>, Box<ValueExpr>),
    Assign { name: String, value: Box<ValueExpr> },
    SetMember { target: Box<ValueExpr>, member: String, value: Box<ValueExpr> },
    NewVariable { var: bool, name: String, ty: TypeExpr, value: Box<ValueExpr> },
    Function { parameters: Vec<ParamSketch>, return_type: TypeExpr, body: Vec<ValueExpr> },
}

#[derive(Clone, Debug)]
pub struct ParamSketch {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Clone, Debug)]
pub struct MethodSketch {
    pub name: String,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<ParamSketch>,
    pub return_type: TypeExpr,
    /// Empty for the methods of a type.
    pub body: Vec<ValueExpr>,
}

#[derive(Clone, Debug)]
pub struct AttributeSketch {
    pub var: bool,
    pub name: String,
    pub ty: TypeExpr,
    pub value: ValueExpr,
}

/// A whole compilation unit.
#[derive(Clone, Debug)]
pub struct UnitSketch {
    pub namespace: String,
    pub uses: Vec<String>,
    /// `true` for a class, `false` for a type.
    pub is_class: bool,
    pub name: String,
    pub type_parameters: Vec<String>,
    pub super_type: TypeExpr,
    pub methods: Vec<MethodSketch>,
    pub attributes: Vec<AttributeSketch>,
}

/// Generates a random number in the inclusive range [min, max].
fn gen_range(g: &mut Gen, min: u32, max: u32) -> u32 {
    min + (u32::arbitrary(g) % (max - min + 1))
}

fn gen_type_name(g: &mut Gen) -> String {
    const NAMES: &[&str] = &["Int", "Float", "String", "Boolean", "None", "List", "Map", "T0", "T1"];
    g.choose(NAMES).map_or("Int", |n| *n).to_string()
}

fn gen_type(g: &mut Gen, depth: usize) -> TypeExpr {
    let depth = depth.min(MAX_DEPTH);
    if depth == 0 {
        return TypeExpr::Simple(gen_type_name(g), vec![]);
    }
    match gen_range(g, 0, 5) {
        0 | 1 => {
            let arity = gen_range(g, 0, 2) as usize;
            TypeExpr::Simple(gen_type_name(g), (0..arity).map(|_| gen_type(g, depth - 1)).collect())
        }
        2 => TypeExpr::Union((0..gen_range(g, 1, 4)).map(|_| gen_type(g, depth - 1)).collect()),
        3 => TypeExpr::Intersection((0..gen_range(g, 1, 4)).map(|_| gen_type(g, depth - 1)).collect()),
        4 => TypeExpr::Function(
            (0..gen_range(g, 0, 2)).map(|_| gen_type(g, depth - 1)).collect(),
            Box::new(gen_type(g, depth - 1)),
        ),
        _ => TypeExpr::Inferred,
    }
}

fn gen_parameters(g: &mut Gen, prefix: &str, depth: usize) -> Vec<ParamSketch> {
    (0..gen_range(g, 0, 3))
        .map(|i| ParamSketch { name: format!("{}{}", prefix, i), ty: gen_type(g, depth) })
        .collect()
}

/// Generates a body; `prefix` keeps variable names unique within it.
fn gen_body(g: &mut Gen, prefix: &str, depth: usize) -> Vec<ValueExpr> {
    (0..gen_range(g, 0, 3))
        .map(|i| gen_value(g, &format!("{}v{}", prefix, i), depth))
        .collect()
}

fn gen_value(g: &mut Gen, fresh: &str, depth: usize) -> ValueExpr {
    let depth = depth.min(MAX_DEPTH);
    let leaf_choices = 5;
    let choice = if depth == 0 { gen_range(g, 0, leaf_choices - 1) } else { gen_range(g, 0, 10) };
    match choice {
        0 => ValueExpr::Str(format!("s{}", u8::arbitrary(g))),
        1 => ValueExpr::Number(format!("{}", u16::arbitrary(g))),
        2 => ValueExpr::Bool(bool::arbitrary(g)),
        3 => ValueExpr::None,
        4 => ValueExpr::Identifier(gen_type_name(g).to_lowercase()),
        5 => ValueExpr::Call {
            method: format!("call{}", gen_range(g, 0, 3)),
            arguments: (0..gen_range(g, 0, 2))
                .map(|i| gen_value(g, &format!("{}a{}", fresh, i), depth - 1))
                .collect(),
        },
        6 => ValueExpr::Nested(
            Box::new(gen_value(g, &format!("{}o", fresh), depth - 1)),
            Box::new(gen_value(g, &format!("{}i", fresh), depth - 1)),
        ),
        7 => ValueExpr::Assign { name: "x".to_string(), value: Box::new(gen_value(g, fresh, depth - 1)) },
        8 => ValueExpr::SetMember {
            target: Box::new(gen_value(g, &format!("{}t", fresh), 0)),
            member: "field".to_string(),
            value: Box::new(gen_value(g, fresh, depth - 1)),
        },
        9 => ValueExpr::NewVariable {
            var: bool::arbitrary(g),
            name: fresh.to_string(),
            ty: gen_type(g, depth - 1),
            value: Box::new(gen_value(g, &format!("{}_", fresh), depth - 1)),
        },
        _ => ValueExpr::Function {
            parameters: gen_parameters(g, "fp", depth - 1),
            return_type: gen_type(g, depth - 1),
            body: gen_body(g, &format!("{}f", fresh), depth - 1),
        },
    }
}

fn gen_method(g: &mut Gen, name: String, with_body: bool) -> MethodSketch {
    MethodSketch {
        name,
        type_parameters: (0..gen_range(g, 0, 2)).map(|i| format!("M{}", i)).collect(),
        parameters: gen_parameters(g, "p", MAX_DEPTH - 1),
        return_type: gen_type(g, MAX_DEPTH - 1),
        body: if with_body { gen_body(g, "", MAX_DEPTH) } else { vec![] },
    }
}

fn gen_unit(g: &mut Gen) -> UnitSketch {
    let is_class = bool::arbitrary(g);
    let mut methods: Vec<MethodSketch> = Vec::new();
    for i in 0..gen_range(g, 0, 4) {
        // An overload: same name as the previous method, one more parameter.
        let overload = methods.last().filter(|_| bool::arbitrary(g)).cloned();
        let method = match overload {
            Some(previous) => {
                let mut method = gen_method(g, previous.name.clone(), is_class);
                method.parameters = previous.parameters.clone();
                method.parameters.push(ParamSketch {
                    name: format!("p{}", previous.parameters.len()),
                    ty: gen_type(g, 1),
                });
                method
            }
            None => gen_method(g, format!("m{}", i), is_class),
        };
        methods.push(method);
    }
    let attributes = if is_class {
        (0..gen_range(g, 0, 3))
            .map(|i| AttributeSketch {
                var: bool::arbitrary(g),
                name: format!("a{}", i),
                ty: gen_type(g, 2),
                value: gen_value(g, &format!("av{}", i), 1),
            })
            .collect()
    } else {
        vec![]
    };
    UnitSketch {
        namespace: format!("org.thorium.ns{}", gen_range(g, 0, 9)),
        uses: (0..gen_range(g, 0, 3)).map(|i| format!("org.lib{}.Use{}", i, i)).collect(),
        is_class,
        name: if is_class { "Sketched".to_string() } else { "SketchedType".to_string() },
        type_parameters: (0..gen_range(g, 0, 2)).map(|i| format!("T{}", i)).collect(),
        super_type: gen_type(g, 1),
        methods,
        attributes,
    }
}

impl Arbitrary for TypeExpr {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_type(g, g.size().min(MAX_DEPTH))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            TypeExpr::Union(members) | TypeExpr::Intersection(members) => Box::new(members.clone().into_iter()),
            TypeExpr::Simple(_, arguments) => Box::new(arguments.clone().into_iter()),
            TypeExpr::Function(arguments, ret) => {
                Box::new(arguments.clone().into_iter().chain(std::iter::once((**ret).clone())))
            }
            TypeExpr::Inferred => quickcheck::empty_shrinker(),
        }
    }
}

impl Arbitrary for UnitSketch {
    fn arbitrary(g: &mut Gen) -> Self {
        gen_unit(g)
    }
}

impl TypeExpr {
    pub fn to_code(&self) -> String {
        let join = |types: &[TypeExpr], sep: &str| types.iter().map(|t| t.to_code()).collect::<Vec<_>>().join(sep);
        match self {
            TypeExpr::Simple(name, args) if args.is_empty() => name.clone(),
            TypeExpr::Simple(name, args) => format!("{}[{}]", name, join(args, ", ")),
            TypeExpr::Union(members) => format!("({})", join(members, " | ")),
            TypeExpr::Intersection(members) => format!("({})", join(members, " & ")),
            TypeExpr::Function(args, ret) => format!("({}): {}", join(args, ", "), ret.to_code()),
            TypeExpr::Inferred => "_".to_string(),
        }
    }

    /// Number of nodes this expression turns into.
    pub fn node_count(&self) -> usize {
        match self {
            TypeExpr::Simple(_, args) => 1 + args.iter().map(TypeExpr::node_count).sum::<usize>(),
            TypeExpr::Union(members) | TypeExpr::Intersection(members) => {
                1 + members.iter().map(TypeExpr::node_count).sum::<usize>()
            }
            TypeExpr::Function(args, ret) => 1 + ret.node_count() + args.iter().map(TypeExpr::node_count).sum::<usize>(),
            TypeExpr::Inferred => 1,
        }
    }
}

impl UnitSketch {
    /// Thorium-like source text, for failure reports.
    pub fn to_code(&self) -> String {
        let mut code = format!("namespace {}\n", self.namespace);
        for use_ in &self.uses {
            code.push_str(&format!("use {};\n", use_));
        }
        let keyword = if self.is_class { "class" } else { "type" };
        code.push_str(&format!("public {} {} : {} {{\n", keyword, self.name, self.super_type.to_code()));
        for attr in &self.attributes {
            let mode = if attr.var { "var" } else { "val" };
            code.push_str(&format!("    {} {}: {};\n", mode, attr.name, attr.ty.to_code()));
        }
        for method in &self.methods {
            let params: Vec<String> =
                method.parameters.iter().map(|p| format!("{}: {}", p.name, p.ty.to_code())).collect();
            code.push_str(&format!(
                "    public {}({}): {} {{ {} statements }}\n",
                method.name,
                params.join(", "),
                method.return_type.to_code(),
                method.body.len()
            ));
        }
        code.push('}');
        code
    }
}
