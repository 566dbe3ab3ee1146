//! Fixture frontend
//!
//! The "source" of a fixture unit is the name of a revision below; the
//! frontend builds the matching structure directly. Two units are modelled:
//!
//! ```text
//! // lib.c
//! struct Point { int x; int y; Point(int x, int y) {} };
//! int add(int a, int b) { return a + b; }
//!
//! // main.c
//! int main() {
//!     Point p = Point(1, 2);
//!     int s = add(1, 2);
//!     return s + p.y;
//! }
//! ```

use codegraph_cpg::shared::models::{Node, NodeKind};
use codegraph_cpg::shared::ports::{Frontend, FrontendError, FrontendSet, Language, SourceUnit};
use codegraph_cpg::UnitBuilder;

pub const LIB: &str = "lib";
/// `add` returns `b + a`
pub const LIB_BODY_CHANGED: &str = "lib:body";
/// `add` takes a single parameter
pub const LIB_SIGNATURE_CHANGED: &str = "lib:signature";
/// `Point` lost field `y`
pub const LIB_WITHOUT_Y: &str = "lib:no-y";
/// The `Point` constructor body is `{ 0; }`
pub const LIB_CTOR_BODY_CHANGED: &str = "lib:ctor-body";
/// The `Point` constructor takes two `long`s
pub const LIB_CTOR_SIGNATURE_CHANGED: &str = "lib:ctor-signature";
pub const MAIN: &str = "main";
/// Rejected by the frontend
pub const BROKEN: &str = "broken";

pub struct FixtureFrontend;

impl Frontend for FixtureFrontend {
    fn language(&self) -> Language {
        Language::C
    }

    fn build(&self, unit: &SourceUnit, builder: &mut UnitBuilder) -> Result<(), FrontendError> {
        match unit.source.as_str() {
            LIB => lib_unit(builder, true, Ctor::Original, Add::Original),
            LIB_BODY_CHANGED => lib_unit(builder, true, Ctor::Original, Add::Swapped),
            LIB_SIGNATURE_CHANGED => lib_unit(builder, true, Ctor::Original, Add::Unary),
            LIB_WITHOUT_Y => lib_unit(builder, false, Ctor::Original, Add::Original),
            LIB_CTOR_BODY_CHANGED => lib_unit(builder, true, Ctor::Body, Add::Original),
            LIB_CTOR_SIGNATURE_CHANGED => lib_unit(builder, true, Ctor::Long, Add::Original),
            MAIN => main_unit(builder),
            other => Err(FrontendError::syntax(&unit.name, 1, format!("unknown fixture '{other}'"))),
        }
    }
}

pub fn frontends() -> FrontendSet {
    FrontendSet::new().with(FixtureFrontend)
}

/// `lib.c` at revision `lib` plus `main.c`
pub fn units(lib: &str) -> Vec<SourceUnit> {
    vec![
        SourceUnit::new("lib.c", Language::C, lib),
        SourceUnit::new("main.c", Language::C, MAIN),
    ]
}

/// `count` independent units, each declaring `f<i>` and calling `f<i-1>`
pub fn chain_units(count: usize) -> Vec<SourceUnit> {
    (0..count)
        .map(|i| SourceUnit::new(format!("u{i}.c"), Language::C, format!("chain:{i}")))
        .collect()
}

/// Frontend for [`chain_units`]
pub struct ChainFrontend;

impl Frontend for ChainFrontend {
    fn language(&self) -> Language {
        Language::C
    }

    fn build(&self, unit: &SourceUnit, builder: &mut UnitBuilder) -> Result<(), FrontendError> {
        let index: usize = unit
            .source
            .strip_prefix("chain:")
            .and_then(|i| i.parse().ok())
            .ok_or_else(|| FrontendError::syntax(&unit.name, 1, "not a chain unit"))?;

        builder.within(Node::builder(NodeKind::Function).name(format!("f{index}")).typed("int"), |b| {
            b.add(Node::builder(NodeKind::Parameter).name("v").typed("int"))?;
            b.within(Node::new(NodeKind::Block), |b| {
                b.within(Node::new(NodeKind::Return), |b| {
                    if index == 0 {
                        b.add(Node::builder(NodeKind::Reference).name("v"))?;
                    } else {
                        b.within(Node::builder(NodeKind::Call).name(format!("f{}", index - 1)), |b| {
                            b.add(Node::builder(NodeKind::Reference).name("v"))?;
                            Ok(())
                        })?;
                    }
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Ctor {
    Original,
    Body,
    Long,
}

#[derive(Clone, Copy)]
enum Add {
    Original,
    Swapped,
    Unary,
}

fn int(kind: NodeKind, name: &str) -> Node {
    Node::builder(kind).name(name).typed("int").build()
}

fn literal(code: &str) -> Node {
    Node::builder(NodeKind::Literal).code(code).typed("int").build()
}

fn lib_unit(
    builder: &mut UnitBuilder,
    with_y: bool,
    ctor: Ctor,
    add: Add,
) -> Result<(), FrontendError> {
    builder.within(Node::builder(NodeKind::Record).name("Point"), |b| {
        b.add(int(NodeKind::Field, "x"))?;
        if with_y {
            b.add(int(NodeKind::Field, "y"))?;
        }
        b.within(Node::builder(NodeKind::Constructor).name("Point"), |b| {
            let param_type = match ctor {
                Ctor::Long => "long",
                Ctor::Original | Ctor::Body => "int",
            };
            for param in ["x", "y"] {
                b.add(Node::builder(NodeKind::Parameter).name(param).typed(param_type))?;
            }
            b.within(Node::new(NodeKind::Block), |b| {
                if matches!(ctor, Ctor::Body) {
                    b.add(literal("0"))?;
                }
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })?;

    let (params, operands): (&[&str], [&str; 2]) = match add {
        Add::Original => (&["a", "b"][..], ["a", "b"]),
        Add::Swapped => (&["a", "b"][..], ["b", "a"]),
        Add::Unary => (&["a"][..], ["a", "a"]),
    };
    builder.within(int(NodeKind::Function, "add"), |b| {
        for param in params {
            b.add(int(NodeKind::Parameter, param))?;
        }
        b.within(Node::new(NodeKind::Block), |b| {
            b.within(Node::new(NodeKind::Return), |b| {
                b.within(Node::builder(NodeKind::BinaryOperator).name("+"), |b| {
                    for operand in operands {
                        b.add(Node::builder(NodeKind::Reference).name(operand))?;
                    }
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}

fn main_unit(builder: &mut UnitBuilder) -> Result<(), FrontendError> {
    builder.within(int(NodeKind::Function, "main"), |b| {
        b.within(Node::new(NodeKind::Block), |b| {
            b.within(Node::builder(NodeKind::Variable).name("p").typed("Point"), |b| {
                b.within(Node::builder(NodeKind::Construct).name("Point"), |b| {
                    b.add(literal("1"))?;
                    b.add(literal("2"))?;
                    Ok(())
                })?;
                Ok(())
            })?;
            b.within(int(NodeKind::Variable, "s"), |b| {
                b.within(Node::builder(NodeKind::Call).name("add"), |b| {
                    b.add(literal("1"))?;
                    b.add(literal("2"))?;
                    Ok(())
                })?;
                Ok(())
            })?;
            b.within(Node::new(NodeKind::Return), |b| {
                b.within(Node::builder(NodeKind::BinaryOperator).name("+"), |b| {
                    b.add(Node::builder(NodeKind::Reference).name("s"))?;
                    b.within(Node::builder(NodeKind::MemberAccess).name("y"), |b| {
                        b.add(Node::builder(NodeKind::Reference).name("p"))?;
                        Ok(())
                    })?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })?;
    Ok(())
}
