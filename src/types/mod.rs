// src/types/mod.rs
//
// The type model shared by the serializer and the signature reconciler.
//
// A type is either a simple classifier application (class or type parameter,
// with argument projections and a nullability mark) or a flexible type: a
// lower/upper bound pair standing in for a host-platform type whose exact
// nullability is unknown. Flexible bounds are `SimpleType` by construction,
// so flexibility cannot nest.

pub mod equivalence;
pub mod substitution;

use smallvec::SmallVec;

use crate::descriptors::{ClassId, DescriptorArena, TypeParameterId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    In,
    Out,
}

impl Variance {
    /// Standard declaration-site variance composition: a covariant position
    /// preserves the inner variance, a contravariant position flips it, and
    /// an invariant position absorbs everything.
    pub fn compose(self, inner: Variance) -> Variance {
        match self {
            Variance::Out => inner,
            Variance::Invariant => Variance::Invariant,
            Variance::In => match inner {
                Variance::Out => Variance::In,
                Variance::In => Variance::Out,
                Variance::Invariant => Variance::Invariant,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::In => "in ",
            Variance::Out => "out ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classifier {
    Class(ClassId),
    Parameter(TypeParameterId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeProjection {
    /// Unconstrained use-site projection (`*`).
    Star,
    Argument(Variance, Box<Type>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleType {
    pub classifier: Classifier,
    pub arguments: SmallVec<[TypeProjection; 2]>,
    pub nullable: bool,
}

/// A platform type with unknown nullability, carried as a bound pair plus an
/// opaque capability-set identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlexibleType {
    pub lower: SimpleType,
    pub upper: SimpleType,
    pub capabilities: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Simple(SimpleType),
    Flexible(FlexibleType),
}

impl Type {
    pub fn class(id: ClassId, arguments: Vec<TypeProjection>) -> Type {
        Type::Simple(SimpleType {
            classifier: Classifier::Class(id),
            arguments: SmallVec::from_vec(arguments),
            nullable: false,
        })
    }

    pub fn parameter(id: TypeParameterId) -> Type {
        Type::Simple(SimpleType {
            classifier: Classifier::Parameter(id),
            arguments: SmallVec::new(),
            nullable: false,
        })
    }

    pub fn flexible(lower: SimpleType, upper: SimpleType, capabilities: impl Into<String>) -> Type {
        Type::Flexible(FlexibleType {
            lower,
            upper,
            capabilities: capabilities.into(),
        })
    }

    /// Returns the same type with the nullability mark set.
    pub fn nullable(self) -> Type {
        match self {
            Type::Simple(mut simple) => {
                simple.nullable = true;
                Type::Simple(simple)
            }
            Type::Flexible(mut flexible) => {
                flexible.lower.nullable = true;
                flexible.upper.nullable = true;
                Type::Flexible(flexible)
            }
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Simple(simple) => simple.nullable,
            // A flexible type is only known-nullable if even its lower
            // bound is.
            Type::Flexible(flexible) => flexible.lower.nullable,
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleType> {
        match self {
            Type::Simple(simple) => Some(simple),
            Type::Flexible(_) => None,
        }
    }

    pub fn lower_bound(&self) -> &SimpleType {
        match self {
            Type::Simple(simple) => simple,
            Type::Flexible(flexible) => &flexible.lower,
        }
    }

    pub fn upper_bound(&self) -> &SimpleType {
        match self {
            Type::Simple(simple) => simple,
            Type::Flexible(flexible) => &flexible.upper,
        }
    }

    /// Readable rendering for diagnostics and the member-order
    /// disambiguator. Class names render fully qualified so two overloads
    /// never collapse to the same key.
    pub fn render(&self, arena: &DescriptorArena) -> String {
        match self {
            Type::Simple(simple) => simple.render(arena),
            Type::Flexible(flexible) => format!(
                "{}..{}",
                flexible.lower.render(arena),
                flexible.upper.render(arena)
            ),
        }
    }
}

impl SimpleType {
    pub fn render(&self, arena: &DescriptorArena) -> String {
        let mut out = match self.classifier {
            Classifier::Class(id) => arena.fq_name(id),
            Classifier::Parameter(id) => arena.type_parameter(id).name.clone(),
        };
        if !self.arguments.is_empty() {
            out.push('<');
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match argument {
                    TypeProjection::Star => out.push('*'),
                    TypeProjection::Argument(variance, ty) => {
                        out.push_str(variance.label());
                        out.push_str(&ty.render(arena));
                    }
                }
            }
            out.push('>');
        }
        if self.nullable {
            out.push('?');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{ClassDescriptor, ClassKind};

    #[test]
    fn variance_composition() {
        use Variance::*;

        assert_eq!(Out.compose(Out), Out);
        assert_eq!(Out.compose(In), In);
        assert_eq!(In.compose(Out), In);
        assert_eq!(In.compose(In), Out);
        assert_eq!(Invariant.compose(Out), Invariant);
        assert_eq!(Out.compose(Invariant), Invariant);
    }

    #[test]
    fn nullable_marks_both_flexible_bounds() {
        let arena = DescriptorArena::new();
        let any = arena.builtins().any;
        let lower = match Type::class(any, Vec::new()) {
            Type::Simple(s) => s,
            _ => unreachable!(),
        };
        let upper = lower.clone();

        let flexible = Type::flexible(lower, upper, "platform").nullable();
        assert!(flexible.is_nullable());
        assert!(flexible.upper_bound().nullable);
    }

    #[test]
    fn render_qualifies_class_names() {
        let mut arena = DescriptorArena::new();
        let list = arena.alloc_class(ClassDescriptor::new("List", "core", ClassKind::Interface));
        let any = arena.builtins().any;

        let ty = Type::class(
            list,
            vec![TypeProjection::Argument(
                Variance::Out,
                Box::new(Type::class(any, Vec::new()).nullable()),
            )],
        );
        assert_eq!(ty.render(&arena), "core.List<out core.Any?>");
    }
}
