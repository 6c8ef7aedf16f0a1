use std::fmt::Display;

use crate::Span;

use super::ast::Identifier;

/// The checked type of an expression or named object.
///
/// `Error` is assigned to subtrees a diagnostic was already raised for;
/// it compares equal to every type so one fault yields one diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Char,
    Bool,
    Error,
    Array {
        size: i32,
        elem: Box<Type>,
    },
    /// Ordered named fields.
    Record {
        fields: Vec<(String, Type)>,
    },
}

impl Type {
    /// Structural compatibility; `Error` is compatible with everything.
    pub fn equals(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Error, _) | (_, Type::Error) => true,
            (Type::Int, Type::Int) | (Type::Char, Type::Char) | (Type::Bool, Type::Bool) => true,
            (
                Type::Array { size, elem },
                Type::Array {
                    size: other_size,
                    elem: other_elem,
                },
            ) => size == other_size && elem.equals(other_elem),
            (Type::Record { fields }, Type::Record { fields: other_fields }) => {
                fields.len() == other_fields.len()
                    && fields
                        .iter()
                        .zip(other_fields.iter())
                        .all(|((name, ty), (other_name, other_ty))| {
                            name == other_name && ty.equals(other_ty)
                        })
            }
            _ => false,
        }
    }

    /// Size of a value of this type in machine words.
    pub fn size(&self) -> i32 {
        match self {
            Type::Int | Type::Char | Type::Bool => 1,
            Type::Error => 0,
            Type::Array { size, elem } => size * elem.size(),
            Type::Record { fields } => fields.iter().map(|(_, ty)| ty.size()).sum(),
        }
    }

    /// Word offset of a record field from the start of the record.
    pub fn field_offset(&self, field: &str) -> Option<i32> {
        if let Type::Record { fields } = self {
            let mut offset = 0;
            for (name, ty) in fields {
                if name == field {
                    return Some(offset);
                }
                offset += ty.size();
            }
        }
        None
    }

    pub fn field_type(&self, field: &str) -> Option<&Type> {
        if let Type::Record { fields } = self {
            for (name, ty) in fields {
                if name == field {
                    return Some(ty);
                }
            }
        }
        None
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "Integer"),
            Type::Char => write!(f, "Char"),
            Type::Bool => write!(f, "Boolean"),
            Type::Error => write!(f, "<error>"),
            Type::Array { size, elem } => write!(f, "array {} of {}", size, elem),
            Type::Record { fields } => {
                write!(f, "record ")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, ty)?;
                }
                write!(f, " end")
            }
        }
    }
}

/// A type as written in the source; the checker resolves it to a [`Type`].
#[derive(Debug, Clone)]
pub struct TypeDenoter {
    pub kind: TypeDenoterKind,
    pub span: Span,
    /// Filled by the checker.
    pub ty: Option<Type>,
}

#[derive(Debug, Clone)]
pub enum TypeDenoterKind {
    /// A type identifier, builtin or declared with `type`.
    Name { name: Identifier },
    /// `array N of T`
    Array { size: i32, elem: Box<TypeDenoter> },
    /// `record I1 : T1 , ... end`
    Record { fields: Vec<(Identifier, TypeDenoter)> },
}

static UNCHECKED: Type = Type::Error;

impl TypeDenoter {
    pub fn new(kind: TypeDenoterKind, span: Span) -> Self {
        TypeDenoter {
            kind,
            span,
            ty: None,
        }
    }

    /// The type the checker resolved this denoter to.
    pub fn checked_type(&self) -> &Type {
        self.ty.as_ref().unwrap_or(&UNCHECKED)
    }
}
