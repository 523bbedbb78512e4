use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured declared-type metadata for mapper method signatures.
///
/// This stands in for source-level reflection: every mapper method declares
/// its return type and the classifier works off this shape instead of an
/// erased runtime type. `Var` is a type variable bound by the declaring
/// interface and substituted through `resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeExpr {
    Unit,
    Bool,
    Int,
    Long,
    Double,
    Str,
    Named(String),
    Var(String),
    Optional(Box<TypeExpr>),
    List(Box<TypeExpr>),
    Set(Box<TypeExpr>),
    Array(Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Cursor(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    pub fn optional(inner: TypeExpr) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn list(inner: TypeExpr) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn set(inner: TypeExpr) -> Self {
        Self::Set(Box::new(inner))
    }

    pub fn array(inner: TypeExpr) -> Self {
        Self::Array(Box::new(inner))
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    pub fn cursor(inner: TypeExpr) -> Self {
        Self::Cursor(Box::new(inner))
    }

    /// Non-nullable scalar types. A select that produces no row cannot
    /// satisfy one of these.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::Long | Self::Double)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Substitute type variables using the given interface bindings.
    /// Unbound variables are left in place.
    pub fn resolve(&self, bindings: &HashMap<String, TypeExpr>) -> TypeExpr {
        match self {
            Self::Var(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            Self::Optional(inner) => Self::Optional(Box::new(inner.resolve(bindings))),
            Self::List(inner) => Self::List(Box::new(inner.resolve(bindings))),
            Self::Set(inner) => Self::Set(Box::new(inner.resolve(bindings))),
            Self::Array(inner) => Self::Array(Box::new(inner.resolve(bindings))),
            Self::Map(key, value) => Self::Map(
                Box::new(key.resolve(bindings)),
                Box::new(value.resolve(bindings)),
            ),
            Self::Cursor(inner) => Self::Cursor(Box::new(inner.resolve(bindings))),
            other => other.clone(),
        }
    }

}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "()"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Long => write!(f, "long"),
            Self::Double => write!(f, "double"),
            Self::Str => write!(f, "string"),
            Self::Named(name) => write!(f, "{}", name),
            Self::Var(name) => write!(f, "{}", name),
            Self::Optional(inner) => write!(f, "Optional<{}>", inner),
            Self::List(inner) => write!(f, "List<{}>", inner),
            Self::Set(inner) => write!(f, "Set<{}>", inner),
            Self::Array(inner) => write!(f, "{}[]", inner),
            Self::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
            Self::Cursor(inner) => write!(f, "Cursor<{}>", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_substitutes_nested_vars() {
        let mut bindings = HashMap::new();
        bindings.insert("T".to_string(), TypeExpr::named("User"));

        let declared = TypeExpr::list(TypeExpr::var("T"));
        assert_eq!(declared.resolve(&bindings), TypeExpr::list(TypeExpr::named("User")));

        let unbound = TypeExpr::map(TypeExpr::Str, TypeExpr::var("K"));
        assert_eq!(unbound.resolve(&bindings), unbound);
    }

    #[test]
    fn test_primitive_classification() {
        assert!(TypeExpr::Int.is_primitive());
        assert!(TypeExpr::Bool.is_primitive());
        assert!(!TypeExpr::Str.is_primitive());
        assert!(!TypeExpr::optional(TypeExpr::Int).is_primitive());
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeExpr::array(TypeExpr::Int).to_string(), "int[]");
        assert_eq!(
            TypeExpr::map(TypeExpr::Str, TypeExpr::named("User")).to_string(),
            "Map<string, User>"
        );
    }
}
