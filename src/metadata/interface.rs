use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{Arg, Result};
use crate::reflection::{ParamDecl, TypeExpr};
use crate::session::CallResult;

/// Receiver surface a default method body sees: the proxy it was invoked on,
/// able to dispatch sibling methods of the same interface.
pub trait MapperCall: Send + Sync {
    fn call(&self, method: &str, args: Vec<Arg>) -> Result<CallResult>;
}

/// A method body carried by the declaration itself, invoked with the proxy
/// as receiver instead of being routed to a command.
pub type DefaultBody = Arc<dyn Fn(&dyn MapperCall, Vec<Arg>) -> Result<CallResult> + Send + Sync>;

/// Declaration-time metadata for one mapper method.
#[derive(Clone)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    pub return_type: TypeExpr,
    pub map_key: Option<String>,
    pub flush: bool,
    pub default_body: Option<DefaultBody>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: TypeExpr::Unit,
            map_key: None,
            flush: false,
            default_body: None,
        }
    }

    pub fn param(mut self, decl: ParamDecl) -> Self {
        self.params.push(decl);
        self
    }

    pub fn returns(mut self, declared: TypeExpr) -> Self {
        self.return_type = declared;
        self
    }

    /// Declare which result field keys a map-shaped return.
    pub fn map_key(mut self, field: impl Into<String>) -> Self {
        self.map_key = Some(field.into());
        self
    }

    /// Mark this method as a flush trigger: no command needs to be
    /// registered for it.
    pub fn flush(mut self) -> Self {
        self.flush = true;
        self
    }

    pub fn default_body<F>(mut self, body: F) -> Self
    where
        F: Fn(&dyn MapperCall, Vec<Arg>) -> Result<CallResult> + Send + Sync + 'static,
    {
        self.default_body = Some(Arc::new(body));
        self
    }
}

/// A directly-extended parent interface, with the type expressions this
/// interface binds to the parent's type parameters (positional).
#[derive(Clone)]
pub struct ParentRef {
    pub interface: Arc<MapperInterface>,
    pub bindings: Vec<TypeExpr>,
}

/// The declared contract whose methods are bound to commands.
///
/// Built once at declaration time and shared immutably. Parents are kept in
/// declaration order; command resolution walks them depth-first.
pub struct MapperInterface {
    name: String,
    type_params: Vec<String>,
    parents: Vec<ParentRef>,
    methods: Vec<Arc<MethodDecl>>,
}

impl MapperInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            parents: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn type_param(mut self, name: impl Into<String>) -> Self {
        self.type_params.push(name.into());
        self
    }

    pub fn extends(mut self, parent: Arc<MapperInterface>) -> Self {
        self.parents.push(ParentRef {
            interface: parent,
            bindings: Vec::new(),
        });
        self
    }

    /// Extend a generic parent, binding its type parameters positionally.
    pub fn extends_with(mut self, parent: Arc<MapperInterface>, bindings: Vec<TypeExpr>) -> Self {
        self.parents.push(ParentRef {
            interface: parent,
            bindings,
        });
        self
    }

    pub fn method(mut self, decl: MethodDecl) -> Self {
        self.methods.push(Arc::new(decl));
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_params(&self) -> &[String] {
        &self.type_params
    }

    pub fn parents(&self) -> &[ParentRef] {
        &self.parents
    }

    pub fn methods(&self) -> &[Arc<MethodDecl>] {
        &self.methods
    }

    /// A method declared directly on this interface.
    pub fn declares(&self, name: &str) -> Option<&Arc<MethodDecl>> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Locate a method by name, searching this interface first and then the
    /// parents depth-first in declaration order. Returns the declaring
    /// interface together with the declaration.
    pub fn find_method(&self, name: &str) -> Option<(&MapperInterface, &Arc<MethodDecl>)> {
        if let Some(decl) = self.declares(name) {
            return Some((self, decl));
        }
        for parent in &self.parents {
            if let Some(found) = parent.interface.find_method(name) {
                return Some(found);
            }
        }
        None
    }

    /// Whether `other` is this interface or transitively extends it.
    pub fn is_assignable_from(&self, other: &MapperInterface) -> bool {
        if self.name == other.name {
            return true;
        }
        other
            .parents
            .iter()
            .any(|p| self.is_assignable_from(&p.interface))
    }

    /// Compose the type-variable substitutions seen from this interface for
    /// a method declared on `declaring`. `None` when `declaring` is not an
    /// ancestor.
    pub fn bindings_to(&self, declaring: &str) -> Option<HashMap<String, TypeExpr>> {
        if self.name == declaring {
            return Some(HashMap::new());
        }
        for parent in &self.parents {
            let local: HashMap<String, TypeExpr> = parent
                .interface
                .type_params
                .iter()
                .cloned()
                .zip(parent.bindings.iter().cloned())
                .collect();
            if parent.interface.name == declaring {
                return Some(local);
            }
            if let Some(inner) = parent.interface.bindings_to(declaring) {
                return Some(
                    inner
                        .into_iter()
                        .map(|(var, expr)| (var, expr.resolve(&local)))
                        .collect(),
                );
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_method_prefers_own_declaration() {
        let base = MapperInterface::new("app.Base")
            .method(MethodDecl::new("find").returns(TypeExpr::named("Base")))
            .build();
        let child = MapperInterface::new("app.Child")
            .extends(Arc::clone(&base))
            .method(MethodDecl::new("find").returns(TypeExpr::named("Child")))
            .build();

        let (declaring, decl) = child.find_method("find").unwrap();
        assert_eq!(declaring.name(), "app.Child");
        assert_eq!(decl.return_type, TypeExpr::named("Child"));
    }

    #[test]
    fn test_assignability_is_transitive() {
        let a = MapperInterface::new("app.A").build();
        let b = MapperInterface::new("app.B").extends(Arc::clone(&a)).build();
        let c = MapperInterface::new("app.C").extends(Arc::clone(&b)).build();

        assert!(a.is_assignable_from(&c));
        assert!(a.is_assignable_from(&a));
        assert!(!c.is_assignable_from(&a));
    }

    #[test]
    fn test_bindings_compose_across_levels() {
        // A<T> <- B<E> (T := E) <- C (E := User)
        let a = MapperInterface::new("app.A").type_param("T").build();
        let b = MapperInterface::new("app.B")
            .type_param("E")
            .extends_with(Arc::clone(&a), vec![TypeExpr::var("E")])
            .build();
        let c = MapperInterface::new("app.C")
            .extends_with(Arc::clone(&b), vec![TypeExpr::named("User")])
            .build();

        let bindings = c.bindings_to("app.A").unwrap();
        assert_eq!(bindings.get("T"), Some(&TypeExpr::named("User")));
    }
}
