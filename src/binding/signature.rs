use log::warn;

use crate::core::{Arg, BindingError, Result, RowBounds, Value};
use crate::metadata::{MapperInterface, MethodDecl};
use crate::reflection::{Param, ParamKind, ParamNameResolver, TypeExpr};
use crate::session::Configuration;

/// Classified return shape of a mapper method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    Void,
    Single,
    Many,
    Map,
    Cursor,
    Optional,
}

/// Build-time classification of one mapper method: return shape, resolved
/// return type, special-capability parameter positions and the name table.
/// Immutable once built.
#[derive(Debug)]
pub struct MethodSignature {
    method_name: String,
    shape: ReturnShape,
    return_type: TypeExpr,
    map_key: Option<String>,
    row_bounds_index: Option<usize>,
    row_handler_index: Option<usize>,
    param_resolver: ParamNameResolver,
}

impl MethodSignature {
    pub fn new(
        config: &Configuration,
        mapper: &MapperInterface,
        declaring: &MapperInterface,
        method: &MethodDecl,
    ) -> Result<Self> {
        let bindings = mapper
            .bindings_to(declaring.name())
            .unwrap_or_default();
        let return_type = method.return_type.resolve(&bindings);

        let shape = Self::classify(config, &return_type, method);
        if matches!(return_type, TypeExpr::Map(..)) && method.map_key.is_none() {
            warn!(
                "method {} returns a map without a map key, treating as single",
                method.name
            );
        }

        let row_bounds_index = Self::unique_param_index(method, ParamKind::RowBounds)?;
        let row_handler_index = Self::unique_param_index(method, ParamKind::RowHandler)?;
        let param_resolver =
            ParamNameResolver::new(config.uses_actual_param_name(), &method.params);

        Ok(Self {
            method_name: method.name.clone(),
            shape,
            return_type,
            map_key: method.map_key.clone(),
            row_bounds_index,
            row_handler_index,
            param_resolver,
        })
    }

    fn classify(config: &Configuration, return_type: &TypeExpr, method: &MethodDecl) -> ReturnShape {
        if *return_type == TypeExpr::Unit {
            ReturnShape::Void
        } else if matches!(return_type, TypeExpr::Cursor(_)) {
            ReturnShape::Cursor
        } else if matches!(return_type, TypeExpr::Optional(_)) {
            ReturnShape::Optional
        } else if matches!(return_type, TypeExpr::Map(..)) && method.map_key.is_some() {
            ReturnShape::Map
        } else if config.factory().is_collection(return_type) || return_type.is_array() {
            ReturnShape::Many
        } else {
            ReturnShape::Single
        }
    }

    fn unique_param_index(method: &MethodDecl, kind: ParamKind) -> Result<Option<usize>> {
        let mut index = None;
        for (i, param) in method.params.iter().enumerate() {
            if param.kind == kind {
                if index.is_some() {
                    return Err(BindingError::DuplicateSpecialParameter {
                        method: method.name.clone(),
                        kind: kind.label(),
                    });
                }
                index = Some(i);
            }
        }
        Ok(index)
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn shape(&self) -> ReturnShape {
        self.shape
    }

    pub fn return_type(&self) -> &TypeExpr {
        &self.return_type
    }

    pub fn map_key(&self) -> Option<&str> {
        self.map_key.as_deref()
    }

    pub fn has_row_bounds(&self) -> bool {
        self.row_bounds_index.is_some()
    }

    pub fn has_row_handler(&self) -> bool {
        self.row_handler_index.is_some()
    }

    pub fn param_resolver(&self) -> &ParamNameResolver {
        &self.param_resolver
    }

    pub fn convert_args_to_command_param(&self, args: &[Arg]) -> Result<Param> {
        self.param_resolver.resolve(args)
    }

    pub fn extract_row_bounds(&self, args: &[Arg]) -> Option<RowBounds> {
        let index = self.row_bounds_index?;
        match args.get(index) {
            Some(Arg::Bounds(bounds)) => Some(*bounds),
            _ => None,
        }
    }

    pub fn extract_row_handler<'a>(
        &self,
        args: &'a mut [Arg],
    ) -> Result<&'a mut (dyn FnMut(Value) + Send)> {
        let index = self
            .row_handler_index
            .ok_or_else(|| BindingError::TypeMismatch(format!(
                "method '{}' declares no row handler parameter",
                self.method_name
            )))?;
        match args.get_mut(index) {
            Some(Arg::Handler(handler)) => Ok(handler.as_mut()),
            _ => Err(BindingError::TypeMismatch(format!(
                "argument {} of '{}' is not a row handler",
                index, self.method_name
            ))),
        }
    }
}
