mod factory;
mod param;
mod types;

pub use factory::{DefaultObjectFactory, ObjectFactory};
pub use param::{
    GENERIC_NAME_PREFIX, NameTable, Param, ParamDecl, ParamKind, ParamMap, ParamNameResolver,
};
pub use types::TypeExpr;
