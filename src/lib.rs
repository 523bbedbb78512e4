// ============================================================================
// RustMapper Library
// ============================================================================

//! Mapper binding layer: routes calls declared on a mapper interface to
//! named commands executed by an engine session, adapting positional
//! arguments into named parameters and engine results back into the shapes
//! the interface declares.
//!
//! A mapper interface is declared as structured metadata, commands are
//! registered against `interface.method` ids, and a [`MapperFactory`] hands
//! out proxies whose calls are routed through a shared, lazily compiled
//! dispatch table.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use rustmapper::{
//!     Arg, CommandDescriptor, CommandType, Configuration, MapperFactory, MapperInterface,
//!     MemorySession, MethodDecl, ParamDecl, TypeExpr, Value,
//! };
//!
//! # fn main() -> rustmapper::Result<()> {
//! let config = Arc::new(
//!     Configuration::new()
//!         .command(CommandDescriptor::new("app.UserMapper.findById", CommandType::Select)),
//! );
//!
//! let users = MapperInterface::new("app.UserMapper")
//!     .method(
//!         MethodDecl::new("findById")
//!             .param(ParamDecl::value("id"))
//!             .returns(TypeExpr::named("User")),
//!     )
//!     .build();
//!
//! let session = Arc::new(MemorySession::new(config));
//! session.seed_rows(
//!     "app.UserMapper.findById",
//!     vec![Value::Record(vec![
//!         ("id".to_string(), Value::Integer(1)),
//!         ("name".to_string(), Value::Text("Alice".to_string())),
//!     ])],
//! );
//!
//! let factory = MapperFactory::new(users);
//! let mapper = factory.create(session);
//!
//! let user = mapper.call("findById", vec![Arg::from(1i64)])?.into_value()?;
//! assert_eq!(user.field("name"), Some(&Value::Text("Alice".to_string())));
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod core;
pub mod mapping;
pub mod metadata;
pub mod reflection;
pub mod session;

// Re-export main types for convenience
pub use binding::{
    InvokerCache, Mapper, MapperFactory, MapperMethod, MethodSignature, ReturnShape, SqlCommand,
};
pub use crate::core::{Arg, BindingError, Result, RowBounds, Value};
pub use mapping::{CommandDescriptor, CommandType};
pub use metadata::{MapperCall, MapperInterface, MethodDecl};
pub use reflection::{
    DefaultObjectFactory, NameTable, ObjectFactory, Param, ParamDecl, ParamMap, ParamNameResolver,
    TypeExpr,
};
pub use session::{
    BatchResult, CallResult, Configuration, Cursor, MemorySession, SqlSession, VecCursor,
};
