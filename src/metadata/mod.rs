mod interface;

pub use interface::{DefaultBody, MapperCall, MapperInterface, MethodDecl, ParentRef};
