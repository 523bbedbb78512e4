mod command;
mod mapper_method;
mod proxy;
mod signature;

pub use command::SqlCommand;
pub use mapper_method::MapperMethod;
pub use proxy::{InvokerCache, Mapper, MapperFactory, MethodInvoker, MethodKey};
pub use signature::{MethodSignature, ReturnShape};
