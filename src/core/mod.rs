mod error;
mod types;
mod value;

pub use error::{BindingError, Result};
pub use types::{Arg, RowBounds, RowHandler};
pub use value::Value;
