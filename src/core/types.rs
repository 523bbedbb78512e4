use std::fmt;

use serde::{Deserialize, Serialize};

use super::Value;

/// Pagination bounds restricting which result rows a select produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowBounds {
    pub offset: usize,
    pub limit: usize,
}

impl RowBounds {
    pub const NO_ROW_OFFSET: usize = 0;
    pub const NO_ROW_LIMIT: usize = usize::MAX;

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

impl Default for RowBounds {
    fn default() -> Self {
        Self {
            offset: Self::NO_ROW_OFFSET,
            limit: Self::NO_ROW_LIMIT,
        }
    }
}

/// Streaming callback invoked once per produced row instead of buffering.
pub type RowHandler = Box<dyn FnMut(Value) + Send>;

/// One positional argument of a mapper method call.
///
/// Plain values participate in parameter naming; bounds and handlers are
/// special capabilities located by position and never named.
pub enum Arg {
    Value(Value),
    Bounds(RowBounds),
    Handler(RowHandler),
}

impl Arg {
    pub fn handler<F>(f: F) -> Self
    where
        F: FnMut(Value) + Send + 'static,
    {
        Self::Handler(Box::new(f))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Bounds(b) => f.debug_tuple("Bounds").field(b).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<i64> for Arg {
    fn from(i: i64) -> Self {
        Self::Value(Value::Integer(i))
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Self::Value(Value::Text(s.to_string()))
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Self::Value(Value::Boolean(b))
    }
}

impl From<RowBounds> for Arg {
    fn from(b: RowBounds) -> Self {
        Self::Bounds(b)
    }
}
