pub mod config;
pub mod cursor;
pub mod memory;

use std::fmt;
use std::sync::Arc;

pub use config::Configuration;
pub use cursor::{Cursor, VecCursor};
pub use memory::MemorySession;

use serde::{Deserialize, Serialize};

use crate::core::{BindingError, Result, RowBounds, Value};
use crate::reflection::Param;

/// Outcome of flushing one pending batched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub command: String,
    pub update_counts: Vec<usize>,
}

impl BatchResult {
    pub fn new(command: impl Into<String>, update_counts: Vec<usize>) -> Self {
        Self {
            command: command.into(),
            update_counts,
        }
    }
}

/// What a dispatched mapper call hands back to the caller.
pub enum CallResult {
    Value(Value),
    Cursor(Box<dyn Cursor>),
    Batch(Vec<BatchResult>),
}

impl CallResult {
    pub fn absent() -> Self {
        Self::Value(Value::Null)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    pub fn into_value(self) -> Result<Value> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Cursor(_) => Err(BindingError::TypeMismatch(
                "call produced a cursor, not a value".to_string(),
            )),
            Self::Batch(_) => Err(BindingError::TypeMismatch(
                "call produced batch results, not a value".to_string(),
            )),
        }
    }

    pub fn into_cursor(self) -> Result<Box<dyn Cursor>> {
        match self {
            Self::Cursor(c) => Ok(c),
            _ => Err(BindingError::TypeMismatch(
                "call did not produce a cursor".to_string(),
            )),
        }
    }

    pub fn into_batch(self) -> Result<Vec<BatchResult>> {
        match self {
            Self::Batch(b) => Ok(b),
            _ => Err(BindingError::TypeMismatch(
                "call did not produce batch results".to_string(),
            )),
        }
    }
}

impl fmt::Debug for CallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Cursor(_) => f.write_str("Cursor(..)"),
            Self::Batch(b) => f.debug_tuple("Batch").field(b).finish(),
        }
    }
}

/// The command-execution engine as seen by the binding layer.
///
/// Every operation is keyed by a command name and a resolved parameter.
/// Statement parsing, caching, transactions and connections all live behind
/// this boundary; calls block the calling thread and this layer imposes no
/// timeout of its own.
pub trait SqlSession: Send + Sync {
    fn configuration(&self) -> Arc<Configuration>;

    fn insert(&self, command: &str, param: &Param) -> Result<usize>;

    fn update(&self, command: &str, param: &Param) -> Result<usize>;

    fn delete(&self, command: &str, param: &Param) -> Result<usize>;

    fn select_one(&self, command: &str, param: &Param) -> Result<Option<Value>>;

    fn select_list(
        &self,
        command: &str,
        param: &Param,
        bounds: Option<RowBounds>,
    ) -> Result<Vec<Value>>;

    /// Keyed select: one entry per row, keyed by the named field's value.
    fn select_map(
        &self,
        command: &str,
        param: &Param,
        map_key: &str,
        bounds: Option<RowBounds>,
    ) -> Result<Vec<(Value, Value)>>;

    fn select_cursor(
        &self,
        command: &str,
        param: &Param,
        bounds: Option<RowBounds>,
    ) -> Result<Box<dyn Cursor>>;

    /// Streaming select: the handler is invoked once per produced row.
    fn select_with_handler(
        &self,
        command: &str,
        param: &Param,
        bounds: Option<RowBounds>,
        handler: &mut (dyn FnMut(Value) + Send),
    ) -> Result<()>;

    fn flush_statements(&self) -> Result<Vec<BatchResult>>;
}
