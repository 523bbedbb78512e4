use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::{Result, RowBounds, Value};
use crate::reflection::Param;
use crate::session::cursor::{Cursor, VecCursor};
use crate::session::{BatchResult, Configuration, SqlSession};

/// One engine call observed by a [`MemorySession`], kept for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub operation: String,
    pub command: String,
    pub param: Param,
}

/// A seedable in-memory engine answering the [`SqlSession`] surface.
///
/// Commands are bound to canned rows and row counts instead of SQL; this is
/// enough to drive the binding layer end-to-end in tests and demos. It is
/// not a SQL executor.
pub struct MemorySession {
    config: Arc<Configuration>,
    rows: RwLock<HashMap<String, Vec<Value>>>,
    row_counts: RwLock<HashMap<String, usize>>,
    pending: RwLock<Vec<BatchResult>>,
    calls: RwLock<Vec<CallRecord>>,
}

impl MemorySession {
    pub fn new(config: Arc<Configuration>) -> Self {
        Self {
            config,
            rows: RwLock::new(HashMap::new()),
            row_counts: RwLock::new(HashMap::new()),
            pending: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Bind a select-style command to the rows it produces.
    pub fn seed_rows(&self, command: &str, rows: Vec<Value>) {
        if let Ok(mut guard) = self.rows.write() {
            guard.insert(command.to_string(), rows);
        }
    }

    /// Bind a mutation command to the row count it reports. Unseeded
    /// mutations report 1.
    pub fn seed_row_count(&self, command: &str, count: usize) {
        if let Ok(mut guard) = self.row_counts.write() {
            guard.insert(command.to_string(), count);
        }
    }

    /// Every engine call made so far, in order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// The most recent call for a command, if any.
    pub fn last_call(&self, command: &str) -> Option<CallRecord> {
        self.calls
            .read()
            .ok()
            .and_then(|calls| calls.iter().rev().find(|c| c.command == command).cloned())
    }

    fn record(&self, operation: &str, command: &str, param: &Param) -> Result<()> {
        self.calls.write()?.push(CallRecord {
            operation: operation.to_string(),
            command: command.to_string(),
            param: param.clone(),
        });
        Ok(())
    }

    fn mutate(&self, operation: &str, command: &str, param: &Param) -> Result<usize> {
        self.record(operation, command, param)?;
        let count = self
            .row_counts
            .read()?
            .get(command)
            .copied()
            .unwrap_or(1);
        self.pending
            .write()?
            .push(BatchResult::new(command, vec![count]));
        Ok(count)
    }

    fn bounded_rows(&self, command: &str, bounds: Option<RowBounds>) -> Result<Vec<Value>> {
        let rows = self
            .rows
            .read()?
            .get(command)
            .cloned()
            .unwrap_or_default();
        let bounds = bounds.unwrap_or_default();
        Ok(rows
            .into_iter()
            .skip(bounds.offset)
            .take(bounds.limit)
            .collect())
    }
}

impl SqlSession for MemorySession {
    fn configuration(&self) -> Arc<Configuration> {
        Arc::clone(&self.config)
    }

    fn insert(&self, command: &str, param: &Param) -> Result<usize> {
        self.mutate("insert", command, param)
    }

    fn update(&self, command: &str, param: &Param) -> Result<usize> {
        self.mutate("update", command, param)
    }

    fn delete(&self, command: &str, param: &Param) -> Result<usize> {
        self.mutate("delete", command, param)
    }

    fn select_one(&self, command: &str, param: &Param) -> Result<Option<Value>> {
        self.record("select_one", command, param)?;
        Ok(self.bounded_rows(command, None)?.into_iter().next())
    }

    fn select_list(
        &self,
        command: &str,
        param: &Param,
        bounds: Option<RowBounds>,
    ) -> Result<Vec<Value>> {
        self.record("select_list", command, param)?;
        self.bounded_rows(command, bounds)
    }

    fn select_map(
        &self,
        command: &str,
        param: &Param,
        map_key: &str,
        bounds: Option<RowBounds>,
    ) -> Result<Vec<(Value, Value)>> {
        self.record("select_map", command, param)?;
        let rows = self.bounded_rows(command, bounds)?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let key = row.field(map_key).cloned().unwrap_or(Value::Null);
                (key, row)
            })
            .collect())
    }

    fn select_cursor(
        &self,
        command: &str,
        param: &Param,
        bounds: Option<RowBounds>,
    ) -> Result<Box<dyn Cursor>> {
        self.record("select_cursor", command, param)?;
        Ok(Box::new(VecCursor::new(self.bounded_rows(command, bounds)?)))
    }

    fn select_with_handler(
        &self,
        command: &str,
        param: &Param,
        bounds: Option<RowBounds>,
        handler: &mut (dyn FnMut(Value) + Send),
    ) -> Result<()> {
        self.record("select", command, param)?;
        for row in self.bounded_rows(command, bounds)? {
            handler(row);
        }
        Ok(())
    }

    fn flush_statements(&self) -> Result<Vec<BatchResult>> {
        let mut pending = self.pending.write()?;
        Ok(std::mem::take(&mut *pending))
    }
}
