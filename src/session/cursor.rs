use crate::core::{Result, Value};

/// A lazy, forward-only sequence of rows bound to an open engine resource.
///
/// Once exhausted or closed a cursor never yields again; it cannot be
/// restarted. The caller owns the lifecycle and must close or fully
/// exhaust it.
pub trait Cursor: Iterator<Item = Result<Value>> + Send {
    fn is_open(&self) -> bool;

    /// True once every row has been fetched.
    fn is_consumed(&self) -> bool;

    /// Index of the last row fetched, -1 before the first fetch.
    fn current_index(&self) -> i64;

    fn close(&mut self);
}

/// Cursor over an already-buffered set of rows.
///
/// This is what an in-memory engine hands back; it still enforces the
/// forward-only, non-restartable discipline of the trait.
pub struct VecCursor {
    rows: std::vec::IntoIter<Value>,
    open: bool,
    consumed: bool,
    index: i64,
}

impl VecCursor {
    pub fn new(rows: Vec<Value>) -> Self {
        Self {
            rows: rows.into_iter(),
            open: true,
            consumed: false,
            index: -1,
        }
    }
}

impl Iterator for VecCursor {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.open || self.consumed {
            return None;
        }
        match self.rows.next() {
            Some(row) => {
                self.index += 1;
                Some(Ok(row))
            }
            None => {
                self.consumed = true;
                None
            }
        }
    }
}

impl Cursor for VecCursor {
    fn is_open(&self) -> bool {
        self.open
    }

    fn is_consumed(&self) -> bool {
        self.consumed
    }

    fn current_index(&self) -> i64 {
        self.index
    }

    fn close(&mut self) {
        self.open = false;
    }
}
