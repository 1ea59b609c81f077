use crate::logging_driver::{DriverOp, LoggingDriver};
use std::sync::{Arc, Mutex};
use tether_core::{
    driver::{Operation, Response},
    stmt::Statement,
};

/// A wrapper around the operations log that provides a clean API for tests
#[derive(Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(&op.operation))
            .count()
    }

    /// Count statements of the given kind (`select`, `insert`, `update`,
    /// `delete`) against `table`
    pub fn statements(&self, kind: &str, table: &str) -> usize {
        self.count(|op| match op.statement() {
            Some((stmt, _)) => stmt.kind() == kind && stmt.table() == table,
            None => false,
        })
    }

    pub fn inserts(&self, table: &str) -> usize {
        self.statements("insert", table)
    }

    pub fn updates(&self, table: &str) -> usize {
        self.statements("update", table)
    }

    pub fn deletes(&self, table: &str) -> usize {
        self.statements("delete", table)
    }

    pub fn selects(&self, table: &str) -> usize {
        self.statements("select", table)
    }

    /// Logged statements, in execution order
    pub fn statement_list(&self) -> Vec<Statement> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| op.operation.statement().map(|(stmt, _)| stmt.clone()))
            .collect()
    }

    /// Clear the log
    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first operation from the log
    /// Returns None if the log is empty
    pub fn pop(&mut self) -> Option<(Operation, Response)> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            let driver_op = ops.remove(0);
            Some((driver_op.operation, driver_op.response))
        }
    }
}

impl From<&LoggingDriver> for ExecLog {
    fn from(driver: &LoggingDriver) -> Self {
        Self::new(driver.ops_log_handle())
    }
}
