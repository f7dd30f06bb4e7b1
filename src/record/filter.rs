use std::cmp::Ordering;

use crate::core::{CoreRecord, Value};

/// Comparison operator for a single field condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone)]
enum Condition {
    Status(String),
    Field(String, Op, Value),
}

/// Conjunctive filter over core records.
///
/// All conditions must hold for a record to match. A condition on a field
/// the record does not carry compares against NULL (and therefore fails
/// for every operator except `Ne`); a condition whose types cannot be
/// compared excludes the record rather than erroring.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    conditions: Vec<Condition>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact lifecycle status.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.conditions.push(Condition::Status(status.into()));
        self
    }

    /// Require `field <op> value`.
    pub fn field(mut self, name: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.conditions
            .push(Condition::Field(name.into(), op, value.into()));
        self
    }

    /// Shorthand for the common equality case.
    pub fn eq(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.field(name, Op::Eq, value)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &CoreRecord) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Status(status) => record.status == *status,
            Condition::Field(name, op, expected) => {
                let actual = record.field(name).unwrap_or(&Value::Null);
                match actual.compare(expected) {
                    Ok(ordering) => op_holds(*op, ordering, actual, expected),
                    Err(_) => false,
                }
            }
        })
    }
}

fn op_holds(op: Op, ordering: Ordering, actual: &Value, expected: &Value) -> bool {
    // NULL never equals anything, including NULL, under filter semantics;
    // Value::compare treats NULLs as orderable only for sorting.
    let either_null = actual.is_null() || expected.is_null();
    match op {
        Op::Eq => !either_null && ordering == Ordering::Equal,
        Op::Ne => either_null || ordering != Ordering::Equal,
        Op::Gt => !either_null && ordering == Ordering::Greater,
        Op::Gte => !either_null && ordering != Ordering::Less,
        Op::Lt => !either_null && ordering == Ordering::Less,
        Op::Lte => !either_null && ordering != Ordering::Greater,
    }
}
