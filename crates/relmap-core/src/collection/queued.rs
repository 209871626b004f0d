use candid::CandidType;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// QueuedListOp
///
/// Positional list operation recorded while a list was uninitialized.
/// Operations replay in order; indices refer to the list state at the
/// time each operation executes.
/// `Insert` clamps out-of-bounds indices to the tail; `Set` and `Remove`
/// require an existing position.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum QueuedListOp<T> {
    Push { value: T },
    Insert { index: usize, value: T },
    Set { index: usize, value: T },
    Remove { index: usize },
    Clear,
}

impl<T> QueuedListOp<T> {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Push { .. } => "push",
            Self::Insert { .. } => "insert",
            Self::Set { .. } => "set",
            Self::Remove { .. } => "remove",
            Self::Clear => "clear",
        }
    }
}

///
/// QueuedOpError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueuedOpError {
    #[error("queued op #{sequence} ({op}) targets position {index}, list length is {len}")]
    PositionOutOfBounds {
        sequence: usize,
        op: &'static str,
        index: usize,
        len: usize,
    },
}

/// Apply queued operations in sequence. Stops at the first failing
/// operation; callers needing all-or-nothing apply to a scratch copy.
pub fn apply_queued<T: Clone>(
    values: &mut Vec<T>,
    ops: &[QueuedListOp<T>],
) -> Result<(), QueuedOpError> {
    for (sequence, op) in ops.iter().enumerate() {
        let out_of_bounds = |index: usize, len: usize| QueuedOpError::PositionOutOfBounds {
            sequence,
            op: op.label(),
            index,
            len,
        };

        match op {
            QueuedListOp::Push { value } => values.push(value.clone()),

            QueuedListOp::Insert { index, value } => {
                let idx = (*index).min(values.len());
                values.insert(idx, value.clone());
            }

            QueuedListOp::Set { index, value } => {
                let len = values.len();
                let slot = values
                    .get_mut(*index)
                    .ok_or_else(|| out_of_bounds(*index, len))?;
                *slot = value.clone();
            }

            QueuedListOp::Remove { index } => {
                if *index >= values.len() {
                    return Err(out_of_bounds(*index, values.len()));
                }
                values.remove(*index);
            }

            QueuedListOp::Clear => values.clear(),
        }
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn queued_ops_are_positional() {
        let mut values = vec![10u8, 20, 30];
        let ops = vec![
            QueuedListOp::Set {
                index: 1,
                value: 99,
            },
            QueuedListOp::Insert {
                index: 1,
                value: 11,
            },
            QueuedListOp::Remove { index: 0 },
            QueuedListOp::Insert {
                index: 50,
                value: 40,
            },
        ];

        apply_queued(&mut values, &ops).expect("queued ops should apply");

        assert_eq!(values, vec![11, 99, 30, 40]);
    }

    #[test]
    fn clear_then_push_rebuilds_contents() {
        let mut values = vec![1u8, 2, 3];
        let ops = vec![QueuedListOp::Clear, QueuedListOp::Push { value: 9 }];

        apply_queued(&mut values, &ops).expect("queued ops should apply");

        assert_eq!(values, vec![9]);
    }

    #[test]
    fn remove_past_end_reports_sequence() {
        let mut values = vec![1u8];
        let ops = vec![
            QueuedListOp::Push { value: 2 },
            QueuedListOp::Remove { index: 5 },
        ];

        let err = apply_queued(&mut values, &ops).expect_err("remove should fail");

        assert_eq!(
            err,
            QueuedOpError::PositionOutOfBounds {
                sequence: 1,
                op: "remove",
                index: 5,
                len: 2,
            }
        );
    }

    #[test]
    fn wire_shape_names_each_op() {
        let op = QueuedListOp::Insert {
            index: 2,
            value: Value::from("x"),
        };
        let json = serde_json::to_string(&op).expect("serialize op");

        assert_eq!(json, r#"{"Insert":{"index":2,"value":{"Text":"x"}}}"#);
    }
}
