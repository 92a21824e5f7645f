//! Position ledger: the dense `0..N-1` ordering of sibling rows.
//!
//! Each [`Scope`] names one parent-keyed ordering (tasks in a column,
//! columns on a board, subtasks under a task). The shift primitives here
//! open and close single-slot gaps; they are non-idempotent and must run
//! exactly once per logical event, inside the caller's transaction.
//! Nothing outside the create/delete/reorder/move operations may write
//! `position`.

use rusqlite::{Connection, params};

use crate::errors::{BoardError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Scope {
    /// Tasks within one column.
    ColumnTasks(i64),
    /// Columns within one board.
    BoardColumns(i64),
    /// Subtasks within one task.
    TaskSubtasks(i64),
}

impl Scope {
    fn table(&self) -> &'static str {
        match self {
            Self::ColumnTasks(_) => "tasks",
            Self::BoardColumns(_) => "columns",
            Self::TaskSubtasks(_) => "subtasks",
        }
    }

    fn parent_column(&self) -> &'static str {
        match self {
            Self::ColumnTasks(_) => "column_id",
            Self::BoardColumns(_) => "board_id",
            Self::TaskSubtasks(_) => "task_id",
        }
    }

    fn parent_id(&self) -> i64 {
        match self {
            Self::ColumnTasks(id) | Self::BoardColumns(id) | Self::TaskSubtasks(id) => *id,
        }
    }
}

/// Close the gap left at `after` by decrementing every later position.
/// Returns the number of rows shifted.
pub(crate) fn shift_down(conn: &Connection, scope: Scope, after: i64) -> Result<usize> {
    let sql = format!(
        "UPDATE {} SET position = position - 1 WHERE {} = ?1 AND position > ?2",
        scope.table(),
        scope.parent_column(),
    );
    Ok(conn.execute(&sql, params![scope.parent_id(), after])?)
}

/// Open a gap at `from` by incrementing every position at or after it.
/// Returns the number of rows shifted.
pub(crate) fn shift_up(conn: &Connection, scope: Scope, from: i64) -> Result<usize> {
    let sql = format!(
        "UPDATE {} SET position = position + 1 WHERE {} = ?1 AND position >= ?2",
        scope.table(),
        scope.parent_column(),
    );
    Ok(conn.execute(&sql, params![scope.parent_id(), from])?)
}

/// Number of current members of the scope.
pub(crate) fn count(conn: &Connection, scope: Scope) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?1",
        scope.table(),
        scope.parent_column(),
    );
    Ok(conn.query_row(&sql, params![scope.parent_id()], |row| row.get(0))?)
}

/// Member ids of the scope, ordered by position.
pub(crate) fn ordered_ids(conn: &Connection, scope: Scope) -> Result<Vec<i64>> {
    let sql = format!(
        "SELECT id FROM {} WHERE {} = ?1 ORDER BY position",
        scope.table(),
        scope.parent_column(),
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![scope.parent_id()], |row| row.get(0))?;
    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

/// Check that `requested` is an exact permutation of `current` before a
/// reorder is persisted. Partial lists, unknown ids and duplicates are all
/// rejected; trusting them would leave the scope non-dense.
pub(crate) fn validate_permutation(current: &[i64], requested: &[i64]) -> Result<()> {
    if requested.len() != current.len() {
        return Err(BoardError::InvalidOrder {
            message: format!("expected {} ids, got {}", current.len(), requested.len()),
        });
    }
    let mut expected: Vec<i64> = current.to_vec();
    let mut got: Vec<i64> = requested.to_vec();
    expected.sort_unstable();
    got.sort_unstable();
    if expected != got {
        return Err(BoardError::InvalidOrder {
            message: "id list is not a permutation of the current members".to_string(),
        });
    }
    Ok(())
}

/// Rewrite the scope's positions to match the order of `ids` exactly
/// (index in the slice becomes the position). The caller has already
/// validated that `ids` is a permutation of the scope membership.
pub(crate) fn write_positions(conn: &Connection, scope: Scope, ids: &[i64]) -> Result<()> {
    let sql = format!(
        "UPDATE {} SET position = ?1 WHERE id = ?2 AND {} = ?3",
        scope.table(),
        scope.parent_column(),
    );
    let mut stmt = conn.prepare(&sql)?;
    for (index, id) in ids.iter().enumerate() {
        stmt.execute(params![index as i64, id, scope.parent_id()])?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn positions(conn: &Connection, scope: Scope) -> Vec<i64> {
    let sql = format!(
        "SELECT position FROM {} WHERE {} = ?1 ORDER BY position",
        scope.table(),
        scope.parent_column(),
    );
    let mut stmt = conn.prepare(&sql).unwrap();
    stmt.query_map(params![scope.parent_id()], |row| row.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect()
}

/// Test helper: the scope's positions must be exactly `0..N-1`.
#[cfg(test)]
pub(crate) fn assert_dense(conn: &Connection, scope: Scope) {
    let found = positions(conn, scope);
    let expected: Vec<i64> = (0..found.len() as i64).collect();
    assert_eq!(found, expected, "scope {:?} is not dense", scope);
}
