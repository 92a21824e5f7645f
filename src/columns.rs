//! Column CRUD and repositioning within a board.

use rusqlite::params;

use crate::db::BoardDb;
use crate::errors::{BoardError, Result};
use crate::ledger::{self, Scope};
use crate::models::{Column, ColumnPatch, NewColumn};

const COLUMN_COLUMNS: &str =
    "id, board_id, name, position, color, wip_limit, is_collapsed, is_done_column, is_blocked_column";

fn column_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Column> {
    Ok(Column {
        id: row.get(0)?,
        board_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
        color: row.get(4)?,
        wip_limit: row.get(5)?,
        is_collapsed: row.get(6)?,
        is_done_column: row.get(7)?,
        is_blocked_column: row.get(8)?,
    })
}

impl BoardDb {
    /// Append a column at the end of the board's ordering.
    pub fn create_column(&self, board_id: i64, new: &NewColumn) -> Result<Column> {
        self.get_board(board_id)?;
        let position = ledger::count(&self.conn, Scope::BoardColumns(board_id))?;
        self.conn.execute(
            "INSERT INTO columns (board_id, name, position, color, wip_limit, is_done_column, is_blocked_column)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                board_id,
                new.name,
                position,
                new.color,
                new.wip_limit,
                new.is_done_column,
                new.is_blocked_column,
            ],
        )?;
        self.get_column(self.conn.last_insert_rowid())
    }

    pub fn get_column(&self, id: i64) -> Result<Column> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM columns WHERE id = ?1",
            COLUMN_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![id], column_row)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(BoardError::ColumnNotFound { id }),
        }
    }

    pub fn list_columns(&self, board_id: i64) -> Result<Vec<Column>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM columns WHERE board_id = ?1 ORDER BY position",
            COLUMN_COLUMNS
        ))?;
        let rows = stmt.query_map(params![board_id], column_row)?;
        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    /// Plain field edits; the column's `position` is owned by the
    /// repositioning operations and is not patchable here.
    pub fn update_column(&self, id: i64, patch: &ColumnPatch) -> Result<Column> {
        let tx = self.conn.unchecked_transaction()?;
        if let Some(name) = &patch.name {
            tx.execute(
                "UPDATE columns SET name = ?1 WHERE id = ?2",
                params![name, id],
            )?;
        }
        if let Some(color) = &patch.color {
            tx.execute(
                "UPDATE columns SET color = ?1 WHERE id = ?2",
                params![color, id],
            )?;
        }
        if let Some(wip_limit) = patch.wip_limit {
            tx.execute(
                "UPDATE columns SET wip_limit = ?1 WHERE id = ?2",
                params![wip_limit, id],
            )?;
        }
        if let Some(is_collapsed) = patch.is_collapsed {
            tx.execute(
                "UPDATE columns SET is_collapsed = ?1 WHERE id = ?2",
                params![is_collapsed, id],
            )?;
        }
        if let Some(is_done) = patch.is_done_column {
            tx.execute(
                "UPDATE columns SET is_done_column = ?1 WHERE id = ?2",
                params![is_done, id],
            )?;
        }
        if let Some(is_blocked) = patch.is_blocked_column {
            tx.execute(
                "UPDATE columns SET is_blocked_column = ?1 WHERE id = ?2",
                params![is_blocked, id],
            )?;
        }
        tx.commit()?;
        self.get_column(id)
    }

    /// Delete a column (its tasks cascade away) and close the gap in the
    /// board's column ordering.
    pub fn delete_column(&self, id: i64) -> Result<Column> {
        let column = self.get_column(id)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM columns WHERE id = ?1", params![id])?;
        ledger::shift_down(&tx, Scope::BoardColumns(column.board_id), column.position)?;
        tx.commit()?;
        tracing::debug!(column = id, board = column.board_id, "deleted column");
        Ok(column)
    }

    /// Persist a full new ordering for the board's columns. `ordered_ids`
    /// must list every column of the board exactly once.
    pub fn reorder_columns(&self, board_id: i64, ordered_ids: &[i64]) -> Result<Vec<Column>> {
        self.get_board(board_id)?;
        let scope = Scope::BoardColumns(board_id);
        let current = ledger::ordered_ids(&self.conn, scope)?;
        ledger::validate_permutation(&current, ordered_ids)?;

        let tx = self.conn.unchecked_transaction()?;
        ledger::write_positions(&tx, scope, ordered_ids)?;
        tx.commit()?;
        tracing::debug!(board = board_id, count = ordered_ids.len(), "reordered columns");
        self.list_columns(board_id)
    }
}
