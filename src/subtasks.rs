//! Subtask CRUD and repositioning within a parent task.

use rusqlite::params;

use crate::db::BoardDb;
use crate::errors::{BoardError, Result};
use crate::ledger::{self, Scope};
use crate::models::{Subtask, SubtaskPatch};

fn subtask_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subtask> {
    Ok(Subtask {
        id: row.get(0)?,
        task_id: row.get(1)?,
        title: row.get(2)?,
        is_completed: row.get(3)?,
        position: row.get(4)?,
    })
}

const SUBTASK_COLUMNS: &str = "id, task_id, title, is_completed, position";

impl BoardDb {
    /// Append a subtask at the end of the parent task's checklist.
    pub fn create_subtask(&self, task_id: i64, title: &str) -> Result<Subtask> {
        self.get_task(task_id)?;
        let position = ledger::count(&self.conn, Scope::TaskSubtasks(task_id))?;
        self.conn.execute(
            "INSERT INTO subtasks (task_id, title, position) VALUES (?1, ?2, ?3)",
            params![task_id, title, position],
        )?;
        self.get_subtask(self.conn.last_insert_rowid())
    }

    pub fn get_subtask(&self, id: i64) -> Result<Subtask> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM subtasks WHERE id = ?1",
            SUBTASK_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![id], subtask_row)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(BoardError::SubtaskNotFound { id }),
        }
    }

    pub fn list_subtasks(&self, task_id: i64) -> Result<Vec<Subtask>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM subtasks WHERE task_id = ?1 ORDER BY position",
            SUBTASK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![task_id], subtask_row)?;
        let mut subtasks = Vec::new();
        for row in rows {
            subtasks.push(row?);
        }
        Ok(subtasks)
    }

    pub fn update_subtask(&self, id: i64, patch: &SubtaskPatch) -> Result<Subtask> {
        let tx = self.conn.unchecked_transaction()?;
        if let Some(title) = &patch.title {
            tx.execute(
                "UPDATE subtasks SET title = ?1 WHERE id = ?2",
                params![title, id],
            )?;
        }
        if let Some(done) = patch.is_completed {
            tx.execute(
                "UPDATE subtasks SET is_completed = ?1 WHERE id = ?2",
                params![done, id],
            )?;
        }
        tx.commit()?;
        self.get_subtask(id)
    }

    /// Delete a subtask and close the gap in the checklist.
    pub fn delete_subtask(&self, id: i64) -> Result<Subtask> {
        let subtask = self.get_subtask(id)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM subtasks WHERE id = ?1", params![id])?;
        ledger::shift_down(&tx, Scope::TaskSubtasks(subtask.task_id), subtask.position)?;
        tx.commit()?;
        Ok(subtask)
    }

    /// Persist a full new ordering for the task's subtasks. `ordered_ids`
    /// must list every subtask of the task exactly once.
    pub fn reorder_subtasks(&self, task_id: i64, ordered_ids: &[i64]) -> Result<Vec<Subtask>> {
        self.get_task(task_id)?;
        let scope = Scope::TaskSubtasks(task_id);
        let current = ledger::ordered_ids(&self.conn, scope)?;
        ledger::validate_permutation(&current, ordered_ids)?;

        let tx = self.conn.unchecked_transaction()?;
        ledger::write_positions(&tx, scope, ordered_ids)?;
        tx.commit()?;
        self.list_subtasks(task_id)
    }
}
