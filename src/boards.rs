//! Board CRUD and the assembled board view (columns with their ordered
//! tasks and subtasks).

use rusqlite::params;

use crate::db::BoardDb;
use crate::errors::{BoardError, Result};
use crate::models::{Board, BoardView, ColumnView, TaskDetail};

fn board_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
    })
}

impl BoardDb {
    pub fn create_board(&self, project_id: i64, name: &str) -> Result<Board> {
        // Appending never needs a shift; the new board takes the next slot.
        let position: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM boards WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        let inserted = self.conn.execute(
            "INSERT INTO boards (project_id, name, position)
             SELECT ?1, ?2, ?3 WHERE EXISTS (SELECT 1 FROM projects WHERE id = ?1)",
            params![project_id, name, position],
        )?;
        if inserted == 0 {
            return Err(BoardError::ProjectNotFound { id: project_id });
        }
        self.get_board(self.conn.last_insert_rowid())
    }

    pub fn get_board(&self, id: i64) -> Result<Board> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, project_id, name, position FROM boards WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], board_row)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(BoardError::BoardNotFound { id }),
        }
    }

    pub fn list_boards(&self, project_id: i64) -> Result<Vec<Board>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, name, position FROM boards
             WHERE project_id = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![project_id], board_row)?;
        let mut boards = Vec::new();
        for row in rows {
            boards.push(row?);
        }
        Ok(boards)
    }

    pub fn delete_board(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM boards WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(BoardError::BoardNotFound { id });
        }
        Ok(())
    }

    /// The full board read: columns in order, each with its tasks in order,
    /// each task with its subtasks in order.
    pub fn get_board_view(&self, id: i64) -> Result<BoardView> {
        let board = self.get_board(id)?;
        let mut columns = Vec::new();
        for column in self.list_columns(board.id)? {
            let mut tasks = Vec::new();
            for task in self.list_tasks(column.id)? {
                let subtasks = self.list_subtasks(task.id)?;
                tasks.push(TaskDetail { task, subtasks });
            }
            columns.push(ColumnView { column, tasks });
        }
        Ok(BoardView { board, columns })
    }
}
