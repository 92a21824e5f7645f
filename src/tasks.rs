//! Task CRUD plus the two repositioning operations with real teeth:
//! `reorder_tasks` (bulk positional rewrite within one column) and
//! `move_task` (cross-column relocation with derived side effects).

use rusqlite::{Connection, params};

use crate::db::BoardDb;
use crate::errors::{BoardError, Result};
use crate::ledger::{self, Scope};
use crate::models::{NewTask, Priority, Resolution, Task, TaskDetail, TaskPatch, TaskType};
use crate::projects::identifier_prefix;

const TASK_COLUMNS: &str = "id, project_id, column_id, identifier, title, description, priority, \
     task_type, position, due_date, completed_at, resolution, estimate_points, \
     is_blocked, blocked_reason, created_at, updated_at";

/// Intermediate row struct for reading tasks from SQLite before converting
/// priority / task_type / resolution strings into typed values.
struct TaskRow {
    id: i64,
    project_id: i64,
    column_id: i64,
    identifier: String,
    title: String,
    description: Option<String>,
    priority: String,
    task_type: String,
    position: i64,
    due_date: Option<String>,
    completed_at: Option<String>,
    resolution: Option<String>,
    estimate_points: Option<i64>,
    is_blocked: bool,
    blocked_reason: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(BoardError::InvalidData)?;
        let task_type = self
            .task_type
            .parse::<TaskType>()
            .map_err(BoardError::InvalidData)?;
        let resolution = self
            .resolution
            .map(|r| r.parse::<Resolution>())
            .transpose()
            .map_err(BoardError::InvalidData)?;
        Ok(Task {
            id: self.id,
            project_id: self.project_id,
            column_id: self.column_id,
            identifier: self.identifier,
            title: self.title,
            description: self.description,
            priority,
            task_type,
            position: self.position,
            due_date: self.due_date,
            completed_at: self.completed_at,
            resolution,
            estimate_points: self.estimate_points,
            is_blocked: self.is_blocked,
            blocked_reason: self.blocked_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        project_id: row.get(1)?,
        column_id: row.get(2)?,
        identifier: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        priority: row.get(6)?,
        task_type: row.get(7)?,
        position: row.get(8)?,
        due_date: row.get(9)?,
        completed_at: row.get(10)?,
        resolution: row.get(11)?,
        estimate_points: row.get(12)?,
        is_blocked: row.get(13)?,
        blocked_reason: row.get(14)?,
        created_at: row.get(15)?,
        updated_at: row.get(16)?,
    })
}

/// Pre-move state read once at the start of the transaction; every shift
/// and derived side effect is computed against this snapshot, never against
/// rows mutated mid-flight.
struct MoveSnapshot {
    column_id: i64,
    position: i64,
    completed_at: Option<String>,
    resolution: Option<String>,
    is_blocked: bool,
    blocked_reason: Option<String>,
}

/// Execute the move inside the caller's transaction. Ordering matters:
/// close the source gap before opening the destination gap, and never let
/// the moved task's own row participate in either shift.
fn apply_move(
    conn: &Connection,
    id: i64,
    destination_column_id: i64,
    requested_position: i64,
) -> Result<()> {
    let snapshot = {
        let mut stmt = conn.prepare(
            "SELECT column_id, position, completed_at, resolution, is_blocked, blocked_reason
             FROM tasks WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], |row| {
            Ok(MoveSnapshot {
                column_id: row.get(0)?,
                position: row.get(1)?,
                completed_at: row.get(2)?,
                resolution: row.get(3)?,
                is_blocked: row.get(4)?,
                blocked_reason: row.get(5)?,
            })
        })?;
        match rows.next() {
            Some(row) => row?,
            None => return Err(BoardError::TaskNotFound { id }),
        }
    };

    let (dest_is_done, dest_is_blocked): (bool, bool) = conn
        .query_row(
            "SELECT is_done_column, is_blocked_column FROM columns WHERE id = ?1",
            params![destination_column_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => BoardError::ColumnNotFound {
                id: destination_column_id,
            },
            other => BoardError::Database(other),
        })?;

    let position = if snapshot.column_id == destination_column_id {
        // Same-scope move: one ranged shift over the interval between the
        // old and new slots, computed from the snapshot. A remove-then-insert
        // double pass would let the task's own row distort both shifts.
        let len = ledger::count(conn, Scope::ColumnTasks(destination_column_id))?;
        let target = requested_position.clamp(0, len - 1);
        if target > snapshot.position {
            conn.execute(
                "UPDATE tasks SET position = position - 1
                 WHERE column_id = ?1 AND position > ?2 AND position <= ?3",
                params![destination_column_id, snapshot.position, target],
            )?;
        } else if target < snapshot.position {
            conn.execute(
                "UPDATE tasks SET position = position + 1
                 WHERE column_id = ?1 AND position >= ?3 AND position < ?2",
                params![destination_column_id, snapshot.position, target],
            )?;
        }
        target
    } else {
        ledger::shift_down(conn, Scope::ColumnTasks(snapshot.column_id), snapshot.position)?;
        // The task is not yet a destination member, so the append slot is
        // the current count and no self-exclusion is needed.
        let len = ledger::count(conn, Scope::ColumnTasks(destination_column_id))?;
        let target = requested_position.clamp(0, len);
        ledger::shift_up(conn, Scope::ColumnTasks(destination_column_id), target)?;
        target
    };

    // Derived side effects, judged against the pre-move snapshot.
    let (completed_at, resolution) = if dest_is_done && snapshot.completed_at.is_none() {
        (
            Some(chrono::Utc::now().to_rfc3339()),
            Some(Resolution::Done.as_str().to_string()),
        )
    } else if !dest_is_done && snapshot.completed_at.is_some() {
        (None, None)
    } else {
        (snapshot.completed_at, snapshot.resolution)
    };
    let (is_blocked, blocked_reason) = if dest_is_blocked {
        (true, snapshot.blocked_reason)
    } else if snapshot.is_blocked {
        (false, None)
    } else {
        (false, snapshot.blocked_reason)
    };

    conn.execute(
        "UPDATE tasks SET column_id = ?1, position = ?2, completed_at = ?3, resolution = ?4,
         is_blocked = ?5, blocked_reason = ?6, updated_at = datetime('now') WHERE id = ?7",
        params![
            destination_column_id,
            position,
            completed_at,
            resolution,
            is_blocked,
            blocked_reason,
            id,
        ],
    )?;
    Ok(())
}

impl BoardDb {
    /// Create a task at the end of its column, deriving the project through
    /// the column's board and minting the next project-scoped identifier
    /// (`PREFIX-N`) from an atomic per-project counter.
    pub fn create_task(&self, new: &NewTask) -> Result<Task> {
        let tx = self.conn.unchecked_transaction()?;

        let board_id: i64 = tx
            .query_row(
                "SELECT board_id FROM columns WHERE id = ?1",
                params![new.column_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => BoardError::ColumnNotFound {
                    id: new.column_id,
                },
                other => BoardError::Database(other),
            })?;
        let project_id: i64 = tx
            .query_row(
                "SELECT project_id FROM boards WHERE id = ?1",
                params![board_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => BoardError::BoardNotFound { id: board_id },
                other => BoardError::Database(other),
            })?;

        // Atomic increment-and-read; count-then-use would hand the same
        // number to two concurrent creations.
        tx.execute(
            "UPDATE projects SET task_seq = task_seq + 1, updated_at = datetime('now')
             WHERE id = ?1",
            params![project_id],
        )?;
        let (slug, seq): (String, i64) = tx.query_row(
            "SELECT slug, task_seq FROM projects WHERE id = ?1",
            params![project_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let identifier = format!("{}-{}", identifier_prefix(&slug), seq);

        let position = ledger::count(&tx, Scope::ColumnTasks(new.column_id))?;
        tx.execute(
            "INSERT INTO tasks (project_id, column_id, identifier, title, description,
             priority, task_type, position, due_date, estimate_points)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                project_id,
                new.column_id,
                identifier,
                new.title,
                new.description,
                new.priority.clone().unwrap_or(Priority::Medium).as_str(),
                new.task_type.clone().unwrap_or(TaskType::Task).as_str(),
                position,
                new.due_date,
                new.estimate_points,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(task = id, column = new.column_id, %identifier, "created task");
        self.get_task(id)
    }

    pub fn get_task(&self, id: i64) -> Result<Task> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS))?;
        let mut rows = stmt.query_map(params![id], task_row)?;
        match rows.next() {
            Some(row) => row?.into_task(),
            None => Err(BoardError::TaskNotFound { id }),
        }
    }

    /// Task plus its ordered subtasks.
    pub fn get_task_detail(&self, id: i64) -> Result<TaskDetail> {
        let task = self.get_task(id)?;
        let subtasks = self.list_subtasks(task.id)?;
        Ok(TaskDetail { task, subtasks })
    }

    pub fn list_tasks(&self, column_id: i64) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE column_id = ?1 ORDER BY position",
            TASK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![column_id], task_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.into_task()?);
        }
        Ok(tasks)
    }

    /// Plain field edits. `position`, `column_id` and `completed_at` are
    /// not patchable; a column change must go through [`BoardDb::move_task`].
    pub fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task> {
        let tx = self.conn.unchecked_transaction()?;
        if let Some(title) = &patch.title {
            tx.execute(
                "UPDATE tasks SET title = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![title, id],
            )?;
        }
        if let Some(description) = &patch.description {
            tx.execute(
                "UPDATE tasks SET description = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![description, id],
            )?;
        }
        if let Some(priority) = &patch.priority {
            tx.execute(
                "UPDATE tasks SET priority = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![priority.as_str(), id],
            )?;
        }
        if let Some(task_type) = &patch.task_type {
            tx.execute(
                "UPDATE tasks SET task_type = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![task_type.as_str(), id],
            )?;
        }
        if let Some(due_date) = &patch.due_date {
            tx.execute(
                "UPDATE tasks SET due_date = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![due_date, id],
            )?;
        }
        if let Some(points) = patch.estimate_points {
            tx.execute(
                "UPDATE tasks SET estimate_points = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![points, id],
            )?;
        }
        if let Some(is_blocked) = patch.is_blocked {
            tx.execute(
                "UPDATE tasks SET is_blocked = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![is_blocked, id],
            )?;
        }
        if let Some(reason) = &patch.blocked_reason {
            tx.execute(
                "UPDATE tasks SET blocked_reason = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![reason, id],
            )?;
        }
        if let Some(resolution) = &patch.resolution {
            tx.execute(
                "UPDATE tasks SET resolution = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![resolution.as_str(), id],
            )?;
        }
        tx.commit()?;
        self.get_task(id)
    }

    /// Delete a task and close the gap it leaves in its column.
    pub fn delete_task(&self, id: i64) -> Result<Task> {
        let task = self.get_task(id)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        ledger::shift_down(&tx, Scope::ColumnTasks(task.column_id), task.position)?;
        tx.commit()?;
        tracing::debug!(task = id, column = task.column_id, "deleted task");
        Ok(task)
    }

    /// Persist a full new ordering for one column's tasks. `ordered_ids`
    /// must list every task of the column exactly once; anything else is
    /// rejected before a single position is written.
    pub fn reorder_tasks(&self, column_id: i64, ordered_ids: &[i64]) -> Result<Vec<Task>> {
        self.get_column(column_id)?;
        let scope = Scope::ColumnTasks(column_id);
        let current = ledger::ordered_ids(&self.conn, scope)?;
        ledger::validate_permutation(&current, ordered_ids)?;

        let tx = self.conn.unchecked_transaction()?;
        ledger::write_positions(&tx, scope, ordered_ids)?;
        tx.commit()?;
        tracing::debug!(column = column_id, count = ordered_ids.len(), "reordered tasks");
        self.list_tasks(column_id)
    }

    /// Move a task to `destination_column_id` at `position` (clamped to the
    /// destination's valid range), shifting neighbours in both columns and
    /// deriving `completed_at` / `resolution` / `is_blocked` from the
    /// destination column's flags. All-or-nothing: a failure at any step
    /// leaves both columns exactly as they were.
    pub fn move_task(&self, id: i64, destination_column_id: i64, position: i64) -> Result<Task> {
        tracing::debug!(
            task = id,
            destination = destination_column_id,
            position,
            "moving task"
        );
        let tx = self.conn.unchecked_transaction()?;
        apply_move(&tx, id, destination_column_id, position)?;
        tx.commit()?;
        self.get_task(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::assert_dense;
    use crate::models::{NewColumn, NewProject};

    struct Fixture {
        db: BoardDb,
        board_id: i64,
        backlog: i64,
        todo: i64,
        done: i64,
    }

    fn fixture() -> Fixture {
        let db = BoardDb::new_in_memory().unwrap();
        let project = db
            .create_project(&NewProject {
                name: "My First Project".into(),
                description: None,
                color: None,
            })
            .unwrap();
        let board_id = db.list_boards(project.id).unwrap()[0].id;
        let columns = db.list_columns(board_id).unwrap();
        Fixture {
            backlog: columns[0].id,
            todo: columns[1].id,
            done: columns[4].id,
            board_id,
            db,
        }
    }

    fn add_task(db: &BoardDb, column_id: i64, title: &str) -> Task {
        db.create_task(&NewTask {
            column_id,
            title: title.into(),
            description: None,
            priority: None,
            task_type: None,
            due_date: None,
            estimate_points: None,
        })
        .unwrap()
    }

    #[test]
    fn test_create_appends_and_numbers_identifiers() {
        let f = fixture();
        for i in 0..5i64 {
            let task = add_task(&f.db, f.backlog, &format!("task {}", i));
            assert_eq!(task.position, i);
            assert_eq!(task.identifier, format!("MYF-{}", i + 1));
            assert_eq!(task.priority, Priority::Medium);
            assert_eq!(task.task_type, TaskType::Task);
        }
        // The sequence is project-wide, not per-column.
        let sixth = add_task(&f.db, f.todo, "elsewhere");
        assert_eq!(sixth.identifier, "MYF-6");
        assert_eq!(sixth.position, 0);
        assert_dense(&f.db.conn, Scope::ColumnTasks(f.backlog));
    }

    #[test]
    fn test_create_in_missing_column_is_not_found() {
        let f = fixture();
        let err = f
            .db
            .create_task(&NewTask {
                column_id: 999,
                title: "orphan".into(),
                description: None,
                priority: None,
                task_type: None,
                due_date: None,
                estimate_points: None,
            })
            .unwrap_err();
        assert!(matches!(err, BoardError::ColumnNotFound { id: 999 }));
        // The aborted creation must not have burned a sequence number.
        assert_eq!(add_task(&f.db, f.backlog, "first").identifier, "MYF-1");
    }

    #[test]
    fn test_delete_compacts_only_later_positions() {
        let f = fixture();
        let tasks: Vec<Task> = (0..5)
            .map(|i| add_task(&f.db, f.backlog, &format!("t{}", i)))
            .collect();

        f.db.delete_task(tasks[2].id).unwrap();

        let remaining = f.db.list_tasks(f.backlog).unwrap();
        let ids: Vec<i64> = remaining.iter().map(|t| t.id).collect();
        assert_eq!(
            ids,
            vec![tasks[0].id, tasks[1].id, tasks[3].id, tasks[4].id]
        );
        let positions: Vec<i64> = remaining.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert!(matches!(
            f.db.delete_task(tasks[2].id),
            Err(BoardError::TaskNotFound { .. })
        ));
    }

    #[test]
    fn test_move_between_columns() {
        let f = fixture();
        let t0 = add_task(&f.db, f.backlog, "t0");
        let t1 = add_task(&f.db, f.backlog, "t1");
        let t2 = add_task(&f.db, f.backlog, "t2");

        let moved = f.db.move_task(t1.id, f.todo, 0).unwrap();
        assert_eq!(moved.column_id, f.todo);
        assert_eq!(moved.position, 0);

        let source: Vec<(i64, i64)> = f
            .db
            .list_tasks(f.backlog)
            .unwrap()
            .iter()
            .map(|t| (t.id, t.position))
            .collect();
        assert_eq!(source, vec![(t0.id, 0), (t2.id, 1)]);
        assert_eq!(f.db.list_tasks(f.todo).unwrap()[0].id, t1.id);
        assert_dense(&f.db.conn, Scope::ColumnTasks(f.backlog));
        assert_dense(&f.db.conn, Scope::ColumnTasks(f.todo));
    }

    #[test]
    fn test_move_lands_between_existing_tasks() {
        let f = fixture();
        let a = add_task(&f.db, f.todo, "a");
        let b = add_task(&f.db, f.todo, "b");
        let incoming = add_task(&f.db, f.backlog, "incoming");

        f.db.move_task(incoming.id, f.todo, 1).unwrap();

        let ids: Vec<i64> = f.db.list_tasks(f.todo).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, incoming.id, b.id]);
        assert_dense(&f.db.conn, Scope::ColumnTasks(f.todo));
    }

    #[test]
    fn test_same_column_move_forward_and_back() {
        let f = fixture();
        let tasks: Vec<Task> = (0..4)
            .map(|i| add_task(&f.db, f.backlog, &format!("t{}", i)))
            .collect();

        // Forward: t0 to slot 2 → [t1, t2, t0, t3].
        f.db.move_task(tasks[0].id, f.backlog, 2).unwrap();
        let ids: Vec<i64> = f
            .db
            .list_tasks(f.backlog)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![tasks[1].id, tasks[2].id, tasks[0].id, tasks[3].id]);
        assert_dense(&f.db.conn, Scope::ColumnTasks(f.backlog));

        // Backward: t0 back to slot 0 → original order.
        f.db.move_task(tasks[0].id, f.backlog, 0).unwrap();
        let ids: Vec<i64> = f
            .db
            .list_tasks(f.backlog)
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![tasks[0].id, tasks[1].id, tasks[2].id, tasks[3].id]);
        assert_dense(&f.db.conn, Scope::ColumnTasks(f.backlog));
    }

    #[test]
    fn test_move_position_is_clamped() {
        let f = fixture();
        let resident = add_task(&f.db, f.todo, "resident");
        let t = add_task(&f.db, f.backlog, "t");

        // Far past the end appends; negative goes to the front.
        let moved = f.db.move_task(t.id, f.todo, 99).unwrap();
        assert_eq!(moved.position, 1);
        let back = f.db.move_task(t.id, f.backlog, -5).unwrap();
        assert_eq!(back.position, 0);
        assert_eq!(f.db.list_tasks(f.todo).unwrap()[0].id, resident.id);
        assert_dense(&f.db.conn, Scope::ColumnTasks(f.todo));
    }

    #[test]
    fn test_move_into_done_sets_completion() {
        let f = fixture();
        let t = add_task(&f.db, f.backlog, "ship it");
        assert!(t.completed_at.is_none());

        let done = f.db.move_task(t.id, f.done, 0).unwrap();
        assert!(done.completed_at.is_some());
        assert_eq!(done.resolution, Some(Resolution::Done));

        // Reordering within the done column keeps the original timestamp.
        let other = add_task(&f.db, f.done, "also done");
        assert!(other.completed_at.is_none()); // creation does not complete
        let still_done = f.db.move_task(t.id, f.done, 1).unwrap();
        assert_eq!(still_done.completed_at, done.completed_at);

        // Moving back out un-completes.
        let reopened = f.db.move_task(t.id, f.todo, 0).unwrap();
        assert!(reopened.completed_at.is_none());
        assert!(reopened.resolution.is_none());
    }

    #[test]
    fn test_move_through_blocked_column() {
        let f = fixture();
        let blocked_col = f
            .db
            .create_column(
                f.board_id,
                &NewColumn {
                    name: "Blocked".into(),
                    color: None,
                    wip_limit: None,
                    is_done_column: false,
                    is_blocked_column: true,
                },
            )
            .unwrap();
        let t = add_task(&f.db, f.backlog, "stuck");

        let blocked = f.db.move_task(t.id, blocked_col.id, 0).unwrap();
        assert!(blocked.is_blocked);

        // Reason arrives out-of-band through a plain patch.
        f.db.update_task(
            t.id,
            &TaskPatch {
                blocked_reason: Some("waiting on vendor".into()),
                ..Default::default()
            },
        )
        .unwrap();

        let unblocked = f.db.move_task(t.id, f.todo, 0).unwrap();
        assert!(!unblocked.is_blocked);
        assert!(unblocked.blocked_reason.is_none());
    }

    #[test]
    fn test_manual_resolution_survives_non_done_moves() {
        let f = fixture();
        let t = add_task(&f.db, f.backlog, "wontfix");
        f.db.update_task(
            t.id,
            &TaskPatch {
                resolution: Some(Resolution::WontDo),
                ..Default::default()
            },
        )
        .unwrap();

        // No completed_at, so moving between non-done columns leaves the
        // hand-set resolution alone.
        let moved = f.db.move_task(t.id, f.todo, 0).unwrap();
        assert_eq!(moved.resolution, Some(Resolution::WontDo));
    }

    #[test]
    fn test_move_rolls_back_as_a_unit() {
        let f = fixture();
        let tasks: Vec<Task> = (0..3)
            .map(|i| add_task(&f.db, f.backlog, &format!("t{}", i)))
            .collect();
        let resident = add_task(&f.db, f.todo, "resident");

        // Run the shifts inside a transaction that never commits; dropping
        // it must discard every intermediate write.
        {
            let tx = f.db.conn.unchecked_transaction().unwrap();
            apply_move(&tx, tasks[1].id, f.todo, 0).unwrap();
        }

        let source: Vec<(i64, i64)> = f
            .db
            .list_tasks(f.backlog)
            .unwrap()
            .iter()
            .map(|t| (t.id, t.position))
            .collect();
        assert_eq!(
            source,
            vec![(tasks[0].id, 0), (tasks[1].id, 1), (tasks[2].id, 2)]
        );
        let dest: Vec<(i64, i64)> = f
            .db
            .list_tasks(f.todo)
            .unwrap()
            .iter()
            .map(|t| (t.id, t.position))
            .collect();
        assert_eq!(dest, vec![(resident.id, 0)]);
    }

    #[test]
    fn test_move_not_found_leaves_state_alone() {
        let f = fixture();
        let t = add_task(&f.db, f.backlog, "t");

        assert!(matches!(
            f.db.move_task(999, f.todo, 0),
            Err(BoardError::TaskNotFound { id: 999 })
        ));
        assert!(matches!(
            f.db.move_task(t.id, 999, 0),
            Err(BoardError::ColumnNotFound { id: 999 })
        ));
        let unchanged = f.db.get_task(t.id).unwrap();
        assert_eq!(unchanged.column_id, f.backlog);
        assert_eq!(unchanged.position, 0);
    }

    #[test]
    fn test_task_lives_in_exactly_one_column() {
        let f = fixture();
        let t = add_task(&f.db, f.backlog, "wanderer");
        f.db.move_task(t.id, f.todo, 0).unwrap();

        let in_backlog = f
            .db
            .list_tasks(f.backlog)
            .unwrap()
            .iter()
            .any(|x| x.id == t.id);
        let in_todo = f.db.list_tasks(f.todo).unwrap().iter().any(|x| x.id == t.id);
        assert!(!in_backlog);
        assert!(in_todo);
        let total: i64 = f
            .db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM tasks WHERE id = ?1",
                params![t.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_reorder_tasks_defensively() {
        let f = fixture();
        let tasks: Vec<Task> = (0..3)
            .map(|i| add_task(&f.db, f.backlog, &format!("t{}", i)))
            .collect();

        let reordered = f
            .db
            .reorder_tasks(f.backlog, &[tasks[2].id, tasks[0].id, tasks[1].id])
            .unwrap();
        let ids: Vec<i64> = reordered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![tasks[2].id, tasks[0].id, tasks[1].id]);
        assert_dense(&f.db.conn, Scope::ColumnTasks(f.backlog));

        // A task from another column cannot be smuggled into the batch.
        let foreign = add_task(&f.db, f.todo, "foreign");
        assert!(matches!(
            f.db.reorder_tasks(f.backlog, &[tasks[2].id, tasks[0].id, foreign.id]),
            Err(BoardError::InvalidOrder { .. })
        ));
    }

    #[test]
    fn test_update_task_never_touches_placement() {
        let f = fixture();
        let t0 = add_task(&f.db, f.backlog, "t0");
        let t1 = add_task(&f.db, f.backlog, "t1");

        let patched = f
            .db
            .update_task(
                t1.id,
                &TaskPatch {
                    title: Some("renamed".into()),
                    priority: Some(Priority::Critical),
                    estimate_points: Some(8),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(patched.title, "renamed");
        assert_eq!(patched.priority, Priority::Critical);
        assert_eq!(patched.estimate_points, Some(8));
        assert_eq!(patched.column_id, t1.column_id);
        assert_eq!(patched.position, t1.position);
        assert_eq!(f.db.get_task(t0.id).unwrap().position, 0);

        assert!(matches!(
            f.db.update_task(999, &TaskPatch::default()),
            Err(BoardError::TaskNotFound { id: 999 })
        ));
    }
}
