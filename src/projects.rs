//! Project CRUD: slug derivation, default board seeding, and the
//! per-project identifier counter consumed by task creation.

use rusqlite::params;

use crate::db::BoardDb;
use crate::errors::{BoardError, Result};
use crate::models::{NewProject, Project, ProjectStatus};

/// Convert a project name to a URL-safe slug: lowercase, runs of
/// non-alphanumerics collapsed to `-`, leading/trailing dashes trimmed.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Identifier prefix for a project: first three alphanumeric characters of
/// the slug, uppercased. `"my-first-project"` becomes `"MYF"`.
pub(crate) fn identifier_prefix(slug: &str) -> String {
    slug.chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

/// Columns every new project starts with.
const DEFAULT_COLUMNS: &[(&str, &str, Option<i64>, bool)] = &[
    ("Backlog", "#6b7280", None, false),
    ("To Do", "#3b82f6", None, false),
    ("In Progress", "#f59e0b", Some(3), false),
    ("In Review", "#8b5cf6", None, false),
    ("Done", "#22c55e", None, true),
];

struct ProjectRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    color: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project> {
        let status = self
            .status
            .parse::<ProjectStatus>()
            .map_err(BoardError::InvalidData)?;
        Ok(Project {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            color: self.color,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PROJECT_COLUMNS: &str =
    "id, name, slug, description, color, status, created_at, updated_at";

impl BoardDb {
    /// Create a project together with its default board and columns.
    pub fn create_project(&self, new: &NewProject) -> Result<Project> {
        let mut slug = slugify(&new.name);
        let taken: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM projects WHERE slug = ?1",
            params![slug],
            |row| row.get(0),
        )?;
        if taken {
            slug = format!("{}-{}", slug, chrono::Utc::now().timestamp_millis());
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO projects (name, slug, description, color) VALUES (?1, ?2, ?3, ?4)",
            params![
                new.name,
                slug,
                new.description,
                new.color.as_deref().unwrap_or("#6366f1"),
            ],
        )?;
        let project_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO boards (project_id, name, position) VALUES (?1, 'Main Board', 0)",
            params![project_id],
        )?;
        let board_id = tx.last_insert_rowid();

        for (position, (name, color, wip_limit, is_done)) in DEFAULT_COLUMNS.iter().enumerate() {
            tx.execute(
                "INSERT INTO columns (board_id, name, position, color, wip_limit, is_done_column)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![board_id, name, position as i64, color, wip_limit, is_done],
            )?;
        }
        tx.commit()?;

        tracing::debug!(project = project_id, %slug, "created project");
        self.get_project(project_id)
    }

    pub fn get_project(&self, id: i64) -> Result<Project> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM projects WHERE id = ?1",
            PROJECT_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![id], project_row)?;
        match rows.next() {
            Some(row) => row?.into_project(),
            None => Err(BoardError::ProjectNotFound { id }),
        }
    }

    pub fn find_project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM projects WHERE slug = ?1",
            PROJECT_COLUMNS
        ))?;
        let mut rows = stmt.query_map(params![slug], project_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?.into_project()?)),
            None => Ok(None),
        }
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM projects ORDER BY created_at, id",
            PROJECT_COLUMNS
        ))?;
        let rows = stmt.query_map([], project_row)?;
        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?.into_project()?);
        }
        Ok(projects)
    }

    pub fn archive_project(&self, id: i64) -> Result<Project> {
        let updated = self.conn.execute(
            "UPDATE projects SET status = 'archived', updated_at = datetime('now') WHERE id = ?1",
            params![id],
        )?;
        if updated == 0 {
            return Err(BoardError::ProjectNotFound { id });
        }
        self.get_project(id)
    }

    /// Delete a project; boards, columns, tasks and subtasks go with it.
    pub fn delete_project(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(BoardError::ProjectNotFound { id });
        }
        Ok(())
    }
}

fn project_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProjectRow> {
    Ok(ProjectRow {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        color: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
