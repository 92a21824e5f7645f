use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Invalid project status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Task,
    Bug,
    Spike,
    Subtask,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Spike => "spike",
            Self::Subtask => "subtask",
        }
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "spike" => Ok(Self::Spike),
            "subtask" => Ok(Self::Subtask),
            _ => Err(format!("Invalid task type: {}", s)),
        }
    }
}

/// How a task left the board. `Done` is assigned automatically when a task
/// is moved into a done column; the other variants are set by hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Done,
    WontDo,
    Duplicate,
    CannotReproduce,
    Obsolete,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::WontDo => "wont_do",
            Self::Duplicate => "duplicate",
            Self::CannotReproduce => "cannot_reproduce",
            Self::Obsolete => "obsolete",
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(Self::Done),
            "wont_do" => Ok(Self::WontDo),
            "duplicate" => Ok(Self::Duplicate),
            "cannot_reproduce" => Ok(Self::CannotReproduce),
            "obsolete" => Ok(Self::Obsolete),
            _ => Err(format!("Invalid resolution: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: String,
    pub status: ProjectStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: i64,
    pub board_id: i64,
    pub name: String,
    pub position: i64,
    pub color: Option<String>,
    /// Advisory only; over-limit columns are flagged in the UI, never rejected here.
    pub wip_limit: Option<i64>,
    pub is_collapsed: bool,
    pub is_done_column: bool,
    pub is_blocked_column: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    /// Current scope of the task's position. Written only by the move
    /// operation; plain field patches must not touch it.
    pub column_id: i64,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub task_type: TaskType,
    pub position: i64,
    pub due_date: Option<String>,
    pub completed_at: Option<String>,
    pub resolution: Option<Resolution>,
    pub estimate_points: Option<i64>,
    pub is_blocked: bool,
    pub blocked_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: i64,
    pub task_id: i64,
    pub title: String,
    pub is_completed: bool,
    pub position: i64,
}

// ── Creation payloads ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewColumn {
    pub name: String,
    pub color: Option<String>,
    pub wip_limit: Option<i64>,
    #[serde(default)]
    pub is_done_column: bool,
    #[serde(default)]
    pub is_blocked_column: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub column_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub task_type: Option<TaskType>,
    pub due_date: Option<String>,
    pub estimate_points: Option<i64>,
}

// ── Patch payloads ────────────────────────────────────────────────────

/// Plain field edits for a task. `position`, `column_id` and `completed_at`
/// are deliberately absent: those are owned by the repositioning operations,
/// and a column change must go through `move_task`. `is_blocked` and
/// `blocked_reason` stay patchable so a caller can supply a blocked reason
/// around a move into a blocked column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub task_type: Option<TaskType>,
    pub due_date: Option<String>,
    pub estimate_points: Option<i64>,
    pub is_blocked: Option<bool>,
    pub blocked_reason: Option<String>,
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub wip_limit: Option<i64>,
    pub is_collapsed: Option<bool>,
    pub is_done_column: Option<bool>,
    pub is_blocked_column: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubtaskPatch {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
}

// ── Read views ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub subtasks: Vec<Subtask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnView {
    #[serde(flatten)]
    pub column: Column,
    pub tasks: Vec<TaskDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<ColumnView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_roundtrip() {
        for s in &["critical", "high", "medium", "low"] {
            let parsed: Priority = s.parse().unwrap();
            assert_eq!(parsed.as_str(), *s);
        }
        assert!("invalid".parse::<Priority>().is_err());
    }

    #[test]
    fn test_task_type_roundtrip() {
        for s in &["task", "bug", "spike", "subtask"] {
            let parsed: TaskType = s.parse().unwrap();
            assert_eq!(parsed.as_str(), *s);
        }
        assert!("invalid".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_resolution_roundtrip() {
        for s in &[
            "done",
            "wont_do",
            "duplicate",
            "cannot_reproduce",
            "obsolete",
        ] {
            let parsed: Resolution = s.parse().unwrap();
            assert_eq!(parsed.as_str(), *s);
        }
        assert!("invalid".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_project_status_roundtrip() {
        for s in &["active", "archived"] {
            let parsed: ProjectStatus = s.parse().unwrap();
            assert_eq!(parsed.as_str(), *s);
        }
        assert!("invalid".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_serde_produces_lowercase_strings() {
        assert_eq!(
            serde_json::to_string(&Resolution::WontDo).unwrap(),
            "\"wont_do\""
        );
        assert_eq!(
            serde_json::to_string(&Resolution::CannotReproduce).unwrap(),
            "\"cannot_reproduce\""
        );
        assert_eq!(
            serde_json::to_string(&Priority::Critical).unwrap(),
            "\"critical\""
        );
        assert_eq!(
            serde_json::from_str::<TaskType>("\"spike\"").unwrap(),
            TaskType::Spike
        );
    }

    #[test]
    fn test_task_patch_deserializes_partial_payload() {
        let patch: TaskPatch =
            serde_json::from_str(r#"{"title": "New title", "priority": "high"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("New title"));
        assert_eq!(patch.priority, Some(Priority::High));
        assert!(patch.is_blocked.is_none());
    }
}
