//! Taskboard — Kanban project tracker storage engine.
//!
//! ## Overview
//!
//! SQLite-backed persistence for a Kanban tracker: projects own boards,
//! boards own ordered columns, columns own ordered tasks, tasks own ordered
//! subtasks. Every sibling group keeps a dense `0..N-1` position ledger;
//! the create/delete/reorder/move operations are the only writers of
//! `position` and each runs as a single transaction.
//!
//! ## Module Map
//!
//! | Module     | Responsibility                                             |
//! |------------|------------------------------------------------------------|
//! | `models`   | Shared types: `Project`, `Board`, `Column`, `Task`, views  |
//! | `errors`   | `BoardError` taxonomy and the crate `Result` alias         |
//! | `db`       | SQLite access: `BoardDb`, async `DbHandle`, migrations     |
//! | `ledger`   | Position-shift primitives shared by all ordered scopes     |
//! | `projects` | Project CRUD, slug derivation, default board seeding       |
//! | `boards`   | Board CRUD and the assembled `BoardView`                   |
//! | `columns`  | Column CRUD and column reordering                          |
//! | `tasks`    | Task CRUD, identifier minting, `move_task`, reordering     |
//! | `subtasks` | Subtask CRUD and checklist reordering                      |
//!
//! ## Typical flow (drag a card to another column)
//!
//! 1. The caller resolves the dragged task id and the drop target
//!    (destination column id plus the slot index).
//! 2. `BoardDb::move_task()` opens a transaction, closes the gap in the
//!    source column, opens one in the destination (clamping the slot), and
//!    relocates the task.
//! 3. The destination column's `is_done_column` / `is_blocked_column` flags
//!    derive `completed_at`, `resolution` and `is_blocked` in the same
//!    transaction.
//! 4. `BoardDb::get_board_view()` re-reads the whole board for the UI.

pub mod boards;
pub mod columns;
pub mod db;
pub mod errors;
mod ledger;
pub mod models;
pub mod projects;
pub mod subtasks;
pub mod tasks;

pub use db::{BoardDb, DbHandle};
pub use errors::{BoardError, Result};
