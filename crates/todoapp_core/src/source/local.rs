//! SQLite-backed local task source.
//!
//! # Responsibility
//! - Map the `tasks` table to `Task` records with parameterized statements.
//!
//! # Invariants
//! - Inserts use replace-on-conflict on `entry_id`.
//! - Reads reject rows with malformed IDs or completion flags.
//! - Construction fails on connections that were not migrated.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::task::{Task, TaskId};
use crate::source::{RepoError, RepoResult, TasksDataSource};
use log::debug;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASKS_TABLE: &str = "tasks";
const TASK_COLUMNS: [&str; 4] = ["entry_id", "title", "description", "completed"];
const TASK_SELECT_SQL: &str = "SELECT entry_id, title, description, completed FROM tasks";
const TASK_UPSERT_SQL: &str = "INSERT OR REPLACE INTO tasks (entry_id, title, description, completed)
     VALUES (?1, ?2, ?3, ?4);";

/// Local task source over a migrated SQLite connection.
pub struct SqliteTasksDataSource<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTasksDataSource<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn set_completed(&self, id: TaskId, completed: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = ?1 WHERE entry_id = ?2;",
            params![bool_to_int(completed), id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

impl TasksDataSource for SqliteTasksDataSource<'_> {
    fn get_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE entry_id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }

    fn save_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;
        self.conn.execute(
            TASK_UPSERT_SQL,
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                bool_to_int(task.completed),
            ],
        )?;
        Ok(())
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        for task in tasks {
            task.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(TASK_UPSERT_SQL)?;
            for task in tasks {
                stmt.execute(params![
                    task.id.to_string(),
                    task.title.as_str(),
                    task.description.as_str(),
                    bool_to_int(task.completed),
                ])?;
            }
        }
        tx.commit()?;

        debug!(
            "event=tasks_save_batch module=source.local status=ok count={}",
            tasks.len()
        );
        Ok(())
    }

    fn complete_task(&self, id: TaskId) -> RepoResult<()> {
        self.set_completed(id, true)
    }

    fn activate_task(&self, id: TaskId) -> RepoResult<()> {
        self.set_completed(id, false)
    }

    fn clear_completed_tasks(&self) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM tasks WHERE completed = 1;", [])?;
        debug!("event=tasks_clear_completed module=source.local status=ok removed={removed}");
        Ok(removed)
    }

    fn refresh_tasks(&self) -> RepoResult<()> {
        // The repository owns refresh orchestration.
        Ok(())
    }

    fn delete_all_tasks(&self) -> RepoResult<()> {
        let removed = self.conn.execute("DELETE FROM tasks;", [])?;
        debug!("event=tasks_delete_all module=source.local status=ok removed={removed}");
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE entry_id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("entry_id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid task id `{id_text}` in tasks.entry_id"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    Ok(Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        completed,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare(&format!("PRAGMA table_info({TASKS_TABLE});"))?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(1)?);
    }
    if present.is_empty() {
        return Err(RepoError::MissingRequiredTable(TASKS_TABLE));
    }
    for column in TASK_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: TASKS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

#[cfg(test)]
mod tests {
    use super::{ensure_connection_ready, SqliteTasksDataSource};
    use crate::db::open_db_in_memory;
    use crate::source::{RepoError, TasksDataSource};
    use rusqlite::Connection;

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = ensure_connection_ready(&conn).unwrap_err();
        assert!(matches!(
            err,
            RepoError::UninitializedConnection {
                actual_version: 0,
                ..
            }
        ));
    }

    #[test]
    fn malformed_completed_value_is_reported() {
        let conn = open_db_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA ignore_check_constraints = ON;
             INSERT INTO tasks (entry_id, title, description, completed)
             VALUES ('0b6f1f2e-4a34-4f4e-9d60-6c1c4a5d1a01', 't', 'd', 7);",
        )
        .unwrap();
        let source = SqliteTasksDataSource::try_new(&conn).unwrap();
        let err = source.get_tasks().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("completed")));
    }

    #[test]
    fn malformed_id_is_reported() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO tasks (entry_id, title, description, completed)
             VALUES ('not-a-uuid', 't', 'd', 0);",
            [],
        )
        .unwrap();
        let source = SqliteTasksDataSource::try_new(&conn).unwrap();
        let err = source.get_tasks().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("entry_id")));
    }
}
