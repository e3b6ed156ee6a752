use crate::Database;
use crate::models::TaskRow;
use anyhow::Result;
use rusqlite::{Connection, Row};

const TASK_COLUMNS: &str = "id, description, completed, created_at, user_id";

impl Database {
    // -- Tasks --

    /// Insert a new, not-yet-completed task owned by `user_id`.
    pub fn insert_task(&self, user_id: &str, description: &str) -> Result<TaskRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO tasks (description, completed, user_id) VALUES (?1, 0, ?2)
                     RETURNING {TASK_COLUMNS}"
                ),
                (description, user_id),
                map_task,
            )?;
            Ok(row)
        })
    }

    /// All tasks owned by `user_id`, newest first.
    pub fn list_tasks(&self, user_id: &str) -> Result<Vec<TaskRow>> {
        self.with_conn(|conn| query_tasks_for_user(conn, user_id))
    }

    /// Set `completed` on the task matching both `id` and `user_id`.
    ///
    /// Ownership is part of the same statement, so a task owned by someone
    /// else behaves exactly like a task that does not exist: `Ok(None)`.
    pub fn set_task_completed(
        &self,
        id: i64,
        user_id: &str,
        completed: bool,
    ) -> Result<Option<TaskRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE tasks SET completed = ?1 WHERE id = ?2 AND user_id = ?3
                     RETURNING {TASK_COLUMNS}"
                ),
                rusqlite::params![completed, id, user_id],
                map_task,
            )
            .optional()
        })
    }

    /// Delete the task matching both `id` and `user_id`. Returns the number of
    /// rows removed (0 or 1).
    pub fn delete_task(&self, id: i64, user_id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                rusqlite::params![id, user_id],
            )?;
            Ok(removed)
        })
    }
}

fn query_tasks_for_user(conn: &Connection, user_id: &str) -> Result<Vec<TaskRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY id DESC"
    ))?;

    let rows = stmt
        .query_map([user_id], map_task)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_task(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        description: row.get(1)?,
        completed: row.get(2)?,
        created_at: row.get(3)?,
        user_id: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn user() -> String {
        Uuid::new_v4().to_string()
    }

    #[test]
    fn insert_returns_generated_fields() {
        let db = db();
        let alice = user();

        let row = db.insert_task(&alice, "Buy milk").unwrap();
        assert!(row.id > 0);
        assert_eq!(row.description, "Buy milk");
        assert!(!row.completed);
        assert_eq!(row.user_id, alice);
        assert!(!row.created_at.is_empty());
    }

    #[test]
    fn list_is_scoped_to_owner_and_newest_first() {
        let db = db();
        let alice = user();
        let bob = user();

        let first = db.insert_task(&alice, "first").unwrap();
        db.insert_task(&bob, "not yours").unwrap();
        let second = db.insert_task(&alice, "second").unwrap();

        let ids: Vec<i64> = db.list_tasks(&alice).unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(db.list_tasks(&user()).unwrap().is_empty());
    }

    #[test]
    fn update_requires_both_id_and_owner() {
        let db = db();
        let alice = user();
        let bob = user();
        let task = db.insert_task(&alice, "walk dog").unwrap();

        // Bob knows the id but does not own the row.
        assert!(db.set_task_completed(task.id, &bob, true).unwrap().is_none());
        assert!(!db.list_tasks(&alice).unwrap()[0].completed);

        let updated = db.set_task_completed(task.id, &alice, true).unwrap().unwrap();
        assert!(updated.completed);
        assert_eq!(updated.description, "walk dog");
    }

    #[test]
    fn update_is_idempotent() {
        let db = db();
        let alice = user();
        let task = db.insert_task(&alice, "stretch").unwrap();

        let once = db.set_task_completed(task.id, &alice, true).unwrap().unwrap();
        let twice = db.set_task_completed(task.id, &alice, true).unwrap().unwrap();
        assert_eq!(once.completed, twice.completed);
        assert_eq!(once.created_at, twice.created_at);

        let reopened = db.set_task_completed(task.id, &alice, false).unwrap().unwrap();
        assert!(!reopened.completed);
    }

    #[test]
    fn update_of_missing_id_is_none() {
        let db = db();
        assert!(db.set_task_completed(4242, &user(), true).unwrap().is_none());
    }

    #[test]
    fn delete_requires_both_id_and_owner() {
        let db = db();
        let alice = user();
        let bob = user();
        let task = db.insert_task(&alice, "pay rent").unwrap();

        assert_eq!(db.delete_task(task.id, &bob).unwrap(), 0);
        assert_eq!(db.list_tasks(&alice).unwrap().len(), 1);

        assert_eq!(db.delete_task(task.id, &alice).unwrap(), 1);
        assert!(db.list_tasks(&alice).unwrap().is_empty());
    }

    #[test]
    fn delete_is_idempotent_and_leaves_other_rows() {
        let db = db();
        let alice = user();
        let keep = db.insert_task(&alice, "keep me").unwrap();
        let gone = db.insert_task(&alice, "remove me").unwrap();

        assert_eq!(db.delete_task(gone.id, &alice).unwrap(), 1);
        assert_eq!(db.delete_task(gone.id, &alice).unwrap(), 0);
        assert_eq!(db.delete_task(9999, &alice).unwrap(), 0);

        let remaining = db.list_tasks(&alice).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let db = db();
        let alice = user();
        let a = db.insert_task(&alice, "a").unwrap();
        db.delete_task(a.id, &alice).unwrap();

        let b = db.insert_task(&alice, "b").unwrap();
        assert!(b.id > a.id);
    }
}
