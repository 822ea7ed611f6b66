use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement, TransactionTrait,
    Value,
};

use crate::error::{TaskError, TaskResult};
use crate::models::{NewTask, Task, TaskQuery, TaskUpdate};
use crate::repository::TaskRepository;

const INSERT_TASK: &str =
    "INSERT INTO todolist (date, title, description) VALUES ($1, $2, $3) RETURNING id";

/// Columns are listed and aliased so rows are read by name, never by position
const SELECT_TASKS: &str = "SELECT id, date, COALESCE(title, '') AS title, \
     COALESCE(description, '') AS description, COALESCE(status, '') AS status \
     FROM todolist";

const UPDATE_TASK: &str =
    "UPDATE todolist SET date = $1, title = $2, description = $3 WHERE id = $4";

const DELETE_TASK: &str = "DELETE FROM todolist WHERE id = $1";

#[derive(Debug, FromQueryResult)]
struct TaskRow {
    id: i64,
    date: Option<NaiveDate>,
    title: String,
    description: String,
    status: String,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            date: row.date.map(Into::into),
            title: row.title,
            description: row.description,
            status: row.status,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct InsertedId {
    id: i64,
}

/// PostgreSQL implementation of TaskRepository over the `todolist` table
#[derive(Clone)]
pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `WHERE 1=1` plus one predicate per active filter, placeholders numbered
/// in the order values are bound.
fn list_statement(query: &TaskQuery) -> Statement {
    let mut sql = format!("{SELECT_TASKS} WHERE 1=1");
    let mut values: Vec<Value> = Vec::new();

    if let Some(date) = query.date {
        values.push(date.into_inner().into());
        sql.push_str(&format!(" AND date = ${}", values.len()));
    }

    if let Some(status) = query.status {
        values.push(status.as_ref().into());
        sql.push_str(&format!(" AND status = ${}", values.len()));
    }

    let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
    values.push(limit.into());
    values.push(offset.into());
    sql.push_str(&format!(
        " ORDER BY date LIMIT ${} OFFSET ${}",
        values.len() - 1,
        values.len()
    ));

    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn insert_task(&self, task: &NewTask) -> TaskResult<i64> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            INSERT_TASK,
            [
                task.date.into_inner().into(),
                task.title.as_str().into(),
                task.description.as_str().into(),
            ],
        );

        let inserted = InsertedId::find_by_statement(stmt)
            .one(&self.db)
            .await?
            .ok_or_else(|| TaskError::Database("insert returned no id".to_string()))?;

        tracing::info!(task_id = inserted.id, "Created task");
        Ok(inserted.id)
    }

    async fn get_task(&self, id: i64) -> TaskResult<Option<Task>> {
        let sql = format!("{SELECT_TASKS} WHERE id = $1");
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = TaskRow::find_by_statement(stmt).one(&self.db).await?;
        Ok(row.map(Into::into))
    }

    async fn get_tasks(&self, query: &TaskQuery) -> TaskResult<Vec<Task>> {
        let rows = TaskRow::find_by_statement(list_statement(query))
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_task(&self, update: &TaskUpdate) -> TaskResult<bool> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            UPDATE_TASK,
            [
                update.date.into_inner().into(),
                update.title.as_str().into(),
                update.description.as_str().into(),
                update.id.into(),
            ],
        );

        // Dropping the transaction without commit rolls it back
        let txn = self.db.begin().await?;
        let result = txn.execute_raw(stmt).await?;
        txn.commit().await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_task(&self, id: i64) -> TaskResult<bool> {
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, DELETE_TASK, [id.into()]);

        let result = self.db.execute_raw(stmt).await?;

        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StatusFilter, TaskDate, TaskInput};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;

    fn task_row(id: i64, date: &str, title: &str) -> BTreeMap<&'static str, Value> {
        let date = TaskDate::parse(date).unwrap().into_inner();
        BTreeMap::from([
            ("id", Value::from(id)),
            ("date", Value::from(date)),
            ("title", Value::from(title.to_string())),
            ("description", Value::from(String::new())),
            ("status", Value::from(String::new())),
        ])
    }

    fn new_task(title: &str, date: &str) -> NewTask {
        NewTask::try_from(TaskInput::new(title).with_date(date)).unwrap()
    }

    #[test]
    fn test_list_statement_without_filters() {
        let stmt = list_statement(&TaskQuery::new(None, None, 1, 50));
        assert_eq!(
            stmt.sql,
            format!("{SELECT_TASKS} WHERE 1=1 ORDER BY date LIMIT $1 OFFSET $2")
        );
    }

    #[test]
    fn test_list_statement_numbers_placeholders_sequentially() {
        let date = TaskDate::parse("20240101").unwrap();

        let status_only = list_statement(&TaskQuery::new(None, Some(StatusFilter::Done), 1, 10));
        assert!(status_only.sql.ends_with(
            "WHERE 1=1 AND status = $1 ORDER BY date LIMIT $2 OFFSET $3"
        ));

        let both = list_statement(&TaskQuery::new(Some(date), Some(StatusFilter::NotDone), 2, 10));
        assert!(both.sql.ends_with(
            "WHERE 1=1 AND date = $1 AND status = $2 ORDER BY date LIMIT $3 OFFSET $4"
        ));
    }

    #[tokio::test]
    async fn test_insert_returns_generated_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![BTreeMap::from([("id", Value::from(17i64))])]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let id = repo.insert_task(&new_task("Buy milk", "20240101")).await.unwrap();
        assert_eq!(id, 17);
    }

    #[tokio::test]
    async fn test_get_task_maps_row_by_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![task_row(3, "20240101", "Buy milk")]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let task = repo.get_task(3).await.unwrap().unwrap();
        assert_eq!(task.id, 3);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.date, Some(TaskDate::parse("20240101").unwrap()));
    }

    #[tokio::test]
    async fn test_get_task_missing_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        assert_eq!(repo.get_task(404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_reports_single_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let update = TaskUpdate::new(5, new_task("Buy milk", "20240101"));
        assert!(repo.update_task(&update).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_false() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let update = TaskUpdate::new(5, new_task("Buy milk", "20240101"));
        assert!(!repo.update_task(&update).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        assert!(repo.delete_task(9).await.unwrap());
        assert!(!repo.delete_task(9).await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_errors_pass_through() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("relation \"todolist\" does not exist".into())])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let err = repo.get_tasks(&TaskQuery::new(None, None, 1, 10)).await.unwrap_err();
        assert!(matches!(err, TaskError::Database(msg) if msg.contains("todolist")));
    }
}
