use std::sync::Arc;
use tracing::instrument;

use crate::error::{TaskError, TaskResult};
use crate::models::{
    ListTasksQuery, NewTask, StatusFilter, Task, TaskDate, TaskInput, TaskList, TaskQuery,
    TaskTitle, TaskUpdate, parse_task_id,
};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate and insert a task, returning its id
    #[instrument(skip(self, input), fields(task_title = %input.title))]
    pub async fn create_task(&self, input: TaskInput) -> TaskResult<i64> {
        let task = NewTask::try_from(input)?;
        self.repository.insert_task(&task).await
    }

    /// Overwrite date, title and description of an existing task
    #[instrument(skip(self, input), fields(task_id = ?input.id))]
    pub async fn update_task(&self, input: TaskInput) -> TaskResult<()> {
        let raw_id = input.id.clone().unwrap_or_default();
        // Field validation is reported before a bad id
        let task = NewTask::try_from(input)?;
        let id = parse_task_id(&raw_id)?;
        let update = TaskUpdate::new(id, task);

        if !self.repository.update_task(&update).await? {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }

    /// Get a task by ID
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get_task(&self, id: &str) -> TaskResult<Task> {
        let id = parse_task_id(id)?;

        self.repository
            .get_task(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// Delete a task
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete_task(&self, id: &str) -> TaskResult<()> {
        let id = parse_task_id(id)?;

        if !self.repository.delete_task(id).await? {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }

    /// Re-write a task unchanged after checking it exists.
    ///
    /// Status is left as stored. A concurrent update between the read and
    /// the write can be overwritten by the stale copy.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn done_task(&self, id: &str) -> TaskResult<()> {
        let id = parse_task_id(id)?;

        let task = self
            .repository
            .get_task(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        let update = TaskUpdate {
            id,
            date: task.date.unwrap_or_else(TaskDate::today),
            title: TaskTitle::new(task.title)?,
            description: task.description,
        };

        if !self.repository.update_task(&update).await? {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }

    /// List tasks, optionally filtered by a recognised status
    #[instrument(skip(self))]
    pub async fn get_tasks_by_status(
        &self,
        status: &str,
        page: i64,
        items_per_page: i64,
    ) -> TaskResult<TaskList> {
        let query = TaskQuery::new(None, StatusFilter::recognise(status), page, items_per_page);
        self.list(&query).await
    }

    /// List tasks on `date`, optionally filtered by a recognised status.
    ///
    /// An empty `date` disables the date filter.
    #[instrument(skip(self))]
    pub async fn get_tasks_by_date_and_status(
        &self,
        date: &str,
        status: &str,
        page: i64,
        items_per_page: i64,
    ) -> TaskResult<TaskList> {
        let date = if date.is_empty() {
            None
        } else {
            Some(TaskDate::parse(date)?)
        };

        let query = TaskQuery::new(date, StatusFilter::recognise(status), page, items_per_page);
        self.list(&query).await
    }

    /// Entry point for `GET /tasks`
    pub async fn list_tasks(&self, query: ListTasksQuery) -> TaskResult<TaskList> {
        if query.date.is_empty() {
            self.get_tasks_by_status(&query.status, query.page(), query.items_per_page())
                .await
        } else {
            self.get_tasks_by_date_and_status(
                &query.date,
                &query.status,
                query.page(),
                query.items_per_page(),
            )
            .await
        }
    }

    async fn list(&self, query: &TaskQuery) -> TaskResult<TaskList> {
        let tasks = self.repository.get_tasks(query).await?;
        Ok(TaskList { tasks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockTaskRepository;
    use mockall::predicate::eq;

    fn stored(id: i64) -> Task {
        Task {
            id,
            date: Some(TaskDate::parse("20240101").unwrap()),
            title: "Buy milk".to_string(),
            description: "2 litres".to_string(),
            status: "Выполнено".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_without_title_never_touches_storage() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_insert_task().never();

        let service = TaskService::new(mock_repo);
        let input = TaskInput::new("").with_date("20240101").with_description("x");

        assert_eq!(service.create_task(input).await, Err(TaskError::RequireTitle));
    }

    #[tokio::test]
    async fn test_create_with_bad_date_never_touches_storage() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_insert_task().never();

        let service = TaskService::new(mock_repo);
        let input = TaskInput::new("Buy milk").with_date("2024-01-01");

        assert_eq!(
            service.create_task(input).await,
            Err(TaskError::InvalidDateFormat("2024-01-01".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_defaults_date_to_today() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_insert_task()
            .withf(|task| task.date == TaskDate::today() && task.title.as_str() == "Buy milk")
            .times(1)
            .returning(|_| Ok(1));

        let service = TaskService::new(mock_repo);
        assert_eq!(service.create_task(TaskInput::new("Buy milk")).await, Ok(1));
    }

    #[tokio::test]
    async fn test_update_requires_numeric_id() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_update_task().never();

        let service = TaskService::new(mock_repo);

        let missing = service.update_task(TaskInput::new("Buy milk")).await;
        assert_eq!(missing, Err(TaskError::InvalidId(String::new())));

        let garbage = service
            .update_task(TaskInput::new("Buy milk").with_id("abc"))
            .await;
        assert_eq!(garbage, Err(TaskError::InvalidId("abc".to_string())));
    }

    #[tokio::test]
    async fn test_update_checks_title_before_id() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_update_task().never();

        let service = TaskService::new(mock_repo);

        let result = service.update_task(TaskInput::new("")).await;
        assert_eq!(result, Err(TaskError::RequireTitle));

        let result = service
            .update_task(TaskInput::new("Buy milk").with_date("tomorrow").with_id("abc"))
            .await;
        assert_eq!(result, Err(TaskError::InvalidDateFormat("tomorrow".to_string())));
    }

    #[tokio::test]
    async fn test_update_of_missing_task_is_not_found() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_update_task()
            .withf(|update| update.id == 404)
            .returning(|_| Ok(false));

        let service = TaskService::new(mock_repo);
        let result = service
            .update_task(TaskInput::new("anything").with_id(404))
            .await;

        assert_eq!(result, Err(TaskError::NotFound(404)));
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_get_task()
            .with(eq(7))
            .returning(|_| Ok(None));

        let service = TaskService::new(mock_repo);
        assert_eq!(service.get_task("7").await, Err(TaskError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_delete_twice_second_is_not_found() {
        let mut mock_repo = MockTaskRepository::new();
        let mut seq = mockall::Sequence::new();
        mock_repo
            .expect_delete_task()
            .with(eq(3))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        mock_repo
            .expect_delete_task()
            .with(eq(3))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));

        let service = TaskService::new(mock_repo);
        assert_eq!(service.delete_task("3").await, Ok(()));
        assert_eq!(service.delete_task("3").await, Err(TaskError::NotFound(3)));
    }

    #[tokio::test]
    async fn test_done_rewrites_stored_fields_unchanged() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_get_task()
            .with(eq(5))
            .returning(|id| Ok(Some(stored(id))));
        mock_repo
            .expect_update_task()
            .withf(|update| {
                update.id == 5
                    && update.title.as_str() == "Buy milk"
                    && update.description == "2 litres"
                    && update.date.to_string() == "20240101"
            })
            .times(1)
            .returning(|_| Ok(true));

        let service = TaskService::new(mock_repo);
        assert_eq!(service.done_task("5").await, Ok(()));
    }

    #[tokio::test]
    async fn test_done_on_vanished_task_is_not_found() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_get_task().returning(|id| Ok(Some(stored(id))));
        mock_repo.expect_update_task().returning(|_| Ok(false));

        let service = TaskService::new(mock_repo);
        assert_eq!(service.done_task("5").await, Err(TaskError::NotFound(5)));
    }

    #[tokio::test]
    async fn test_unrecognised_status_disables_filter() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_get_tasks()
            .withf(|query| query.status.is_none() && query.date.is_none())
            .times(2)
            .returning(|_| Ok(vec![]));

        let service = TaskService::new(mock_repo);
        let filtered = service.get_tasks_by_status("whatever", 1, 10).await.unwrap();
        let unfiltered = service.get_tasks_by_status("", 1, 10).await.unwrap();

        assert!(filtered.tasks.is_empty());
        assert!(unfiltered.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_list_tasks_dispatches_on_date() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo
            .expect_get_tasks()
            .withf(|query| {
                query.date.map(|d| d.to_string()) == Some("20240101".to_string())
                    && query.status == Some(StatusFilter::NotDone)
                    && query.limit == 5
                    && query.offset == 5
            })
            .times(1)
            .returning(|_| Ok(vec![stored(1)]));

        let service = TaskService::new(mock_repo);
        let query = ListTasksQuery {
            date: "20240101".to_string(),
            status: "Не выполнено".to_string(),
            page: Some("2".to_string()),
            items_per_page: Some("5".to_string()),
        };

        let list = service.list_tasks(query).await.unwrap();
        assert_eq!(list.tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_list_with_bad_date_is_rejected() {
        let mut mock_repo = MockTaskRepository::new();
        mock_repo.expect_get_tasks().never();

        let service = TaskService::new(mock_repo);
        let result = service.get_tasks_by_date_and_status("tomorrow", "", 1, 10).await;

        assert!(matches!(result, Err(TaskError::InvalidDateFormat(_))));
    }
}
