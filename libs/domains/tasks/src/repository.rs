use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TaskResult;
use crate::models::{NewTask, Task, TaskQuery, TaskUpdate};

/// Repository trait for Task persistence
///
/// Implementations own the storage schema. Validation has already happened
/// by the time a value reaches them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task and return its generated id
    async fn insert_task(&self, task: &NewTask) -> TaskResult<i64>;

    /// Get a task by ID
    async fn get_task(&self, id: i64) -> TaskResult<Option<Task>>;

    /// List tasks ordered by date, filtered and paged by `query`
    async fn get_tasks(&self, query: &TaskQuery) -> TaskResult<Vec<Task>>;

    /// Overwrite date, title and description; `true` if exactly one row changed
    async fn update_task(&self, update: &TaskUpdate) -> TaskResult<bool>;

    /// Delete a task by ID; `true` if exactly one row was removed
    async fn delete_task(&self, id: i64) -> TaskResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    last_id: i64,
    tasks: BTreeMap<i64, Task>,
}

/// In-memory implementation of TaskRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a task with an arbitrary status, bypassing the insert path
    pub async fn seed(&self, mut task: Task) -> i64 {
        let mut store = self.store.write().await;
        store.last_id += 1;
        task.id = store.last_id;
        store.tasks.insert(task.id, task);
        store.last_id
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert_task(&self, task: &NewTask) -> TaskResult<i64> {
        let mut store = self.store.write().await;
        store.last_id += 1;
        let id = store.last_id;

        store.tasks.insert(
            id,
            Task {
                id,
                date: Some(task.date),
                title: task.title.as_str().to_string(),
                description: task.description.clone(),
                status: String::new(),
            },
        );

        tracing::info!(task_id = id, "Created task");
        Ok(id)
    }

    async fn get_task(&self, id: i64) -> TaskResult<Option<Task>> {
        let store = self.store.read().await;
        Ok(store.tasks.get(&id).cloned())
    }

    async fn get_tasks(&self, query: &TaskQuery) -> TaskResult<Vec<Task>> {
        let store = self.store.read().await;

        let mut result: Vec<Task> = store
            .tasks
            .values()
            .filter(|t| {
                if let Some(date) = query.date {
                    if t.date != Some(date) {
                        return false;
                    }
                }
                if let Some(status) = query.status {
                    if t.status != status.as_ref() {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Ascending by date, undated last (Postgres NULL ordering), id breaks ties
        result.sort_by_key(|t| (t.date.is_none(), t.date, t.id));

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

        Ok(result.into_iter().skip(offset).take(limit).collect())
    }

    async fn update_task(&self, update: &TaskUpdate) -> TaskResult<bool> {
        let mut store = self.store.write().await;

        let Some(task) = store.tasks.get_mut(&update.id) else {
            return Ok(false);
        };

        task.date = Some(update.date);
        task.title = update.title.as_str().to_string();
        task.description = update.description.clone();

        tracing::info!(task_id = update.id, "Updated task");
        Ok(true)
    }

    async fn delete_task(&self, id: i64) -> TaskResult<bool> {
        let mut store = self.store.write().await;
        let removed = store.tasks.remove(&id).is_some();

        if removed {
            tracing::info!(task_id = id, "Deleted task");
        }
        Ok(removed)
    }
}
