use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;
use strum::{AsRefStr, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::error::{TaskError, TaskResult};

/// Wire format of task dates
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Page size used when the client sends none (or a non-positive one)
pub const DEFAULT_ITEMS_PER_PAGE: u64 = 50;

/// Calendar date carried as `YYYYMMDD` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskDate(NaiveDate);

impl TaskDate {
    /// Parse exactly eight ASCII digits forming a valid calendar date.
    pub fn parse(raw: &str) -> TaskResult<Self> {
        let invalid = || TaskError::InvalidDateFormat(raw.to_string());

        if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// [`TaskDate::parse`], or today's date when `raw` is empty
    pub fn parse_or_today(raw: &str) -> TaskResult<Self> {
        if raw.is_empty() {
            Ok(Self::today())
        } else {
            Self::parse(raw)
        }
    }

    /// Today in the process's local timezone
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn into_inner(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for TaskDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for TaskDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for TaskDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Non-empty task title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    pub fn new(title: impl Into<String>) -> TaskResult<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(TaskError::RequireTitle);
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Status values that activate the list filter.
///
/// The stored status is free text; anything else passed as a filter is
/// ignored rather than matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum StatusFilter {
    #[strum(serialize = "Не выполнено")]
    NotDone,
    #[strum(serialize = "Выполнено")]
    Done,
}

impl StatusFilter {
    /// `None` for any value other than the two recognised literals
    pub fn recognise(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

/// A stored task
///
/// `id` is rendered as a JSON string; empty fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    #[serde(with = "id_as_string")]
    #[schema(value_type = String, example = "12")]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "20240101")]
    pub date: Option<TaskDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Request body of `POST /task` and `PUT /task`
///
/// Fields are kept raw so the service can report which rule failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TaskInput {
    /// Required for updates; a JSON string or integer
    #[serde(
        default,
        deserialize_with = "raw_id",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "12")]
    pub id: Option<String>,

    /// `YYYYMMDD`, today when empty
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schema(example = "20240101")]
    pub date: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[schema(example = "Buy milk")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    /// Accepted but not written by create or update
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
}

impl TaskInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Validated task ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: TaskDate,
    pub title: TaskTitle,
    pub description: String,
}

impl TryFrom<TaskInput> for NewTask {
    type Error = TaskError;

    /// Title is checked before date.
    fn try_from(input: TaskInput) -> TaskResult<Self> {
        let title = TaskTitle::new(input.title)?;
        let date = TaskDate::parse_or_today(&input.date)?;

        Ok(Self {
            date,
            title,
            description: input.description,
        })
    }
}

/// Validated overwrite of an existing task's date, title and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    pub id: i64,
    pub date: TaskDate,
    pub title: TaskTitle,
    pub description: String,
}

impl TaskUpdate {
    pub fn new(id: i64, task: NewTask) -> Self {
        Self {
            id,
            date: task.date,
            title: task.title,
            description: task.description,
        }
    }
}

/// Repository-level list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub date: Option<TaskDate>,
    pub status: Option<StatusFilter>,
    pub limit: u64,
    pub offset: u64,
}

impl TaskQuery {
    /// Non-positive `page` becomes 1 and non-positive `items_per_page`
    /// becomes [`DEFAULT_ITEMS_PER_PAGE`].
    pub fn new(
        date: Option<TaskDate>,
        status: Option<StatusFilter>,
        page: i64,
        items_per_page: i64,
    ) -> Self {
        let page = u64::try_from(page).ok().filter(|p| *p > 0).unwrap_or(1);
        let limit = u64::try_from(items_per_page)
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE);

        Self {
            date,
            status,
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

/// Query string of `GET /tasks`
///
/// `page` and `itemsPerPage` that are not integers are treated as absent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// `YYYYMMDD`; no date filter when empty
    #[serde(default)]
    pub date: String,

    /// "Не выполнено" or "Выполнено"; other values disable the filter
    #[serde(default)]
    pub status: String,

    /// 1-based page number
    #[serde(default)]
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,

    #[serde(default, rename = "itemsPerPage")]
    #[param(value_type = Option<i64>)]
    pub items_per_page: Option<String>,
}

impl ListTasksQuery {
    pub fn page(&self) -> i64 {
        lenient_int(self.page.as_deref())
    }

    pub fn items_per_page(&self) -> i64 {
        lenient_int(self.items_per_page.as_deref())
    }
}

fn lenient_int(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// `?id=` query string
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdQuery {
    /// Task id
    #[serde(default)]
    pub id: String,
}

/// Response of `GET /tasks`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

/// Response of `POST /task`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct CreatedTask {
    pub id: i64,
}

/// Parse a task id given as decimal text
pub fn parse_task_id(raw: &str) -> TaskResult<i64> {
    raw.parse()
        .map_err(|_| TaskError::InvalidId(raw.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn raw_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

/// JSON `null` reads as an absent field
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod id_as_string {
    use super::RawId;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Ok(n),
            RawId::Str(s) => s.parse().map_err(de::Error::custom),
        }
    }
}
