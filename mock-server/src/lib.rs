//! In-memory stand-in for the hosted `todos` table.
//!
//! Speaks the subset of the PostgREST wire format the client uses: filters
//! and ordering in the query string, `Prefer: return=representation` on
//! writes, and `{code, message, details, hint}` error bodies.

use std::{cmp::Ordering, collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const TABLE_PATH: &str = "/rest/v1/todos";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub task: String,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub is_complete: bool,
}

/// PostgREST accepts either a single object or an array of objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    Many(Vec<NewTodo>),
    One(NewTodo),
}

impl Insert {
    fn into_rows(self) -> Vec<NewTodo> {
        match self {
            Insert::Many(rows) => rows,
            Insert::One(row) => vec![row],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TodoPatch {
    pub task: Option<String>,
    pub is_complete: Option<bool>,
}

/// Table contents plus the identity sequence.
#[derive(Debug)]
pub struct Table {
    rows: BTreeMap<i64, Todo>,
    next_id: i64,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Table {
    /// A table pre-seeded with fixed rows; new ids continue after the largest.
    pub fn with_rows(rows: Vec<Todo>) -> Self {
        let next_id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        Self {
            rows: rows.into_iter().map(|row| (row.id, row)).collect(),
            next_id,
        }
    }

    fn insert(&mut self, task: String, is_complete: bool) -> Todo {
        let todo = Todo {
            id: self.next_id,
            task,
            is_complete,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.rows.insert(todo.id, todo.clone());
        todo
    }
}

pub type Db = Arc<RwLock<Table>>;

/// Error response in the service's JSON shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "code": self.code,
            "message": self.message,
            "details": null,
            "hint": null,
        });
        (self.status, Json(body)).into_response()
    }
}

type Params = HashMap<String, String>;

pub fn app() -> Router {
    app_with_rows(Vec::new())
}

pub fn app_with_rows(rows: Vec<Todo>) -> Router {
    let db: Db = Arc::new(RwLock::new(Table::with_rows(rows)));
    Router::new()
        .route(
            TABLE_PATH,
            get(list_todos)
                .post(create_todos)
                .patch(update_todos)
                .delete(delete_todos),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn wants_representation(headers: &HeaderMap) -> bool {
    headers
        .get_all("prefer")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.split(',').any(|p| p.trim() == "return=representation"))
}

/// Parse `order=<column>.<asc|desc>` into a comparator over rows.
fn order_by(params: &Params) -> Result<impl Fn(&Todo, &Todo) -> Ordering, ApiError> {
    let spec = params.get("order").map(String::as_str).unwrap_or("id.asc");
    let (column, direction) = spec.split_once('.').unwrap_or((spec, "asc"));
    let descending = match direction {
        "asc" => false,
        "desc" => true,
        other => {
            return Err(ApiError::bad_request(
                "PGRST100",
                format!("unexpected order direction \"{other}\""),
            ))
        }
    };
    let by_created = match column {
        "created_at" => true,
        "id" => false,
        other => {
            return Err(ApiError::bad_request(
                "42703",
                format!("column todos.{other} does not exist"),
            ))
        }
    };
    Ok(move |a: &Todo, b: &Todo| {
        let ord = if by_created {
            a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
        } else {
            a.id.cmp(&b.id)
        };
        if descending {
            ord.reverse()
        } else {
            ord
        }
    })
}

/// Writes other than insert must be scoped with `id=eq.<n>`.
fn id_filter(params: &Params) -> Result<i64, ApiError> {
    let filter = params
        .get("id")
        .ok_or_else(|| ApiError::bad_request("21000", "UPDATE and DELETE require a WHERE clause"))?;
    filter
        .strip_prefix("eq.")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| ApiError::bad_request("22P02", format!("invalid id filter \"{filter}\"")))
}

async fn list_todos(
    State(db): State<Db>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let compare = order_by(&params)?;
    let table = db.read().await;
    let mut rows: Vec<Todo> = table.rows.values().cloned().collect();
    rows.sort_by(compare);
    Ok(Json(rows))
}

async fn create_todos(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<Insert>,
) -> Result<Response, ApiError> {
    let rows = input.into_rows();
    if rows.iter().any(|row| row.task.is_none()) {
        return Err(ApiError::bad_request(
            "23502",
            "null value in column \"task\" of relation \"todos\" violates not-null constraint",
        ));
    }

    let mut table = db.write().await;
    let inserted: Vec<Todo> = rows
        .into_iter()
        .filter_map(|row| row.task.map(|task| table.insert(task, row.is_complete)))
        .collect();
    debug!(count = inserted.len(), "inserted rows");

    if wants_representation(&headers) {
        Ok((StatusCode::CREATED, Json(inserted)).into_response())
    } else {
        Ok(StatusCode::CREATED.into_response())
    }
}

async fn update_todos(
    State(db): State<Db>,
    Query(params): Query<Params>,
    headers: HeaderMap,
    Json(patch): Json<TodoPatch>,
) -> Result<Response, ApiError> {
    let id = id_filter(&params)?;
    let mut table = db.write().await;
    let updated: Vec<Todo> = match table.rows.get_mut(&id) {
        Some(todo) => {
            if let Some(task) = patch.task {
                todo.task = task;
            }
            if let Some(is_complete) = patch.is_complete {
                todo.is_complete = is_complete;
            }
            vec![todo.clone()]
        }
        None => Vec::new(),
    };

    if wants_representation(&headers) {
        Ok((StatusCode::OK, Json(updated)).into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

async fn delete_todos(
    State(db): State<Db>,
    Query(params): Query<Params>,
) -> Result<StatusCode, ApiError> {
    let id = id_filter(&params)?;
    let removed = db.write().await.rows.remove(&id).is_some();
    debug!(id, removed, "delete");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn row(id: i64, secs: i64) -> Todo {
        Todo {
            id,
            task: format!("task {id}"),
            is_complete: false,
            created_at: DateTime::from_timestamp(secs, 0).unwrap(),
        }
    }

    #[test]
    fn insert_accepts_object_or_array() {
        let one: Insert = serde_json::from_str(r#"{"task":"A"}"#).unwrap();
        assert_eq!(one.into_rows().len(), 1);
        let many: Insert = serde_json::from_str(r#"[{"task":"A"},{"task":"B"}]"#).unwrap();
        assert_eq!(many.into_rows().len(), 2);
    }

    #[test]
    fn insert_defaults_is_complete_to_false() {
        let input: NewTodo = serde_json::from_str(r#"{"task":"No flag"}"#).unwrap();
        assert!(!input.is_complete);
    }

    #[test]
    fn seeded_table_continues_the_sequence() {
        let mut table = Table::with_rows(vec![row(4, 10), row(9, 20)]);
        assert_eq!(table.insert("next".into(), false).id, 10);
    }

    #[test]
    fn order_created_at_desc_breaks_ties_by_id() {
        let compare = order_by(&params(&[("order", "created_at.desc")])).unwrap();
        let mut rows = vec![row(1, 5), row(2, 5), row(3, 9)];
        rows.sort_by(compare);
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn order_rejects_unknown_column() {
        assert!(order_by(&params(&[("order", "priority.asc")])).is_err());
        assert!(order_by(&params(&[("order", "id.sideways")])).is_err());
    }

    #[test]
    fn id_filter_requires_eq_prefix() {
        assert_eq!(id_filter(&params(&[("id", "eq.12")])).unwrap(), 12);
        assert!(id_filter(&params(&[("id", "12")])).is_err());
        assert!(id_filter(&params(&[])).is_err());
    }

    #[test]
    fn prefer_header_may_list_several_preferences() {
        let mut headers = HeaderMap::new();
        headers.insert("prefer", "count=exact, return=representation".parse().unwrap());
        assert!(wants_representation(&headers));
        assert!(!wants_representation(&HeaderMap::new()));
    }
}
