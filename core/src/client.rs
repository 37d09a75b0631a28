//! Stateless HTTP request builder and response parser for the `todos` table.
//!
//! # Design
//! `TodoClient` holds only the project URL and API key and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. A `Transport` executes the round-trip in between, keeping
//! this module deterministic and free of I/O.
//!
//! Requests follow the PostgREST conventions of the hosted table service:
//! filters go in the query string (`id=eq.7`), ordering is `order=col.desc`,
//! and writes ask for the affected rows back with `Prefer: return=representation`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoPatch};

/// Name of the remote table.
pub const TABLE: &str = "todos";

const REST_PREFIX: &str = "rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Synchronous, stateless client for the `todos` table.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    api_key: String,
}

impl TodoClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, query: &str) -> String {
        format!("{}/{REST_PREFIX}/{TABLE}?{query}", self.base_url)
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![
            ("apikey".to_string(), self.api_key.clone()),
            ("authorization".to_string(), format!("Bearer {}", self.api_key)),
        ]
    }

    fn write_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.auth_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        headers.push(("prefer".to_string(), RETURN_REPRESENTATION.to_string()));
        headers
    }

    /// All rows, newest first.
    pub fn build_list_todos(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.table_url("select=*&order=created_at.desc"),
            headers: self.auth_headers(),
            body: None,
        }
    }

    /// Insert one row carrying only `task`.
    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.table_url("select=*"),
            headers: self.write_headers(),
            body: Some(to_json(&[input])?),
        })
    }

    pub fn build_update_todo(&self, id: i64, patch: &TodoPatch) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: self.table_url(&format!("id=eq.{id}&select=*")),
            headers: self.write_headers(),
            body: Some(to_json(patch)?),
        })
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.table_url(&format!("id=eq.{id}")),
            headers: self.auth_headers(),
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    /// The inserted row as resolved by the store.
    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        first_row(from_json(&response.body)?, "insert returned no rows")
    }

    /// The updated row. A filter that matched nothing is reported as an error.
    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        first_row(from_json(&response.body)?, "update matched no rows")
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Map non-success status codes to an `ApiError` built from the body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_response(response))
}

fn first_row(rows: Vec<Todo>, empty: &str) -> Result<Todo, ApiError> {
    rows.into_iter().next().ok_or_else(|| ApiError::new(empty))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::new(format!("invalid request body: {e}")))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::decode)
}
