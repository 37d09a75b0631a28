//! The four data-access operations on the `todos` table.
//!
//! Each call issues exactly one request through the injected `Transport` and
//! returns any remote error unchanged. No retries.

use tracing::{debug, instrument};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{NewTodo, Todo, TodoPatch};

#[derive(Debug, Clone)]
pub struct TodoService<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> TodoService<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "table request");
        self.transport.execute(&request)
    }

    /// All rows ordered by `created_at`, newest first.
    #[instrument(level = "debug", skip(self))]
    pub fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(self.client.build_list_todos())?;
        self.client.parse_list_todos(response)
    }

    /// Insert a row with the given task and return it as stored.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&self, task: &str) -> Result<Todo, ApiError> {
        let input = NewTodo {
            task: task.to_string(),
        };
        let response = self.send(self.client.build_create_todo(&input)?)?;
        self.client.parse_create_todo(response)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn update(&self, id: i64, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_update_todo(id, patch)?)?;
        self.client.parse_update_todo(response)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_todo(id))?;
        self.client.parse_delete_todo(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::http::HttpMethod;

    fn ok(status: u16, body: &str) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    fn service<F>(transport: F) -> TodoService<F>
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
    {
        TodoService::new(TodoClient::new("http://table.test", "key"), transport)
    }

    #[test]
    fn each_operation_issues_exactly_one_request() {
        let seen = Mutex::new(Vec::new());
        let svc = service(|req: &HttpRequest| {
            seen.lock().unwrap().push(req.method);
            match req.method {
                HttpMethod::Get => ok(200, "[]"),
                HttpMethod::Post => ok(201, r#"[{"id":1,"task":"A"}]"#),
                HttpMethod::Patch => ok(200, r#"[{"id":1,"task":"B"}]"#),
                HttpMethod::Delete => ok(204, ""),
            }
        });

        assert!(svc.list().unwrap().is_empty());
        assert_eq!(svc.create("A").unwrap().task, "A");
        assert_eq!(svc.update(1, &TodoPatch::task("B")).unwrap().task, "B");
        svc.delete(1).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Patch,
                HttpMethod::Delete
            ]
        );
    }

    #[test]
    fn transport_error_is_returned_unchanged() {
        let svc = service(|_: &HttpRequest| Err(ApiError::new("connection refused")));
        assert_eq!(svc.list().unwrap_err(), ApiError::new("connection refused"));
        assert_eq!(svc.delete(3).unwrap_err().message, "connection refused");
    }

    #[test]
    fn remote_error_message_reaches_the_caller() {
        let svc = service(|_: &HttpRequest| ok(409, r#"{"code":"23505","message":"duplicate key"}"#));
        let err = svc.create("dup").unwrap_err();
        assert_eq!(err.message, "duplicate key");
        assert_eq!(err.code.as_deref(), Some("23505"));
    }
}
