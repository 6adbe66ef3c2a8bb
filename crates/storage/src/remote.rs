//! Remote task store
//!
//! Talks to a JSONPlaceholder-compatible mock REST API:
//! - `GET /todos?_limit=N`
//! - `POST /todos`
//! - `PATCH /todos/{id}`
//! - `DELETE /todos/{id}`
//!
//! The mock echoes writes back without persisting them, so responses are
//! trusted only for the fields they actually carry.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use taskdeck_core::{RemoteConfig, Task, TaskId, TaskTitle, UserId};
use tracing::{debug, warn};

use crate::error::{Operation, Result, StoreError};
use crate::trait_::TaskStore;

/// Remote task store over HTTP
#[derive(Clone)]
pub struct RemoteTaskStore {
    client: Client,
    base_url: String,
    fetch_limit: usize,
    user_id: UserId,
}

impl std::fmt::Debug for RemoteTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTaskStore")
            .field("base_url", &self.base_url)
            .field("fetch_limit", &self.fetch_limit)
            .finish_non_exhaustive()
    }
}

/// Record as echoed by the server; any field may be missing
#[derive(Debug, Deserialize)]
struct TaskEcho {
    id: Option<TaskId>,
    title: Option<String>,
    completed: Option<bool>,
    #[serde(rename = "userId")]
    user_id: Option<UserId>,
}

impl TaskEcho {
    /// Fill gaps in the echo from what was requested.
    fn merge_into(self, requested: Task) -> Task {
        Task {
            id: self.id.unwrap_or(requested.id),
            title: self.title.unwrap_or(requested.title),
            completed: self.completed.unwrap_or(requested.completed),
            user_id: self.user_id.or(requested.user_id),
        }
    }
}

impl RemoteTaskStore {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(StoreError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fetch_limit: config.fetch_limit,
            user_id: config.user_id,
        })
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: TaskId) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    /// Reject non-2xx responses.
    fn check(operation: Operation, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            warn!(%operation, status = status.as_u16(), "remote store rejected request");
            Err(StoreError::Status {
                operation,
                status: status.as_u16(),
            })
        }
    }

    async fn send(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<Response> {
        let response = request.send().await.map_err(|source| {
            warn!(%operation, error = %source, "remote store request failed");
            StoreError::Network { operation, source }
        })?;
        Self::check(operation, response)
    }

    async fn read_echo(operation: Operation, response: Response) -> Result<TaskEcho> {
        response
            .json::<TaskEcho>()
            .await
            .map_err(|e| StoreError::Response {
                operation,
                message: e.to_string(),
            })
    }

    async fn patch(
        &self,
        operation: Operation,
        id: TaskId,
        body: serde_json::Value,
        requested: Task,
    ) -> Result<Task> {
        let response = self
            .send(operation, self.client.patch(self.todo_url(id)).json(&body))
            .await?;
        let echo = Self::read_echo(operation, response).await?;
        Ok(echo.merge_into(requested))
    }
}

#[async_trait]
impl TaskStore for RemoteTaskStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn list_tasks(&self, limit: Option<usize>) -> Result<Vec<Task>> {
        let limit = limit.unwrap_or(self.fetch_limit);
        let response = self
            .send(
                Operation::List,
                self.client
                    .get(self.todos_url())
                    .query(&[("_limit", limit)]),
            )
            .await?;
        let mut tasks: Vec<Task> = response.json().await.map_err(|e| StoreError::Response {
            operation: Operation::List,
            message: e.to_string(),
        })?;
        tasks.truncate(limit);
        debug!(count = tasks.len(), "listed remote tasks");
        Ok(tasks)
    }

    async fn create_task(&self, title: &str) -> Result<Task> {
        let title = TaskTitle::parse(title)?;
        let body = serde_json::json!({
            "title": title.as_str(),
            "completed": false,
            "userId": self.user_id,
        });
        let response = self
            .send(Operation::Create, self.client.post(self.todos_url()).json(&body))
            .await?;
        let echo = Self::read_echo(Operation::Create, response).await?;
        let Some(id) = echo.id else {
            return Err(StoreError::Response {
                operation: Operation::Create,
                message: "created record carries no id".to_string(),
            });
        };
        let task = echo.merge_into(Task::new(id, title).with_owner(self.user_id));
        debug!(id = %task.id, "created remote task");
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, completed: bool) -> Result<Task> {
        let requested = Task {
            id,
            title: String::new(),
            completed: !completed,
            user_id: None,
        };
        let body = serde_json::json!({ "completed": !completed });
        let task = self.patch(Operation::Update, id, body, requested).await?;
        debug!(%id, completed = task.completed, "updated remote task");
        Ok(task)
    }

    async fn rename_task(&self, id: TaskId, title: &str) -> Result<Task> {
        let title = TaskTitle::parse(title)?;
        let body = serde_json::json!({ "title": title.as_str() });
        let requested = Task::new(id, title);
        let task = self.patch(Operation::Rename, id, body, requested).await?;
        debug!(%id, "renamed remote task");
        Ok(task)
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        self.send(Operation::Delete, self.client.delete(self.todo_url(id)))
            .await?;
        debug!(%id, "deleted remote task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store_for(server: &MockServer) -> RemoteTaskStore {
        RemoteTaskStore::new(&RemoteConfig {
            base_url: format!("{}/", server.uri()),
            ..RemoteConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_default_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("_limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"userId": 1, "id": 1, "title": "delectus aut autem", "completed": false},
                {"userId": 1, "id": 2, "title": "quis ut nam", "completed": true}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = store_for(&server).await.list_tasks(None).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].id, TaskId(2));
        assert!(tasks[1].completed);
        assert_eq!(tasks[0].user_id, Some(1));
    }

    #[tokio::test]
    async fn test_list_failure_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = store_for(&server).await.list_tasks(Some(3)).await.unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 503, .. }));
        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[tokio::test]
    async fn test_create_posts_title_and_owner() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos"))
            .and(body_json(json!({"title": "Buy milk", "completed": false, "userId": 1})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "title": "Buy milk", "completed": false, "userId": 1, "id": 201
            })))
            .expect(1)
            .mount(&server)
            .await;

        let task = store_for(&server)
            .await
            .create_task("  Buy milk ")
            .await
            .unwrap();
        assert_eq!(task.id, TaskId(201));
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn test_create_without_id_in_echo_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"title": "x"})))
            .mount(&server)
            .await;

        let err = store_for(&server).await.create_task("x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = store_for(&server).await.create_task(" ").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidTitle(_)));
    }

    #[tokio::test]
    async fn test_update_patches_negated_flag() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/todos/4"))
            .and(body_json(json!({"completed": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "userId": 1, "id": 4, "title": "et porro tempora", "completed": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let task = store_for(&server)
            .await
            .update_task(TaskId(4), false)
            .await
            .unwrap();
        assert!(task.completed);
        assert_eq!(task.title, "et porro tempora");
    }

    #[tokio::test]
    async fn test_partial_echo_is_filled_from_request() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/todos/201"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"completed": false})))
            .mount(&server)
            .await;

        let task = store_for(&server)
            .await
            .update_task(TaskId(201), true)
            .await
            .unwrap();
        assert_eq!(task.id, TaskId(201));
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn test_rename_patches_title() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/todos/2"))
            .and(body_json(json!({"title": "Renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "title": "Renamed"})))
            .expect(1)
            .mount(&server)
            .await;

        let task = store_for(&server)
            .await
            .rename_task(TaskId(2), "Renamed ")
            .await
            .unwrap();
        assert_eq!(task.title, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_status_handling() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/todos/2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = store_for(&server).await;
        store.delete_task(TaskId(1)).await.unwrap();
        let err = store.delete_task(TaskId(2)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let store = RemoteTaskStore::new(&RemoteConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 5,
            ..RemoteConfig::default()
        })
        .unwrap();

        let err = store.delete_task(TaskId(1)).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Network {
                operation: Operation::Delete,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::Write);
    }
}
