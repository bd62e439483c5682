//! In-memory [`WorkflowApi`] used by the engine's unit tests.

use std::sync::Mutex;

use serde_json::{Value, json};
use wfd_api::{ApiError, CatalogPage, DispatchReply, WorkflowApi};
use wfd_types::{DispatchRequest, RepositorySlug, WorkflowDescriptor};

/// A recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPage { cursor: Option<String> },
    Dispatch { workflow_id: u64, git_ref: String },
    GetRun { url: String },
}

pub enum FakeDispatch {
    Reply(DispatchReply),
    Reject { status: u16, message: String },
}

pub struct FakeApi {
    pages: Vec<Vec<WorkflowDescriptor>>,
    dispatch: FakeDispatch,
    run: Value,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new(pages: Vec<Vec<WorkflowDescriptor>>) -> Self {
        Self {
            pages,
            dispatch: FakeDispatch::Reply(DispatchReply {
                http_status: "204 No Content".into(),
                body: Value::Null,
            }),
            run: Value::Null,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_dispatch(mut self, dispatch: FakeDispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_queued_reply(self, workflow_url: &str) -> Self {
        self.with_dispatch(FakeDispatch::Reply(DispatchReply {
            http_status: "200 OK".into(),
            body: json!({ "status": "queued", "workflow_url": workflow_url }),
        }))
    }

    pub fn with_run(mut self, run: Value) -> Self {
        self.run = run;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait::async_trait]
impl WorkflowApi for FakeApi {
    async fn list_workflows_page(
        &self,
        _slug: &RepositorySlug,
        _git_ref: &str,
        cursor: Option<&str>,
    ) -> Result<CatalogPage, ApiError> {
        self.record(Call::ListPage {
            cursor: cursor.map(str::to_string),
        });
        let index = match cursor {
            None => 0,
            Some(link) => link
                .strip_prefix("page:")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ApiError::Url(format!("unknown cursor {link}")))?,
        };
        let workflows = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| format!("page:{}", index + 1));
        Ok(CatalogPage {
            raw: json!({ "total_count": workflows.len(), "workflows": workflows }),
            workflows,
            next,
        })
    }

    async fn dispatch(&self, _slug: &RepositorySlug, workflow_id: u64, request: &DispatchRequest) -> Result<DispatchReply, ApiError> {
        self.record(Call::Dispatch {
            workflow_id,
            git_ref: request.git_ref.clone(),
        });
        match &self.dispatch {
            FakeDispatch::Reply(reply) => Ok(reply.clone()),
            FakeDispatch::Reject { status, message } => Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    async fn get_run(&self, url: &str) -> Result<Value, ApiError> {
        self.record(Call::GetRun { url: url.to_string() });
        Ok(self.run.clone())
    }
}

pub fn sample_catalog() -> Vec<WorkflowDescriptor> {
    vec![
        WorkflowDescriptor::new(1, "build", ".github/workflows/build.yml"),
        WorkflowDescriptor::new(2, "deploy", ".github/workflows/deploy.yml"),
    ]
}
