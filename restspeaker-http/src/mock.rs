//! In-memory transport for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::{HttpTransport, Response, Result, TransportError, TransportRequest};

enum Reply {
    Response(Response),
    Error(TransportError),
}

/// Transport that answers from a queue of canned replies and records every
/// request it receives.
///
/// Clones share the same queue and history, so a test can keep one handle
/// while the facade owns another.
#[derive(Clone, Default)]
pub struct MockTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn append(&self, response: Response) -> &Self {
        self.replies.lock().push_back(Reply::Response(response));
        self
    }

    /// Queue a transport failure.
    pub fn append_error(&self, error: TransportError) -> &Self {
        self.replies.lock().push_back(Reply::Error(error));
        self
    }

    /// Number of replies still queued.
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<Response> {
        let method = request.method.to_string();
        let uri = request.uri.clone();
        self.requests.lock().push(request);

        match self.replies.lock().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Error(error)) => Err(error),
            None => Err(TransportError::MockExhausted { method, uri }),
        }
    }
}
