//! Resource request lifecycle
//!
//! A request moves `Pending -> Resolving -> Finished | Failed`, or
//! `Pending -> Cancelled` when it is stopped before it starts. It reaches a
//! terminal state exactly once. A successful completion delivers the
//! response head, the whole body and the finish signal while holding the
//! request's lock, so the three calls are never interleaved with anything
//! else for the same request.

use crate::error::ResolveError;
use aibridge_core::OCTET_STREAM;
use bytes::Bytes;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// How a request's URL was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedKind {
    /// Transfer-prefixed, served from bundled assets
    Bundled,
    /// Personal-prefixed, served from the model archive
    PersonalArchiveEntry,
    /// Not routable
    #[default]
    Unresolved,
}

impl ResolvedKind {
    /// Short label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::PersonalArchiveEntry => "personal",
            Self::Unresolved => "unresolved",
        }
    }
}

/// Lifecycle state of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Resolving,
    Finished,
    Failed,
    Cancelled,
}

impl RequestState {
    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed | Self::Cancelled)
    }
}

/// Response head delivered before the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    /// Requested URL
    pub url: String,

    /// Always `application/octet-stream`
    pub mime_type: &'static str,

    /// Exact body length in bytes
    pub expected_content_length: usize,
}

impl ResourceResponse {
    /// Create the response head for a body of `len` bytes
    pub fn octet_stream(url: impl Into<String>, len: usize) -> Self {
        Self {
            url: url.into(),
            mime_type: OCTET_STREAM,
            expected_content_length: len,
        }
    }
}

/// The host side of a single fetch over the private scheme.
///
/// Callbacks run while the request lock is held and must not call back into
/// the owning [`ResourceRequest`].
pub trait SchemeTask: Send + Sync {
    /// The requested URL
    fn url(&self) -> &str;

    /// Response head
    fn did_receive_response(&self, response: &ResourceResponse);

    /// The complete body
    fn did_receive_data(&self, data: &Bytes);

    /// Successful completion
    fn did_finish(&self);

    /// Failed completion; no body was or will be delivered
    fn did_fail(&self, error: &ResolveError);
}

#[derive(Debug)]
struct RequestInner {
    state: RequestState,
    kind: ResolvedKind,
}

/// A single fetch being driven by the router
pub struct ResourceRequest {
    id: Uuid,
    task: Arc<dyn SchemeTask>,
    inner: Mutex<RequestInner>,
}

impl ResourceRequest {
    /// Wrap a host task in a new pending request
    pub fn new(task: Arc<dyn SchemeTask>) -> Self {
        Self {
            id: Uuid::new_v4(),
            task,
            inner: Mutex::new(RequestInner {
                state: RequestState::Pending,
                kind: ResolvedKind::Unresolved,
            }),
        }
    }

    /// Request identifier used in logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The requested URL
    pub fn url(&self) -> &str {
        self.task.url()
    }

    /// Current state
    pub fn state(&self) -> RequestState {
        self.inner.lock().state
    }

    /// Classification recorded when resolution started
    pub fn resolved_kind(&self) -> ResolvedKind {
        self.inner.lock().kind
    }

    /// Cancel the request if it has not started resolving.
    ///
    /// Returns whether the request was cancelled; once resolution has begun
    /// this is a no-op.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == RequestState::Pending {
            inner.state = RequestState::Cancelled;
            true
        } else {
            false
        }
    }

    /// Move `Pending -> Resolving`; false if the request already left Pending
    pub(crate) fn begin(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == RequestState::Pending {
            inner.state = RequestState::Resolving;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_kind(&self, kind: ResolvedKind) {
        self.inner.lock().kind = kind;
    }

    /// Deliver the outcome and terminate the request.
    ///
    /// Returns false, delivering nothing, unless the request is resolving.
    pub(crate) fn complete(&self, outcome: &Result<Bytes, ResolveError>) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != RequestState::Resolving {
            return false;
        }

        match outcome {
            Ok(data) => {
                let response = ResourceResponse::octet_stream(self.task.url(), data.len());
                self.task.did_receive_response(&response);
                self.task.did_receive_data(data);
                self.task.did_finish();
                inner.state = RequestState::Finished;
            }
            Err(err) => {
                self.task.did_fail(err);
                inner.state = RequestState::Failed;
            }
        }
        true
    }
}

impl fmt::Debug for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ResourceRequest")
            .field("id", &self.id)
            .field("url", &self.task.url())
            .field("state", &inner.state)
            .field("kind", &inner.kind)
            .finish()
    }
}
