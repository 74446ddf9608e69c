//! Blocking HTTP implementation of the remote taxonomy contract.
//!
//! # Responsibility
//! - Map each level to its REST collection path and speak the camelCase
//!   wire shape over it.
//! - Convert non-success responses into `Rejected` envelopes carrying the
//!   backend's body text verbatim.
//!
//! # Invariants
//! - No retries and no engine-side timeouts; transport-level failures
//!   surface as ordinary `Transport` errors.

use crate::model::node::Level;
use crate::remote::api::{NodeDraft, RemoteError, RemoteNode, RemoteOp, RemoteResult, RemoteTaxonomy};
use reqwest::blocking::{Client, Response};

/// HTTP-backed `RemoteTaxonomy` over one REST base URL.
///
/// Each level maps to a path segment, e.g. `["lineas", "sublineas",
/// "areas"]` yields `POST {base}/lineas`, `PUT {base}/sublineas/{code}`
/// and so on.
pub struct HttpRemoteTaxonomy {
    client: Client,
    base_url: String,
    segments: Vec<String>,
}

impl HttpRemoteTaxonomy {
    /// Creates a client for one backend with per-level path segments.
    pub fn new(base_url: impl Into<String>, segments: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            segments,
        }
    }

    fn collection_url(&self, op: RemoteOp, level: Level) -> RemoteResult<String> {
        let segment = self
            .segments
            .get(usize::from(level))
            .ok_or_else(|| RemoteError::Transport {
                op,
                message: format!("no path segment configured for level {level}"),
            })?;
        Ok(format!("{}/{segment}", self.base_url))
    }

    fn member_url(&self, op: RemoteOp, level: Level, code: &str) -> RemoteResult<String> {
        Ok(format!("{}/{code}", self.collection_url(op, level)?))
    }

    fn check_status(op: RemoteOp, level: Level, response: Response) -> RemoteResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().unwrap_or_default();
        let message = if body.trim().is_empty() {
            status.to_string()
        } else {
            body
        };
        Err(RemoteError::Rejected { op, level, message })
    }

    fn transport(op: RemoteOp, err: reqwest::Error) -> RemoteError {
        RemoteError::Transport {
            op,
            message: err.to_string(),
        }
    }
}

impl RemoteTaxonomy for HttpRemoteTaxonomy {
    fn create(&self, level: Level, draft: &NodeDraft) -> RemoteResult<RemoteNode> {
        let op = RemoteOp::Create;
        let response = self
            .client
            .post(self.collection_url(op, level)?)
            .json(draft)
            .send()
            .map_err(|err| Self::transport(op, err))?;
        Self::check_status(op, level, response)?
            .json::<RemoteNode>()
            .map_err(|err| Self::transport(op, err))
    }

    fn update(&self, level: Level, code: &str, draft: &NodeDraft) -> RemoteResult<RemoteNode> {
        let op = RemoteOp::Update;
        let response = self
            .client
            .put(self.member_url(op, level, code)?)
            .json(draft)
            .send()
            .map_err(|err| Self::transport(op, err))?;
        Self::check_status(op, level, response)?
            .json::<RemoteNode>()
            .map_err(|err| Self::transport(op, err))
    }

    fn delete(&self, level: Level, code: &str) -> RemoteResult<()> {
        let op = RemoteOp::Delete;
        let response = self
            .client
            .delete(self.member_url(op, level, code)?)
            .send()
            .map_err(|err| Self::transport(op, err))?;
        Self::check_status(op, level, response).map(|_| ())
    }

    fn list(&self, level: Level) -> RemoteResult<Vec<RemoteNode>> {
        let op = RemoteOp::List;
        let response = self
            .client
            .get(self.collection_url(op, level)?)
            .send()
            .map_err(|err| Self::transport(op, err))?;
        Self::check_status(op, level, response)?
            .json::<Vec<RemoteNode>>()
            .map_err(|err| Self::transport(op, err))
    }
}
