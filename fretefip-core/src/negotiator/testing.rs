use std::collections::VecDeque;
use std::sync::Mutex;

use crate::transport::{TransportError, TransportRequest, TransportResponse, Verb};

pub(crate) type Reply = Result<TransportResponse, TransportError>;

pub(crate) fn reply(status: u16, body: &str) -> Reply {
    Ok(TransportResponse::new(status, body))
}

pub(crate) fn timeout() -> Reply {
    Err(TransportError::Timeout("timed out after 30s".to_string()))
}

/// Answers with a fixed script of replies and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            sent: Mutex::default(),
        }
    }

    pub(crate) fn sent(&self) -> Vec<TransportRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn verbs(&self) -> Vec<Verb> {
        self.sent().iter().map(|r| r.verb).collect()
    }

    fn next(&self, request: &TransportRequest) -> Reply {
        self.sent.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("script exhausted".to_string())))
    }
}

#[cfg(feature = "sync")]
impl crate::Transport for ScriptedTransport {
    fn send(&self, request: &TransportRequest) -> Reply {
        self.next(request)
    }
}

#[cfg(feature = "async")]
#[async_trait::async_trait]
impl crate::AsyncTransport for ScriptedTransport {
    async fn send(&self, request: &TransportRequest) -> Reply {
        self.next(request)
    }
}

/// A server that only accepts `GET`.
#[derive(Default)]
pub(crate) struct GetOnlyServer {
    sent: Mutex<Vec<Verb>>,
}

impl GetOnlyServer {
    pub(crate) fn verbs(&self) -> Vec<Verb> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(feature = "sync")]
impl crate::Transport for GetOnlyServer {
    fn send(&self, request: &TransportRequest) -> Reply {
        self.sent.lock().unwrap().push(request.verb);
        match request.verb {
            Verb::Post => reply(405, r#"{"message":"Method Not Allowed"}"#),
            Verb::Get => reply(200, r#"{"success":true}"#),
        }
    }
}
