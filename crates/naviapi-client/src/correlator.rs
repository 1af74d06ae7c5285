//! Reply correlation and the pending-call table.
//!
//! ```text
//!   inbound reply {request:{info, id?}, response}
//!            │
//!     id echoed? ── yes ──► pending[id]
//!            │ no
//!            ▼
//!     oldest pending call with verb == info
//!            │
//!     decode, update handles, wake the caller
//! ```
//!
//! The verb-name fallback only serves remotes that do not echo `request.id`. It
//! cannot tell apart two outstanding calls of the same verb: replies that come
//! back out of order are handed to the wrong callers.

use std::collections::HashMap;
use std::time::Instant;

use naviapi_protocol::{DecodedReply, HandleStore, Verb, decode_reply};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::error::{NaviClientError, NaviClientResult};

pub type CallId = String;

struct PendingCall {
    verb: Verb,
    seq: u64,
    issued_at: Instant,
    sender: oneshot::Sender<DecodedReply>,
}

#[derive(Default)]
struct PendingTable {
    calls: HashMap<CallId, PendingCall>,
    next_seq: u64,
}

impl PendingTable {
    fn oldest_for(&self, verb: Verb) -> Option<CallId> {
        self.calls
            .iter()
            .filter(|(_, call)| call.verb == verb)
            .min_by_key(|(_, call)| call.seq)
            .map(|(id, _)| id.clone())
    }
}

/// What happened to an inbound reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Matched and handed to the waiting call
    Delivered { id: CallId, verb: Verb },
    /// No call was waiting; side effects were still applied
    Unmatched { verb: Verb },
    /// Neither a known id nor a recognizable verb
    Dropped,
}

/// Routes replies to pending calls and maintains the handle cache.
pub struct ReplyCorrelator {
    pending: Mutex<PendingTable>,
    handles: Mutex<HandleStore>,
    max_pending: usize,
}

impl ReplyCorrelator {
    pub fn new(max_pending: usize) -> Self {
        Self {
            pending: Mutex::new(PendingTable::default()),
            handles: Mutex::new(HandleStore::new()),
            max_pending,
        }
    }

    /// Snapshot of the cached handles
    pub fn handles(&self) -> HandleStore {
        *self.handles.lock()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().calls.len()
    }

    /// Ids of the calls awaiting a reply, oldest first
    pub fn pending_ids(&self) -> Vec<CallId> {
        let pending = self.pending.lock();
        let mut calls: Vec<(&CallId, u64)> =
            pending.calls.iter().map(|(id, call)| (id, call.seq)).collect();
        calls.sort_by_key(|(_, seq)| *seq);
        calls.into_iter().map(|(id, _)| id.clone()).collect()
    }

    /// Register a waiter for the reply to call `id`.
    pub fn register(
        &self,
        id: CallId,
        verb: Verb,
    ) -> NaviClientResult<oneshot::Receiver<DecodedReply>> {
        let mut pending = self.pending.lock();
        let pending_len = pending.calls.len();
        if pending_len >= self.max_pending {
            warn!(
                pending_len,
                max_pending = self.max_pending,
                %verb,
                "too many pending calls; refusing new call"
            );
            return Err(NaviClientError::TooManyPending {
                limit: self.max_pending,
            });
        }

        let (sender, receiver) = oneshot::channel();
        let seq = pending.next_seq;
        pending.next_seq += 1;
        trace!(%id, %verb, pending_len = pending_len + 1, "registered pending call");
        pending.calls.insert(
            id,
            PendingCall {
                verb,
                seq,
                issued_at: Instant::now(),
                sender,
            },
        );
        Ok(receiver)
    }

    /// Forget call `id`. Returns whether it was still pending.
    pub fn cancel(&self, id: &str) -> bool {
        self.pending.lock().calls.remove(id).is_some()
    }

    /// Route an inbound reply envelope.
    pub fn dispatch(&self, reply: &Value) -> Dispatch {
        let echoed_verb = reply
            .pointer("/request/info")
            .and_then(Value::as_str)
            .and_then(|info| info.parse::<Verb>().ok());
        let echoed_id = reply.pointer("/request/id").and_then(Value::as_str);

        let matched = {
            let mut pending = self.pending.lock();
            let id = match echoed_id {
                Some(id) => Some(id.to_string()),
                None => echoed_verb.and_then(|verb| pending.oldest_for(verb)),
            };
            id.and_then(|id| pending.calls.remove_entry(&id))
        };

        let Some(verb) = matched.as_ref().map(|(_, call)| call.verb).or(echoed_verb) else {
            warn!(id = ?echoed_id, "reply without a known call or verb dropped");
            return Dispatch::Dropped;
        };

        let decoded = decode_reply(verb, reply);
        self.apply_side_effects(&decoded);

        match matched {
            Some((id, call)) => {
                debug!(
                    %id,
                    %verb,
                    elapsed_ms = call.issued_at.elapsed().as_millis() as u64,
                    "reply delivered"
                );
                if call.sender.send(decoded).is_err() {
                    debug!(%id, %verb, "caller stopped waiting before delivery");
                }
                Dispatch::Delivered { id, verb }
            }
            None => {
                warn!(id = ?echoed_id, %verb, "reply matched no pending call");
                Dispatch::Unmatched { verb }
            }
        }
    }

    fn apply_side_effects(&self, decoded: &DecodedReply) {
        let mut handles = self.handles.lock();
        match decoded {
            DecodedReply::Sessions(sessions) => {
                if let Some(&first) = sessions.keys().next() {
                    handles.set_session(first);
                }
            }
            DecodedReply::Routes(routes) => {
                if let Some(&first) = routes.first() {
                    handles.set_route(first);
                }
            }
            DecodedReply::CreatedRoute(route) => handles.set_route(*route),
            DecodedReply::Position(_) | DecodedReply::Ack => {}
        }
    }
}
