//! In-process direct messaging between users. Lost on restart.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectMessage {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub text: String,
    pub sent_at: String,
}

/// Messages grouped by conversation (the unordered pair of participants).
#[derive(Default)]
pub struct MessageStore {
    conversations: Mutex<HashMap<(String, String), Vec<DirectMessage>>>,
}

fn conversation_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, from: &str, to: &str, text: &str) -> DirectMessage {
        let message = DirectMessage {
            id: uuid::Uuid::new_v4().to_string(),
            from_user_id: from.to_string(),
            to_user_id: to.to_string(),
            text: text.to_string(),
            sent_at: fitola_core::now_iso(),
        };
        self.conversations
            .lock()
            .entry(conversation_key(from, to))
            .or_default()
            .push(message.clone());
        message
    }

    /// Messages involving `user_id`, oldest first. `with` narrows to one conversation.
    pub fn for_user(&self, user_id: &str, with: Option<&str>) -> Vec<DirectMessage> {
        let conversations = self.conversations.lock();
        if let Some(other) = with {
            return conversations
                .get(&conversation_key(user_id, other))
                .cloned()
                .unwrap_or_default();
        }
        let mut messages: Vec<DirectMessage> = conversations
            .iter()
            .filter(|((a, b), _)| a == user_id || b == user_id)
            .flat_map(|(_, msgs)| msgs.iter().cloned())
            .collect();
        messages.sort_by(|x, y| x.sent_at.cmp(&y.sent_at));
        messages
    }
}
