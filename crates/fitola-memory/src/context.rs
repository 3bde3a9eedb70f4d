use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One workflow invocation remembered as conversational context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    pub timestamp: String,
    pub workflow: String,
    pub context: serde_json::Value,
    pub parameters: serde_json::Value,
}

impl ContextEntry {
    pub fn new(
        workflow: impl Into<String>,
        context: serde_json::Value,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            timestamp: fitola_core::now_iso(),
            workflow: workflow.into(),
            context,
            parameters,
        }
    }
}

/// Per-user rolling history of workflow contexts, trimmed to the newest `cap`.
pub struct ContextStore {
    cap: usize,
    entries: Mutex<HashMap<String, Vec<ContextEntry>>>,
}

impl ContextStore {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Append an entry and return the user's history including it.
    pub fn push(&self, user_id: &str, entry: ContextEntry) -> Vec<ContextEntry> {
        let mut entries = self.entries.lock();
        let list = entries.entry(user_id.to_string()).or_default();
        list.push(entry);
        if list.len() > self.cap {
            let excess = list.len() - self.cap;
            list.drain(..excess);
        }
        list.clone()
    }

    pub fn history(&self, user_id: &str) -> Vec<ContextEntry> {
        self.entries
            .lock()
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new(10)
    }
}
