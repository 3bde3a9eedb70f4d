use async_trait::async_trait;
use fitola_core::Result;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::record::*;

/// In-process memory: an append-only list per user, lost on restart.
///
/// Retrieval ignores the query and returns the most recent records.
#[derive(Default)]
pub struct LocalMemory {
    records: Mutex<HashMap<String, Vec<MemoryRecord>>>,
}

impl LocalMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored for a user.
    pub fn count(&self, user_id: &str) -> usize {
        self.records.lock().get(user_id).map_or(0, Vec::len)
    }

    pub fn insert(
        &self,
        user_id: &str,
        interaction_type: &str,
        content: &serde_json::Value,
        category: MemoryCategory,
    ) -> MemorizeAck {
        let mut records = self.records.lock();
        let list = records.entry(user_id.to_string()).or_default();
        list.push(MemoryRecord {
            user_id: user_id.to_string(),
            interaction_type: interaction_type.to_string(),
            content: content.clone(),
            category,
            timestamp: Some(fitola_core::now_iso()),
            relevance: None,
        });
        MemorizeAck {
            task_id: format!("mock_{}", list.len()),
            status: "memorized_mock".into(),
            category,
        }
    }

    /// Last `limit` records in insertion order, optionally filtered by category.
    pub fn recent(
        &self,
        user_id: &str,
        category: Option<MemoryCategory>,
        limit: usize,
    ) -> Vec<MemoryRecord> {
        let records = self.records.lock();
        let Some(list) = records.get(user_id) else {
            return Vec::new();
        };
        let filtered: Vec<&MemoryRecord> = list
            .iter()
            .filter(|r| category.is_none_or(|c| r.category == c))
            .collect();
        let skip = filtered.len().saturating_sub(limit);
        filtered.into_iter().skip(skip).cloned().collect()
    }
}

#[async_trait]
impl MemoryBackend for LocalMemory {
    fn name(&self) -> &str {
        "local"
    }

    async fn memorize(
        &self,
        user_id: &str,
        interaction_type: &str,
        content: &serde_json::Value,
        category: MemoryCategory,
    ) -> Result<MemorizeAck> {
        Ok(self.insert(user_id, interaction_type, content, category))
    }

    async fn retrieve(
        &self,
        user_id: &str,
        _query: &str,
        category: Option<MemoryCategory>,
        limit: usize,
    ) -> Result<Vec<MemoryRecord>> {
        Ok(self.recent(user_id, category, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_counts_per_user() {
        let mem = LocalMemory::new();
        let content = serde_json::json!({"k": "v"});
        let a = mem.insert("alice", "x", &content, MemoryCategory::UserProfile);
        let b = mem.insert("alice", "y", &content, MemoryCategory::Patterns);
        let c = mem.insert("bob", "z", &content, MemoryCategory::Patterns);
        assert_eq!(a.task_id, "mock_1");
        assert_eq!(b.task_id, "mock_2");
        assert_eq!(c.task_id, "mock_1");
        assert_eq!(b.status, "memorized_mock");
        assert_eq!(b.category, MemoryCategory::Patterns);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mem = LocalMemory::new();
        for i in 0..7 {
            mem.insert("u", &format!("e{i}"), &serde_json::json!({}), MemoryCategory::UserProfile);
        }
        let recent = mem.recent("u", None, 3);
        let types: Vec<_> = recent.iter().map(|r| r.interaction_type.as_str()).collect();
        assert_eq!(types, vec!["e4", "e5", "e6"]);
    }

    #[test]
    fn test_category_filter() {
        let mem = LocalMemory::new();
        mem.insert("u", "a", &serde_json::json!({}), MemoryCategory::Patterns);
        mem.insert("u", "b", &serde_json::json!({}), MemoryCategory::Preferences);
        mem.insert("u", "c", &serde_json::json!({}), MemoryCategory::Patterns);
        let patterns = mem.recent("u", Some(MemoryCategory::Patterns), 10);
        assert_eq!(patterns.len(), 2);
        assert!(mem.recent("nobody", None, 10).is_empty());
        assert_eq!(mem.count("u"), 3);
    }
}
