//! Per-user conversation context.
//!
//! A bounded ring buffer of recent messages and their intents. Appending
//! past capacity evicts the oldest entry.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::intent::Intent;

/// Default number of entries kept per user.
pub const DEFAULT_CAPACITY: usize = 10;

/// One remembered message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextEntry {
    pub message: String,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
}

/// Context for all users, keyed by user id.
#[derive(Debug)]
pub struct ConversationStore {
    capacity: usize,
    users: Mutex<HashMap<String, VecDeque<ContextEntry>>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ConversationStore {
    /// A store keeping at most `capacity` entries per user (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            users: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a message, evicting the oldest entry when full.
    pub fn append(&self, user_id: &str, message: &str, intent: Intent) {
        self.append_at(user_id, message, intent, Utc::now());
    }

    pub fn append_at(&self, user_id: &str, message: &str, intent: Intent, timestamp: DateTime<Utc>) {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        let buf = users
            .entry(user_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        while buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(ContextEntry {
            message: message.to_string(),
            intent,
            timestamp,
        });
    }

    /// Entries for `user_id`, oldest first.
    pub fn history(&self, user_id: &str) -> Vec<ContextEntry> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users
            .get(user_id)
            .map(|buf| buf.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, user_id: &str) -> usize {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.get(user_id).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self, user_id: &str) -> bool {
        self.len(user_id) == 0
    }

    /// Forget everything for `user_id`. Returns how many entries were dropped.
    pub fn clear(&self, user_id: &str) -> usize {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.remove(user_id).map_or(0, |buf| buf.len())
    }
}
