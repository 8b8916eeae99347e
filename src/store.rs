//! Interfaces the app's screens use to persist meals and coach chat, plus
//! an in-memory implementation.
//!
//! The production app backs these with a managed document store; this crate
//! only defines the contracts.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use tokio::sync::broadcast;

use crate::error::StoreError;
use crate::model::{ChatMessage, DaySummary, MealEntry, MealSlot};

/// Persists a logged meal
#[async_trait]
pub trait MealLogWriter: Send + Sync {
    /// Store `meal` and return its identifier
    async fn add_meal(&self, meal: MealEntry) -> Result<String, StoreError>;
}

/// Reads logged meals back per day and slot
#[async_trait]
pub trait MealLogReader: Send + Sync {
    async fn meals_for(&self, date: NaiveDate, slot: MealSlot) -> Result<DaySummary, StoreError>;
}

/// Append-only chat storage keyed by conversation
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn send(&self, message: ChatMessage) -> Result<(), StoreError>;

    /// Messages of a conversation, newest first
    async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, StoreError>;

    /// Live feed of messages sent after subscribing
    fn subscribe(&self, conversation_id: &str) -> broadcast::Receiver<ChatMessage>;
}

/// Conversation identifier shared by two participants.
///
/// The ids are sorted before joining, so both sides derive the same value.
pub fn conversation_id(a: &str, b: &str) -> String {
    let mut ids = [a, b];
    ids.sort_unstable();
    ids.join("_")
}

pub fn validate_meal(meal: &MealEntry) -> Result<(), StoreError> {
    if meal.name.trim().is_empty() {
        return Err(StoreError::Invalid("meal name is empty".to_string()));
    }
    if meal.calories == 0 {
        return Err(StoreError::Invalid("calories must be positive".to_string()));
    }
    Ok(())
}

const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct MemoryState {
    meals: Vec<(String, MealEntry)>,
    messages: HashMap<String, Vec<ChatMessage>>,
    channels: HashMap<String, broadcast::Sender<ChatMessage>>,
}

/// In-memory meal log and message store
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // Every critical section is a single push or read, so poisoning is harmless
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MealLogWriter for MemoryStore {
    async fn add_meal(&self, meal: MealEntry) -> Result<String, StoreError> {
        validate_meal(&meal)?;
        let mut state = self.lock();
        let id = format!("meal-{}", state.meals.len() + 1);
        debug!("Logged {} ({} kcal) as {}", meal.name, meal.calories, id);
        state.meals.push((id.clone(), meal));
        Ok(id)
    }
}

#[async_trait]
impl MealLogReader for MemoryStore {
    async fn meals_for(&self, date: NaiveDate, slot: MealSlot) -> Result<DaySummary, StoreError> {
        let state = self.lock();
        let entries = state
            .meals
            .iter()
            .filter(|(_, m)| m.date == date && m.slot == slot)
            .map(|(_, m)| m.clone())
            .collect();
        Ok(DaySummary::from_entries(entries))
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn send(&self, message: ChatMessage) -> Result<(), StoreError> {
        if message.content.trim().is_empty() {
            return Err(StoreError::Invalid("message is empty".to_string()));
        }
        let mut state = self.lock();
        state.channels.retain(|_, tx| tx.receiver_count() > 0);
        if let Some(tx) = state.channels.get(&message.conversation_id) {
            // No live subscribers is fine
            let _ = tx.send(message.clone());
        }
        state
            .messages
            .entry(message.conversation_id.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let state = self.lock();
        let mut messages = state
            .messages
            .get(conversation_id)
            .cloned()
            .unwrap_or_default();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    fn subscribe(&self, conversation_id: &str) -> broadcast::Receiver<ChatMessage> {
        let mut state = self.lock();
        state
            .channels
            .entry(conversation_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}
