//! Rolling log of recent chat messages.

use std::collections::VecDeque;

use bevy::prelude::*;

use super::events::{ChatMessageEvent, MessageStyle};

/// Number of lines the log keeps.
pub const COMBAT_LOG_CAPACITY: usize = 10;

/// The most recent chat lines, oldest first.
#[derive(Resource, Debug, Default)]
pub struct CombatLog {
    entries: VecDeque<String>,
}

impl CombatLog {
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_back(line.into());
        while self.entries.len() > COMBAT_LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|line| line.contains(needle))
    }
}

/// Mirror chat messages into the log and the tracing output.
pub fn record_chat_messages(mut messages: EventReader<ChatMessageEvent>, mut log: ResMut<CombatLog>) {
    for message in messages.read() {
        match message.style {
            MessageStyle::Warning => warn!("[Combat] {}", message.text),
            MessageStyle::Boss => info!("[Boss] {}", message.text),
            _ => info!("[Combat] {}", message.text),
        }
        log.push(message.text.clone());
    }
}
