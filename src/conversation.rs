//! Caller-owned chat history with a bounded turn window.

use crate::provider::ChatMessage;
use serde::Serialize;
use std::collections::VecDeque;

/// One completed exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    pub user: String,
    pub assistant: String,
}

/// History for a single chat session.
///
/// Only the last `window` turns are kept; older turns are evicted first-in,
/// first-out as new ones arrive.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    window: usize,
    system_prompt: Option<String>,
    turns: VecDeque<ConversationTurn>,
}

impl ConversationContext {
    /// A window of zero is treated as one.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            system_prompt: None,
            turns: VecDeque::with_capacity(window),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        self.system_prompt = if prompt.trim().is_empty() {
            None
        } else {
            Some(prompt)
        };
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn push_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push_back(ConversationTurn {
            user: user.into(),
            assistant: assistant.into(),
        });
        while self.turns.len() > self.window {
            self.turns.pop_front();
        }
    }

    /// Messages to send for the next turn: system prompt, retained history, then `user_message`.
    pub fn messages_for(&self, user_message: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() * 2 + 2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        for turn in &self.turns {
            messages.push(ChatMessage::user(turn.user.clone()));
            messages.push(ChatMessage::assistant(turn.assistant.clone()));
        }
        messages.push(ChatMessage::user(user_message));
        messages
    }

    /// Drop all history; the system prompt stays.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }
}
