use vita_ai::{AiOrchestrator, AiReply, ChatContext};
use vita_types::ChatMessage;

use crate::error::SubmitRejection;

pub const GREETING: &str = "Hello! I am your AI health assistant. How can I help you today? Ask me about nutrition, fitness, or general wellness.";

/// Message log and pending flag of the health chatbot.
///
/// The log is append-only. A turn is split in two so the event loop can
/// run the request without holding the session: `begin_turn` records the
/// user message and hands out the conversation context, `finish_turn`
/// records the reply and takes the context back.
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    pending: bool,
    context: Option<ChatContext>,
}

/// A turn whose request has not been sent yet
#[derive(Debug)]
pub struct PendingTurn {
    message: String,
    context: Option<ChatContext>,
}

#[derive(Debug)]
pub struct CompletedTurn {
    pub context: ChatContext,
    pub reply: AiReply,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::model(GREETING)],
            pending: false,
            context: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, SubmitRejection> {
        if text.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }
        if self.pending {
            return Err(SubmitRejection::RequestPending);
        }

        self.messages.push(ChatMessage::user(text));
        self.pending = true;

        Ok(PendingTurn {
            message: text.to_string(),
            context: self.context.take(),
        })
    }

    /// Append the model reply (answer or fallback) and clear `pending`
    pub fn finish_turn(&mut self, turn: CompletedTurn) -> &ChatMessage {
        self.context = Some(turn.context);
        self.pending = false;
        self.messages.push(ChatMessage::model(turn.reply.text));
        &self.messages[self.messages.len() - 1]
    }

    /// Whole turn in one call, for single-owner use
    pub async fn submit(
        &mut self,
        ai: &AiOrchestrator,
        text: &str,
    ) -> Result<&ChatMessage, SubmitRejection> {
        let turn = self.begin_turn(text)?;
        let completed = turn.run(ai).await;
        Ok(self.finish_turn(completed))
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingTurn {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub async fn run(self, ai: &AiOrchestrator) -> CompletedTurn {
        let mut context = self.context.unwrap_or_else(|| ai.open_chat());
        let reply = ai.chat_turn(&mut context, &self.message).await;
        CompletedTurn { context, reply }
    }
}
