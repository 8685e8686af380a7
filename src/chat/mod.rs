mod types;

pub use types::{ConversationMessage, MessageContent, Role};

use crate::{Error, Result, flow::FlowTracker, llm::LlmClient};
use std::sync::Mutex;
use tracing::{info, warn};

pub const EMPTY_QUESTION: &str = "Please enter a question.";
pub const ASSISTANT_FAILURE: &str = "Sorry, there was an error. Please try again.";

/// The conversational flow: keeps the session log and talks to the LLM.
pub struct Assistant {
    llm: Box<dyn LlmClient>,
    log: Mutex<Vec<ConversationMessage>>,
    tracker: FlowTracker,
}

impl Assistant {
    pub fn new(llm: Box<dyn LlmClient>) -> Self {
        Self {
            llm,
            log: Mutex::new(Vec::new()),
            tracker: FlowTracker::new("chat"),
        }
    }

    pub fn tracker(&self) -> &FlowTracker {
        &self.tracker
    }

    pub fn messages(&self) -> Result<Vec<ConversationMessage>> {
        Ok(self.lock_log()?.clone())
    }

    /// Appends the question and the reply, returning the reply.
    ///
    /// An LLM failure is answered with a fixed apology rather than an error.
    pub async fn ask(&self, input: &str) -> Result<ConversationMessage> {
        let topic = input.trim();
        if topic.is_empty() {
            return Err(Error::validation(EMPTY_QUESTION));
        }

        let request = self.tracker.begin()?;
        self.lock_log()?.push(ConversationMessage::user(input));

        let outcome = self.llm.generate_answer(topic).await;
        request.finish(&outcome);

        let reply = match outcome {
            Ok(answer) => {
                info!("Assistant answered with '{}'", answer.title);
                ConversationMessage::assistant(answer)
            }
            Err(e) => {
                warn!("Assistant request failed: {}", e);
                ConversationMessage::assistant_text(ASSISTANT_FAILURE)
            }
        };

        self.lock_log()?.push(reply.clone());
        Ok(reply)
    }

    fn lock_log(&self) -> Result<std::sync::MutexGuard<'_, Vec<ConversationMessage>>> {
        self.log
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))
    }
}
