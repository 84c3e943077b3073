//! Yes/no gate consulted before a product is deleted.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this product?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Declined,
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Decision::Confirmed
        } else {
            Decision::Declined
        }
    }
}

/// Asks the operator to confirm an action and reports the decision.
///
/// Implementations only report; they never perform the action themselves.
#[async_trait]
pub trait ConfirmationFlow: Send + Sync {
    async fn confirm(&self, message: &str) -> Decision;
}

/// A pending question for whoever renders the confirmation dialog.
#[derive(Debug)]
pub struct ConfirmationPrompt {
    pub message: String,
    pub respond_to: oneshot::Sender<Decision>,
}

/// Confirmation flow that forwards each prompt over a channel.
///
/// Dropping the prompt's responder without answering counts as
/// [`Decision::Declined`], as does a closed channel.
#[derive(Clone)]
pub struct ChannelConfirmation {
    sender: mpsc::Sender<ConfirmationPrompt>,
}

impl ChannelConfirmation {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<ConfirmationPrompt>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ConfirmationFlow for ChannelConfirmation {
    async fn confirm(&self, message: &str) -> Decision {
        let (respond_to, response) = oneshot::channel();
        let prompt = ConfirmationPrompt {
            message: message.to_string(),
            respond_to,
        };
        if self.sender.send(prompt).await.is_err() {
            warn!("Confirmation dialog unavailable, treating as declined");
            return Decision::Declined;
        }
        let decision = response.await.unwrap_or(Decision::Declined);
        debug!(?decision, "Confirmation resolved");
        decision
    }
}
