use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use super::{ConsoleConfig, SystemError};
use crate::classifier::{ErrorClassifier, StatusClassifier};
use crate::clients::RecordClient;
use crate::confirmation::{ChannelConfirmation, ConfirmationPrompt};
use crate::transport::HttpTransport;
use crate::workflow::WorkflowController;

/// The running application: transport service, workflow controller and the
/// receiving end of the confirmation dialog.
///
/// Responsible for starting the transport, wiring every dependency into the
/// controller, and handling shutdown.
pub struct ProductSystem {
    pub controller: WorkflowController,
    pub prompts: mpsc::Receiver<ConfirmationPrompt>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ProductSystem {
    pub fn start(config: &ConsoleConfig) -> Result<Self, SystemError> {
        info!(api_url = %config.api_url, "Starting product system");

        let (transport, transport_client) = HttpTransport::new(
            config.channel_buffer,
            config.api_url.clone(),
            config.request_timeout(),
        )?;
        let transport_handle = tokio::spawn(transport.run());

        let classifier: Arc<dyn ErrorClassifier> = Arc::new(StatusClassifier);
        let records = RecordClient::new(transport_client, classifier);
        let (confirmation, prompts) = ChannelConfirmation::new(config.channel_buffer);
        let controller =
            WorkflowController::new(records, Arc::new(confirmation), config.notice_ttl());

        Ok(Self {
            controller,
            prompts,
            handles: vec![transport_handle],
        })
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down product system...");

        // Dropping the controller drops the last transport handle, which stops the service.
        drop(self.controller);
        drop(self.prompts);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Service task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("Product system shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let config =
            ConsoleConfig::parse_from(["product_console", "--api-url", "http://127.0.0.1:9/api"]);
        let system = ProductSystem::start(&config).expect("system should start");
        system.shutdown().await.expect("system should shut down cleanly");
    }
}
