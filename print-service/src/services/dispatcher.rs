use crate::config::PipelineConfig;
use crate::error::PrintError;
use crate::models::PrintReceipt;
use crate::services::executor::{CommandExecutor, CommandTemplate};
use async_trait::async_trait;
use service_core::error::AppError;
use std::path::Path;

/// Submits a document to a print queue.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn submit(&self, document: &Path) -> Result<PrintReceipt, PrintError>;
}

/// Dispatcher backed by an OS print command, `lp {document}` by default.
///
/// The command's exit status is checked; a rejected submission is a
/// [`PrintError::PrintFailed`].
pub struct CommandDispatcher {
    template: CommandTemplate,
    executor: CommandExecutor,
}

impl CommandDispatcher {
    pub fn new(template: CommandTemplate, executor: CommandExecutor) -> Self {
        Self { template, executor }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, AppError> {
        Ok(Self::new(
            CommandTemplate::parse(&config.print_command)?,
            CommandExecutor::new(config.command_timeout),
        ))
    }
}

#[async_trait]
impl Dispatcher for CommandDispatcher {
    async fn submit(&self, document: &Path) -> Result<PrintReceipt, PrintError> {
        let path = document.to_string_lossy();
        let args = self.template.render(&[("document", &*path)]);
        let command = self.template.command_line(&args);

        let output = self
            .executor
            .execute(self.template.program(), &args, &[])
            .await
            .map_err(|e| PrintError::PrintFailed {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        let receipt = PrintReceipt::from_output(command, &String::from_utf8_lossy(&output.stdout));
        tracing::info!(
            command = %receipt.command,
            job_id = ?receipt.job_id,
            "Printed with command"
        );
        Ok(receipt)
    }
}
