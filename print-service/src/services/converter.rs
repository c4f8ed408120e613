use crate::config::PipelineConfig;
use crate::error::PrintError;
use crate::services::executor::{CommandExecutor, CommandTemplate};
use async_trait::async_trait;
use service_core::error::AppError;
use std::path::Path;

/// Turns a markup file into a paginated document file.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, markup: &Path, document: &Path) -> Result<(), PrintError>;
}

/// Converter backed by an external engine such as `wkhtmltopdf`.
///
/// Headless engines may need an X display; when configured it is exported
/// as `DISPLAY` to the engine process only.
pub struct CommandConverter {
    template: CommandTemplate,
    executor: CommandExecutor,
    display: Option<String>,
}

impl CommandConverter {
    pub fn new(
        template: CommandTemplate,
        executor: CommandExecutor,
        display: Option<String>,
    ) -> Self {
        Self {
            template,
            executor,
            display,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, AppError> {
        Ok(Self::new(
            CommandTemplate::with_args(&config.converter_program, &config.converter_args)?,
            CommandExecutor::new(config.command_timeout),
            config.display.clone(),
        ))
    }

    fn failed(&self, reason: impl ToString) -> PrintError {
        PrintError::ConvertFailed {
            program: self.template.program().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl Converter for CommandConverter {
    async fn convert(&self, markup: &Path, document: &Path) -> Result<(), PrintError> {
        let input = markup.to_string_lossy();
        let output = document.to_string_lossy();
        let args = self.template.render(&[("input", &*input), ("output", &*output)]);

        let envs: Vec<(&str, &str)> = self
            .display
            .as_deref()
            .map(|display| ("DISPLAY", display))
            .into_iter()
            .collect();

        self.executor
            .execute(self.template.program(), &args, &envs)
            .await
            .map_err(|e| self.failed(e))?;

        match tokio::fs::try_exists(document).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(self.failed(format!("no document written to {}", output)));
            }
            Err(e) => return Err(self.failed(e)),
        }

        tracing::info!(path = %document.display(), "Generated document file");
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn script_converter(dir: &Path, body: &str, display: Option<&str>) -> CommandConverter {
        let script = dir.join("engine.sh");
        std::fs::write(&script, body).unwrap();
        let template = CommandTemplate::with_args(
            "sh",
            &format!("{} {{input}} {{output}}", script.display()),
        )
        .unwrap();
        CommandConverter::new(
            template,
            CommandExecutor::new(Some(Duration::from_secs(10))),
            display.map(str::to_string),
        )
    }

    fn pair(dir: &Path) -> (PathBuf, PathBuf) {
        let markup = dir.join("job.html");
        std::fs::write(&markup, "<html>123456</html>").unwrap();
        (markup, dir.join("job.pdf"))
    }

    #[tokio::test]
    async fn successful_engine_produces_document() {
        let dir = tempfile::tempdir().unwrap();
        let converter = script_converter(dir.path(), "cp \"$1\" \"$2\"\n", None);
        let (markup, document) = pair(dir.path());

        converter.convert(&markup, &document).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&document).unwrap(),
            "<html>123456</html>"
        );
    }

    #[tokio::test]
    async fn engine_stderr_is_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let converter = script_converter(
            dir.path(),
            "echo 'cannot connect to X server' >&2\nexit 1\n",
            None,
        );
        let (markup, document) = pair(dir.path());

        let err = converter.convert(&markup, &document).await.unwrap_err();

        assert_eq!(err.kind(), "convert_failed");
        assert_eq!(err.to_string(), "sh failed: cannot connect to X server");
    }

    #[tokio::test]
    async fn engine_that_writes_nothing_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let converter = script_converter(dir.path(), "exit 0\n", None);
        let (markup, document) = pair(dir.path());

        let err = converter.convert(&markup, &document).await.unwrap_err();

        assert!(err.to_string().contains("no document written"));
    }

    #[tokio::test]
    async fn display_is_exported_to_engine() {
        let dir = tempfile::tempdir().unwrap();
        let converter = script_converter(dir.path(), "printf %s \"$DISPLAY\" > \"$2\"\n", Some(":0"));
        let (markup, document) = pair(dir.path());

        converter.convert(&markup, &document).await.unwrap();

        assert_eq!(std::fs::read_to_string(&document).unwrap(), ":0");
    }
}
