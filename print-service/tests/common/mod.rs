#![allow(dead_code)]

use async_trait::async_trait;
use print_service::config::{CleanupPolicy, PipelineConfig, PrintConfig, ReaperConfig};
use print_service::error::PrintError;
use print_service::models::PrintReceipt;
use print_service::services::{Converter, Dispatcher};
use print_service::startup::Application;
use service_core::config::Config as CoreConfig;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// One converter invocation, with the markup as it was on disk at the time.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub markup: PathBuf,
    pub document: PathBuf,
    pub markup_contents: String,
}

/// Converter that writes a placeholder document, or fails on demand.
#[derive(Default)]
pub struct RecordingConverter {
    pub fail_with: Option<String>,
    pub calls: Mutex<Vec<Conversion>>,
}

#[async_trait]
impl Converter for RecordingConverter {
    async fn convert(&self, markup: &Path, document: &Path) -> Result<(), PrintError> {
        let markup_contents = tokio::fs::read_to_string(markup).await.unwrap_or_default();
        self.calls.lock().unwrap().push(Conversion {
            markup: markup.to_path_buf(),
            document: document.to_path_buf(),
            markup_contents,
        });

        if let Some(reason) = &self.fail_with {
            return Err(PrintError::ConvertFailed {
                program: "wkhtmltopdf".to_string(),
                reason: reason.clone(),
            });
        }

        tokio::fs::write(document, b"%PDF-1.4\n%fake\n")
            .await
            .map_err(|e| PrintError::ConvertFailed {
                program: "wkhtmltopdf".to_string(),
                reason: e.to_string(),
            })
    }
}

/// Dispatcher that records submitted paths, or rejects them on demand.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub fail_with: Option<String>,
    pub job_id: Option<String>,
    pub calls: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl Dispatcher for RecordingDispatcher {
    async fn submit(&self, document: &Path) -> Result<PrintReceipt, PrintError> {
        self.calls.lock().unwrap().push(document.to_path_buf());
        let command = format!("lp {}", document.display());

        match &self.fail_with {
            Some(reason) => Err(PrintError::PrintFailed {
                command,
                reason: reason.clone(),
            }),
            None => Ok(PrintReceipt {
                command,
                job_id: self.job_id.clone(),
            }),
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub tmp_dir: TempDir,
    pub converter: Arc<RecordingConverter>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(
            RecordingConverter::default(),
            RecordingDispatcher::default(),
            CleanupPolicy::RetainOnFailure,
        )
        .await
    }

    pub async fn spawn_with(
        converter: RecordingConverter,
        dispatcher: RecordingDispatcher,
        cleanup: CleanupPolicy,
    ) -> Self {
        let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let config = PrintConfig {
            common: CoreConfig {
                port: 0, // Random port for testing
                ..CoreConfig::default()
            },
            pipeline: PipelineConfig {
                tmp_dir: tmp_dir.path().to_path_buf(),
                converter_program: "wkhtmltopdf".to_string(),
                converter_args: "{input} {output}".to_string(),
                print_command: "lp {document}".to_string(),
                display: None,
                command_timeout: None,
                cleanup,
            },
            reaper: ReaperConfig {
                interval: Duration::ZERO,
                max_age: Duration::from_secs(86400),
            },
        };

        let converter = Arc::new(converter);
        let dispatcher = Arc::new(dispatcher);

        let app = Application::build_with(config, converter.clone(), dispatcher.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            tmp_dir,
            converter,
            dispatcher,
            client,
        }
    }

    pub async fn print(&self, number: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/print/{}", self.address, number))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Files currently in the temp directory.
    pub fn artifacts(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(self.tmp_dir.path())
            .expect("Failed to read temp dir")
            .map(|entry| entry.expect("Failed to read entry").path())
            .collect();
        paths.sort();
        paths
    }

    pub fn conversions(&self) -> Vec<Conversion> {
        self.converter.calls.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<PathBuf> {
        self.dispatcher.calls.lock().unwrap().clone()
    }
}
