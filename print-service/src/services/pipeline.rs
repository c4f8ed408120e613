use crate::config::CleanupPolicy;
use crate::error::PrintError;
use crate::models::{ArtifactPair, PrintReceipt, PrintRequest};
use crate::services::converter::Converter;
use crate::services::dispatcher::Dispatcher;
use crate::services::renderer::Renderer;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Render, convert, print, clean up. One run per validated request.
pub struct PrintPipeline {
    tmp_dir: PathBuf,
    cleanup: CleanupPolicy,
    renderer: Renderer,
    converter: Arc<dyn Converter>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl PrintPipeline {
    pub fn new(
        tmp_dir: impl Into<PathBuf>,
        cleanup: CleanupPolicy,
        converter: Arc<dyn Converter>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Self {
        Self {
            tmp_dir: tmp_dir.into(),
            cleanup,
            renderer: Renderer::new(),
            converter,
            dispatcher,
        }
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    #[tracing::instrument(
        skip(self, request),
        fields(number = request.number(), artifact_id)
    )]
    pub async fn run(&self, request: PrintRequest) -> Result<PrintReceipt, PrintError> {
        let artifacts = ArtifactPair::generate(&self.tmp_dir);
        tracing::Span::current().record("artifact_id", artifacts.id());

        let start = Instant::now();
        let result = self.execute(&request, &artifacts).await;
        metrics::histogram!("print_pipeline_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        match (&result, self.cleanup) {
            (Ok(_), _) | (Err(_), CleanupPolicy::Always) => artifacts.remove().await,
            (Err(_), CleanupPolicy::RetainOnFailure) => tracing::warn!(
                markup = %artifacts.markup_path().display(),
                document = %artifacts.document_path().display(),
                "Retaining artifacts of failed pipeline run"
            ),
        }

        result
    }

    async fn execute(
        &self,
        request: &PrintRequest,
        artifacts: &ArtifactPair,
    ) -> Result<PrintReceipt, PrintError> {
        let markup = self.renderer.render(request, artifacts).await?;
        self.converter
            .convert(&markup, artifacts.document_path())
            .await?;
        self.dispatcher.submit(artifacts.document_path()).await
    }
}
