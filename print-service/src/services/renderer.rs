use crate::error::PrintError;
use crate::models::{ArtifactPair, PrintRequest};
use askama::Template;
use std::path::PathBuf;

#[derive(Template)]
#[template(
    source = r#"<html>
  <head>
    <style>
      body {
        font-size: 40px;
        padding-left: 18px;
      }
    </style>
  </head>
  <body>
    {{ number }}
  </body>
</html>
"#,
    ext = "html"
)]
struct NumberSheet<'a> {
    number: &'a str,
}

/// Fills the fixed number-sheet template and writes it to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_markup(&self, number: &str) -> Result<String, askama::Error> {
        NumberSheet { number }.render()
    }

    /// Writes the markup for `request` to the pair's markup path.
    pub async fn render(
        &self,
        request: &PrintRequest,
        artifacts: &ArtifactPair,
    ) -> Result<PathBuf, PrintError> {
        let path = artifacts.markup_path().to_path_buf();
        let markup =
            self.render_markup(&request.formatted())
                .map_err(|e| PrintError::RenderFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

        tokio::fs::write(&path, markup)
            .await
            .map_err(|e| PrintError::RenderFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!(path = %path.display(), "Generated markup file");
        Ok(path)
    }
}
