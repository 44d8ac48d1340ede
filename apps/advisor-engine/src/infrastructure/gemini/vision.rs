//! Vision analyzer backed by Gemini.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::application::ports::{CapabilityError, ChartSource, VisionAnalyzer};

use super::api_types::{Content, Part};
use super::client::GeminiClient;

/// [`VisionAnalyzer`] implementation sending the chart image inline.
#[derive(Debug, Clone)]
pub struct GeminiVision {
    client: GeminiClient,
}

impl GeminiVision {
    /// Wrap a client.
    #[must_use]
    pub const fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VisionAnalyzer for GeminiVision {
    async fn analyze(
        &self,
        chart: &ChartSource,
        instructions: &str,
    ) -> Result<String, CapabilityError> {
        let mime = chart.mime_type().to_string();
        let bytes = match chart {
            ChartSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
                CapabilityError::InvalidInput(format!(
                    "failed to read chart image {}: {e}",
                    path.display()
                ))
            })?,
            ChartSource::Bytes { data, .. } => data.clone(),
        };
        if bytes.is_empty() {
            return Err(CapabilityError::InvalidInput(
                "chart image is empty".to_string(),
            ));
        }

        let contents = vec![Content {
            parts: vec![
                Part::text(instructions),
                Part::inline_data(mime, STANDARD.encode(&bytes)),
            ],
        }];
        self.client.generate(contents, None).await
    }
}
