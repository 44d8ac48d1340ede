//! Vision analyzer port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::CapabilityError;

/// Handle to the chart image being analyzed.
#[derive(Debug, Clone)]
pub enum ChartSource {
    /// Chart stored on disk.
    Path(PathBuf),
    /// Chart already in memory (e.g. an upload).
    Bytes {
        /// Raw image bytes.
        data: Vec<u8>,
        /// MIME type of the image.
        mime: String,
    },
}

impl ChartSource {
    /// Chart from a file path; MIME type is inferred from the extension.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Check the handle is usable before the pipeline starts.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem (missing file, empty buffer).
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Path(path) => {
                if path.is_file() {
                    Ok(())
                } else {
                    Err(format!("chart image not found at {}", path.display()))
                }
            }
            Self::Bytes { data, .. } => {
                if data.is_empty() {
                    Err("chart image buffer is empty".to_string())
                } else {
                    Ok(())
                }
            }
        }
    }

    /// MIME type of the image.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Path(path) => mime_from_extension(path),
            Self::Bytes { mime, .. } => mime,
        }
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Visual chart recognition capability.
///
/// Read-only: one call in, one textual description out.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    /// Describe the chart according to the instructions.
    async fn analyze(
        &self,
        chart: &ChartSource,
        instructions: &str,
    ) -> Result<String, CapabilityError>;
}
