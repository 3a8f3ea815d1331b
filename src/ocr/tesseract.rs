use super::OcrEngine;
use crate::error::OcrError;
use async_trait::async_trait;
use tracing::debug;

/// Tesseract-backed OCR engine via `leptess`.
///
/// A fresh `LepTess` handle is created per request inside a blocking task;
/// the handles are cheap relative to recognition time and are not Sync.
pub struct TesseractOcrEngine {
    data_path: Option<String>,
}

impl TesseractOcrEngine {
    /// `data_path` points at the tessdata directory; `None` uses the
    /// engine's compiled-in default.
    pub fn new(data_path: Option<String>) -> Self {
        Self { data_path }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcrEngine {
    async fn extract_text(&self, image_jpeg: &[u8], languages: &str) -> Result<String, OcrError> {
        let data_path = self.data_path.clone();
        let languages = languages.to_string();
        let bytes = image_jpeg.to_vec();

        let text = tokio::task::spawn_blocking(move || {
            let mut engine = leptess::LepTess::new(data_path.as_deref(), &languages).map_err(
                |e| OcrError::EngineMissing {
                    details: format!("failed to load model '{}': {}", languages, e),
                },
            )?;

            engine
                .set_image_from_mem(&bytes)
                .map_err(|e| OcrError::Recognition {
                    details: format!("failed to load image: {}", e),
                })?;

            engine.get_utf8_text().map_err(|e| OcrError::Recognition {
                details: format!("recognition failed: {}", e),
            })
        })
        .await
        .map_err(|e| OcrError::Recognition {
            details: format!("recognition task failed: {}", e),
        })??;

        let text = text.trim().to_string();
        debug!("OCR extracted {} chars", text.len());
        Ok(text)
    }
}
