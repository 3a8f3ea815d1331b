//! OCR boundary: text extraction from captured stills.
//!
//! The pipeline talks to an [`OcrEngine`] trait object; the concrete
//! engine is picked at wiring time. `MockOcrEngine` serves tests and
//! development hosts, and `TesseractOcrEngine` (feature `ocr-tesseract`)
//! runs a local Tesseract model.

#[cfg(feature = "ocr-tesseract")]
mod tesseract;

#[cfg(feature = "ocr-tesseract")]
pub use tesseract::TesseractOcrEngine;

use crate::error::OcrError;
use async_trait::async_trait;

/// Local text-recognition engine.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Extract text from a JPEG-encoded image.
    ///
    /// `languages` is the combined language-set identifier for the
    /// recognition model (e.g. `eng+deu`). The result may be empty when
    /// no text is detected; a missing engine or a recognition error fails.
    async fn extract_text(&self, image_jpeg: &[u8], languages: &str) -> Result<String, OcrError>;
}

/// Mock OCR engine returning deterministic text.
pub struct MockOcrEngine {
    response: Result<String, String>,
}

impl MockOcrEngine {
    /// Engine that returns the given text for any input.
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Engine that detects no text.
    pub fn empty() -> Self {
        Self {
            response: Ok(String::new()),
        }
    }

    /// Engine that fails every recognition request.
    pub fn failing<S: Into<String>>(details: S) -> Self {
        Self {
            response: Err(details.into()),
        }
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn extract_text(&self, image_jpeg: &[u8], _languages: &str) -> Result<String, OcrError> {
        if image_jpeg.is_empty() {
            return Err(OcrError::Recognition {
                details: "empty image data".to_string(),
            });
        }
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(details) => Err(OcrError::Recognition {
                details: details.clone(),
            }),
        }
    }
}

/// Placeholder engine for builds without a recognition backend.
///
/// Every request fails as engine-missing, which the pipeline surfaces as
/// a recoverable processing failure.
pub struct UnavailableOcrEngine;

#[async_trait]
impl OcrEngine for UnavailableOcrEngine {
    async fn extract_text(&self, _image_jpeg: &[u8], languages: &str) -> Result<String, OcrError> {
        Err(OcrError::EngineMissing {
            details: format!(
                "no recognition engine compiled in (requested model '{}')",
                languages
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_configured_text() {
        let engine = MockOcrEngine::with_text("Coffee Shop — $4.50");
        let text = engine.extract_text(&[1, 2, 3], "eng+deu").await.unwrap();
        assert_eq!(text, "Coffee Shop — $4.50");
    }

    #[tokio::test]
    async fn test_mock_empty_text_is_not_an_error() {
        let engine = MockOcrEngine::empty();
        let text = engine.extract_text(&[1, 2, 3], "eng+deu").await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let engine = MockOcrEngine::failing("model not loaded");
        let result = engine.extract_text(&[1, 2, 3], "eng+deu").await;
        assert!(matches!(result, Err(OcrError::Recognition { .. })));
    }

    #[tokio::test]
    async fn test_mock_rejects_empty_input() {
        let engine = MockOcrEngine::with_text("anything");
        let result = engine.extract_text(&[], "eng+deu").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unavailable_engine_reports_missing() {
        let engine = UnavailableOcrEngine;
        let result = engine.extract_text(&[1, 2, 3], "eng+deu").await;
        assert!(matches!(result, Err(OcrError::EngineMissing { .. })));
    }
}
