//! Text detection in images.

mod vision;

pub use vision::VisionClient;

use crate::error::PicSyncResult;
use async_trait::async_trait;

/// OCR service the pipeline depends on
#[async_trait]
pub trait OcrClient: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Plain text found in the image, or an empty string when there is none.
    /// Service failures are errors, never an empty string.
    async fn detect_text(&self, image: &[u8]) -> PicSyncResult<String>;
}
