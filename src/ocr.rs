//! Optical-recognition engine seam.
//!
//! The converter never talks to a concrete OCR backend. A provider builds
//! one engine per run; the run holds it through an [`EngineLease`], which
//! terminates the engine exactly once however the run ends.

use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Engine initialization failed: {0}")]
    Init(String),

    #[error("Recognition failed: {0}")]
    Recognition(String),
}

/// Parameters handed to an [`OcrEngineProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrEngineOptions {
    /// Language code, e.g. `eng`.
    pub language: String,
    /// Where the engine's language data lives; the provider picks when `None`.
    pub asset_path: Option<String>,
}

pub trait OcrEngine {
    fn recognize(&mut self, image: &RgbaImage) -> Result<String, OcrError>;

    /// Free the engine's resources. Must be safe to call more than once.
    fn terminate(&mut self);
}

/// Builds engines, so tests can substitute a deterministic fake.
pub trait OcrEngineProvider {
    fn create(&self, options: &OcrEngineOptions) -> Result<Box<dyn OcrEngine>, OcrError>;
}

/// Owns the engine for one run and terminates it exactly once.
pub struct EngineLease {
    engine: Option<Box<dyn OcrEngine>>,
}

impl EngineLease {
    pub fn acquire(
        provider: &dyn OcrEngineProvider,
        options: &OcrEngineOptions,
    ) -> Result<Self, OcrError> {
        let engine = provider.create(options)?;
        log::debug!("OCR engine started (language: {})", options.language);
        Ok(Self {
            engine: Some(engine),
        })
    }

    pub fn recognize(&mut self, image: &RgbaImage) -> Result<String, OcrError> {
        match self.engine.as_mut() {
            Some(engine) => engine.recognize(image),
            None => Err(OcrError::Recognition("engine already released".into())),
        }
    }

    /// Terminate the engine now instead of at drop.
    pub fn release(mut self) {
        self.terminate();
    }

    fn terminate(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.terminate();
            log::debug!("OCR engine terminated");
        }
    }
}

impl Drop for EngineLease {
    fn drop(&mut self) {
        self.terminate();
    }
}
