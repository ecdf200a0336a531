use crate::config::ConversionConfig;
use crate::decode::DecodedDocument;
use crate::error::{ConversionError, Result};
use crate::extract::ParagraphReconstructor;
use crate::ocr::{EngineLease, OcrEngineOptions, OcrEngineProvider, OcrError};
use crate::progress::{CancellationToken, ProgressEvent, ProgressSink, page_percent};
use crate::types::PageData;

/// OCR path: rasterizes each page and runs it through one engine.
///
/// Pages go strictly in order and only one raster is alive at a time.
pub struct OcrPageProcessor<'a> {
    provider: &'a dyn OcrEngineProvider,
    options: OcrEngineOptions,
    scale: f32,
    max_pages: usize,
    reconstructor: ParagraphReconstructor,
}

impl<'a> OcrPageProcessor<'a> {
    pub fn new(provider: &'a dyn OcrEngineProvider, config: &ConversionConfig) -> Self {
        Self {
            provider,
            options: OcrEngineOptions {
                language: config.ocr_language.clone(),
                asset_path: config.ocr_asset_path.clone(),
            },
            scale: config.ocr_scale,
            max_pages: config.max_ocr_pages,
            reconstructor: ParagraphReconstructor::from_config(config),
        }
    }

    /// Recognize every page. The engine is terminated before this returns.
    pub fn process(
        &self,
        document: &mut dyn DecodedDocument,
        cancel: &CancellationToken,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<PageData>> {
        let total = document.page_count();
        if total > self.max_pages {
            return Err(ConversionError::PageLimitExceeded {
                requested: total,
                allowed: self.max_pages,
            });
        }

        progress.report(ProgressEvent::new(2.0, "Starting OCR engine"));
        let mut lease = EngineLease::acquire(self.provider, &self.options)
            .map_err(|e| ConversionError::EngineInitFailure(reason(e)))?;

        let result = self.recognize_pages(&mut lease, document, cancel, progress);
        lease.release();
        result
    }

    fn recognize_pages(
        &self,
        lease: &mut EngineLease,
        document: &mut dyn DecodedDocument,
        cancel: &CancellationToken,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<PageData>> {
        let total = document.page_count();
        let mut pages = Vec::with_capacity(total);

        for index in 0..total {
            let page = index + 1;
            if cancel.is_cancelled() {
                log::info!("OCR cancelled before page {} of {}", page, total);
                return Err(ConversionError::Cancelled);
            }

            progress.report(ProgressEvent::new(
                page_percent(index, total),
                format!("Recognizing page {} of {}", page, total),
            ));

            let text = self.recognize_page(lease, document, page);
            document.release_page(page);
            let text = text?;

            let paragraphs = self.reconstructor.split_recognized(&text);
            log::debug!("Page {}: recognized {} paragraphs", page, paragraphs.len());
            pages.push(PageData::new(page, paragraphs));
        }

        Ok(pages)
    }

    /// The raster is dropped when this returns.
    fn recognize_page(
        &self,
        lease: &mut EngineLease,
        document: &mut dyn DecodedDocument,
        page: usize,
    ) -> Result<String> {
        let raster = document
            .render(page, self.scale)
            .map_err(|e| ConversionError::PageRenderFailure {
                page,
                reason: e.to_string(),
            })?;

        lease
            .recognize(&raster)
            .map_err(|e| ConversionError::PageRecognitionFailure {
                page,
                reason: reason(e),
            })
    }
}

fn reason(err: OcrError) -> String {
    match err {
        OcrError::Init(reason) | OcrError::Recognition(reason) => reason,
    }
}
