use crate::decode::DecodedDocument;
use crate::error::{ConversionError, Result};
use crate::extract::ParagraphReconstructor;
use crate::progress::{CancellationToken, ProgressEvent, ProgressSink, page_percent};
use crate::types::PageData;

/// Native-text path: reads positioned fragments page by page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageTextExtractor {
    reconstructor: ParagraphReconstructor,
}

impl PageTextExtractor {
    pub fn new(reconstructor: ParagraphReconstructor) -> Self {
        Self { reconstructor }
    }

    /// Extract every page in order. Any page failure aborts the run.
    pub fn extract(
        &self,
        document: &mut dyn DecodedDocument,
        cancel: &CancellationToken,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<PageData>> {
        let total = document.page_count();
        let mut pages = Vec::with_capacity(total);

        for index in 0..total {
            let page = index + 1;
            if cancel.is_cancelled() {
                log::info!("Text extraction cancelled before page {}", page);
                return Err(ConversionError::Cancelled);
            }

            progress.report(ProgressEvent::new(
                page_percent(index, total),
                format!("Extracting text from page {} of {}", page, total),
            ));

            let fragments = document.fragments(page);
            document.release_page(page);
            let fragments = fragments.map_err(|e| {
                ConversionError::SourceMalformed(format!("page {}: {}", page, e))
            })?;

            let paragraphs = self.reconstructor.reconstruct(&fragments);
            log::debug!(
                "Page {}: {} fragments, {} paragraphs",
                page,
                fragments.len(),
                paragraphs.len()
            );
            pages.push(PageData::new(page, paragraphs));
        }

        Ok(pages)
    }
}
