use crate::assemble::{DEFAULT_TITLE, DocumentAssembler, DocumentSerializer, DocxWriter};
use crate::config::ConversionConfig;
use crate::decode::{DocumentDecoder, LopdfDecoder};
use crate::error::{ConversionError, Result};
use crate::extract::{OcrPageProcessor, PageTextExtractor, ParagraphReconstructor};
use crate::ocr::OcrEngineProvider;
use crate::progress::{CancellationToken, ProgressEvent, ProgressSink};
use crate::types::PageData;
use crate::unicode::{UnicodeReport, analyze};

/// How page text is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// Read the text layer embedded in the PDF.
    Text,
    /// Rasterize pages and recognize them optically.
    Ocr,
}

/// Lifecycle of a run. The last three states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Idle,
    Extracting,
    Assembling,
    Completed,
    Cancelled,
    Failed,
}

impl ConversionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ConversionState::Completed | ConversionState::Cancelled | ConversionState::Failed
        )
    }
}

/// A finished conversion.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The serialized document.
    pub document: Vec<u8>,
    pub page_count: usize,
    pub unicode: UnicodeReport,
    /// Advisory messages; the document is still usable.
    pub warnings: Vec<String>,
}

/// Entry point: extraction, then assembly, one run at a time.
pub struct Converter<D = LopdfDecoder, S = DocxWriter> {
    config: ConversionConfig,
    decoder: D,
    serializer: S,
    ocr_provider: Option<Box<dyn OcrEngineProvider>>,
    state: ConversionState,
}

impl Converter {
    /// Native-text converter writing DOCX.
    pub fn native(config: ConversionConfig) -> Self {
        Self::new(config, LopdfDecoder, DocxWriter)
    }
}

impl<D: DocumentDecoder, S: DocumentSerializer> Converter<D, S> {
    pub fn new(config: ConversionConfig, decoder: D, serializer: S) -> Self {
        Self {
            config,
            decoder,
            serializer,
            ocr_provider: None,
            state: ConversionState::Idle,
        }
    }

    pub fn with_ocr_provider(mut self, provider: Box<dyn OcrEngineProvider>) -> Self {
        self.ocr_provider = Some(provider);
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// State of the current or most recent run.
    pub fn state(&self) -> ConversionState {
        self.state
    }

    pub fn convert_text(
        &mut self,
        data: &[u8],
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<ConversionOutput> {
        self.convert(ConversionMode::Text, data, progress, cancel)
    }

    pub fn convert_ocr(
        &mut self,
        data: &[u8],
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<ConversionOutput> {
        self.convert(ConversionMode::Ocr, data, progress, cancel)
    }

    pub fn convert(
        &mut self,
        mode: ConversionMode,
        data: &[u8],
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<ConversionOutput> {
        self.convert_with_title(mode, data, None, progress, cancel)
    }

    /// Run one conversion. The token is reset first, so a stale cancel from an
    /// earlier run does not leak in. Failed runs are never retried.
    ///
    /// The heading is the configured title if set, else `title`, else
    /// [`DEFAULT_TITLE`].
    pub fn convert_with_title(
        &mut self,
        mode: ConversionMode,
        data: &[u8],
        title: Option<&str>,
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<ConversionOutput> {
        cancel.reset();
        self.state = ConversionState::Idle;

        let result = self.run(mode, data, title, progress, cancel);

        match &result {
            Ok(output) => {
                log::info!(
                    "Converted {} pages into {} bytes",
                    output.page_count,
                    output.document.len()
                );
                self.transition(ConversionState::Completed);
            }
            Err(e) if e.is_cancelled() => {
                log::info!("Conversion cancelled");
                self.transition(ConversionState::Cancelled);
            }
            Err(e) => {
                log::error!("Conversion failed: {}", e);
                self.transition(ConversionState::Failed);
            }
        }

        result
    }

    fn run(
        &mut self,
        mode: ConversionMode,
        data: &[u8],
        title: Option<&str>,
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<ConversionOutput> {
        self.transition(ConversionState::Extracting);
        progress.report(ProgressEvent::new(0.0, "Loading document"));

        let pages = self.extract(mode, data, progress, cancel)?;
        if cancel.is_cancelled() {
            return Err(ConversionError::Cancelled);
        }

        let mut unicode = UnicodeReport::default();
        for page in &pages {
            unicode.merge(&analyze(&page.text()));
        }
        let warnings: Vec<String> = unicode.warning().into_iter().collect();
        for warning in &warnings {
            log::warn!("{}", warning);
        }

        self.transition(ConversionState::Assembling);
        progress.report(ProgressEvent::new(95.0, "Building document"));
        let title = self
            .config
            .title
            .as_deref()
            .or(title)
            .unwrap_or(DEFAULT_TITLE);
        let document = DocumentAssembler::new(&self.serializer).assemble(&pages, title)?;
        progress.report(ProgressEvent::new(100.0, "Done"));

        Ok(ConversionOutput {
            document,
            page_count: pages.len(),
            unicode,
            warnings,
        })
    }

    /// The decoded handle is dropped before this returns.
    fn extract(
        &self,
        mode: ConversionMode,
        data: &[u8],
        progress: &mut dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<Vec<PageData>> {
        let mut document = self
            .decoder
            .open(data)
            .map_err(|e| ConversionError::SourceMalformed(e.to_string()))?;
        log::info!(
            "Extracting {} pages ({:?} mode)",
            document.page_count(),
            mode
        );

        match mode {
            ConversionMode::Text => {
                let reconstructor = ParagraphReconstructor::from_config(&self.config);
                PageTextExtractor::new(reconstructor).extract(document.as_mut(), cancel, progress)
            }
            ConversionMode::Ocr => {
                let provider = self.ocr_provider.as_deref().ok_or_else(|| {
                    ConversionError::EngineInitFailure("no OCR engine configured".into())
                })?;
                OcrPageProcessor::new(provider, &self.config).process(
                    document.as_mut(),
                    cancel,
                    progress,
                )
            }
        }
    }

    fn transition(&mut self, next: ConversionState) {
        log::debug!("Conversion state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
