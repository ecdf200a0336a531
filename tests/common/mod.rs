#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Cursor, Read};
use std::rc::Rc;

use image::RgbaImage;
use pdf_docx::{
    Block, CancellationToken, DecodeError, DecodedDocument, DocumentDecoder, DocumentSerializer,
    OcrEngine, OcrEngineOptions, OcrEngineProvider, OcrError, PositionedFragment,
};
use pdf_docx::assemble::SerializeError;

/// Decoder serving canned pages. OCR text is keyed by page number.
#[derive(Clone, Default)]
pub struct FakeDecoder {
    pub pages: Vec<Vec<PositionedFragment>>,
    pub ocr_text: Vec<String>,
    pub reject: bool,
}

impl FakeDecoder {
    pub fn with_text_pages(pages: Vec<Vec<PositionedFragment>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_ocr_pages(count: usize) -> Self {
        Self {
            pages: vec![Vec::new(); count],
            ocr_text: (1..=count).map(|n| format!("Scanned page {}", n)).collect(),
            reject: false,
        }
    }
}

impl DocumentDecoder for FakeDecoder {
    fn open(&self, _data: &[u8]) -> Result<Box<dyn DecodedDocument>, DecodeError> {
        if self.reject {
            return Err(DecodeError::Malformed("not a PDF".into()));
        }
        Ok(Box::new(self.clone()))
    }
}

impl DecodedDocument for FakeDecoder {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&mut self, page: usize) -> Result<Vec<PositionedFragment>, DecodeError> {
        self.pages
            .get(page - 1)
            .cloned()
            .ok_or(DecodeError::PageNotFound(page))
    }

    /// The raster width carries the page number to the fake engine.
    fn render(&mut self, page: usize, _scale: f32) -> Result<RgbaImage, DecodeError> {
        Ok(RgbaImage::new(page as u32, 1))
    }
}

#[derive(Default)]
pub struct EngineStats {
    pub created: usize,
    pub terminated: usize,
    pub recognized: Vec<usize>,
}

/// Provider whose engines record what happens to them.
#[derive(Clone, Default)]
pub struct SpyProvider {
    pub stats: Rc<RefCell<EngineStats>>,
    pub texts: Vec<String>,
    pub fail_init: bool,
    /// Cancel this token once the given page has been recognized.
    pub cancel_after: Option<(usize, CancellationToken)>,
}

impl SpyProvider {
    pub fn new(texts: Vec<String>) -> Self {
        Self {
            texts,
            ..Self::default()
        }
    }
}

impl OcrEngineProvider for SpyProvider {
    fn create(&self, _options: &OcrEngineOptions) -> Result<Box<dyn OcrEngine>, OcrError> {
        if self.fail_init {
            return Err(OcrError::Init("language data unreachable".into()));
        }
        self.stats.borrow_mut().created += 1;
        Ok(Box::new(SpyEngine {
            provider: self.clone(),
        }))
    }
}

struct SpyEngine {
    provider: SpyProvider,
}

impl OcrEngine for SpyEngine {
    fn recognize(&mut self, image: &RgbaImage) -> Result<String, OcrError> {
        let page = image.width() as usize;
        self.provider.stats.borrow_mut().recognized.push(page);
        if let Some((after, token)) = &self.provider.cancel_after {
            if page == *after {
                token.cancel();
            }
        }
        Ok(self
            .provider
            .texts
            .get(page - 1)
            .cloned()
            .unwrap_or_default())
    }

    fn terminate(&mut self) {
        self.provider.stats.borrow_mut().terminated += 1;
    }
}

/// Serializer that keeps the blocks it was given.
#[derive(Clone, Default)]
pub struct RecordingSerializer {
    pub blocks: Rc<RefCell<Vec<Block>>>,
    pub fail: bool,
}

impl DocumentSerializer for RecordingSerializer {
    fn serialize(&self, blocks: &[Block]) -> Result<Vec<u8>, SerializeError> {
        if self.fail {
            return Err(SerializeError::Io(std::io::Error::other("out of memory")));
        }
        *self.blocks.borrow_mut() = blocks.to_vec();
        Ok(vec![0x50, 0x4B])
    }
}

pub fn frag(text: &str, y: f64) -> PositionedFragment {
    PositionedFragment::new(text, y, 12.0)
}

/// Body XML of a DOCX package.
pub fn document_xml(docx: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut part = archive.by_name("word/document.xml").unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}
