mod docx;

use thiserror::Error;

use crate::error::{ConversionError, Result};
use crate::types::PageData;

pub use docx::DocxWriter;

/// Sole paragraph of a document built from zero pages.
pub const NO_CONTENT_PLACEHOLDER: &str = "No text content could be extracted from this document.";

/// Heading used when the caller supplies a blank title.
pub const DEFAULT_TITLE: &str = "Converted Document";

/// Structured content handed to a [`DocumentSerializer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { runs: Vec<Run> },
    /// Ends the current page section; the next block starts a new page.
    SectionBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Run {
    Text(String),
    LineBreak,
}

impl Block {
    /// A paragraph whose embedded newlines become explicit line breaks.
    pub fn paragraph(text: &str) -> Self {
        let mut runs = Vec::new();
        for (i, line) in text.lines().enumerate() {
            if i > 0 {
                runs.push(Run::LineBreak);
            }
            if !line.is_empty() {
                runs.push(Run::Text(line.to_string()));
            }
        }
        Block::Paragraph { runs }
    }

    pub fn blank_paragraph() -> Self {
        Block::Paragraph { runs: Vec::new() }
    }
}

#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns blocks into a binary document container.
pub trait DocumentSerializer {
    fn serialize(&self, blocks: &[Block]) -> std::result::Result<Vec<u8>, SerializeError>;
}

/// Lays out reconstructed pages as blocks and serializes them.
pub struct DocumentAssembler<'a> {
    serializer: &'a dyn DocumentSerializer,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(serializer: &'a dyn DocumentSerializer) -> Self {
        Self { serializer }
    }

    pub fn assemble(&self, pages: &[PageData], title: &str) -> Result<Vec<u8>> {
        let blocks = build_blocks(pages, title);
        log::debug!("Serializing {} blocks for {} pages", blocks.len(), pages.len());
        self.serializer
            .serialize(&blocks)
            .map_err(|e| ConversionError::AssemblyFailure(e.to_string()))
    }
}

/// Title heading, then each page's paragraphs, with a section break before
/// every page after the first. Pages without paragraphs keep one blank paragraph.
pub fn build_blocks(pages: &[PageData], title: &str) -> Vec<Block> {
    let title = match title.trim() {
        "" => DEFAULT_TITLE,
        t => t,
    };
    let mut blocks = vec![Block::Heading {
        level: 1,
        text: title.to_string(),
    }];

    if pages.is_empty() {
        blocks.push(Block::paragraph(NO_CONTENT_PLACEHOLDER));
        return blocks;
    }

    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            blocks.push(Block::SectionBreak);
        }

        let before = blocks.len();
        blocks.extend(
            page.paragraphs
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| Block::paragraph(p.trim())),
        );
        if blocks.len() == before {
            blocks.push(Block::blank_paragraph());
        }
    }

    blocks
}
