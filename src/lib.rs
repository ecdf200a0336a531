pub mod assemble;
pub mod config;
pub mod convert;
pub mod decode;
pub mod error;
pub mod extract;
pub mod filename;
pub mod ocr;
pub mod progress;
pub mod types;
pub mod unicode;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use assemble::{Block, DocumentAssembler, DocumentSerializer, DocxWriter, Run};
pub use config::ConversionConfig;
pub use convert::{ConversionMode, ConversionOutput, ConversionState, Converter};
pub use decode::{DecodeError, DecodedDocument, DocumentDecoder, LopdfDecoder};
pub use error::{ConfigError, ConversionError, Result};
pub use extract::{OcrPageProcessor, PageTextExtractor, ParagraphReconstructor};
pub use filename::{output_filename, sanitize_filename};
pub use ocr::{EngineLease, OcrEngine, OcrEngineOptions, OcrEngineProvider, OcrError};
pub use progress::{CancellationToken, NoProgress, ProgressEvent, ProgressSink};
pub use types::{PageData, PositionedFragment};
pub use unicode::{UnicodeReport, analyze as analyze_unicode};
