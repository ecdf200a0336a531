mod ocr;
pub mod paragraph;
mod text;

pub use ocr::OcrPageProcessor;
pub use paragraph::ParagraphReconstructor;
pub use text::PageTextExtractor;
