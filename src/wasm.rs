use wasm_bindgen::prelude::*;

use crate::{
    CancellationToken, ConversionConfig, ConversionMode, Converter, DocumentDecoder, LopdfDecoder,
    NoProgress,
    PageTextExtractor, ParagraphReconstructor, analyze_unicode, sanitize_filename,
};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert a PDF's text layer into DOCX bytes
#[wasm_bindgen]
pub fn pdf_to_docx(data: &[u8], title: Option<String>) -> Result<Vec<u8>, JsValue> {
    let mut converter = Converter::native(ConversionConfig::default());

    converter
        .convert_with_title(
            ConversionMode::Text,
            data,
            title.as_deref(),
            &mut NoProgress,
            &CancellationToken::new(),
        )
        .map(|output| output.document)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Advisory warning for non-Latin scripts, empty when the text is safe
#[wasm_bindgen]
pub fn pdf_unicode_warning(data: &[u8]) -> Result<String, JsValue> {
    let mut document = LopdfDecoder
        .open(data)
        .map_err(|e| JsValue::from_str(&format!("Parse error: {}", e)))?;

    let pages = PageTextExtractor::new(ParagraphReconstructor::default())
        .extract(document.as_mut(), &CancellationToken::new(), &mut NoProgress)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let text: Vec<String> = pages.iter().map(|p| p.text()).collect();
    Ok(analyze_unicode(&text.join("\n\n")).warning().unwrap_or_default())
}

/// Safe download name ending in .docx
#[wasm_bindgen]
pub fn sanitize_docx_filename(name: &str) -> String {
    sanitize_filename(name, "docx")
}

/// Get page count from a PDF
#[wasm_bindgen]
pub fn pdf_page_count(data: &[u8]) -> Result<usize, JsValue> {
    LopdfDecoder
        .open(data)
        .map(|document| document.page_count())
        .map_err(|e| JsValue::from_str(&format!("Parse error: {}", e)))
}
