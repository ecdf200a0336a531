use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId};

use super::{DecodeError, DecodedDocument, DocumentDecoder};
use crate::types::PositionedFragment;

/// TJ adjustments below this (in thousandths of an em) read as a word gap.
const WORD_GAP_ADJUSTMENT: f64 = -200.0;

/// A baseline jump larger than this many font sizes starts a new paragraph.
const PARAGRAPH_GAP_RATIO: f64 = 1.5;

/// Native-text decoder built on `lopdf`.
///
/// It reads text runs from page content streams but cannot rasterize, so
/// OCR runs need a decoder backed by a real renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfDecoder;

impl DocumentDecoder for LopdfDecoder {
    fn open(&self, data: &[u8]) -> Result<Box<dyn DecodedDocument>, DecodeError> {
        if !data.starts_with(b"%PDF-") {
            return Err(DecodeError::Malformed("missing %PDF header".into()));
        }

        let document =
            lopdf::Document::load_mem(data).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        log::debug!("Opened PDF with {} pages", pages.len());

        Ok(Box::new(LopdfDocument { document, pages }))
    }
}

struct LopdfDocument {
    document: lopdf::Document,
    /// Page object ids in page order.
    pages: Vec<ObjectId>,
}

impl DecodedDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&mut self, page: usize) -> Result<Vec<PositionedFragment>, DecodeError> {
        let page_id = page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .copied()
            .ok_or(DecodeError::PageNotFound(page))?;

        let data = self
            .document
            .get_page_content(page_id)
            .map_err(|e| DecodeError::Page {
                page,
                message: e.to_string(),
            })?;
        let content = Content::decode(&data).map_err(|e| DecodeError::Page {
            page,
            message: e.to_string(),
        })?;

        let mut walker = TextWalker::default();
        for operation in &content.operations {
            walker.execute(operation);
        }
        Ok(walker.fragments)
    }

    fn render(&mut self, _page: usize, _scale: f32) -> Result<RgbaImage, DecodeError> {
        Err(DecodeError::RenderUnsupported)
    }
}

/// Text state for positioning
#[derive(Debug, Clone)]
struct TextState {
    // Text matrix components [a, b, c, d, e, f]
    text_matrix: [f64; 6],
    // Line matrix - reset at start of each line
    line_matrix: [f64; 6],
    font_size: f64,
    leading: f64,
}

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl Default for TextState {
    fn default() -> Self {
        Self {
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            font_size: 12.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    fn y(&self) -> f64 {
        self.text_matrix[5]
    }

    /// Font size scaled by the vertical component of the text matrix.
    fn effective_font_size(&self) -> f64 {
        let [_, _, c, d, _, _] = self.text_matrix;
        let scale = (c * c + d * d).sqrt();
        if scale > 0.0 {
            self.font_size * scale
        } else {
            self.font_size
        }
    }

    /// Tlm = [1 0 0 1 tx ty] x Tlm, so offsets are in text-space units.
    fn move_line(&mut self, tx: f64, ty: f64) {
        let [a, b, c, d, e, f] = self.line_matrix;
        self.line_matrix[4] = e + tx * a + ty * c;
        self.line_matrix[5] = f + tx * b + ty * d;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }
}

/// Walks content-stream operations and collects positioned text runs.
#[derive(Default)]
struct TextWalker {
    state: TextState,
    state_stack: Vec<TextState>,
    fragments: Vec<PositionedFragment>,
}

impl TextWalker {
    fn execute(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.state_stack.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.state_stack.pop() {
                    self.state = state;
                }
            }
            "BT" => {
                self.state.text_matrix = IDENTITY;
                self.state.line_matrix = IDENTITY;
            }
            // Font: /FontName size Tf
            "Tf" => {
                if let Some(size) = operands.last().and_then(number) {
                    self.state.font_size = size;
                }
            }
            "TL" => {
                if let Some(leading) = operands.last().and_then(number) {
                    self.state.leading = leading;
                }
            }
            "Td" => {
                if let Some((tx, ty)) = pair(operands) {
                    self.state.move_line(tx, ty);
                }
            }
            "TD" => {
                if let Some((tx, ty)) = pair(operands) {
                    self.state.leading = -ty;
                    self.state.move_line(tx, ty);
                }
            }
            "Tm" => {
                let nums: Vec<f64> = operands.iter().filter_map(number).collect();
                if nums.len() >= 6 {
                    self.state.text_matrix = [nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]];
                    self.state.line_matrix = self.state.text_matrix;
                }
            }
            "T*" => {
                self.mark_line_end();
                self.state.next_line();
            }
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.last() {
                    self.push_text(decode_text(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.last() {
                    self.push_text(join_tj_array(items));
                }
            }
            // Move to next line and show: (string) '
            // Set spacing, move, and show: aw ac (string) "
            "'" | "\"" => {
                self.mark_line_end();
                self.state.next_line();
                if let Some(Object::String(bytes, _)) = operands.last() {
                    self.push_text(decode_text(bytes));
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: String) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let y = self.state.y();
        self.break_paragraph_on_gap(y);
        self.fragments
            .push(PositionedFragment::new(text, y, self.state.effective_font_size()));
    }

    /// Close the previous line and add a blank one when the baseline jumps
    /// well past normal line spacing.
    fn break_paragraph_on_gap(&mut self, y: f64) {
        let Some(last) = self.fragments.last_mut() else {
            return;
        };
        let (Some(prev_y), Some(prev_size)) = (last.y, last.font_size) else {
            return;
        };
        if (prev_y - y).abs() > PARAGRAPH_GAP_RATIO * prev_size {
            last.end_of_line = true;
            self.fragments.push(PositionedFragment::line_end(prev_y));
        }
    }

    fn mark_line_end(&mut self) {
        if let Some(last) = self.fragments.last_mut() {
            last.end_of_line = true;
        }
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn pair(operands: &[Object]) -> Option<(f64, f64)> {
    match operands {
        [.., a, b] => Some((number(a)?, number(b)?)),
        _ => None,
    }
}

/// Concatenate the strings of a TJ array, inserting spaces at wide gaps.
fn join_tj_array(items: &[Object]) -> String {
    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&decode_text(bytes)),
            other => {
                if number(other).is_some_and(|n| n < WORD_GAP_ADJUSTMENT)
                    && !text.is_empty()
                    && !text.ends_with(' ')
                {
                    text.push(' ');
                }
            }
        }
    }
    text
}

/// UTF-16BE when the string carries a byte-order mark, WinAnsi otherwise.
fn decode_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    bytes
        .iter()
        .map(|&b| win_ansi_char(b).unwrap_or(' '))
        .collect()
}

/// WinAnsiEncoding: Latin-1 plus the Windows-1252 block at 0x80-0x9F.
fn win_ansi_char(byte: u8) -> Option<char> {
    let ch = match byte {
        0x20..=0x7E | 0xA0..=0xFF => char::from(byte),
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(ch)
}
