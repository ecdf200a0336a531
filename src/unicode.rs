//! Script-family scan of extracted text.
//!
//! DOCX output can lose or garble non-Latin scripts depending on the fonts
//! available to the reader, so the converter attaches an advisory warning
//! when any of these families show up. The scan never changes the text.

/// Script families that put a conversion at risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFamily {
    Cjk,
    Arabic,
    Hebrew,
    Cyrillic,
    OtherComplex,
}

impl ScriptFamily {
    pub fn label(self) -> &'static str {
        match self {
            ScriptFamily::Cjk => "CJK",
            ScriptFamily::Arabic => "Arabic",
            ScriptFamily::Hebrew => "Hebrew",
            ScriptFamily::Cyrillic => "Cyrillic",
            ScriptFamily::OtherComplex => "other complex scripts",
        }
    }
}

/// Per-family flags and codepoint counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnicodeReport {
    pub has_cjk: bool,
    pub has_arabic: bool,
    pub has_hebrew: bool,
    pub has_cyrillic: bool,
    pub has_other_complex: bool,
    pub cjk: usize,
    pub arabic: usize,
    pub hebrew: usize,
    pub cyrillic: usize,
    pub other_complex: usize,
}

/// Codepoints below this are Latin, Latin-1 and Latin Extended-A/B.
const LOW_COMPLEXITY_LIMIT: u32 = 0x0250;

/// Classify one codepoint, `None` for low-risk characters.
pub fn classify(ch: char) -> Option<ScriptFamily> {
    let cp = ch as u32;
    if cp < LOW_COMPLEXITY_LIMIT {
        return None;
    }

    match cp {
        // Hangul Jamo, CJK radicals through Yi, Hangul syllables,
        // compatibility ideographs, halfwidth forms, supplementary ideographs
        0x1100..=0x11FF
        | 0x2E80..=0x2FDF
        | 0x3000..=0x303F
        | 0x3040..=0x30FF
        | 0x3100..=0x31FF
        | 0x3200..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA960..=0xA97F
        | 0xAC00..=0xD7FF
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFFEF
        | 0x20000..=0x3FFFF => Some(ScriptFamily::Cjk),
        0x0600..=0x06FF
        | 0x0750..=0x077F
        | 0x0870..=0x08FF
        | 0xFB50..=0xFDFF
        | 0xFE70..=0xFEFF => Some(ScriptFamily::Arabic),
        0x0590..=0x05FF | 0xFB1D..=0xFB4F => Some(ScriptFamily::Hebrew),
        0x0400..=0x052F | 0x1C80..=0x1C8F | 0x2DE0..=0x2DFF | 0xA640..=0xA69F => {
            Some(ScriptFamily::Cyrillic)
        }
        // Modifier letters, combining diacritics and Greek
        0x02B0..=0x03FF => None,
        // Latin Extended Additional (Vietnamese) and Greek Extended
        0x1E00..=0x1FFF => None,
        // Punctuation, symbols, arrows, math and box drawing render fine
        0x2000..=0x2BFF => None,
        // Variation selectors and the replacement character
        0xFE00..=0xFE0F | 0xFFF0..=0xFFFF => None,
        _ => Some(ScriptFamily::OtherComplex),
    }
}

/// Scan `text` and count codepoints per risky script family.
pub fn analyze(text: &str) -> UnicodeReport {
    let mut report = UnicodeReport::default();
    for ch in text.chars() {
        match classify(ch) {
            Some(ScriptFamily::Cjk) => report.cjk += 1,
            Some(ScriptFamily::Arabic) => report.arabic += 1,
            Some(ScriptFamily::Hebrew) => report.hebrew += 1,
            Some(ScriptFamily::Cyrillic) => report.cyrillic += 1,
            Some(ScriptFamily::OtherComplex) => report.other_complex += 1,
            None => {}
        }
    }
    report.refresh_flags();
    report
}

impl UnicodeReport {
    fn refresh_flags(&mut self) {
        self.has_cjk = self.cjk > 0;
        self.has_arabic = self.arabic > 0;
        self.has_hebrew = self.hebrew > 0;
        self.has_cyrillic = self.cyrillic > 0;
        self.has_other_complex = self.other_complex > 0;
    }

    /// Accumulate another report, e.g. from the next page.
    pub fn merge(&mut self, other: &UnicodeReport) {
        self.cjk += other.cjk;
        self.arabic += other.arabic;
        self.hebrew += other.hebrew;
        self.cyrillic += other.cyrillic;
        self.other_complex += other.other_complex;
        self.refresh_flags();
    }

    pub fn has_complex_script(&self) -> bool {
        !self.detected_families().is_empty()
    }

    pub fn detected_families(&self) -> Vec<ScriptFamily> {
        [
            (self.has_cjk, ScriptFamily::Cjk),
            (self.has_arabic, ScriptFamily::Arabic),
            (self.has_hebrew, ScriptFamily::Hebrew),
            (self.has_cyrillic, ScriptFamily::Cyrillic),
            (self.has_other_complex, ScriptFamily::OtherComplex),
        ]
        .into_iter()
        .filter_map(|(present, family)| present.then_some(family))
        .collect()
    }

    /// Advisory message for the caller, `None` when only low-risk text was found.
    pub fn warning(&self) -> Option<String> {
        let families = self.detected_families();
        if families.is_empty() {
            return None;
        }
        let names: Vec<&str> = families.iter().map(|f| f.label()).collect();
        Some(format!(
            "Document contains {} text, which may not display correctly in the converted file",
            names.join(", ")
        ))
    }
}
