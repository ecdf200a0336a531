//! Download filename handling.

/// Used when nothing survives sanitizing.
pub const FALLBACK_STEM: &str = "document";

const MAX_STEM_CHARS: usize = 200;

/// Make `name` safe to offer as a download and ensure it ends in `.{extension}`.
///
/// Path separators, `..` sequences, control characters and leading dots are
/// removed and whitespace runs collapse to one space.
pub fn sanitize_filename(name: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    let suffix = format!(".{}", extension);

    let mut cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\'))
        .collect();

    // Removing one ".." can join two dots into a new one
    while cleaned.contains("..") {
        cleaned = cleaned.replace("..", "");
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_start_matches(['.', ' ']).trim_end();

    let stem = strip_suffix_ignore_case(trimmed, &suffix).unwrap_or(trimmed);
    let stem: String = stem.trim_end_matches(['.', ' ']).chars().take(MAX_STEM_CHARS).collect();
    let stem = stem.trim_end();

    if stem.is_empty() {
        format!("{}{}", FALLBACK_STEM, suffix)
    } else {
        format!("{}{}", stem, suffix)
    }
}

/// Output name for a converted source file: `report.pdf` becomes `report.docx`.
pub fn output_filename(source_name: &str) -> String {
    let base = source_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source_name);
    let stem = strip_suffix_ignore_case(base, ".pdf").unwrap_or(base);
    sanitize_filename(stem, "docx")
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    if s.is_char_boundary(cut) && s[cut..].eq_ignore_ascii_case(suffix) {
        Some(&s[..cut])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traversal_is_stripped() {
        let name = sanitize_filename("../../etc/passwd", "docx");
        assert!(!name.contains('/'));
        assert!(!name.contains('\\'));
        assert!(!name.contains(".."));
        assert!(name.ends_with(".docx"));
        assert_eq!(name, "etcpasswd.docx");
    }

    #[test]
    fn test_windows_separators_and_controls() {
        assert_eq!(
            sanitize_filename("C:\\temp\\re\u{7}port\n.docx", "docx"),
            "C:tempreport.docx"
        );
    }

    #[test]
    fn test_leading_dots_removed() {
        assert_eq!(sanitize_filename(".hidden", "docx"), "hidden.docx");
        assert_eq!(sanitize_filename("...", ".docx"), "document.docx");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(sanitize_filename("", "docx"), "document.docx");
        assert_eq!(sanitize_filename(" / \\ ", "docx"), "document.docx");
    }

    #[test]
    fn test_extension_not_doubled() {
        assert_eq!(sanitize_filename("Report.DOCX", "docx"), "Report.docx");
        assert_eq!(sanitize_filename("notes  final", "docx"), "notes final.docx");
    }

    #[test]
    fn test_long_names_truncated() {
        let name = sanitize_filename(&"a".repeat(500), "docx");
        assert_eq!(name.len(), MAX_STEM_CHARS + ".docx".len());
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(output_filename("scans/Invoice 2024.PDF"), "Invoice 2024.docx");
        assert_eq!(output_filename("notes"), "notes.docx");
        assert_eq!(output_filename(".pdf"), "document.docx");
    }
}
