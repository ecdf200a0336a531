use crate::config::ConversionConfig;
use crate::types::PositionedFragment;

/// Turns one page's fragments, or one page of OCR text, into paragraphs.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphReconstructor {
    line_break_ratio: f64,
    default_font_size: f64,
    paragraph_gap_ratio: Option<f64>,
}

impl Default for ParagraphReconstructor {
    fn default() -> Self {
        Self::from_config(&ConversionConfig::default())
    }
}

impl ParagraphReconstructor {
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            line_break_ratio: config.line_break_ratio,
            default_font_size: config.default_font_size,
            paragraph_gap_ratio: config.paragraph_gap_ratio,
        }
    }

    /// Rebuild paragraphs from fragments in content-stream order.
    pub fn reconstruct(&self, fragments: &[PositionedFragment]) -> Vec<String> {
        let lines = self.build_lines(fragments);
        group_lines(&lines)
    }

    /// Split recognized text into paragraphs on blank lines.
    ///
    /// Single line breaks inside a paragraph are kept.
    pub fn split_recognized(&self, text: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim_end();
            if line.trim().is_empty() {
                push_paragraph(&mut paragraphs, &current.join("\n"));
                current.clear();
            } else {
                current.push(line);
            }
        }
        push_paragraph(&mut paragraphs, &current.join("\n"));

        paragraphs
    }

    /// Join fragments into lines. A blank entry marks a paragraph break.
    fn build_lines(&self, fragments: &[PositionedFragment]) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut buffer = String::new();
        let mut last_y: Option<f64> = None;
        let mut last_font_size = self.default_font_size;

        for fragment in fragments {
            // Empty runs without a line end leave spacing state untouched
            if fragment.text.is_empty() && !fragment.end_of_line {
                continue;
            }

            let mut broke_line = false;
            if let (Some(y), Some(prev_y)) = (fragment.y, last_y) {
                let dy = (y - prev_y).abs();
                if dy > self.line_break_ratio * last_font_size {
                    if !buffer.is_empty() {
                        lines.push(std::mem::take(&mut buffer));
                    }
                    if let Some(ratio) = self.paragraph_gap_ratio {
                        if dy > ratio * last_font_size && lines.last().is_some_and(|l| !l.trim().is_empty()) {
                            lines.push(String::new());
                        }
                    }
                    broke_line = true;
                }
            }

            if !broke_line
                && !fragment.text.is_empty()
                && !buffer.is_empty()
                && !buffer.ends_with(char::is_whitespace)
            {
                buffer.push(' ');
            }
            buffer.push_str(&fragment.text);

            if fragment.y.is_some() {
                last_y = fragment.y;
            }
            if let Some(size) = fragment.font_size.filter(|s| *s > 0.0) {
                last_font_size = size;
            }

            if fragment.end_of_line {
                lines.push(std::mem::take(&mut buffer));
            }
        }

        if !buffer.is_empty() {
            lines.push(buffer);
        }

        lines
    }
}

/// Consecutive non-blank lines form one paragraph; a blank line ends it.
fn group_lines(lines: &[String]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            push_paragraph(&mut paragraphs, &current.join(" "));
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_paragraph(&mut paragraphs, &current.join(" "));

    paragraphs
}

fn push_paragraph(paragraphs: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        paragraphs.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, y: f64, font_size: f64) -> PositionedFragment {
        PositionedFragment::new(text, y, font_size)
    }

    #[test]
    fn test_small_offset_stays_on_line() {
        // dy = 6 = 0.5 * 12, not above the threshold
        let fragments = vec![frag("Hello", 700.0, 12.0), frag("world", 694.0, 12.0)];
        let paragraphs = ParagraphReconstructor::default().reconstruct(&fragments);
        assert_eq!(paragraphs, vec!["Hello world"]);
    }

    #[test]
    fn test_large_offset_breaks_line() {
        let r = ParagraphReconstructor::default();
        let fragments = vec![frag("Hello", 700.0, 12.0), frag("world", 693.9, 12.0)];
        let lines = r.build_lines(&fragments);
        assert_eq!(lines, vec!["Hello", "world"]);
        // Both lines are non-blank, so they still share a paragraph
        assert_eq!(r.reconstruct(&fragments), vec!["Hello world"]);
    }

    #[test]
    fn test_threshold_uses_previous_font_size() {
        let r = ParagraphReconstructor::default();
        // dy = 8: below 0.5 * 20 but above 0.5 * 12
        let big_first = vec![frag("Title", 700.0, 20.0), frag("x", 692.0, 12.0)];
        assert_eq!(r.build_lines(&big_first), vec!["Title x"]);
        let small_first = vec![frag("a", 700.0, 12.0), frag("b", 692.0, 20.0)];
        assert_eq!(r.build_lines(&small_first), vec!["a", "b"]);
    }

    #[test]
    fn test_no_double_space() {
        let fragments = vec![frag("Hello ", 700.0, 12.0), frag("world", 700.0, 12.0)];
        let paragraphs = ParagraphReconstructor::default().reconstruct(&fragments);
        assert_eq!(paragraphs, vec!["Hello world"]);
    }

    #[test]
    fn test_end_of_line_forces_break() {
        let r = ParagraphReconstructor::default();
        let fragments = vec![
            frag("first", 700.0, 12.0).with_end_of_line(),
            frag("second", 700.0, 12.0),
        ];
        assert_eq!(r.build_lines(&fragments), vec!["first", "second"]);
    }

    #[test]
    fn test_blank_line_splits_paragraphs() {
        let fragments = vec![
            frag("One", 700.0, 12.0),
            PositionedFragment::line_end(700.0),
            PositionedFragment::line_end(700.0),
            frag("Two", 686.0, 12.0),
        ];
        let paragraphs = ParagraphReconstructor::default().reconstruct(&fragments);
        assert_eq!(paragraphs, vec!["One", "Two"]);
    }

    #[test]
    fn test_empty_fragment_without_eol_is_skipped() {
        // The empty run sits far below, but must not move the baseline
        let r = ParagraphReconstructor::default();
        let fragments = vec![
            frag("alpha", 700.0, 12.0),
            frag("", 100.0, 40.0),
            frag("beta", 700.0, 12.0),
        ];
        assert_eq!(r.build_lines(&fragments), vec!["alpha beta"]);
    }

    #[test]
    fn test_unknown_positions_never_break() {
        let fragments = vec![
            PositionedFragment {
                text: "no".into(),
                ..Default::default()
            },
            PositionedFragment {
                text: "position".into(),
                ..Default::default()
            },
        ];
        let paragraphs = ParagraphReconstructor::default().reconstruct(&fragments);
        assert_eq!(paragraphs, vec!["no position"]);
    }

    #[test]
    fn test_no_fragments() {
        assert!(ParagraphReconstructor::default().reconstruct(&[]).is_empty());
    }

    #[test]
    fn test_paragraph_gap_when_enabled() {
        let config = ConversionConfig {
            paragraph_gap_ratio: Some(1.5),
            ..ConversionConfig::default()
        };
        let r = ParagraphReconstructor::from_config(&config);
        let fragments = vec![
            frag("line one", 700.0, 12.0),
            frag("line two", 686.0, 12.0),
            frag("next paragraph", 650.0, 12.0),
        ];
        assert_eq!(
            r.reconstruct(&fragments),
            vec!["line one line two", "next paragraph"]
        );
    }

    #[test]
    fn test_recognized_text_paragraphs() {
        let text = "First line\nstill first\n\n  \n\nSecond\r\n\r\nThird  \n";
        let paragraphs = ParagraphReconstructor::default().split_recognized(text);
        assert_eq!(paragraphs, vec!["First line\nstill first", "Second", "Third"]);
    }

    #[test]
    fn test_recognized_text_blank() {
        assert!(ParagraphReconstructor::default()
            .split_recognized(" \n\n \t")
            .is_empty());
    }
}
