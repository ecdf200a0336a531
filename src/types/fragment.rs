/// A run of text reported by the PDF decoder, in content-stream order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionedFragment {
    pub text: String,
    /// Baseline Y in page space, if the decoder knows it.
    pub y: Option<f64>,
    /// Effective font size, if the decoder knows it.
    pub font_size: Option<f64>,
    /// The decoder saw an explicit line end after this run.
    pub end_of_line: bool,
}

impl PositionedFragment {
    pub fn new(text: impl Into<String>, y: f64, font_size: f64) -> Self {
        Self {
            text: text.into(),
            y: Some(y),
            font_size: Some(font_size),
            end_of_line: false,
        }
    }

    /// An empty run that only marks a line end.
    pub fn line_end(y: f64) -> Self {
        Self {
            y: Some(y),
            end_of_line: true,
            ..Self::default()
        }
    }

    pub fn with_end_of_line(mut self) -> Self {
        self.end_of_line = true;
        self
    }
}
