/// Reconstructed paragraphs of one source page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageData {
    /// 1-based, contiguous across a run.
    pub page_number: usize,
    /// Never contains an entry that is blank after trimming.
    pub paragraphs: Vec<String>,
}

impl PageData {
    /// Build a page, dropping blank paragraphs.
    pub fn new(page_number: usize, paragraphs: Vec<String>) -> Self {
        let paragraphs = paragraphs
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();
        Self {
            page_number,
            paragraphs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// All paragraph text of the page, separated by blank lines.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}
