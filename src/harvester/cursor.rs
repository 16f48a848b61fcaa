use crate::harvester::GalleryIdentifier;
use url::Url;

/// Position within one gallery's page sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub identifier: GalleryIdentifier,
    /// 1-based page number
    pub page_number: u32,
}

impl PageCursor {
    /// Starts a cursor at page 1
    pub fn new(identifier: GalleryIdentifier) -> Self {
        Self {
            identifier,
            page_number: 1,
        }
    }

    /// Moves to the next page
    pub fn advance(&mut self) {
        self.page_number += 1;
    }

    /// Page URL for the current position
    pub fn page_url(&self, template: &str) -> Result<Url, url::ParseError> {
        render_page_url(template, &self.identifier, self.page_number)
    }

    /// Local file name, `<identifier>_<pageNumber>.jpg`
    pub fn file_name(&self) -> String {
        format!("{}_{}.jpg", self.identifier, self.page_number)
    }
}

/// Substitutes `{id}` and `{page}` in a page URL template
pub fn render_page_url(
    template: &str,
    identifier: &GalleryIdentifier,
    page_number: u32,
) -> Result<Url, url::ParseError> {
    let rendered = template
        .replace("{id}", identifier.as_str())
        .replace("{page}", &page_number.to_string());
    Url::parse(&rendered)
}
