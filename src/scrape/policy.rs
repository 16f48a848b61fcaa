use url::Url;

/// Decides which image URLs are treated as JPEG resources
///
/// The check is purely on the path extension; the image is not fetched to
/// inspect its content type.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    extensions: Vec<String>,
}

impl ImagePolicy {
    /// Accepts paths ending in any of `extensions` (case-insensitive, no dot)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns true if the URL's path has an accepted extension
    pub fn accepts(&self, image_url: &str) -> bool {
        let Ok(url) = Url::parse(image_url) else {
            return false;
        };

        let Some(file_name) = url.path_segments().and_then(|mut s| s.next_back()) else {
            return false;
        };

        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            }
            _ => false,
        }
    }

    /// Filters `images` down to accepted URLs, preserving document order
    pub fn select<'a>(&'a self, images: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
        images.iter().filter(move |url| self.accepts(url))
    }
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self::new(["jpg", "jpeg"])
    }
}
