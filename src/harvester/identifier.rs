use rand::Rng;
use std::fmt;

/// Number of digits in every identifier
pub const IDENTIFIER_WIDTH: usize = 6;

/// Size of the full identifier space, `[0, 1_000_000)`
pub const MAX_IDENTIFIER_SPACE: u32 = 1_000_000;

/// A zero-padded 6 digit gallery identifier
///
/// Drawn uniformly at random for each harvester iteration. Uniqueness across
/// draws is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GalleryIdentifier(String);

impl GalleryIdentifier {
    /// Builds the identifier for `number`, wrapping into the identifier space
    pub fn from_number(number: u32) -> Self {
        Self(format!(
            "{:0width$}",
            number % MAX_IDENTIFIER_SPACE,
            width = IDENTIFIER_WIDTH
        ))
    }

    /// Draws an identifier uniformly from `[0, space)`
    ///
    /// `space` is clamped to `1..=MAX_IDENTIFIER_SPACE` so the result always
    /// keeps the fixed width.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, space: u32) -> Self {
        let space = space.clamp(1, MAX_IDENTIFIER_SPACE);
        Self::from_number(rng.random_range(0..space))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GalleryIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
