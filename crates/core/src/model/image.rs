use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid image URL: {0}")]
    InvalidUrl(String),
}

/// Opaque pointer to the thumbnail shown next to a headline.
///
/// The quiz never loads the asset; the display layer decides how to resolve it
/// and what to show when it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    FilePath(PathBuf),
    Url(Url),
}

impl ImageRef {
    /// Parses a raw reference. Anything carrying a `scheme://` prefix is treated
    /// as a URL, everything else as a (usually relative) file path.
    ///
    /// # Errors
    ///
    /// Returns `ImageRefError::Empty` for blank input and
    /// `ImageRefError::InvalidUrl` when a URL-looking value does not parse.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ImageRefError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(ImageRefError::Empty);
        }
        if s.contains("://") {
            let url = Url::parse(s).map_err(|_| ImageRefError::InvalidUrl(s.to_string()))?;
            return Ok(ImageRef::Url(url));
        }
        Ok(ImageRef::FilePath(PathBuf::from(s)))
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            ImageRef::Url(u) => Some(u),
            ImageRef::FilePath(_) => None,
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::FilePath(p) => write!(f, "{}", p.display()),
            ImageRef::Url(u) => write!(f, "{u}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_stay_paths() {
        let image = ImageRef::parse("images/q1.jpg").unwrap();
        assert_eq!(image, ImageRef::FilePath(PathBuf::from("images/q1.jpg")));
        assert!(image.as_url().is_none());
        assert_eq!(image.to_string(), "images/q1.jpg");
    }

    #[test]
    fn urls_are_parsed() {
        let image = ImageRef::parse(" https://example.com/q2.jpg ").unwrap();
        assert_eq!(
            image.as_url().map(Url::as_str),
            Some("https://example.com/q2.jpg")
        );
    }

    #[test]
    fn blank_and_broken_refs_are_rejected() {
        assert_eq!(ImageRef::parse("   ").unwrap_err(), ImageRefError::Empty);
        assert!(matches!(
            ImageRef::parse("http://").unwrap_err(),
            ImageRefError::InvalidUrl(_)
        ));
    }
}
