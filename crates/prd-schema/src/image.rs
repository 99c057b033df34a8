//! Images attached to a document

use crate::section::SectionName;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Where an image can be found
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageHandle {
    /// Remote image
    Url(String),
    /// Local file
    Path(PathBuf),
}

impl Display for ImageHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// An image fetched for a suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Source handle
    pub handle: ImageHandle,
    /// Section the image illustrates, `None` for general images
    pub owner: Option<SectionName>,
}

/// A free-text image request, optionally resolved to an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSuggestion {
    /// Query text
    pub description: String,
    /// Section explicitly named by the author
    pub section: Option<SectionName>,
    /// Resolved image
    pub image: Option<ImageAsset>,
}

impl ImageSuggestion {
    /// Create an unresolved suggestion
    #[inline]
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            section: None,
            image: None,
        }
    }

    /// With an explicit section
    #[inline]
    #[must_use]
    pub fn for_section(mut self, section: SectionName) -> Self {
        self.section = Some(section);
        self
    }

    /// Section a resolved image should be placed under
    ///
    /// The explicit section wins, otherwise the first section named in the
    /// description.
    #[must_use]
    pub fn placement(&self) -> Option<SectionName> {
        self.section
            .or_else(|| SectionName::mentioned_in(&self.description))
    }
}
