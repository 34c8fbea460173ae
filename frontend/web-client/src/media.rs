//! Media references and per-post carousel

use url::Url;

use crate::models::{MediaAttachment, MediaKind};

/// Placeholder shown for users without an avatar
pub const NOT_FOUND_AVATAR: &str = "/static/not_found.png";

/// Resolves relative media paths against the backend origin
#[derive(Debug, Clone)]
pub struct MediaResolver {
    origin: Url,
}

impl MediaResolver {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    /// Absolute URL for a media path; unparsable paths are returned as-is
    pub fn resolve(&self, path: &str) -> String {
        self.origin
            .join(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| path.to_string())
    }

    pub fn avatar(&self, profile: Option<&str>) -> String {
        match profile {
            Some(path) if !path.is_empty() => self.resolve(path),
            _ => self.resolve(NOT_FOUND_AVATAR),
        }
    }

    pub fn attachment(&self, attachment: &MediaAttachment) -> (MediaKind, String) {
        (attachment.kind, self.resolve(&attachment.content))
    }
}

/// Which attachment of a post is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaCarousel {
    index: usize,
    len: usize,
}

impl MediaCarousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len
    }

    /// Move to `index`, clamped to the available attachments
    pub fn select(&mut self, index: isize) {
        if self.len == 0 || index <= 0 {
            self.index = 0;
        } else {
            self.index = (index as usize).min(self.len - 1);
        }
    }

    pub fn show_next(&mut self) {
        self.select(self.index as isize + 1);
    }

    pub fn show_previous(&mut self) {
        self.select(self.index as isize - 1);
    }

    pub fn current<'a>(&self, files: &'a [MediaAttachment]) -> Option<&'a MediaAttachment> {
        files.get(self.index)
    }
}
