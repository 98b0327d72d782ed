//! Page sections and the slug <-> path contract
//!
//! A section's slug is its element id and its URL path segment (`/about`).
//! The root path maps to the default slug. Paths are always compared in
//! their percent-encoded form, the way the address bar reports them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

use crate::error::NavigationError;
use crate::Result;

pub const DEFAULT_SLUG: &str = "home";

/// Base for resolving relative locations; only the path is ever kept.
const LOCATION_BASE: &str = "http://folio.invalid/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Element id and URL slug
    pub slug: String,
    /// Position in document order
    pub position: usize,
}

impl Section {
    /// `/slug`, percent-encoded as a single path segment.
    pub fn path(&self) -> String {
        let Ok(mut url) = Url::parse(LOCATION_BASE) else {
            return format!("/{}", self.slug);
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().push(&self.slug);
        }
        url.path().to_string()
    }
}

/// The ordered, immutable list of sections on the page.
#[derive(Debug, Clone)]
pub struct Sections {
    sections: Vec<Section>,
    default_slug: String,
}

impl Sections {
    /// Build from slugs in document order.
    pub fn new<I, S>(slugs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut sections = Vec::new();

        for (position, slug) in slugs.into_iter().enumerate() {
            let slug = slug.into();
            if slug.trim().is_empty() {
                return Err(NavigationError::EmptySlug(position));
            }
            if !seen.insert(slug.clone()) {
                return Err(NavigationError::DuplicateSlug(slug));
            }
            sections.push(Section { slug, position });
        }

        if sections.is_empty() {
            return Err(NavigationError::NoSections);
        }

        Ok(Self {
            sections,
            default_slug: DEFAULT_SLUG.to_string(),
        })
    }

    /// Slug the root path resolves to.
    pub fn with_default_slug(mut self, slug: impl Into<String>) -> Self {
        self.default_slug = slug.into();
        self
    }

    pub fn default_slug(&self) -> &str {
        &self.default_slug
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; construction rejects an empty page.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.sections.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn position(&self, slug: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.slug == slug)
    }

    pub fn path_for(&self, index: usize) -> Option<String> {
        self.get(index).map(Section::path)
    }

    /// The slug of the section a location points at.
    pub fn slug_for_location(&self, location: &str) -> Option<&str> {
        self.resolve(location)
            .and_then(|index| self.get(index))
            .map(|section| section.slug.as_str())
    }

    /// Resolve a location to a section index.
    ///
    /// Accepts a bare path (`/about`) or a full URL; query and fragment are
    /// ignored. The root path resolves to the default slug.
    pub fn resolve(&self, location: &str) -> Option<usize> {
        let path = location_path(location);
        let segment = path.trim_matches('/');
        if segment.is_empty() {
            return self.position(&self.default_slug);
        }

        self.sections
            .iter()
            .position(|section| section.path().trim_start_matches('/') == segment)
    }
}

/// The path component of a location, as the browser would report it.
pub fn location_path(location: &str) -> String {
    let location = location.trim();
    Url::parse(LOCATION_BASE)
        .and_then(|base| base.join(location))
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| {
            let end = location.find(['?', '#']).unwrap_or(location.len());
            location[..end].to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Sections {
        Sections::new(["home", "about", "work", "contact"]).unwrap()
    }

    #[test]
    fn test_positions_follow_document_order() {
        let sections = page();
        assert_eq!(sections.len(), 4);
        assert_eq!(sections.last_index(), 3);
        assert_eq!(sections.position("work"), Some(2));
        assert_eq!(sections.get(3).unwrap().path(), "/contact");
        assert!(sections.iter().enumerate().all(|(i, s)| s.position == i));
    }

    #[test]
    fn test_rejects_bad_section_lists() {
        assert_eq!(
            Sections::new(Vec::<String>::new()).unwrap_err(),
            NavigationError::NoSections
        );
        assert_eq!(
            Sections::new(["home", " "]).unwrap_err(),
            NavigationError::EmptySlug(1)
        );
        assert_eq!(
            Sections::new(["home", "about", "home"]).unwrap_err(),
            NavigationError::DuplicateSlug("home".to_string())
        );
    }

    #[test]
    fn test_resolve_locations() {
        let sections = page();

        assert_eq!(sections.resolve("/"), Some(0));
        assert_eq!(sections.resolve(""), Some(0));
        assert_eq!(sections.resolve("/about"), Some(1));
        assert_eq!(sections.resolve("/work/"), Some(2));
        assert_eq!(sections.resolve("/contact?ref=nav#top"), Some(3));
        assert_eq!(sections.resolve("https://example.com/about"), Some(1));
        assert_eq!(sections.resolve("/missing"), None);
        assert_eq!(sections.resolve("/about/team"), None);
    }

    #[test]
    fn test_custom_default_slug() {
        let sections = Sections::new(["intro", "about"])
            .unwrap()
            .with_default_slug("intro");
        assert_eq!(sections.slug_for_location("/"), Some("intro"));
        assert_eq!(sections.resolve("/"), Some(0));

        // A page without a "home" section does not resolve the root.
        let sections = Sections::new(["intro", "about"]).unwrap();
        assert_eq!(sections.resolve("/"), None);
    }

    #[test]
    fn test_non_ascii_slugs_match_encoded_locations() {
        let sections = Sections::new(["home", "über uns", "a/b"]).unwrap();

        assert_eq!(sections.get(1).unwrap().path(), "/%C3%BCber%20uns");
        assert_eq!(sections.get(2).unwrap().path(), "/a%2Fb");
        assert_eq!(
            location_path("https://example.com/%C3%BCber%20uns"),
            sections.get(1).unwrap().path()
        );

        assert_eq!(sections.resolve("https://example.com/%C3%BCber%20uns"), Some(1));
        assert_eq!(sections.resolve("/über uns"), Some(1));
        assert_eq!(sections.resolve("/a%2Fb"), Some(2));
        assert_eq!(sections.resolve("/a/b"), None);
        assert_eq!(sections.slug_for_location("/%C3%BCber%20uns"), Some("über uns"));
    }

    #[test]
    fn test_location_path() {
        assert_eq!(location_path("/about"), "/about");
        assert_eq!(location_path("about"), "/about");
        assert_eq!(location_path("https://example.com/work?x=1"), "/work");
    }
}
