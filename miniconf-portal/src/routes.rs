//! Site routes
//!
//! Every dynamic page of the portal lives at a single top-level path segment
//! (`/papers.html`, `/poster_<uid>.html`, `/serve_<name>.json`, ...). The
//! same [`Route`] value drives both the HTTP handler and the static export.

use std::fmt;

/// Pages with a fixed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Index,
    Registration,
    Organizers,
    Speakers,
    Calls,
    Help,
    Papers,
    Calendar,
    Workshops,
    Tutorials,
    Sponsors,
}

impl Page {
    pub const ALL: [Page; 11] = [
        Page::Index,
        Page::Registration,
        Page::Organizers,
        Page::Speakers,
        Page::Calls,
        Page::Help,
        Page::Papers,
        Page::Calendar,
        Page::Workshops,
        Page::Tutorials,
        Page::Sponsors,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Index => "index.html",
            Self::Registration => "registration.html",
            Self::Organizers => "organizers.html",
            Self::Speakers => "speakers.html",
            Self::Calls => "calls.html",
            Self::Help => "help.html",
            Self::Papers => "papers.html",
            Self::Calendar => "calendar.html",
            Self::Workshops => "workshops.html",
            Self::Tutorials => "tutorials.html",
            Self::Sponsors => "sponsors.html",
        }
    }

    /// Template the page context is rendered with
    pub fn template(self) -> &'static str {
        match self {
            Self::Calendar => "schedule.html",
            other => other.file_name(),
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.file_name() == name)
    }
}

/// Body type of a rendered route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Html,
    Json,
}

impl ContentKind {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

/// Any dynamic route of the portal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Page(Page),
    /// Detail page for one paper
    Poster(String),
    /// Detail page for one workshop
    Workshop(String),
    /// All papers, normalized and sorted by title
    PapersJson,
    /// A raw dataset passed through as JSON
    Serve(String),
}

impl Route {
    /// Parse a top-level path segment (without the leading `/`)
    pub fn parse(segment: &str) -> Option<Self> {
        if let Some(page) = Page::from_file_name(segment) {
            return Some(Self::Page(page));
        }
        if segment == "papers.json" {
            return Some(Self::PapersJson);
        }
        if let Some(uid) = strip_affixes(segment, "poster_", ".html") {
            return Some(Self::Poster(uid.to_string()));
        }
        if let Some(uid) = strip_affixes(segment, "workshop_", ".html") {
            return Some(Self::Workshop(uid.to_string()));
        }
        if let Some(name) = strip_affixes(segment, "serve_", ".json") {
            return Some(Self::Serve(name.to_string()));
        }
        None
    }

    /// File name relative to the site root
    pub fn file_name(&self) -> String {
        match self {
            Self::Page(page) => page.file_name().to_string(),
            Self::Poster(uid) => format!("poster_{}.html", uid),
            Self::Workshop(uid) => format!("workshop_{}.html", uid),
            Self::PapersJson => "papers.json".to_string(),
            Self::Serve(name) => format!("serve_{}.json", name),
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.file_name())
    }

    pub fn content_kind(&self) -> ContentKind {
        match self {
            Self::Page(_) | Self::Poster(_) | Self::Workshop(_) => ContentKind::Html,
            Self::PapersJson | Self::Serve(_) => ContentKind::Json,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// `prefix<middle>suffix` → `middle`, requiring a non-empty middle
fn strip_affixes<'a>(segment: &'a str, prefix: &str, suffix: &str) -> Option<&'a str> {
    segment
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .filter(|middle| !middle.is_empty())
}
