//! Page contexts
//!
//! Each route is turned into a JSON context dictionary from the site data and
//! indexes, then either rendered through a [`PageRenderer`] (HTML routes) or
//! returned as-is (JSON routes).

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use miniconf_common::index::CollectionShape;
use miniconf_common::records::{
    format_paper, format_workshop, require, require_text, to_record, Record,
};
use miniconf_common::{EntityKind, Error, Result, SiteContext};

use crate::render::{markdown_to_html, PageRenderer};
use crate::routes::{ContentKind, Page, Route};

/// Markdown file behind the home page
pub const HOME_MARKDOWN: &str = "Home.md";
/// Markdown file behind the registration page
pub const REGISTRATION_MARKDOWN: &str = "registration.md";

/// Output of rendering one route
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub kind: ContentKind,
    pub body: String,
}

/// Builds page contexts from an immutable site
pub struct Pages<'a> {
    site: &'a SiteContext,
    pages_dir: &'a Path,
}

impl<'a> Pages<'a> {
    pub fn new(site: &'a SiteContext, pages_dir: &'a Path) -> Self {
        Self { site, pages_dir }
    }

    /// Render any route to its final body
    pub fn render(&self, route: &Route, renderer: &dyn PageRenderer) -> Result<Rendered> {
        debug!("Rendering {}", route);
        let body = match route {
            Route::Page(page) => renderer.render(page.template(), &self.page_context(*page)?)?,
            Route::Poster(uid) => renderer.render("poster.html", &self.poster_context(uid)?)?,
            Route::Workshop(uid) => {
                renderer.render("workshop.html", &self.workshop_context(uid)?)?
            }
            Route::PapersJson => to_json(&self.papers_json()?)?,
            Route::Serve(name) => to_json(self.site.site_data().require(name)?)?,
        };
        Ok(Rendered {
            kind: route.content_kind(),
            body,
        })
    }

    /// Context shared by every page
    fn base(&self) -> Result<Map<String, Value>> {
        let mut data = Map::new();
        data.insert("config".to_string(), self.site.site_data().require("config")?.clone());
        Ok(data)
    }

    /// Context for a fixed page
    pub fn page_context(&self, page: Page) -> Result<Value> {
        let datasets = self.site.site_data();
        let mut data = self.base()?;

        match page {
            Page::Index => {
                data.insert("home".into(), Value::String(self.markdown(HOME_MARKDOWN)?));
            }
            Page::Registration => {
                data.insert(
                    "registration".into(),
                    Value::String(self.markdown(REGISTRATION_MARKDOWN)?),
                );
            }
            Page::Organizers => {
                let committee = datasets.require_field("committee", "committee")?;
                data.insert("committee".into(), committee.clone());
            }
            Page::Speakers => {
                let speakers = datasets.require_field("speakers", "speakers")?;
                data.insert("speakers".into(), speakers.clone());
            }
            Page::Calls => {
                data.insert("calls".into(), self.calls()?);
            }
            Page::Help => {
                data.insert("FAQ".into(), datasets.require_field("faq", "FAQ")?.clone());
            }
            Page::Papers => {
                let papers = sorted_by_title(self.raw_papers()?)?;
                data.insert("papers".into(), records_to_value(papers));
            }
            Page::Calendar => {
                data.insert("days".into(), to_value(self.site.by_date())?);
            }
            Page::Workshops => {
                data.insert("workshops".into(), self.formatted_workshops(EntityKind::Workshops)?);
            }
            Page::Tutorials => {
                data.insert("tutorials".into(), self.formatted_workshops(EntityKind::Tutorials)?);
            }
            Page::Sponsors => {
                for tier in ["goldsponsors", "silversponsors", "bronzesponsors"] {
                    data.insert(tier.into(), datasets.require(tier)?.clone());
                }
            }
        }

        Ok(Value::Object(data))
    }

    /// Context for `poster_<uid>.html`
    pub fn poster_context(&self, uid: &str) -> Result<Value> {
        let raw = self.site.by_uid().require(EntityKind::Papers, uid)?;
        let mut data = self.base()?;
        data.insert("paper".into(), to_value(&format_paper(raw)?)?);
        Ok(Value::Object(data))
    }

    /// Context for `workshop_<uid>.html`
    ///
    /// Indexed workshops are already in normalized form.
    pub fn workshop_context(&self, uid: &str) -> Result<Value> {
        let workshop = self.site.by_uid().require(EntityKind::Workshops, uid)?;
        let mut data = self.base()?;
        data.insert("workshop".into(), Value::Object(workshop.as_ref().clone()));
        Ok(Value::Object(data))
    }

    /// Normalized papers sorted by title, for `papers.json`
    pub fn papers_json(&self) -> Result<Value> {
        let formatted = self
            .raw_papers()?
            .iter()
            .map(|raw| format_paper(raw).and_then(|paper| to_record(&paper)))
            .collect::<Result<Vec<_>>>()?;
        let sorted = sorted_by_title(formatted)?;
        Ok(records_to_value(sorted))
    }

    fn raw_papers(&self) -> Result<Vec<Record>> {
        let papers = self.site.site_data().require(EntityKind::Papers.dataset_name())?;
        CollectionShape::Mapping.collect(EntityKind::Papers.dataset_name(), papers)
    }

    fn formatted_workshops(&self, kind: EntityKind) -> Result<Value> {
        let raw = self.site.site_data().require(kind.dataset_name())?;
        let formatted = CollectionShape::Sequence
            .collect(kind.dataset_name(), raw)?
            .iter()
            .map(|record| format_workshop(record).and_then(|w| to_value(&w)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(formatted))
    }

    /// Calls for papers with their body files rendered
    fn calls(&self) -> Result<Value> {
        let calls = CollectionShape::NestedSequence("calls")
            .collect("calls", self.site.site_data().require("calls")?)?;

        let mut rendered = Vec::with_capacity(calls.len());
        for mut call in calls {
            let body = require_text(&call, "body")?;
            call.insert("bodytext".into(), Value::String(self.markdown(&body)?));
            rendered.push(Value::Object(call));
        }
        Ok(Value::Array(rendered))
    }

    /// Read a Markdown file relative to the pages directory and render it
    fn markdown(&self, relative: &str) -> Result<String> {
        let path = self.pages_dir.join(relative);
        let source = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        Ok(markdown_to_html(&source))
    }
}

/// Stable sort of records by their `title` field
///
/// Titles are compared as text; a non-string title sorts by its JSON form.
fn sorted_by_title(records: Vec<Record>) -> Result<Vec<Record>> {
    let mut keyed = records
        .into_iter()
        .map(|record| {
            let title = match require(&record, "title")? {
                Value::String(title) => title.clone(),
                other => other.to_string(),
            };
            Ok((title, record))
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

fn records_to_value(records: Vec<Record>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}

fn to_value<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| Error::Export(format!("Failed to encode context: {}", e)))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::Export(format!("Failed to encode JSON: {}", e)))
}
