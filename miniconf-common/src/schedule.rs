//! Day → session → contents schedule index
//!
//! Entities are added one at a time in whatever order they are encountered.
//! Each session tracks the earliest start time seen so far; `finish` then
//! orders sessions by that time and contents by their own start time. Both
//! sorts are stable so ties keep encounter order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::records::{require, require_text, Record};
use crate::time::{parse_start_time, weekday_name};
use crate::{Error, Result};

/// An entity placed on the schedule together with its parsed start time
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEntity {
    pub start_time: DateTime<Utc>,
    pub record: Arc<Record>,
}

impl Serialize for ScheduledEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}

/// A named time slot within a day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub name: String,
    /// Earliest start time among `contents`
    pub time: DateTime<Utc>,
    pub contents: Vec<ScheduledEntity>,
}

impl Session {
    fn new(name: String, time: DateTime<Utc>) -> Self {
        Self {
            name,
            time,
            contents: Vec::new(),
        }
    }

    /// Member records in schedule order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.contents.iter().map(|entry| entry.record.as_ref())
    }
}

/// All sessions falling on one weekday
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Day {
    pub name: String,
    pub sessions: IndexMap<String, Session>,
}

impl Day {
    fn new(name: String) -> Self {
        Self {
            name,
            sessions: IndexMap::new(),
        }
    }

    pub fn session(&self, name: &str) -> Option<&Session> {
        self.sessions.get(name)
    }
}

/// Finished schedule keyed by weekday name, in first-encounter order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ByDate(IndexMap<String, Day>);

impl ByDate {
    pub fn get(&self, day: &str) -> Option<&Day> {
        self.0.get(day)
    }

    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.0.values()
    }

    pub fn day_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Incremental builder for [`ByDate`]
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    days: IndexMap<String, Day>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place one entity on the schedule
    ///
    /// The entity must carry `start_time` and `session`.
    pub fn add(&mut self, record: Arc<Record>) -> Result<()> {
        let raw_time = match require(&record, "start_time")? {
            serde_json::Value::String(s) => s.clone(),
            other => {
                return Err(Error::invalid_field(
                    "scheduled entity",
                    "start_time",
                    format!("expected string, found {}", other),
                ))
            }
        };
        let start_time = parse_start_time(&raw_time)?;
        let session_name = require_text(&record, "session")?;
        let day_name = weekday_name(&start_time);

        let day = self
            .days
            .entry(day_name.clone())
            .or_insert_with(|| Day::new(day_name));
        let session = day
            .sessions
            .entry(session_name.clone())
            .or_insert_with(|| Session::new(session_name, start_time));

        if start_time < session.time {
            session.time = start_time;
        }
        session.contents.push(ScheduledEntity { start_time, record });
        Ok(())
    }

    /// Sort sessions and contents and freeze the schedule
    pub fn finish(mut self) -> ByDate {
        for day in self.days.values_mut() {
            day.sessions.sort_by(|_, a, _, b| a.time.cmp(&b.time));
            for session in day.sessions.values_mut() {
                session.contents.sort_by(|a, b| a.start_time.cmp(&b.start_time));
            }
        }
        ByDate(self.days)
    }
}
