//! Identifier and schedule indexing
//!
//! Each known entity type is described by a row in a lookup table naming its
//! dataset and the shape that dataset has on disk. Indexing walks every type
//! in table order, inserts each entity into [`ByUid`] and places it on the
//! schedule.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::loader::Datasets;
use crate::records::{format_workshop, require_text, to_record, Record};
use crate::schedule::{ByDate, ScheduleBuilder};
use crate::{Error, Result};

/// Turns a raw record into its uniform shape
pub type Normalizer = fn(&Record) -> Result<Record>;

/// How an entity type's collection is laid out inside its dataset
#[derive(Clone, Copy)]
pub enum CollectionShape {
    /// Object keyed by UID; the values are the entities
    Mapping,
    /// Object holding the entity sequence under a named field
    NestedSequence(&'static str),
    /// Bare sequence of entities, used as-is
    Sequence,
    /// Bare sequence of entities, each passed through a normalizer
    NormalizedSequence(Normalizer),
}

impl fmt::Debug for CollectionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapping => write!(f, "Mapping"),
            Self::NestedSequence(field) => write!(f, "NestedSequence({:?})", field),
            Self::Sequence => write!(f, "Sequence"),
            Self::NormalizedSequence(_) => write!(f, "NormalizedSequence(..)"),
        }
    }
}

impl CollectionShape {
    /// Extract the entity records from a dataset of this shape
    pub fn collect(&self, dataset: &str, value: &Value) -> Result<Vec<Record>> {
        match self {
            Self::Mapping => {
                let map = value
                    .as_object()
                    .ok_or_else(|| shape_error(dataset, "an object keyed by UID"))?;
                map.values().map(|v| as_record(dataset, v)).collect()
            }
            Self::NestedSequence(field) => {
                let items = value
                    .get(*field)
                    .and_then(Value::as_array)
                    .ok_or_else(|| {
                        shape_error(dataset, &format!("an object with a '{}' list", field))
                    })?;
                items.iter().map(|v| as_record(dataset, v)).collect()
            }
            Self::Sequence => sequence(dataset, value)?
                .iter()
                .map(|v| as_record(dataset, v))
                .collect(),
            Self::NormalizedSequence(normalize) => sequence(dataset, value)?
                .iter()
                .map(|v| as_record(dataset, v).and_then(|r| normalize(&r)))
                .collect(),
        }
    }
}

fn sequence<'a>(dataset: &str, value: &'a Value) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| shape_error(dataset, "a list of records"))
}

fn as_record(dataset: &str, value: &Value) -> Result<Record> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| shape_error(dataset, "records to be objects"))
}

fn shape_error(dataset: &str, expected: &str) -> Error {
    Error::Shape {
        dataset: dataset.to_string(),
        expected: expected.to_string(),
    }
}

fn normalize_workshop(raw: &Record) -> Result<Record> {
    to_record(&format_workshop(raw)?)
}

/// The schedulable entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Papers,
    Workshops,
    Tutorials,
    Speakers,
    Social,
}

impl EntityKind {
    /// Indexing order
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Papers,
        EntityKind::Workshops,
        EntityKind::Tutorials,
        EntityKind::Speakers,
        EntityKind::Social,
    ];

    /// Dataset the entities are loaded from
    pub fn dataset_name(self) -> &'static str {
        match self {
            Self::Papers => "papers",
            Self::Workshops => "workshops",
            Self::Tutorials => "tutorials",
            Self::Speakers => "speakers",
            Self::Social => "social",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.dataset_name() == name)
    }

    /// Layout of this type's dataset
    pub fn shape(self) -> CollectionShape {
        match self {
            Self::Papers => CollectionShape::Mapping,
            Self::Workshops | Self::Tutorials => {
                CollectionShape::NormalizedSequence(normalize_workshop)
            }
            Self::Speakers => CollectionShape::NestedSequence("speakers"),
            Self::Social => CollectionShape::Sequence,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dataset_name())
    }
}

/// Entities of each type keyed by UID
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ByUid(IndexMap<EntityKind, IndexMap<String, Arc<Record>>>);

impl ByUid {
    /// Look up one entity
    pub fn get(&self, kind: EntityKind, uid: &str) -> Option<&Arc<Record>> {
        self.0.get(&kind).and_then(|entities| entities.get(uid))
    }

    /// Look up one entity, failing with `NotFound`
    pub fn require(&self, kind: EntityKind, uid: &str) -> Result<&Arc<Record>> {
        self.get(kind, uid)
            .ok_or_else(|| Error::NotFound(format!("{} '{}'", kind, uid)))
    }

    /// All entities of a type, keyed by UID in first-insertion order
    pub fn entities(&self, kind: EntityKind) -> Option<&IndexMap<String, Arc<Record>>> {
        self.0.get(&kind)
    }

    /// UIDs of a type in first-insertion order
    pub fn uids(&self, kind: EntityKind) -> Vec<&str> {
        self.entities(kind)
            .map(|entities| entities.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.entities(kind).map_or(0, IndexMap::len)
    }
}

/// Build the identifier and schedule indexes from loaded datasets
///
/// Every known type must have its dataset; an absent one, or any malformed
/// entity, aborts the whole build.
pub fn build_indexes(datasets: &Datasets) -> Result<(ByUid, ByDate)> {
    let mut by_uid = ByUid::default();
    let mut schedule = ScheduleBuilder::new();

    for kind in EntityKind::ALL {
        let entities = by_uid.0.entry(kind).or_default();

        let value = datasets.require(kind.dataset_name())?;
        let records = kind.shape().collect(kind.dataset_name(), value)?;
        for record in records {
            let uid = require_text(&record, "UID")?;
            let record = Arc::new(record);
            if entities.insert(uid.clone(), Arc::clone(&record)).is_some() {
                debug!("Duplicate {} UID '{}' overwrites earlier entry", kind, uid);
            }
            schedule.add(record)?;
        }

        info!("Indexed {} {}", entities.len(), kind);
    }

    let by_date = schedule.finish();
    info!("Built schedule spanning {} days", by_date.len());
    Ok((by_uid, by_date))
}
