use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

pub const NAME_TAG: &str = "name";
pub const UNIT_TAG: &str = "unit";
pub const INGRESS_TAG: &str = "ingress";
pub const DISTILLER_TAG: &str = "distiller";

/// Handle of one time series channel in the database.
#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct Stream {
    pub uuid: Uuid,
    pub collection: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub property_version: u64,
}

impl Stream {
    pub fn new<C: ToString, N: ToString, U: ToString>(
        uuid: Uuid,
        collection: C,
        name: N,
        unit: U,
    ) -> Self {
        let mut tags = BTreeMap::new();
        tags.insert(NAME_TAG.to_string(), name.to_string());
        tags.insert(UNIT_TAG.to_string(), unit.to_string());
        Self {
            uuid,
            collection: collection.to_string(),
            tags,
            annotations: BTreeMap::new(),
            property_version: 0,
        }
    }

    pub fn with_tag<K: ToString, V: ToString>(mut self, key: K, value: V) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_annotation<K: ToString, V: ToString>(mut self, key: K, value: V) -> Self {
        self.annotations.insert(key.to_string(), value.to_string());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|v| v.as_str())
    }

    pub fn name(&self) -> &str {
        self.tag(NAME_TAG).unwrap_or_default()
    }

    pub fn unit(&self) -> &str {
        self.tag(UNIT_TAG).unwrap_or_default()
    }

    /// `collection/name`
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.name())
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path(), self.uuid)
    }
}

/// Filterable columns of the `streams` table besides `collection` and `annotations`.
#[derive(AsRefStr, EnumString, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[strum(serialize_all = "snake_case")]
pub enum TagColumn {
    Distiller,
    Ingress,
    Name,
    Unit,
    Uuid,
    PropertyVersion,
}

/// One row of the `streams` table.
#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct StreamMetadata {
    pub uuid: Uuid,
    pub collection: String,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub ingress: Option<String>,
    pub distiller: Option<String>,
    pub property_version: u64,
    pub annotations: BTreeMap<String, String>,
}

impl StreamMetadata {
    pub fn column(&self, column: TagColumn) -> Option<String> {
        match column {
            TagColumn::Distiller => self.distiller.clone(),
            TagColumn::Ingress => self.ingress.clone(),
            TagColumn::Name => self.name.clone(),
            TagColumn::Unit => self.unit.clone(),
            TagColumn::Uuid => Some(self.uuid.to_string()),
            TagColumn::PropertyVersion => Some(self.property_version.to_string()),
        }
    }
}

impl From<&Stream> for StreamMetadata {
    fn from(stream: &Stream) -> Self {
        Self {
            uuid: stream.uuid,
            collection: stream.collection.clone(),
            name: stream.tag(NAME_TAG).map(|v| v.to_string()),
            unit: stream.tag(UNIT_TAG).map(|v| v.to_string()),
            ingress: stream.tag(INGRESS_TAG).map(|v| v.to_string()),
            distiller: stream.tag(DISTILLER_TAG).map(|v| v.to_string()),
            property_version: stream.property_version,
            annotations: stream.annotations.clone(),
        }
    }
}

/// Key usage counts over the streams of a collection.
#[derive(Debug, PartialEq, Clone, Default, Deserialize, Serialize)]
pub struct CollectionMetadata {
    pub tags: BTreeMap<String, usize>,
    pub annotations: BTreeMap<String, usize>,
}

/// Narrows `streams_in_collection` beyond the collection name.
#[derive(Debug, PartialEq, Clone)]
pub struct StreamFilter {
    pub is_collection_prefix: bool,
    pub tags: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl StreamFilter {
    pub fn exact_collection() -> Self {
        Self {
            is_collection_prefix: false,
            ..Self::default()
        }
    }

    pub fn with_tag<K: ToString, V: ToString>(mut self, key: K, value: V) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_annotation<K: ToString, V: ToString>(mut self, key: K, value: V) -> Self {
        self.annotations.insert(key.to_string(), value.to_string());
        self
    }

    pub fn matches(&self, collection: &str, stream: &Stream) -> bool {
        let collection_matched = if self.is_collection_prefix {
            stream.collection.starts_with(collection)
        } else {
            stream.collection == collection
        };

        collection_matched
            && self
                .tags
                .iter()
                .all(|(k, v)| stream.tags.get(k) == Some(v))
            && self
                .annotations
                .iter()
                .all(|(k, v)| stream.annotations.get(k) == Some(v))
    }
}

impl Default for StreamFilter {
    fn default() -> Self {
        Self {
            is_collection_prefix: true,
            tags: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }
}
