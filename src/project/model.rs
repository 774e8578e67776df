use indexmap::IndexMap;

use crate::{
    foundation::error::{ConformError, ConformResult},
    tree::record::Record,
};

pub const PROPERTY_TAG: &str = "property";
pub const TRACK_NAME_PROPERTY: &str = "kdenlive:track_name";

const KEY_IN: &str = "in";
const KEY_OUT: &str = "out";
const KEY_LENGTH: &str = "length";
const KEY_PRODUCER: &str = "producer";
const KEY_NAME: &str = "name";

/// A media source (`<producer>`), keyed by its id.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Producer {
    pub id: String,
    pub record: Record,
}

impl Producer {
    pub fn new(id: impl Into<String>, record: Record) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.record.attribute(name)
    }

    /// Value of the last `<property name=...>` child with this name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.record
            .children_tagged(PROPERTY_TAG)
            .filter(|p| p.attribute(KEY_NAME) == Some(name))
            .filter_map(|p| p.value.as_deref())
            .last()
    }

    /// Declared frame count: the `length` property, else `out - in + 1`.
    pub fn declared_length(&self) -> Option<u64> {
        if let Some(len) = self
            .property(KEY_LENGTH)
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            return Some(len);
        }
        let source_in: u64 = self.attribute(KEY_IN)?.trim().parse().ok()?;
        let source_out: u64 = self.attribute(KEY_OUT)?.trim().parse().ok()?;
        source_out.checked_sub(source_in).map(|d| d + 1)
    }
}

/// Reference to the inclusive frame range `[source_in, source_out]` of a producer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ClipRef {
    pub producer: Option<String>,
    pub source_in: i64,
    pub source_out: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Gap {
    pub length: i64,
}

/// One child of a track playlist, classified once when the track is built.
///
/// `in` + `out` makes a clip reference, otherwise `length` makes a gap. Anything else
/// (track properties, filters, unknown elements) stays in order as `Unclassified`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    ClipRef(ClipRef),
    Gap(Gap),
    Unclassified { record: Record },
}

impl Segment {
    pub fn classify(track: &str, index: usize, record: Record) -> ConformResult<Self> {
        let int = |attribute: &str, value: &str| -> ConformResult<i64> {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| ConformError::InvalidInteger {
                    track: track.to_string(),
                    index,
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                })
        };

        if let (Some(i), Some(o)) = (record.attribute(KEY_IN), record.attribute(KEY_OUT)) {
            return Ok(Self::ClipRef(ClipRef {
                producer: record.attribute(KEY_PRODUCER).map(str::to_string),
                source_in: int(KEY_IN, i)?,
                source_out: int(KEY_OUT, o)?,
            }));
        }
        if let Some(len) = record.attribute(KEY_LENGTH) {
            return Ok(Self::Gap(Gap {
                length: int(KEY_LENGTH, len)?,
            }));
        }
        Ok(Self::Unclassified { record })
    }

    pub fn as_clip(&self) -> Option<&ClipRef> {
        match self {
            Self::ClipRef(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_unclassified(&self) -> Option<&Record> {
        match self {
            Self::Unclassified { record } => Some(record),
            _ => None,
        }
    }
}

/// A track playlist before offsets are computed.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Track {
    pub id: String,
    pub attributes: IndexMap<String, String>,
    pub segments: Vec<Segment>,
    /// Name/value pairs lifted from `<property>` children.
    pub properties: IndexMap<String, String>,
}

impl Track {
    pub fn from_record(id: impl Into<String>, record: Record) -> ConformResult<Self> {
        let id = id.into();
        let segments = record
            .children
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, child)| Segment::classify(&id, index, child))
            .collect::<ConformResult<Vec<_>>>()?;

        Ok(Self {
            id,
            attributes: record.attributes,
            segments,
            properties: IndexMap::new(),
        })
    }

    /// Top-level field: a hoisted property, else an element attribute.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.properties
            .get(key)
            .or_else(|| self.attributes.get(key))
            .map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.field(TRACK_NAME_PROPERTY)
    }
}
