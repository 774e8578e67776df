pub type ConformResult<T> = Result<T, ConformError>;

#[derive(thiserror::Error, Debug)]
pub enum ConformError {
    #[error("schema conflict: <{tag}> has attribute '{attribute}' which is a reserved field name")]
    SchemaConflict { tag: String, attribute: String },

    #[error("missing identifier: <{tag}> has none of the attributes {keys:?}")]
    MissingIdentifier { tag: String, keys: Vec<String> },

    #[error(
        "invalid integer: track '{track}' segment {index} attribute '{attribute}' = '{value}'"
    )]
    InvalidInteger {
        track: String,
        index: usize,
        attribute: String,
        value: String,
    },

    #[error("invalid range: track '{track}' segment {index} has in={source_in} out={source_out}")]
    InvalidRange {
        track: String,
        index: usize,
        source_in: i64,
        source_out: i64,
    },

    #[error("invalid length: track '{track}' segment {index} has length={length}")]
    InvalidLength {
        track: String,
        index: usize,
        length: i64,
    },

    #[error("empty source: no frames available to conform track '{track}'")]
    EmptySource { track: String },

    #[error("unknown producer: track '{track}' segment {index} references '{producer}'")]
    UnknownProducer {
        track: String,
        index: usize,
        producer: String,
    },

    #[error(
        "range out of bounds: track '{track}' segment {index} reads frames up to {end} but source has {available}"
    )]
    RangeOutOfBounds {
        track: String,
        index: usize,
        end: u64,
        available: u64,
    },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("xml error: {0}")]
    Xml(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConformError {
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Track id the failure belongs to, when the error is scoped to a single track.
    pub fn track(&self) -> Option<&str> {
        match self {
            Self::InvalidInteger { track, .. }
            | Self::InvalidRange { track, .. }
            | Self::InvalidLength { track, .. }
            | Self::EmptySource { track }
            | Self::UnknownProducer { track, .. }
            | Self::RangeOutOfBounds { track, .. } => Some(track),
            _ => None,
        }
    }
}
