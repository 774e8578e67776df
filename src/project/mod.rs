//! Loading a Kdenlive/MLT project into producers and resolved tracks.
//!
//! Loading runs every stage once, in order: keyed extraction of `<producer>` and
//! `<playlist>` elements, classification of track children, property hoisting and
//! offset computation. The resulting [`Project`] is read-only.

pub mod config;
pub mod hoist;
pub mod model;

use std::path::Path;

use indexmap::IndexMap;

use crate::{
    foundation::{diagnostics::Diagnostics, error::ConformResult},
    project::{
        config::ProjectConfig,
        hoist::hoist_properties,
        model::{Producer, Segment, Track},
    },
    timeline::{
        lookup,
        offsets::{ResolvedTrack, compute_offsets},
    },
    tree::{
        extract::{KeyedRecords, extract},
        node::TreeNode,
    },
};

const PRODUCER_TAG: &str = "producer";
const PLAYLIST_TAG: &str = "playlist";
const TRACTOR_TAG: &str = "tractor";
const TRACK_TAG: &str = "track";
const MAIN_TRACTOR_ID: &str = "maintractor";

#[derive(Clone, Debug, serde::Serialize)]
pub struct Project {
    pub producers: IndexMap<String, Producer>,
    /// Every playlist, tracks and bins alike.
    pub playlists: KeyedRecords,
    /// Track playlists in declaration order (bottom layer first).
    pub tracks: IndexMap<String, ResolvedTrack>,
    /// Playlist ids referenced by the main tractor, bottom to top. Informational.
    pub layer_order: Vec<String>,
    pub diagnostics: Diagnostics,
    #[serde(skip)]
    config: ProjectConfig,
}

impl Project {
    pub fn from_path(path: &Path, config: &ProjectConfig) -> ConformResult<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::from_xml_str(&xml, config)
    }

    pub fn from_xml_str(xml: &str, config: &ProjectConfig) -> ConformResult<Self> {
        let root = TreeNode::parse_xml(xml)?;
        Self::from_tree(&root, config)
    }

    #[tracing::instrument(skip_all, fields(root = %root.tag))]
    pub fn from_tree(root: &TreeNode, config: &ProjectConfig) -> ConformResult<Self> {
        config.validate()?;
        let id_keys = config.id_keys();
        let mut diagnostics = Diagnostics::new();

        let producers = extract(root, PRODUCER_TAG, &id_keys, config.force_include_empty)?
            .into_iter()
            .map(|(id, record)| (id.clone(), Producer::new(id, record)))
            .collect::<IndexMap<_, _>>();

        let playlists = extract(root, PLAYLIST_TAG, &id_keys, config.force_include_empty)?;

        let mut tracks = IndexMap::new();
        for (id, record) in &playlists {
            if !id.starts_with(&config.track_prefix) {
                continue;
            }
            let mut track = Track::from_record(id.clone(), record.clone())?;
            hoist_properties(&mut track, &mut diagnostics);
            tracks.insert(id.clone(), compute_offsets(&track)?);
        }

        let layer_order = layer_order(root);

        diagnostics.info(
            "project",
            format!(
                "loaded {} producers, {} playlists, {} tracks",
                producers.len(),
                playlists.len(),
                tracks.len()
            ),
        );

        Ok(Self {
            producers,
            playlists,
            tracks,
            layer_order,
            diagnostics,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn track(&self, id: &str) -> Option<&ResolvedTrack> {
        self.tracks.get(id)
    }

    /// Display names of the tracks that have one, in track order.
    pub fn track_names(&self) -> Vec<&str> {
        let key = self.config.track_name_property.as_str();
        self.tracks.values().filter_map(|t| t.field(key)).collect()
    }

    pub fn find_tracks_by_name(&self, name: &str, exact: bool) -> Vec<&ResolvedTrack> {
        lookup::find_by_field(
            self.tracks.values(),
            &self.config.track_name_property,
            name,
            exact,
        )
    }

    /// Record a warning for every clip that names a producer the project does not define.
    ///
    /// Returns how many were found. Conform decides for itself whether that is fatal,
    /// since its buffers need not be keyed by the same ids.
    pub fn validate_references(&mut self) -> usize {
        let mut missing = 0;
        for track in self.tracks.values() {
            for (index, segment) in track.track.segments.iter().enumerate() {
                let Segment::ClipRef(clip) = segment else {
                    continue;
                };
                match &clip.producer {
                    Some(p) if self.producers.contains_key(p) => {}
                    Some(p) => {
                        missing += 1;
                        self.diagnostics.warn(
                            track.id(),
                            format!("segment {index} references unknown producer '{p}'"),
                        );
                    }
                    None => {
                        missing += 1;
                        self.diagnostics
                            .warn(track.id(), format!("segment {index} has no producer"));
                    }
                }
            }
        }
        missing
    }
}

/// `<track producer=...>` references of the main tractor, falling back to the last
/// top-level tractor.
fn layer_order(root: &TreeNode) -> Vec<String> {
    let tractors: Vec<_> = root
        .children
        .iter()
        .filter(|c| c.tag == TRACTOR_TAG)
        .collect();
    let main = tractors
        .iter()
        .find(|t| t.attribute("id") == Some(MAIN_TRACTOR_ID))
        .or_else(|| tractors.last());

    main.map(|t| {
        t.children
            .iter()
            .filter(|c| c.tag == TRACK_TAG)
            .filter_map(|c| c.attribute(PRODUCER_TAG).map(str::to_string))
            .collect()
    })
    .unwrap_or_default()
}
