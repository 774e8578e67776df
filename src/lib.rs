//! edlconform rebuilds an edit from a Kdenlive/MLT project and re-applies it to
//! arbitrary per-frame data.
//!
//! The typical use is regenerating an edited sequence (latent vectors, parameters,
//! labels) after the matching rendered video was cut in a video editor, without
//! re-deriving the content frame by frame.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: XML text -> [`TreeNode`] (element tree, order preserved)
//! 2. **Convert**: [`TreeNode`] -> [`Record`], keyed by id with [`extract`]
//! 3. **Load**: playlists -> [`Track`] (segments classified, properties hoisted)
//! 4. **Resolve**: [`Track`] -> [`ResolvedTrack`] via [`compute_offsets`]
//! 5. **Conform**: [`ResolvedTrack`] + [`Source`] -> output buffer via [`conform`]
//!
//! [`Project`] runs steps 1-4 once at load time. Everything after loading is read-only,
//! so a resolved track can be conformed any number of times, from any number of threads.
//!
//! ```
//! use edlconform::{ConformOptions, Project, ProjectConfig, Source, conform};
//! use ndarray::Array1;
//!
//! let xml = r#"<mlt>
//!   <producer id="1_video" in="0" out="99"/>
//!   <playlist id="playlist3">
//!     <property name="kdenlive:track_name">Video 1</property>
//!     <entry in="10" out="29" producer="1_video"/>
//!     <blank length="10"/>
//!     <entry in="60" out="60" producer="1_video"/>
//!   </playlist>
//! </mlt>"#;
//!
//! let project = Project::from_xml_str(xml, &ProjectConfig::default()).unwrap();
//! let track = project.find_tracks_by_name("Video 1", true)[0];
//! assert_eq!(track.length, 31);
//!
//! let frames = Array1::from_iter((0..100).map(f64::from));
//! let out = conform(track, &Source::single(frames.view()), &ConformOptions::default()).unwrap();
//! assert_eq!(out.len(), 31);
//! assert_eq!(out.as_slice().unwrap()[30], 60.0);
//! ```
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

mod conform;
mod foundation;
mod project;
mod timeline;
mod tree;

pub use conform::engine::{Source, conform};
pub use conform::verify::{Comparison, compare};
pub use foundation::core::{FrameIndex, FrameRange};
pub use foundation::diagnostics::{Diagnostic, Diagnostics, Severity};
pub use foundation::error::{ConformError, ConformResult};
pub use project::Project;
pub use project::config::{ConformOptions, ProjectConfig};
pub use project::hoist::hoist_properties;
pub use project::model::{
    ClipRef, Gap, PROPERTY_TAG, Producer, Segment, TRACK_NAME_PROPERTY, Track,
};
pub use timeline::lookup::{TrackFields, find_by_field, find_by_name, track_names};
pub use timeline::offsets::{Placement, ResolvedSegment, ResolvedTrack, compute_offsets};
pub use tree::extract::{DEFAULT_ID_KEYS, KeyedRecords, extract};
pub use tree::node::TreeNode;
pub use tree::record::{RESERVED_FIELDS, Record, convert};
