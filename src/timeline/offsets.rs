use crate::{
    foundation::{
        core::FrameRange,
        error::{ConformError, ConformResult},
    },
    project::model::{ClipRef, Segment, Track},
};

/// What occupies a placed span of the timeline.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Frames `source` of `producer` land on the span.
    Clip {
        producer: Option<String>,
        source: FrameRange,
    },
    Gap,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ResolvedSegment {
    /// Position of the segment in `Track::segments`.
    pub index: usize,
    /// Where the segment sits on the track timeline.
    pub span: FrameRange,
    pub placement: Placement,
}

impl ResolvedSegment {
    pub fn start(&self) -> u64 {
        self.span.start.0
    }

    pub fn length(&self) -> u64 {
        self.span.len_frames()
    }
}

/// A track with every clip and gap placed on its timeline.
///
/// Built from a [`Track`] by [`compute_offsets`]; read-only afterwards, so any number
/// of conform calls may share it.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ResolvedTrack {
    pub track: Track,
    /// Placed segments in timeline order. Unclassified segments have no entry.
    pub segments: Vec<ResolvedSegment>,
    /// Total frames, i.e. the end of the last placed segment.
    pub length: u64,
}

impl ResolvedTrack {
    pub fn id(&self) -> &str {
        &self.track.id
    }

    pub fn name(&self) -> Option<&str> {
        self.track.name()
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.track.field(key)
    }

    pub fn clips(&self) -> impl Iterator<Item = (&ResolvedSegment, &FrameRange)> {
        self.segments.iter().filter_map(|s| match &s.placement {
            Placement::Clip { source, .. } => Some((s, source)),
            Placement::Gap => None,
        })
    }
}

/// Place the segments of `track` back to back starting at frame 0.
///
/// A clip covers `out - in + 1` frames (both bounds inclusive), a gap covers `length`
/// frames, anything else is left unplaced and does not move the cursor. The input is
/// not modified, so running this again on the same track gives the same result.
#[tracing::instrument(skip(track), fields(track = %track.id))]
pub fn compute_offsets(track: &Track) -> ConformResult<ResolvedTrack> {
    let mut cursor = 0u64;
    let mut segments = Vec::with_capacity(track.segments.len());

    for (index, segment) in track.segments.iter().enumerate() {
        let (length, placement) = match segment {
            Segment::ClipRef(clip) => {
                let length =
                    clip_length(clip).ok_or_else(|| invalid_range(track, index, clip))?;
                let source = FrameRange::at(clip.source_in as u64, length);
                (
                    length,
                    Placement::Clip {
                        producer: clip.producer.clone(),
                        source,
                    },
                )
            }
            Segment::Gap(gap) => {
                if gap.length < 0 {
                    return Err(ConformError::InvalidLength {
                        track: track.id.clone(),
                        index,
                        length: gap.length,
                    });
                }
                (gap.length as u64, Placement::Gap)
            }
            Segment::Unclassified { .. } => continue,
        };

        let Some(end) = cursor.checked_add(length) else {
            return Err(match segment {
                Segment::ClipRef(clip) => invalid_range(track, index, clip),
                _ => ConformError::InvalidLength {
                    track: track.id.clone(),
                    index,
                    length: length as i64,
                },
            });
        };
        segments.push(ResolvedSegment {
            index,
            span: FrameRange::at(cursor, length),
            placement,
        });
        cursor = end;
    }

    tracing::debug!(segments = segments.len(), length = cursor, "offsets computed");

    Ok(ResolvedTrack {
        track: track.clone(),
        segments,
        length: cursor,
    })
}

/// Frames covered by `[source_in, source_out]`, or `None` if the range is reversed,
/// starts before frame 0 or does not fit.
fn clip_length(clip: &ClipRef) -> Option<u64> {
    if clip.source_in < 0 || clip.source_out < clip.source_in {
        return None;
    }
    let length = clip.source_out.checked_sub(clip.source_in)?.checked_add(1)?;
    u64::try_from(length).ok()
}

fn invalid_range(track: &Track, index: usize, clip: &ClipRef) -> ConformError {
    ConformError::InvalidRange {
        track: track.id.clone(),
        index,
        source_in: clip.source_in,
        source_out: clip.source_out,
    }
}
