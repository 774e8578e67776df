use indexmap::IndexMap;
use ndarray::{ArrayD, ArrayView, ArrayViewD, Axis, Dimension, IxDyn, Slice};

use crate::{
    foundation::error::{ConformError, ConformResult},
    project::config::ConformOptions,
    timeline::offsets::{Placement, ResolvedTrack},
};

/// Frame data a track is conformed against. Frames run along `Axis(0)`.
#[derive(Clone, Debug)]
pub enum Source<'a, T> {
    /// One buffer serves every clip, whatever producer it names.
    Single(ArrayViewD<'a, T>),
    /// One buffer per producer id.
    ByProducer(IndexMap<String, ArrayViewD<'a, T>>),
}

impl<'a, T> Source<'a, T> {
    pub fn single<D: Dimension>(view: ArrayView<'a, T, D>) -> Self {
        Self::Single(view.into_dyn())
    }

    pub fn by_producer<K, D, I>(buffers: I) -> Self
    where
        K: Into<String>,
        D: Dimension,
        I: IntoIterator<Item = (K, ArrayView<'a, T, D>)>,
    {
        Self::ByProducer(
            buffers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_dyn()))
                .collect(),
        )
    }

    pub fn total_frames(&self) -> u64 {
        match self {
            Self::Single(v) => frames(v),
            Self::ByProducer(m) => m.values().map(frames).sum(),
        }
    }

    /// Shape of one frame, taken from the first buffer that has frames.
    fn frame_shape(&self) -> Option<&[usize]> {
        match self {
            Self::Single(v) => (frames(v) > 0).then(|| &v.shape()[1..]),
            Self::ByProducer(m) => m
                .values()
                .find(|v| frames(*v) > 0)
                .map(|v| &v.shape()[1..]),
        }
    }

    fn resolve(
        &self,
        track: &str,
        index: usize,
        producer: Option<&str>,
    ) -> ConformResult<&ArrayViewD<'a, T>> {
        match self {
            Self::Single(v) => Ok(v),
            Self::ByProducer(m) => producer.and_then(|p| m.get(p)).ok_or_else(|| {
                ConformError::UnknownProducer {
                    track: track.to_string(),
                    index,
                    producer: producer.unwrap_or_default().to_string(),
                }
            }),
        }
    }
}

fn frames<T>(v: &ArrayViewD<'_, T>) -> u64 {
    if v.ndim() == 0 {
        0
    } else {
        v.len_of(Axis(0)) as u64
    }
}

/// Materialize `track` against `source`.
///
/// The output has `track.length` frames, each shaped like a source frame. Every clip
/// copies source frames `[in, in + length)` to output frames `[start, start + length)`;
/// every other frame holds `options.fill_value`. `source` is only read.
#[tracing::instrument(skip_all, fields(track = %track.id(), length = track.length))]
pub fn conform<T: Clone>(
    track: &ResolvedTrack,
    source: &Source<'_, T>,
    options: &ConformOptions<T>,
) -> ConformResult<ArrayD<T>> {
    let frame_shape = match source.frame_shape() {
        Some(s) if source.total_frames() > 0 => s.to_vec(),
        _ => {
            return Err(ConformError::EmptySource {
                track: track.id().to_string(),
            });
        }
    };

    let mut shape = Vec::with_capacity(frame_shape.len() + 1);
    shape.push(track.length as usize);
    shape.extend_from_slice(&frame_shape);
    let mut out = ArrayD::from_elem(IxDyn(&shape), options.fill_value.clone());

    for seg in &track.segments {
        let Placement::Clip { producer, source: range } = &seg.placement else {
            continue;
        };
        let index = seg.index;
        let buf = source.resolve(track.id(), index, producer.as_deref())?;

        let available = frames(buf);
        if range.end.0 > available {
            return Err(ConformError::RangeOutOfBounds {
                track: track.id().to_string(),
                index,
                end: range.end.0,
                available,
            });
        }
        if buf.shape()[1..] != frame_shape[..] {
            return Err(ConformError::shape_mismatch(format!(
                "track '{}' segment {index}: producer frames are {:?}, expected {:?}",
                track.id(),
                &buf.shape()[1..],
                frame_shape
            )));
        }

        tracing::debug!(
            source_in = range.start.0,
            length = seg.length(),
            start = seg.start(),
            "applying edit"
        );
        out.slice_axis_mut(Axis(0), Slice::from(seg.span.as_usize_range()))
            .assign(&buf.slice_axis(Axis(0), Slice::from(range.as_usize_range())));
    }

    Ok(out)
}
