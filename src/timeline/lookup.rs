use crate::{
    project::model::{TRACK_NAME_PROPERTY, Track},
    timeline::offsets::ResolvedTrack,
};

/// Anything with top-level track fields (hoisted properties and attributes).
pub trait TrackFields {
    fn field(&self, key: &str) -> Option<&str>;
}

impl TrackFields for Track {
    fn field(&self, key: &str) -> Option<&str> {
        Track::field(self, key)
    }
}

impl TrackFields for ResolvedTrack {
    fn field(&self, key: &str) -> Option<&str> {
        ResolvedTrack::field(self, key)
    }
}

/// Tracks whose display name equals `name` (`exact`) or contains it.
///
/// Returns every match in input order; an empty result is not an error.
pub fn find_by_name<'a, T, I>(tracks: I, name: &str, exact: bool) -> Vec<&'a T>
where
    T: TrackFields + 'a,
    I: IntoIterator<Item = &'a T>,
{
    find_by_field(tracks, TRACK_NAME_PROPERTY, name, exact)
}

/// Like [`find_by_name`], matching on an arbitrary field. Tracks without the field never match.
pub fn find_by_field<'a, T, I>(tracks: I, key: &str, target: &str, exact: bool) -> Vec<&'a T>
where
    T: TrackFields + 'a,
    I: IntoIterator<Item = &'a T>,
{
    tracks
        .into_iter()
        .filter(|t| match t.field(key) {
            Some(v) if exact => v == target,
            Some(v) => v.contains(target),
            None => false,
        })
        .collect()
}

/// Display names of all tracks that have one, in track order.
pub fn track_names<'a, T, I>(tracks: I) -> Vec<&'a str>
where
    T: TrackFields + 'a,
    I: IntoIterator<Item = &'a T>,
{
    tracks
        .into_iter()
        .filter_map(|t| t.field(TRACK_NAME_PROPERTY))
        .collect()
}
