use crate::{
    foundation::diagnostics::Diagnostics,
    project::model::{PROPERTY_TAG, Track},
};

/// Lift every `<property name="...">value</property>` child of `track` into
/// `track.properties`, in child order, so a later duplicate name overwrites an earlier
/// one. A property without a value is skipped and reported in `diagnostics`.
pub fn hoist_properties<'t>(
    track: &'t mut Track,
    diagnostics: &mut Diagnostics,
) -> &'t mut Track {
    for record in track.segments.iter().filter_map(|s| s.as_unclassified()) {
        if record.tag != PROPERTY_TAG {
            continue;
        }
        let Some(name) = record.attribute("name") else {
            continue;
        };
        match &record.value {
            Some(value) => {
                track.properties.insert(name.to_string(), value.clone());
            }
            None => diagnostics.warn(
                track.id.as_str(),
                format!("property '{name}' has no value; not hoisted"),
            ),
        }
    }
    track
}
