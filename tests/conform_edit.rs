use edlconform::{
    ConformError, ConformOptions, Placement, Project, ProjectConfig, Source, compare, conform,
};
use ndarray::{Array1, Array2, ArrayD, Axis, s};

fn two_tracks() -> Project {
    Project::from_xml_str(
        include_str!("data/two_tracks.kdenlive"),
        &ProjectConfig::default(),
    )
    .unwrap()
}

/// Frame `f` holds `[f, f + 0.5]`, so every copied frame is recognizable.
fn latents(frames: usize) -> Array2<f64> {
    Array2::from_shape_fn((frames, 2), |(f, c)| f as f64 + 0.5 * c as f64)
}

#[test]
fn reference_edit_on_scalar_buffer() {
    let p = two_tracks();
    let track = p.find_tracks_by_name("Video 1", true)[0];
    let src = Array1::from_iter((0..100).map(|i| 1.0 + f64::from(i)));
    let out = conform(track, &Source::single(src.view()), &ConformOptions::default()).unwrap();
    let out = out.into_dimensionality::<ndarray::Ix1>().unwrap();

    assert_eq!(out.len(), 46);
    assert_eq!(out.slice(s![0..20]), src.slice(s![10..30]));
    assert!(out.slice(s![20..30]).iter().all(|&v| v == 0.0));
    assert_eq!(out.slice(s![30..40]), src.slice(s![35..45]));
    assert!(out.slice(s![40..45]).iter().all(|&v| v == 0.0));
    assert_eq!(out[45], src[60]);
}

#[test]
fn every_clip_matches_its_source_and_everything_else_is_fill() {
    let p = two_tracks();
    let track = p.track("playlist2").unwrap();
    let src = latents(100);
    let fill = -1.0;
    let out = conform(
        track,
        &Source::single(src.view()),
        &ConformOptions { fill_value: fill },
    )
    .unwrap();
    assert_eq!(out.len_of(Axis(0)) as u64, track.length);

    let mut covered = vec![false; track.length as usize];
    for (seg, range) in track.clips() {
        let dst = out.slice_axis(Axis(0), ndarray::Slice::from(seg.span.as_usize_range()));
        let want = src.slice_axis(Axis(0), ndarray::Slice::from(range.as_usize_range()));
        assert_eq!(dst, want.into_dyn());
        for i in seg.span.as_usize_range() {
            covered[i] = true;
        }
    }
    for (i, frame) in out.outer_iter().enumerate() {
        if !covered[i] {
            assert!(frame.iter().all(|&v| v == fill), "frame {i} should be fill");
        }
    }
}

#[test]
fn per_producer_sources() {
    let p = two_tracks();
    let track = p.track("playlist4").unwrap();
    assert_eq!(track.length, 19);

    let v1 = latents(100);
    let v2 = latents(50).mapv(|x| x + 1000.0);
    let v3 = latents(8).mapv(|x| x - 1000.0);
    let source = Source::by_producer([
        ("1_video", v1.view()),
        ("2_video", v2.view()),
        ("3_video", v3.view()),
    ]);
    let out = conform(track, &source, &ConformOptions::default()).unwrap();
    let out = out.into_dimensionality::<ndarray::Ix2>().unwrap();

    assert!(out.slice(s![0..3, ..]).iter().all(|&v| v == 0.0));
    assert_eq!(out.slice(s![3..8, ..]), v2.slice(s![0..5, ..]));
    assert_eq!(out.slice(s![8..18, ..]), v1.slice(s![90..100, ..]));
    assert_eq!(out.row(18), v3.row(7));
}

#[test]
fn missing_producer_buffer_fails() {
    let p = two_tracks();
    let track = p.track("playlist4").unwrap();
    let v1 = latents(100);
    let v2 = latents(50);
    let source = Source::by_producer([("1_video", v1.view()), ("2_video", v2.view())]);
    let err = conform(track, &source, &ConformOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ConformError::UnknownProducer { ref producer, index: 5, .. } if producer == "3_video"
    ));
}

#[test]
fn short_source_fails() {
    let p = two_tracks();
    let track = p.track("playlist4").unwrap();
    let src = latents(95);
    assert!(matches!(
        conform(track, &Source::single(src.view()), &ConformOptions::default()),
        Err(ConformError::RangeOutOfBounds {
            end: 100,
            available: 95,
            ..
        })
    ));
}

#[test]
fn conformed_output_matches_a_reference_edit() {
    let p = two_tracks();
    let track = p.track("playlist2").unwrap();
    let src = latents(100);

    let mut reference = ArrayD::<f64>::zeros(vec![46, 2]);
    for seg in &track.segments {
        if let Placement::Clip { source, .. } = &seg.placement {
            for k in 0..seg.length() as usize {
                let from = source.start.0 as usize + k;
                let to = seg.start() as usize + k;
                reference
                    .index_axis_mut(Axis(0), to)
                    .assign(&src.index_axis(Axis(0), from).into_dyn());
            }
        }
    }

    let out = conform(track, &Source::single(src.view()), &ConformOptions::default()).unwrap();
    let cmp = compare(reference.view(), out.view()).unwrap();
    assert!(cmp.is_exact());
    assert_eq!(cmp.l2_distance, 0.0);
}

#[test]
fn resolved_tracks_can_be_shared_across_threads() {
    let p = two_tracks();
    let src = latents(100);
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let track = p.track("playlist2").unwrap();
                let src = src.view();
                scope.spawn(move || {
                    conform(track, &Source::single(src), &ConformOptions::default()).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}
