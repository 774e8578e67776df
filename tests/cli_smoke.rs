use std::path::PathBuf;

use ndarray::{Array2, ArrayD};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_edlconform")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "edlconform.exe"
            } else {
                "edlconform"
            });
            p
        })
}

fn setup(name: &str) -> (PathBuf, PathBuf, PathBuf) {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    std::fs::create_dir_all(&dir).unwrap();

    let project = PathBuf::from("tests").join("data").join("two_tracks.kdenlive");
    let input = dir.join("latents.json");
    let src = Array2::from_shape_fn((100, 3), |(f, c)| (f * 10 + c) as f64).into_dyn();
    let f = std::fs::File::create(&input).unwrap();
    serde_json::to_writer(f, &src).unwrap();

    let out = dir.join("out.json");
    let _ = std::fs::remove_file(&out);
    (project, input, out)
}

#[test]
fn cli_conforms_and_writes_output() {
    let (project, input, out) = setup("ok");

    let status = std::process::Command::new(exe())
        .arg("-k")
        .arg(&project)
        .args(["-n", "Video 1", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let f = std::fs::File::open(&out).unwrap();
    let edited: ArrayD<f64> = serde_json::from_reader(f).unwrap();
    assert_eq!(edited.shape(), &[46, 3]);
}

#[test]
fn cli_fails_on_unknown_track() {
    let (project, input, out) = setup("missing_track");

    let status = std::process::Command::new(exe())
        .arg("-k")
        .arg(&project)
        .args(["-n", "Titles", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
    assert!(!out.exists());
}

#[test]
fn cli_fails_on_unloadable_input() {
    let (project, _, out) = setup("bad_input");

    let status = std::process::Command::new(exe())
        .arg("-k")
        .arg(&project)
        .args(["-i", "does/not/exist.json", "-o"])
        .arg(&out)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));
}
