use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use ndarray::ArrayD;
use tracing_subscriber::EnvFilter;

/// Apply the edit of one Kdenlive track to a per-frame array.
#[derive(Parser, Debug)]
#[command(name = "edlconform", version)]
struct Cli {
    /// Kdenlive project file.
    #[arg(short = 'k', long = "kdenlive-prj-path")]
    project: PathBuf,

    /// Name of the track whose edit is applied.
    #[arg(short = 'n', long, default_value = "Video 1")]
    track_name: String,

    /// Input array (JSON, ndarray serde layout) indexed by source frame.
    #[arg(short = 'i', long = "input-path")]
    input: PathBuf,

    /// Already-edited reference array, to check the result against.
    #[arg(short = 'g', long = "groundtruth-path")]
    groundtruth: Option<PathBuf>,

    /// Where to write the conformed array.
    #[arg(short = 'o', long = "output-path", default_value = "out.json")]
    output: PathBuf,

    /// 1 dumps every output frame (next to the reference, if given).
    #[arg(short = 'v', long, default_value_t = 0)]
    verbose: u8,

    /// Project loading settings (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Value written to frames not covered by any clip.
    #[arg(long, default_value_t = 0.0)]
    fill: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => edlconform::ProjectConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => edlconform::ProjectConfig::default(),
    };

    println!("Loading Kdenlive project: {}", cli.project.display());
    let project = edlconform::Project::from_path(&cli.project, &config)
        .with_context(|| format!("load project '{}'", cli.project.display()))?;

    let names = project.track_names();
    println!("Found {} tracks, called {:?}", names.len(), names);

    let Some(track) = project
        .find_tracks_by_name(&cli.track_name, true)
        .into_iter()
        .next()
    else {
        anyhow::bail!("Track \"{}\" not found", cli.track_name);
    };
    println!(
        "Track \"{}\" found with length {} frames",
        cli.track_name, track.length
    );

    let src = load_array(&cli.input)?;
    let reference = cli.groundtruth.as_deref().map(load_array).transpose()?;

    println!(
        "Conforming edit on track \"{}\" with {} frames onto {}",
        cli.track_name,
        track.length,
        cli.input.display()
    );
    let edited = edlconform::conform(
        track,
        &edlconform::Source::single(src.view()),
        &edlconform::ConformOptions {
            fill_value: cli.fill,
        },
    )?;

    if cli.verbose > 0 {
        dump_frames(&edited, reference.as_ref());
    }

    println!("{}", "=".repeat(80));
    println!("Saving conformed sequence to {}", cli.output.display());
    save_array(&cli.output, &edited)?;

    if let Some(reference) = &reference {
        let cmp = edlconform::compare(reference.view(), edited.view())?;
        println!(
            "L2 distance between ground truth edit and conformed edit is {}",
            cmp.l2_distance
        );
        if !cmp.is_exact() {
            println!(
                "{} frames differ (max abs diff {})",
                cmp.mismatched_frames.len(),
                cmp.max_abs_diff
            );
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = if verbose > 0 { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_array(path: &Path) -> anyhow::Result<ArrayD<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "json" => {
            println!("Loading array {}", path.display());
            let f = File::open(path)
                .with_context(|| format!("Could not load '{}'", path.display()))?;
            let arr: ArrayD<f64> = serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("Could not load '{}': not an array", path.display()))?;
            Ok(arr)
        }
        "mp4" | "mov" => anyhow::bail!(
            "Could not load '{}': video input is not supported, extract per-frame values first",
            path.display()
        ),
        _ => anyhow::bail!(
            "Could not load '{}': unknown input type '{ext}'",
            path.display()
        ),
    }
}

fn save_array(path: &Path, arr: &ArrayD<f64>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    serde_json::to_writer(BufWriter::new(f), arr)
        .with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

fn dump_frames(edited: &ArrayD<f64>, reference: Option<&ArrayD<f64>>) {
    if edited.ndim() == 0 {
        return;
    }
    for (i, frame) in edited.outer_iter().enumerate() {
        println!("{}", "-".repeat(80));
        println!("frame #{i}");
        if let Some(r) = reference.filter(|r| r.ndim() > 0 && i < r.len_of(ndarray::Axis(0))) {
            println!("ref:  {}", r.index_axis(ndarray::Axis(0), i));
        }
        println!("edit: {frame}");
    }
}
