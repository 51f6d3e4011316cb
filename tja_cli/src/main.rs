use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};
use tja_compiler::{DanRequest, DanSong, ParsedDocument};

mod job;
mod logger;
mod text;

use job::DanJob;

#[derive(Debug, Parser)]
#[command(name = "tja")]
#[command(about = "TJA chart statistics and dan chart compiler", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print note counts for every chart block.
    Stats {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Compile a dan chart from a JSON job file.
    Dan {
        job: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove `//` and `;` comments from a chart.
    Strip {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose, cli.quiet);

    match cli.command {
        Command::Stats { input, json } => run_stats(&input, json),
        Command::Dan { job, output } => run_dan(&job, output),
        Command::Strip { input, output } => run_strip(&input, output),
    }
}

fn load_document(path: &Path) -> anyhow::Result<ParsedDocument> {
    let src = text::read_chart(path)?;
    let doc = tja_compiler::parse_str(&src);
    for warning in &doc.warnings {
        warn!("{}:{}: {warning}", path.display(), warning.line());
    }
    Ok(doc)
}

fn run_stats(input: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load_document(input)?;
    let stats = tja_compiler::document_stats(&doc);

    if json {
        let out = serde_json::to_string_pretty(&stats).context("failed to serialize stats")?;
        println!("{out}");
        return Ok(());
    }
    for s in &stats {
        println!(
            "{}\tdon={}\tkatsu={}\tcombo={}\tlevel={}",
            s.course, s.don, s.katsu, s.combo, s.level
        );
    }
    Ok(())
}

fn run_dan(job_path: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let job = DanJob::load(job_path)?;
    let base_dir = job_path.parent().unwrap_or_else(|| Path::new("."));

    let exams = job.exam_slots()?;
    let mut song_dirs = Vec::with_capacity(job.songs.len());
    let mut documents = Vec::with_capacity(job.songs.len());
    let mut courses = Vec::with_capacity(job.songs.len());
    for song in &job.songs {
        let path = base_dir.join(&song.path);
        courses.push(song.course_id()?);
        documents.push(load_document(&path)?);
        song_dirs.push(path.parent().map(Path::to_path_buf).unwrap_or_default());
    }

    let request = DanRequest {
        songs: documents
            .iter()
            .zip(&courses)
            .map(|(document, &course)| DanSong { document, course })
            .collect(),
        exams,
        title: job.title.clone(),
        genre_tag: job.genre.clone(),
        color: job.color,
    };
    let compiled = tja_compiler::compile(&request)
        .with_context(|| format!("compile failed: {}", job_path.display()))?;

    let out_path = output.unwrap_or_else(|| default_output_path(job_path));
    fs::write(&out_path, &compiled.text)
        .with_context(|| format!("failed to write: {}", out_path.display()))?;
    info!("wrote {}", out_path.display());

    let out_dir = out_path.parent().unwrap_or_else(|| Path::new("."));
    for name in &compiled.audio_files {
        copy_audio(name, &song_dirs, out_dir)?;
    }
    Ok(())
}

/// Copies `name` from the first song directory holding it into `out_dir`.
fn copy_audio(name: &str, song_dirs: &[PathBuf], out_dir: &Path) -> anyhow::Result<()> {
    if !stays_inside(name) {
        warn!("audio file name leaves the output directory, skipped: {name}");
        return Ok(());
    }
    let Some(src) = song_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
    else {
        warn!("audio file not found next to any song: {name}");
        return Ok(());
    };

    let dst = out_dir.join(name);
    if same_file(&src, &dst) {
        return Ok(());
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create: {}", parent.display()))?;
    }
    fs::copy(&src, &dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    info!("copied {}", dst.display());
    Ok(())
}

/// True when `name` is a relative path without `..` components.
fn stays_inside(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn run_strip(input: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let src = text::read_chart(input)?;
    let stripped = tja_compiler::strip_comments(&src);
    match output {
        Some(out_path) => fs::write(&out_path, stripped)
            .with_context(|| format!("failed to write: {}", out_path.display()))?,
        None => print!("{stripped}"),
    }
    Ok(())
}

fn default_output_path(job: &Path) -> PathBuf {
    let mut out = job.to_path_buf();
    out.set_extension("tja");
    out
}
