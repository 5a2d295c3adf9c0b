mod commands;
mod jobs;
mod state;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cliprail_core::config::EditorConfig;
use cliprail_core::project::preset_by_name;
use cliprail_core::types::Project;
use cliprail_preview::CompositionManifest;
use commands::{Applied, EditCommand};
use jobs::{track_job, SpoolBackend};
use state::Session;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Replay timeline edits against a project file.
#[derive(Parser, Debug)]
#[command(name = "cliprail")]
#[command(version)]
#[command(about = "Three-track timeline editor driven by JSON command scripts")]
struct Args {
    /// Project file to open. A new project is created if it does not exist.
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Name for a newly created project
    #[arg(long, default_value = "Untitled")]
    name: String,

    /// Output preset for a new project (1080p, 720p, shorts, 4k)
    #[arg(long, default_value = "1080p")]
    preset: String,

    /// File of JSON edit commands, one per line ("-" for stdin)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Editor config (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to save the edited project (defaults to --project)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the composition manifest as JSON when done
    #[arg(long)]
    manifest: bool,

    /// Wait for a generation job and add its media to the timeline
    #[arg(long, requires = "jobs_dir")]
    await_job: Option<String>,

    /// Directory where generation jobs publish `<id>.json` state files
    #[arg(long)]
    jobs_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    let project = open_project(&args)?;
    let mut session = Session::new(project, config);

    if let Some(script) = &args.script {
        run_script(&mut session, script)?;
    }

    if let (Some(job_id), Some(dir)) = (&args.await_job, &args.jobs_dir) {
        let backend = SpoolBackend::new(dir);
        let policy = session.config.job_poll.clone();
        let scale = session.scale();
        let id = track_job(&backend, job_id, &policy, |asset| {
            let kind = asset.kind;
            let clip = asset.into_clip(&scale)?;
            session.add_generated(kind, clip)
        })
        .await?;
        tracing::info!(job_id = %job_id, %id, "generated clip added");
    }

    if let Some(out) = args.out.as_ref().or(args.project.as_ref()) {
        let written = session.project.save_to_file(out)?;
        println!("{}", written.display());
    }

    if args.manifest {
        let manifest = CompositionManifest::build(session.timeline(), &session.scale());
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    }

    Ok(())
}

fn open_project(args: &Args) -> Result<Project> {
    if let Some(path) = &args.project {
        if path.exists() {
            return Project::load_from_file(path)
                .with_context(|| format!("loading project {}", path.display()));
        }
    }
    let Some(settings) = preset_by_name(&args.preset) else {
        bail!("unknown preset {:?}", args.preset);
    };
    tracing::info!(name = %args.name, preset = %args.preset, "creating project");
    Ok(Project::new(args.name.clone(), settings))
}

fn run_script(session: &mut Session, path: &Path) -> Result<()> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening script {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cmd: EditCommand = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: bad command", path.display(), n + 1))?;
        let label = cmd.label();
        match session
            .apply(cmd)
            .with_context(|| format!("{}:{}: {label}", path.display(), n + 1))?
        {
            Applied::Edited { clip } => {
                if let Some(id) = clip {
                    println!("{id}");
                }
            }
            Applied::Unchanged => tracing::debug!(line = n + 1, label, "no change"),
            Applied::Restored | Applied::Transport => {}
        }
    }
    Ok(())
}
