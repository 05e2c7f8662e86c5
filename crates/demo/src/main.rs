// File: crates/demo/src/main.rs
// Summary: scientiflow CLI; renders a dataset + chart config to a file and manages stored projects and chart specs.

use anyhow::{bail, Context, Result};
use chart_core::{load_path, render_request, RenderOptions, RenderOutcome, RenderTarget};
use chart_store::{ChartSpecStore, ProjectStore, SqliteStore};
use log::{info, warn};
use serde_json::Value as Json;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage:
  scientiflow render <static|dynamic|dynamic-json> <config.json> <dataset.csv|json> [out]
  scientiflow project create <name> <description>
  scientiflow project list
  scientiflow spec save <project-id> <name> <config.json> [description]
  scientiflow spec get <project-id> <spec-id>
  scientiflow spec list <project-id>
  scientiflow spec render <project-id> <spec-id> <target> <dataset> [out]";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let args = args.iter().map(String::as_str).collect::<Vec<_>>();
    match args.as_slice() {
        ["render", target, config, dataset, rest @ ..] => {
            let config = read_config(Path::new(config))?;
            render_to_file(target, &config, Path::new(dataset), rest.first().map(PathBuf::from))
        }
        ["project", "create", name, description] => {
            let project = open_store()?.create_project(name, description)?;
            println!("{}", serde_json::to_string_pretty(&project)?);
            Ok(())
        }
        ["project", "list"] => {
            for p in open_store()?.list_projects()? {
                println!("{}\t{}\t{}", p.id, p.name, p.description);
            }
            Ok(())
        }
        ["spec", "save", project_id, name, config, rest @ ..] => {
            let store = open_store()?;
            if store.get_project(project_id)?.is_none() {
                bail!("project not found: {project_id}");
            }
            let config = read_config(Path::new(config))?;
            let id = store.save(project_id, name, rest.first().copied(), &config)?;
            println!("{id}");
            Ok(())
        }
        ["spec", "get", project_id, spec_id] => {
            let spec = open_store()?
                .get(project_id, spec_id)?
                .with_context(|| format!("chart spec not found: {spec_id}"))?;
            println!("{}", serde_json::to_string_pretty(&spec)?);
            Ok(())
        }
        ["spec", "list", project_id] => {
            for s in open_store()?.list(project_id)? {
                println!("{}\t{}\t{}", s.id, s.name, s.description.unwrap_or_default());
            }
            Ok(())
        }
        ["spec", "render", project_id, spec_id, target, dataset, rest @ ..] => {
            let spec = open_store()?
                .get(project_id, spec_id)?
                .with_context(|| format!("chart spec not found: {spec_id}"))?;
            render_to_file(target, &spec.config, Path::new(dataset), rest.first().map(PathBuf::from))
        }
        _ => {
            eprintln!("{USAGE}");
            bail!("unrecognized arguments: {:?}", args);
        }
    }
}

/// Database path from `SCIENTIFLOW_DB`, default `data/projects.db`.
fn open_store() -> Result<SqliteStore> {
    let path = std::env::var("SCIENTIFLOW_DB").unwrap_or_else(|_| "data/projects.db".to_string());
    SqliteStore::open(&path).with_context(|| format!("opening store '{path}'"))
}

fn read_config(path: &Path) -> Result<Json> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config '{}'", path.display()))
}

fn render_to_file(target: &str, config: &Json, dataset: &Path, out: Option<PathBuf>) -> Result<()> {
    let target = target.parse::<RenderTarget>()?;
    let data = load_path(dataset).with_context(|| format!("failed to load dataset '{}'", dataset.display()))?;
    info!("loaded {} rows x {} columns from {}", data.row_count(), data.column_names().count(), dataset.display());

    let opts = RenderOptions::from_env();
    let RenderOutcome { artifact, warnings } = render_request(target.as_str(), config, &data, &opts)?;
    for w in &warnings {
        warn!("{w}");
    }

    let out = out.unwrap_or_else(|| out_name_with(dataset, target, artifact.extension()));
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let bytes = artifact.into_bytes()?;
    std::fs::write(&out, &bytes).with_context(|| format!("writing {}", out.display()))?;
    println!("Wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}

/// Produce output file name like target/out/chart_<stem>_<target>.<ext>
fn out_name_with(input: &Path, target: RenderTarget, ext: &str) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    let mut out = PathBuf::from("target/out");
    if stem.is_empty() {
        out.push(format!("chart_{target}.{ext}"));
    } else {
        out.push(format!("chart_{stem}_{target}.{ext}"));
    }
    out
}
