use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tempfile::NamedTempFile;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use res_obfuscator::config::load_exemption_config;
use res_obfuscator::deobfuscation::{load_mapping, write_mapping, write_path_map};
use res_obfuscator::{
  Deobfuscator, ObfuscationMaps, ObfuscationOptions, Obfuscator, ResourceTable,
};

#[derive(Parser)]
#[command(name = "res-obfuscate", version, about = "Shorten resource paths and collapse resource names")]
struct Cli {
  /// Log at debug level unless RUST_LOG says otherwise.
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Obfuscate a resource table in place.
  Obfuscate(ObfuscateArgs),
  /// Undo path shortening using a previously written mapping.
  Restore(RestoreArgs),
}

#[derive(Args, Default)]
struct ObfuscateArgs {
  /// Resource table JSON to rewrite.
  #[arg(long)]
  table: PathBuf,
  /// Where to write the rewritten table; defaults to overwriting --table.
  #[arg(long)]
  output: Option<PathBuf>,
  /// JSON options file; defaults to obfuscation.config.json next to the table.
  #[arg(long)]
  config: Option<PathBuf>,
  /// Exemption config listing `type/name#no_collapse` lines.
  #[arg(long)]
  exemptions: Option<PathBuf>,
  /// Shorten file reference paths.
  #[arg(long)]
  shorten_resource_paths: bool,
  /// Collapse resource names in the key string pool.
  #[arg(long)]
  collapse_resource_names: bool,
  /// Write the JSON de-obfuscation mapping here.
  #[arg(long)]
  mapping_out: Option<PathBuf>,
  /// Write the plain-text shortened path map here.
  #[arg(long)]
  path_map_out: Option<PathBuf>,
}

#[derive(Args)]
struct RestoreArgs {
  /// Resource table JSON to rewrite.
  #[arg(long)]
  table: PathBuf,
  /// JSON de-obfuscation mapping.
  #[arg(long)]
  mapping: PathBuf,
  /// Where to write the restored table; defaults to overwriting --table.
  #[arg(long)]
  output: Option<PathBuf>,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match cli.command {
    Commands::Obfuscate(args) => obfuscate(&args),
    Commands::Restore(args) => restore(&args),
  }
}

fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter_layer =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::registry()
    .with(filter_layer)
    .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
    .init();
}

fn obfuscate(args: &ObfuscateArgs) -> Result<()> {
  let options = resolve_options(args)?;
  let mut resource_table = read_table(&args.table)?;
  let obfuscator = Obfuscator::new(options);
  let maps = obfuscator
    .run(&mut resource_table)
    .context("resource obfuscation failed")?;

  // The table is only replaced once everything needed to reverse it is on disk.
  write_artifacts(
    obfuscator.has_output(),
    &maps,
    args.mapping_out.as_deref(),
    args.path_map_out.as_deref(),
  )?;
  write_table(args.output.as_deref().unwrap_or(&args.table), &resource_table)
}

fn restore(args: &RestoreArgs) -> Result<()> {
  let deobfuscator = Deobfuscator::new(load_mapping(&args.mapping)?);
  let mut resource_table = read_table(&args.table)?;
  let restored = deobfuscator.restore_table(&mut resource_table)?;
  tracing::info!(restored, "restored shortened paths");
  write_table(args.output.as_deref().unwrap_or(&args.table), &resource_table)
}

/// Options file (explicit or discovered), then the exemption file, then command-line flags.
///
/// Flags can only switch a transform on; they never disable one the options file enabled.
fn resolve_options(args: &ObfuscateArgs) -> Result<ObfuscationOptions> {
  let mut options = match &args.config {
    Some(path) => ObfuscationOptions::from_path(path)?,
    None => ObfuscationOptions::discover(table_dir(&args.table)),
  };
  options.shorten_resource_paths |= args.shorten_resource_paths;
  options.collapse_key_stringpool |= args.collapse_resource_names;
  if let Some(path) = &args.exemptions {
    options
      .name_collapse_exemptions
      .extend(load_exemption_config(path)?);
  }
  Ok(options)
}

fn write_artifacts(
  has_output: bool,
  maps: &ObfuscationMaps,
  mapping_out: Option<&Path>,
  path_map_out: Option<&Path>,
) -> Result<()> {
  if !has_output {
    tracing::info!("no obfuscation enabled; skipping de-obfuscation output");
    return Ok(());
  }
  if let Some(path) = mapping_out {
    write_mapping(path, maps)?;
    tracing::info!(path = %path.display(), "wrote de-obfuscation mapping");
  }
  if let Some(path) = path_map_out {
    let file =
      File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_path_map(&mut writer, &maps.shortened_paths)
      .and_then(|()| writer.flush())
      .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote shortened path map");
  }
  Ok(())
}

fn table_dir(path: &Path) -> &Path {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  }
}

fn read_table(path: &Path) -> Result<ResourceTable> {
  let content =
    fs::read_to_string(path).with_context(|| format!("table not found at {}", path.display()))?;
  serde_json::from_str(&content)
    .with_context(|| format!("failed to parse resource table {}", path.display()))
}

/// Write through a sibling temp file so a failed write never leaves a truncated table behind.
fn write_table(path: &Path, table: &ResourceTable) -> Result<()> {
  let json = serde_json::to_string_pretty(table).context("failed to serialise resource table")?;
  let mut staged = NamedTempFile::new_in(table_dir(path))
    .with_context(|| format!("failed to stage {}", path.display()))?;
  staged
    .write_all(json.as_bytes())
    .with_context(|| format!("failed to write {}", path.display()))?;
  staged
    .persist(path)
    .map_err(|err| err.error)
    .with_context(|| format!("failed to replace {}", path.display()))?;
  Ok(())
}
