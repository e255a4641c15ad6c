use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use refdocs_core::config::{self, CONFIG_FILE_NAME, RefdocsConfig};
use refdocs_core::index::{FriendlyOperationNames, missing_friendly_names, name_resolver};
use refdocs_core::parse;
use refdocs_core::{DocModel, report};

#[derive(Parser)]
#[command(
    name = "refdocs",
    about = "Kubernetes-style API reference model builder",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the documentation model and print the categorized operations
    Build {
        /// Directory holding config.yaml and config-op-names.yaml
        #[arg(short, long, default_value = ".")]
        config_dir: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Report unrecognized definition names instead of failing
        #[arg(long)]
        allow_errors: bool,

        /// Keep dotted operation groups as-is when linking operations
        #[arg(long)]
        no_munge_groups: bool,
    },

    /// Validate a Swagger spec
    Validate {
        /// Path to the spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the friendly operation name table, with TODO for missing entries
    OpNames {
        #[arg(short, long, default_value = ".")]
        config_dir: PathBuf,
    },

    /// List every version of a kind, newest first
    Versions {
        #[arg(short, long, default_value = ".")]
        config_dir: PathBuf,

        /// Kind name, e.g. Deployment
        #[arg(short, long)]
        kind: String,
    },

    /// Write a default config.yaml
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            config_dir,
            format,
            allow_errors,
            no_munge_groups,
        } => cmd_build(&config_dir, format, allow_errors, no_munge_groups),

        Commands::Validate { input } => cmd_validate(input),

        Commands::OpNames { config_dir } => cmd_op_names(&config_dir),

        Commands::Versions { config_dir, kind } => cmd_versions(&config_dir, &kind),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "refdocs", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load config from the directory, falling back to defaults.
fn try_load_config(config_dir: &Path) -> Result<RefdocsConfig> {
    let cfg = config::load_config(config_dir)
        .with_context(|| format!("failed to load config from {}", config_dir.display()))?;
    Ok(cfg.unwrap_or_default())
}

fn load_model(
    config_dir: &Path,
    cfg: &RefdocsConfig,
) -> Result<(DocModel, FriendlyOperationNames)> {
    let specs = config::load_specs(&cfg.spec_paths(config_dir))?;
    eprintln!("Loaded {} API spec(s).", specs.len());

    let names = config::load_friendly_names(config_dir)?;
    eprintln!("Loaded friendly operation names: {}", names.len());

    for id in missing_friendly_names(&specs, &names) {
        log::info!("no friendly name found for {id}");
    }

    let options = cfg.build_options()?;
    let model = refdocs_core::build(&specs, &names, &options)?;
    Ok((model, names))
}

fn cmd_build(
    config_dir: &Path,
    format: OutputFormat,
    allow_errors: bool,
    no_munge_groups: bool,
) -> Result<()> {
    let mut cfg = try_load_config(config_dir)?;
    cfg.allow_errors |= allow_errors;
    if no_munge_groups {
        cfg.munge_groups = false;
    }

    let (model, _) = load_model(config_dir, &cfg)?;

    for d in &model.diagnostics {
        log::warn!("{d}");
    }

    match format {
        OutputFormat::Text => println!("{}", report::render_text(&model)?),
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&build_summary_value(&model))?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&build_summary_value(&model))?;
            println!("{}", json);
        }
    }

    let summary = model.summary();
    if summary.unclassified + summary.unmatched > 0 {
        eprintln!(
            "{} operation(s) without a category; update {}",
            summary.unclassified + summary.unmatched,
            config::OP_NAMES_FILE_NAME
        );
    }
    Ok(())
}

fn build_summary_value(model: &DocModel) -> serde_json::Value {
    let categories: Vec<serde_json::Value> = model
        .categories
        .iter()
        .map(|c| {
            let slots: indexmap::IndexMap<&str, Vec<&str>> = c
                .friendly_names
                .iter()
                .map(|f| {
                    let ids = f
                        .operations
                        .iter()
                        .filter_map(|&h| model.operations.get_index(h))
                        .map(|op| op.id.as_str())
                        .collect();
                    (f.name.as_str(), ids)
                })
                .collect();
            serde_json::json!({
                "name": c.name,
                "slots": slots,
            })
        })
        .collect();

    let definitions: Vec<serde_json::Value> = model
        .definitions
        .iter()
        .map(|d| {
            serde_json::json!({
                "key": d.key(),
                "anchor": d.anchor(),
                "show_group": d.show_group,
                "is_inlined": d.is_inlined,
                "is_old_version": d.is_old_version,
                "in_toc": d.in_toc,
                "found_in_field": d.found_in_field,
                "found_in_operation": d.found_in_operation,
            })
        })
        .collect();

    serde_json::json!({
        "categories": categories,
        "definitions": definitions,
        "diagnostics": model.diagnostics,
    })
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let content = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let parsed = parse::from_path_contents(&input, &content)?;

    eprintln!("Valid Swagger {} spec: {}", parsed.swagger, parsed.info.title);
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());
    eprintln!("  Definitions: {}", parsed.definitions.len());

    // Every definition name must follow the known layout.
    let mut skipped = 0;
    for name in parsed.definitions.keys() {
        if name_resolver::resolve_reference(name)?.is_empty() {
            skipped += 1;
        }
    }
    eprintln!("  Wrapper types: {}", skipped);

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_op_names(config_dir: &Path) -> Result<()> {
    let cfg = try_load_config(config_dir)?;
    let (model, names) = load_model(config_dir, &cfg)?;
    println!("{}", report::render_op_names(&model, &names)?);
    Ok(())
}

fn cmd_versions(config_dir: &Path, kind: &str) -> Result<()> {
    let cfg = try_load_config(config_dir)?;
    let specs = config::load_specs(&cfg.spec_paths(config_dir))?;
    let options = cfg.build_options()?;
    let model = refdocs_core::build(&specs, &Default::default(), &options)?;

    let versions = model
        .definitions
        .all_versions_sorted(kind, cfg.version_order.ordering());
    if versions.is_empty() {
        anyhow::bail!("no definitions of kind {kind}");
    }
    for d in versions {
        let marker = if d.is_old_version { " (old)" } else { "" };
        println!("{}{}", d.key(), marker);
    }
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
