use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use massrename_core::{
    ArchiveSink, DirectorySink, FileSink, RenameConfig, RenameJob, template,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod formatter;

const DEFAULT_CONFIG_FILE: &str = "massrename.toml";
const LOG_ENV: &str = "MASSRENAME_LOG";

#[derive(Parser)]
#[command(name = "massrename")]
#[command(about = "Rename files from a spreadsheet mapping and pack them into one zip archive", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "A source file literally named `template` must follow `--`:\n  massrename -m mapping.xlsx -- template")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Source files to rename, in archive order (list them after `--` if one is named `template`)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Mapping spreadsheet (xlsx, xlsm, xlsb, xls, ods)
    #[arg(short, long, value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// Prefix added to every output file name (overrides config)
    #[arg(short, long)]
    prefix: Option<String>,

    /// Sheet of the mapping spreadsheet to read (overrides config)
    #[arg(long, value_name = "NAME")]
    sheet: Option<String>,

    /// Write the archive to this exact path
    #[arg(short, long, value_name = "FILE", conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Directory for the timestamped archive
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Show the planned names without writing an archive
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write an example mapping spreadsheet
    Template {
        /// Where to write the template (.xlsx)
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Command::Template { output }) = &cli.command {
        template::write_template(output)
            .with_context(|| format!("Failed to write template to {}", output.display()))?;
        formatter::print_template_written(output);
        return Ok(());
    }

    let config = load_config(&cli)?;
    config.validate().context("Invalid configuration")?;

    let mut job = RenameJob::new(config);

    if let Some(mapping) = &cli.mapping {
        job.load_mapping_file(mapping)
            .with_context(|| format!("Failed to load mapping from {}", mapping.display()))?;
    }

    job.add_paths(&cli.files)
        .context("Failed to read source files")?;

    if cli.dry_run {
        let plan = job.plan().context("Failed to plan renames")?;
        match cli.format {
            OutputFormat::Human => formatter::print_plan_human(&plan),
            OutputFormat::Json => formatter::print_plan_json(&plan)?,
        }
        return Ok(());
    }

    let mut sink: Box<dyn ArchiveSink> = match &cli.output {
        Some(path) => Box::new(FileSink { path: path.clone() }),
        None => Box::new(DirectorySink::new(
            &cli.out_dir,
            job.config().archive_stem.clone(),
        )),
    };

    let outcome = job.run(sink.as_mut()).context("Conversion failed")?;

    match cli.format {
        OutputFormat::Human => formatter::print_outcome_human(&outcome),
        OutputFormat::Json => formatter::print_outcome_json(&outcome)?,
    }

    Ok(())
}

/// Load configuration: explicit file, else `massrename.toml` if present, else defaults.
/// Command-line values override the file.
fn load_config(cli: &Cli) -> Result<RenameConfig> {
    let mut config = if let Some(config_path) = &cli.config {
        RenameConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_config_path.exists() {
            RenameConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            RenameConfig::default()
        }
    };

    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(sheet) = &cli.sheet {
        config.sheet = Some(sheet.clone());
    }

    Ok(config)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "massrename=debug"
    } else {
        "massrename=warn"
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_subcommand() {
        let cli = Cli::try_parse_from(["massrename", "template", "t.xlsx"]).unwrap();
        let Some(Command::Template { output }) = &cli.command else {
            panic!("expected the template subcommand");
        };
        assert_eq!(output, &PathBuf::from("t.xlsx"));
        assert!(cli.files.is_empty());
    }

    #[test]
    fn test_file_named_template_after_separator() {
        let cli =
            Cli::try_parse_from(["massrename", "-m", "map.xlsx", "--", "template", "b.png"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.files, [PathBuf::from("template"), PathBuf::from("b.png")]);
    }

    #[test]
    fn test_output_conflicts_with_out_dir() {
        let result = Cli::try_parse_from(["massrename", "-o", "a.zip", "-d", "out", "x.txt"]);
        assert!(result.is_err());
    }
}
