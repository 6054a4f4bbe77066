use anyhow::{Context, Result};
use bibendum::config::{find_config_file, get_config, load_config, Config, ConfigFile};
use bibendum::fields::{FieldCodec, Properties};
use bibendum::finders::{scan_document, FinderRegistry, PlainTextSource, ScanReport};
use bibendum::models::{Author, AuthorList, Entry, SearchSpec};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Bibendum - find citations in documents and store them as fields
#[derive(Parser, Debug)]
#[command(name = "bibendum")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find citations in documents and store them as document fields", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Log format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (plain if TTY, JSON otherwise)
    Auto,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

/// Citation notations
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Notation {
    /// LaTeX natbib commands
    #[value(name = "natbib")]
    Natbib,
    /// Author-year citations in prose
    #[value(name = "plaintext")]
    PlainText,
}

impl Notation {
    fn id(self) -> &'static str {
        match self {
            Notation::Natbib => "natbib",
            Notation::PlainText => "plaintext",
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find citations, reference lists and style markers in a file
    #[command(alias = "s")]
    Scan {
        /// File to scan
        file: PathBuf,

        /// Citation notation (defaults to the configured one)
        #[arg(long, short, value_enum)]
        notation: Option<Notation>,
    },

    /// Encode a JSON object of properties as a field name
    Encode {
        /// Index keeping the field name unique
        index: usize,

        /// Properties, as a JSON object
        properties: String,
    },

    /// Decode a field name
    Decode {
        /// Field name
        name: String,
    },

    /// Derive the reference key of an entry
    CiteRef {
        /// Surname of the first author
        #[arg(long)]
        surname: String,

        /// Publication year
        #[arg(long)]
        year: i32,

        /// Name prefix of the first author ("van de")
        #[arg(long, default_value = "")]
        prefix: String,

        /// Existing key this one collides with
        #[arg(long)]
        previous: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        /// Where to write it (defaults to the user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config(),
    };

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let format = resolve_format(cli.output);

    match cli.command {
        Some(Commands::Scan { file, notation }) => {
            let registry = FinderRegistry::new();
            let id = notation
                .map(|n| n.id().to_string())
                .unwrap_or_else(|| config.finder.notation.clone());
            let finder = registry.get_required(&id)?;

            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = scan_document(finder.as_ref(), &PlainTextSource::new(text))?;

            if !cli.quiet {
                eprintln!(
                    "Found {} citations in {} ({})",
                    report.citations.len(),
                    file.display(),
                    finder.name()
                );
            }
            output_report(&report, format)?;
        }

        Some(Commands::Encode { index, properties }) => {
            let properties: Properties = serde_json::from_str(&properties)
                .context("Properties must be a JSON object")?;
            let codec = FieldCodec::new(config.fields.prefix.as_str());
            println!("{}", codec.encode(index, &properties)?);
        }

        Some(Commands::Decode { name }) => {
            let codec = FieldCodec::new(config.fields.prefix.as_str());
            let (index, properties) = codec
                .decode(&name)?
                .with_context(|| format!("'{}' is not a bibendum field", name))?;

            match format {
                OutputFormat::Json => {
                    let value = serde_json::json!({ "index": index, "properties": properties });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                _ => {
                    println!("index: {}", index);
                    for (key, value) in &properties {
                        println!("{}: {}", key, value);
                    }
                }
            }
        }

        Some(Commands::CiteRef {
            surname,
            year,
            prefix,
            previous,
        }) => {
            let authors: AuthorList = vec![Author::new("", "", surname, prefix)].into();
            let entry = Entry::new(authors, year);
            println!("{}", entry.make_cite_ref(previous.as_deref())?);
        }

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { path, force } => {
                let path = match path {
                    Some(path) => path,
                    None => dirs::config_dir()
                        .context("No user configuration directory")?
                        .join("bibendum")
                        .join("config.toml"),
                };
                if path.exists() && !force {
                    anyhow::bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }

                ConfigFile::default().save(&path)?;
                if !cli.quiet {
                    println!("Wrote default configuration to {}", path.display());
                }
            }
            ConfigAction::Show => {
                print!("{}", ConfigFile::from(config).to_toml()?);
            }
        },

        None => {
            // No command provided - show help
            println!("No command provided. Use --help for usage information.");
            println!("Common commands:");
            println!("  scan <file>           - Find citations in a file");
            println!("  encode <index> <json> - Encode properties as a field name");
            println!("  decode <name>         - Decode a field name");
            println!("  cite-ref              - Derive a reference key");
        }
    }

    Ok(())
}

fn init_tracing(cli: &Cli, config: &Config) {
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("bibendum={}", env_filter)),
    );

    let json = match cli.log_format {
        Some(format) => format == LogFormat::Json,
        None => config.logging.format.as_deref() == Some("json"),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Plain
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

fn output_report(report: &ScanReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        _ => {
            for found in &report.citations {
                let citation = &found.item;
                print!(
                    "{:>6}..{:<6} {:<3}",
                    found.range.start,
                    found.range.end,
                    citation.style().to_string()
                );
                match citation.search() {
                    Some(SearchSpec::Text {
                        search_string,
                        et_al,
                    }) => {
                        let et_al = if *et_al { " (et al.)" } else { "" };
                        println!(" search: {}{}", search_string, et_al);
                    }
                    _ => println!(" {}", citation.cite_ref().join(", ")),
                }
            }
            for found in &report.reflists {
                let options: Vec<String> = found
                    .item
                    .iter()
                    .map(|(key, value)| match value {
                        Some(value) => format!("{}={}", key, value),
                        None => key.clone(),
                    })
                    .collect();
                println!(
                    "{:>6}..{:<6} reference list {}",
                    found.range.start,
                    found.range.end,
                    options.join(", ")
                );
            }
            for found in &report.styles {
                println!(
                    "{:>6}..{:<6} style {}",
                    found.range.start, found.range.end, found.item
                );
            }
        }
    }
    Ok(())
}
