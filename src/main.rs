//! glossa CLI: statistical language identification.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use glossa::{
    DetectorBuilder, DetectorConfig, GlossaConfig, Language, LanguageDetector, ModelStore,
};

#[derive(Parser)]
#[command(name = "glossa", version, about = "Statistical language identification")]
struct Cli {
    /// Candidate languages as comma-separated ISO 639-1 codes (default: all).
    #[arg(long, global = true)]
    languages: Option<String>,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model directory or snapshot file to use instead of the bundled models.
    #[arg(long, global = true)]
    models: Option<PathBuf>,

    /// Minimum confidence gap between the two best languages (0.0 - 0.99).
    #[arg(long, global = true)]
    min_distance: Option<f64>,

    /// Score trigrams only.
    #[arg(long, global = true)]
    low_accuracy: bool,

    /// Emit JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the most likely language of a text ("-" reads stdin).
    Detect { text: String },

    /// Print the confidence that a text is written in one language.
    Confidence {
        text: String,

        /// ISO 639-1 code of a candidate language.
        #[arg(long)]
        language: String,
    },

    /// Print every candidate language with its confidence, highest first.
    Rank { text: String },

    /// Detect each sentence of a text separately.
    Sentences { text: String },

    /// List supported languages.
    Languages,

    /// Export or snapshot the model set.
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Write every model as `<code>.json` into a directory.
    Export {
        #[arg(long)]
        dir: PathBuf,
    },
    /// Write a compact binary snapshot of every model.
    Snapshot {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => GlossaConfig::load(path)?,
        None => GlossaConfig::default(),
    };

    match &cli.command {
        Commands::Detect { text } => {
            let detector = build_detector(&cli, &file_config)?;
            let text = read_text(text)?;
            let language = detector.detect_language_of(&text);
            if cli.json {
                let code = language.map(Language::iso_code_639_1);
                println!("{}", serde_json::json!({ "language": code }));
            } else {
                match language {
                    Some(language) => println!("{} ({})", language.iso_code_639_1(), language),
                    None => println!("unknown"),
                }
            }
        }

        Commands::Confidence { text, language } => {
            let detector = build_detector(&cli, &file_config)?;
            let text = read_text(text)?;
            let language: Language = language.parse()?;
            let confidence = detector.compute_language_confidence(&text, language)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "language": language.iso_code_639_1(),
                        "confidence": confidence,
                    })
                );
            } else {
                println!("{confidence:.4}");
            }
        }

        Commands::Rank { text } => {
            let detector = build_detector(&cli, &file_config)?;
            let text = read_text(text)?;
            let result = detector.compute_language_confidence_values(&text);
            if cli.json {
                let json = serde_json::to_string_pretty(&result).into_diagnostic()?;
                println!("{json}");
            } else {
                for entry in &result {
                    println!("{entry}");
                }
            }
        }

        Commands::Sentences { text } => {
            let detector = build_detector(&cli, &file_config)?;
            let text = read_text(text)?;
            let sentences = detector.detect_per_sentence(&text);
            if cli.json {
                let json = serde_json::to_string_pretty(&sentences).into_diagnostic()?;
                println!("{json}");
            } else {
                for s in &sentences {
                    let code = s.language.map_or("??", Language::iso_code_639_1);
                    println!("[{code} {:.2}] {}", s.confidence, s.sentence);
                }
            }
        }

        Commands::Languages => {
            if cli.json {
                let list: Vec<_> = Language::all()
                    .map(|l| {
                        serde_json::json!({
                            "code": l.iso_code_639_1(),
                            "name": l.name(),
                            "scripts": l.scripts().iter().map(ToString::to_string).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                let json = serde_json::to_string_pretty(&list).into_diagnostic()?;
                println!("{json}");
            } else {
                println!("Supported languages ({}):", Language::COUNT);
                for language in Language::all() {
                    let scripts: Vec<String> =
                        language.scripts().iter().map(ToString::to_string).collect();
                    println!(
                        "  {}  {:<12} {}",
                        language.iso_code_639_1(),
                        language.name(),
                        scripts.join(", ")
                    );
                }
            }
        }

        Commands::Models { action } => {
            let store = load_store(&cli, &file_config)?;
            match action {
                ModelAction::Export { dir } => {
                    store.export_to_dir(dir)?;
                    println!("Exported {} models to {}", Language::COUNT, dir.display());
                }
                ModelAction::Snapshot { out } => {
                    store.write_snapshot(out)?;
                    println!(
                        "Wrote snapshot of {} n-grams to {}",
                        store.ngram_count(),
                        out.display()
                    );
                }
            }
        }
    }

    Ok(())
}

/// The model store named by `--models` or the config file, else the shared bundled one.
fn load_store(cli: &Cli, file_config: &GlossaConfig) -> Result<Arc<ModelStore>> {
    match cli.models.as_ref().or(file_config.models.as_ref()) {
        Some(path) => Ok(Arc::new(ModelStore::load(path)?)),
        None => Ok(ModelStore::global()?),
    }
}

/// Command-line flags override the config file.
fn build_detector(cli: &Cli, file_config: &GlossaConfig) -> Result<LanguageDetector> {
    let codes: Vec<String> = match &cli.languages {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect(),
        None => file_config.languages.clone(),
    };
    let builder = if codes.is_empty() {
        DetectorBuilder::from_all_languages()
    } else {
        DetectorBuilder::from_iso_codes(&codes)?
    };

    let config = DetectorConfig {
        minimum_relative_distance: cli
            .min_distance
            .unwrap_or(file_config.detector.minimum_relative_distance),
        low_accuracy: cli.low_accuracy || file_config.detector.low_accuracy,
    };

    let detector = builder
        .with_config(config)
        .with_store(load_store(cli, file_config)?)
        .build()?;
    Ok(detector)
}

/// `-` reads the whole of stdin.
fn read_text(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
        Ok(buf)
    } else {
        Ok(arg.to_string())
    }
}
