use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use readaloud::cli::{Cli, Commands, ConfigAction, log_filter};
use readaloud::config::Config;
use readaloud::narration::Highlight;
use readaloud::output;
use readaloud::render::{Article, RelatedArticle, SynchronizedRenderer, load_related};
use readaloud::session::{Session, SessionOptions, SessionOutcome, spawn_stdin_reader};
use readaloud::speech::{create_engine, speech_channel};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);
    tracing::debug!(version = %readaloud::version_string(), "readaloud");

    match cli.command {
        Commands::Segment { file, json } => {
            let article = Article::load(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(article.sentences())?);
            } else {
                for sentence in article.sentences() {
                    println!("{:>4}  {}", sentence.index.dimmed(), sentence.text);
                }
            }
        }
        Commands::Render {
            file,
            related,
            sentence,
            offset,
            format,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let article = Article::load(&file)?;
            let related = load_related_opt(related.as_deref())?;
            let highlight = match sentence {
                Some(index) => Highlight::at(index, offset.unwrap_or(0)),
                None => Highlight::passive(),
            };
            if let Some(index) = sentence
                && index >= article.sentences().len()
            {
                eprintln!(
                    "{} sentence {index} is out of range ({} sentences)",
                    "warning:".yellow(),
                    article.sentences().len()
                );
            }

            let tree = SynchronizedRenderer::from_config(&config.render).render(
                &article,
                highlight,
                &related,
            );
            output::print_tree(
                &tree,
                format.unwrap_or(config.render.format),
                config.render.context_blocks,
            )?;
        }
        Commands::Read {
            file,
            related,
            backend,
            wpm,
            replay_yield,
            stay,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(backend) = backend {
                config.speech.backend = backend;
            }
            if let Some(wpm) = wpm {
                config.speech.words_per_minute = wpm;
            }
            config.validate()?;

            let article = Article::load(&file)?;
            let related = load_related_opt(related.as_deref())?;
            let (speech_tx, speech_rx) = speech_channel();
            let engine = create_engine(&config.speech, speech_tx);
            tracing::info!(
                engine = engine.name(),
                sentences = article.sentences().len(),
                "starting narration"
            );

            let options = SessionOptions {
                format: config.render.format,
                context_blocks: config.render.context_blocks,
                stay,
                replay_yield: replay_yield.unwrap_or_else(|| config.narration.replay_yield()),
                ..SessionOptions::default()
            };
            let session = Session::new(
                engine,
                speech_rx,
                article,
                related,
                SynchronizedRenderer::from_config(&config.render),
                options,
            );

            let (outcome, _) = session.run(spawn_stdin_reader()).await?;
            if let SessionOutcome::Failed(message) = outcome {
                anyhow::bail!("narration failed: {message}");
            }
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "readaloud",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the flags.
fn init_logging(quiet: bool, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(quiet, verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_path(custom_path: Option<&Path>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Config::default_path()?),
    }
}

fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // An explicit path must exist
        Config::load(path)?
    } else {
        Config::load_or_default(&config_path(None)?)?
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

fn load_related_opt(path: Option<&Path>) -> Result<Vec<RelatedArticle>> {
    match path {
        Some(path) => load_related(path)
            .with_context(|| format!("reading related articles from {}", path.display())),
        None => Ok(Vec::new()),
    }
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = config_path(custom_path)?;
            let note = if path.exists() {
                String::new()
            } else {
                format!(" {}", "(not created, defaults in use)".dimmed())
            };
            println!("{}{note}", path.display());
        }
    }
    Ok(())
}
