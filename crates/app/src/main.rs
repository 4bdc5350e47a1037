use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use providers::ProviderClient;
use research_host::{generate_research_plan, ResearchEvent, ResearchSession};
use shared::settings::{ApiProvider, OpenRouterModel, ResearchSettings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod output;
mod settings_store;

use output::{format_error_message, plan_section, report_section};
use settings_store::{apply_env_keys, mask_key, SettingsStore};

/// Research Helper: research plans and cited reports from Gemini or OpenRouter
#[derive(Parser, Debug)]
#[command(name = "researcher", version, about, long_about = None)]
struct Cli {
    /// Settings file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a plan, then a cited report for a topic
    Research {
        /// Research topic
        topic: Vec<String>,
    },
    /// Only generate the research plan
    Plan {
        /// Research topic
        topic: Vec<String>,
    },
    /// Manage provider settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List the OpenRouter models that can be selected
    Models,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show the current settings (keys masked)
    Show,
    /// Update and save settings
    Set {
        /// gemini or openrouter
        #[arg(long)]
        provider: Option<ApiProvider>,
        #[arg(long)]
        gemini_key: Option<String>,
        #[arg(long)]
        openrouter_key: Option<String>,
        /// OpenRouter model id (see `researcher models`)
        #[arg(long)]
        model: Option<OpenRouterModel>,
        /// Attach Google Search grounding to Gemini report requests
        #[arg(long, conflicts_with = "no_grounding")]
        grounding: bool,
        #[arg(long)]
        no_grounding: bool,
    },
    /// Delete the saved settings
    Reset,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(store: &SettingsStore) -> Result<ResearchSettings> {
    let (mut settings, from_disk) = store.load_or_default()?;
    if !from_disk {
        tracing::debug!("no settings at {}, using defaults", store.path().display());
    }
    apply_env_keys(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn require_configured(settings: &ResearchSettings) -> Result<()> {
    if let Err(e) = settings.validate() {
        bail!(
            "{} Run `researcher config set --provider {}` with a key, or set {}.",
            e,
            settings.provider.as_str(),
            match settings.provider {
                ApiProvider::Gemini => settings_store::GEMINI_KEY_ENV,
                ApiProvider::OpenRouter => settings_store::OPENROUTER_KEY_ENV,
            }
        );
    }
    Ok(())
}

async fn run_research(settings: &ResearchSettings, topic: &str) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let session = ResearchSession::from_config(&settings.provider_config()).with_events(tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ResearchEvent::Planning => eprintln!("Generating research plan..."),
                ResearchEvent::PlanReady(plan) => println!("{}", plan_section(&plan)),
                ResearchEvent::Researching => eprintln!("Researching and writing report..."),
                ResearchEvent::Completed(result) => println!("{}", report_section(&result)),
                ResearchEvent::Failed(_) => {}
            }
        }
    });

    let outcome = session.submit(topic).await;
    drop(session);
    let _ = printer.await;

    match outcome {
        Ok(_) => Ok(()),
        Err(e) => bail!(format_error_message(&e.run_message())),
    }
}

async fn run_plan(settings: &ResearchSettings, topic: &str) -> Result<()> {
    if topic.trim().is_empty() {
        bail!("Please enter a research topic.");
    }
    let client = ProviderClient::from_config(&settings.provider_config());
    match generate_research_plan(topic, &client).await {
        Ok(plan) => {
            println!("{}", plan_section(&plan));
            Ok(())
        }
        Err(e) => bail!(format_error_message(&e.to_string())),
    }
}

fn run_config(store: &SettingsStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let (settings, from_disk) = store.load_or_default()?;
            println!("settings file:    {}", store.path().display());
            if !from_disk {
                println!("                  (not saved yet)");
            }
            println!(
                "provider:         {}{}",
                settings.provider,
                if settings.is_configured() {
                    ""
                } else {
                    " (API key missing)"
                }
            );
            println!("gemini key:       {}", mask_key(&settings.gemini_key));
            println!("gemini grounding: {}", settings.gemini_grounding);
            println!("openrouter key:   {}", mask_key(&settings.openrouter_key));
            println!("openrouter model: {}", settings.openrouter_model);
            Ok(())
        }
        ConfigAction::Set {
            provider,
            gemini_key,
            openrouter_key,
            model,
            grounding,
            no_grounding,
        } => {
            let (mut settings, _) = store.load_or_default()?;
            if let Some(provider) = provider {
                settings.provider = provider;
            }
            if let Some(key) = gemini_key {
                settings.gemini_key = key;
            }
            if let Some(key) = openrouter_key {
                settings.openrouter_key = key;
            }
            if let Some(model) = model {
                settings.openrouter_model = model;
            }
            if grounding {
                settings.gemini_grounding = true;
            }
            if no_grounding {
                settings.gemini_grounding = false;
            }
            settings.validate()?;
            store.save(&settings)?;
            println!("Saved settings to {}", store.path().display());
            Ok(())
        }
        ConfigAction::Reset => {
            if store.reset()? {
                println!("Removed {}", store.path().display());
            } else {
                println!("No saved settings at {}", store.path().display());
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = SettingsStore::open(cli.config)?;

    match cli.command {
        Commands::Research { topic } => {
            let settings = load_settings(&store)?;
            require_configured(&settings)?;
            run_research(&settings, &topic.join(" ")).await
        }
        Commands::Plan { topic } => {
            let settings = load_settings(&store)?;
            require_configured(&settings)?;
            run_plan(&settings, &topic.join(" ")).await
        }
        Commands::Config { action } => run_config(&store, action),
        Commands::Models => {
            let default = OpenRouterModel::default();
            for model in OpenRouterModel::all() {
                if *model == default {
                    println!("{} (default)", model);
                } else {
                    println!("{}", model);
                }
            }
            Ok(())
        }
    }
}
