use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use scribe_notes::document::{empty_document, next_recording_number};
use scribe_notes::{
    ai, create_router, replay, AppState, Config, Document, FileStore, HttpTokenSource,
    ScriptedStream, StaticTokenSource, TokenSource, Tool, ToolOutcome, TranscriptController,
};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "scribe-notes")]
#[command(about = "Notes with live transcription and AI tools")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/scribe-notes")]
    config: String,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,

    /// Replay a recorded transcription session into a note
    Replay {
        /// JSON-lines replay script
        script: PathBuf,

        /// Note to insert into; without it the result is printed only
        #[arg(short, long)]
        file: Option<String>,

        /// Fetch the session token from `scribe.token_url` instead of a fixed one
        #[arg(long)]
        live_token: bool,
    },

    /// Print the recording number the next commit would use
    NextRecording {
        /// Note to scan; without it the number for an empty note is printed
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Fetch a transcription token from `scribe.token_url`
    Token,

    /// Run an AI tool over a note
    Tool {
        #[arg(value_enum)]
        tool: Tool,

        #[arg(short, long)]
        file: String,
    },

    /// Create an empty note
    New { title: String },

    /// List notes
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let cfg = Config::load(&args.config)?;

    match args.command {
        Command::Serve => serve(&cfg).await,
        Command::Replay {
            script,
            file,
            live_token,
        } => replay_script(&cfg, script, file, live_token).await,
        Command::NextRecording { file } => {
            let number = match file {
                Some(id) => {
                    let store = FileStore::open(cfg.files_path()?)?;
                    let note = store
                        .get(&id)
                        .ok_or_else(|| anyhow!("Note {} not found", id))?;
                    next_recording_number(&note.content)
                }
                None => next_recording_number(&empty_document()),
            };
            println!("{}", number);
            Ok(())
        }
        Command::Token => {
            let token = HttpTokenSource::new(cfg.scribe.token_url.clone())
                .fetch_token()
                .await
                .with_context(|| format!("Token request to {} failed", cfg.scribe.token_url))?;
            println!("{}", token);
            Ok(())
        }
        Command::Tool { tool, file } => run_tool(&cfg, tool, &file).await,
        Command::New { title } => {
            let mut store = FileStore::open(cfg.files_path()?)?;
            let note = store.create(&title)?;
            println!("{}", note.id);
            Ok(())
        }
        Command::List => {
            let store = FileStore::open(cfg.files_path()?)?;
            for note in store.list() {
                let flowchart = if note.flowchart.is_some() { " [flowchart]" } else { "" };
                println!("{}  {}{}", note.id, note.file_name, flowchart);
            }
            Ok(())
        }
    }
}

async fn serve(cfg: &Config) -> Result<()> {
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let app = create_router(AppState::from_config(cfg));

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn replay_script(
    cfg: &Config,
    script: PathBuf,
    file: Option<String>,
    live_token: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(&script)
        .with_context(|| format!("Failed to read {}", script.display()))?;
    let steps = replay::parse_script(&raw)?;

    let mut store = match &file {
        Some(_) => Some(FileStore::open(cfg.files_path()?)?),
        None => None,
    };

    let content = match (&store, &file) {
        (Some(store), Some(id)) => store
            .get(id)
            .ok_or_else(|| anyhow!("Note {} not found", id))?
            .content
            .clone(),
        _ => empty_document(),
    };

    let tokens: Box<dyn TokenSource> = if live_token {
        Box::new(HttpTokenSource::new(cfg.scribe.token_url.clone()))
    } else {
        Box::new(StaticTokenSource(Some("replay".to_string())))
    };

    let mut controller = TranscriptController::new(
        ScriptedStream::new(),
        Document::new(content),
        tokens,
        cfg.session_settings(),
    );

    info!("Replaying {} steps from {}", steps.len(), script.display());
    let summary = replay::run(&mut controller, steps).await?;
    let (_, document) = controller.into_parts();

    match (&mut store, &file) {
        (Some(store), Some(id)) => {
            store.save_content(id, document.into_blocks())?;
            info!("Saved note {}", id);
        }
        _ => println!("{}", serde_json::to_string_pretty(&document.into_blocks())?),
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run_tool(cfg: &Config, tool: Tool, file: &str) -> Result<()> {
    let models = AppState::from_config(cfg)
        .models
        .ok_or_else(|| anyhow!("GEMINI_API_KEY is not set"))?;

    let mut store = FileStore::open(cfg.files_path()?)?;
    let mut note = store
        .get(file)
        .cloned()
        .ok_or_else(|| anyhow!("Note {} not found", file))?;

    match ai::run_tool(tool, &mut note, &models).await {
        Ok(ToolOutcome::Actions(actions)) => {
            if actions.is_empty() {
                println!("No actions found in document.");
            }
            for action in actions {
                println!("{}", serde_json::to_string(&action)?);
            }
        }
        Ok(outcome) => {
            store.put(note)?;
            match outcome {
                ToolOutcome::Rewritten { blocks } => println!("Note rewritten ({} blocks)", blocks),
                _ => println!("Flowchart created"),
            }
        }
        Err(ai::ToolError::FlowchartExists) => println!("Flowchart already exists"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
