//! webtasker binary: console frontend for the integration core.
//!
//! Runs either a single command or an interactive shell in which surface
//! bindings stay alive between commands (the CLI analogue of a long-lived
//! editor session). This is the single error-display point: every typed
//! failure is printed once, cancellations terminate silently, and raw
//! detail goes to the tracing channel only.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use webtasker::error::Flow;
use webtasker::{
    CommandOrchestrator, FlowResult, HttpRemote, LocalWorkspace, ProfileStore, ResourceBinder,
    VerifierConfig,
};

#[derive(Parser, Debug)]
#[command(name = "webtasker", version, about = "Edit and run webtask.io functions")]
struct Cli {
    /// Profile config location; a $HOME placeholder is substituted.
    #[arg(long, env = "WEBTASK_CONFIG", default_value = webtasker::profile::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Directory holding opened webtask surfaces.
    #[arg(long, env = "WEBTASK_DIR", default_value = ".")]
    dir: PathBuf,

    /// Verification endpoint URL.
    #[arg(long, env = "WEBTASK_VERIFIER_URL", default_value = webtasker::remote::DEFAULT_VERIFIER_URL)]
    verifier_url: String,

    /// Static bearer credential for the verification endpoint.
    #[arg(long, env = "WEBTASK_VERIFIER_TOKEN", default_value = "", hide_env_values = true)]
    verifier_token: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in to the hosting service and persist the default profile.
    Init,
    /// List remote webtasks and open one for editing.
    Open,
    /// Create a new webtask from the template.
    Create,
    /// Push a surface's code to a remote webtask.
    Update {
        /// Surface file to update from (defaults to the active surface).
        file: Option<String>,
    },
    /// Open a webtask's invocation URL in the browser.
    Run {
        /// Surface file whose webtask to run (defaults to the active surface).
        file: Option<String>,
    },
    /// Interactive shell keeping surface bindings across commands.
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    url::Url::parse(&cli.verifier_url)
        .with_context(|| format!("invalid verifier URL: {}", cli.verifier_url))?;

    let store = match ProfileStore::from_location(&cli.config) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let workspace = Arc::new(LocalWorkspace::new(&cli.dir));
    let remote = Arc::new(HttpRemote::new(VerifierConfig::new(
        &cli.verifier_url,
        &cli.verifier_token,
    )));
    let orchestrator = CommandOrchestrator::new(
        Arc::new(webtasker::ui::ConsoleUi::new()),
        remote,
        workspace.clone(),
        store,
        Arc::new(ResourceBinder::new()),
    );

    match cli.command.unwrap_or(Command::Shell) {
        Command::Init => report_flow(orchestrator.init().await),
        Command::Open => report_flow(orchestrator.open().await),
        Command::Create => report_flow(orchestrator.create().await),
        Command::Update { file } => {
            if let Some(file) = file {
                use webtasker::Workspace as _;
                workspace.focus(&file);
            }
            report_flow(orchestrator.update().await);
        }
        Command::Run { file } => {
            if let Some(file) = file {
                use webtasker::Workspace as _;
                workspace.focus(&file);
            }
            report_flow(orchestrator.run().await.map(Flow::Done));
        }
        Command::Shell => shell(&orchestrator, &workspace).await?,
    }

    Ok(())
}

/// The single display point: typed failures are printed once, cancellation
/// is silent, raw detail goes to the diagnostic channel.
fn report_flow(result: FlowResult<()>) {
    match result {
        Ok(Flow::Done(())) | Ok(Flow::Cancelled) => {}
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{err}");
        }
    }
}

async fn shell(
    orchestrator: &CommandOrchestrator,
    workspace: &Arc<LocalWorkspace>,
) -> anyhow::Result<()> {
    use webtasker::Workspace as _;

    let mut editor = rustyline::DefaultEditor::new()?;
    let history = dirs::home_dir().map(|home| home.join(".webtask").join("history"));
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    println!("webtasker shell — init, open, create, update [FILE], run [FILE], quit");

    loop {
        let line = match editor.readline("webtask> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let arg = parts.next();

        match command {
            "init" => report_flow(orchestrator.init().await),
            "open" => report_flow(orchestrator.open().await),
            "create" => report_flow(orchestrator.create().await),
            "update" => {
                if let Some(file) = arg {
                    workspace.focus(file);
                }
                report_flow(orchestrator.update().await);
            }
            "run" => {
                if let Some(file) = arg {
                    workspace.focus(file);
                }
                report_flow(orchestrator.run().await.map(Flow::Done));
            }
            "quit" | "exit" => break,
            "help" => {
                println!("commands: init, open, create, update [FILE], run [FILE], quit");
            }
            other => println!("unknown command: {other} (try help)"),
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.save_history(path);
    }

    Ok(())
}
