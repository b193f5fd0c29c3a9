//! carfetch — entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use carfetch::{DecodePolicy, FetchMethod, Outcome, RenderTarget};
use carfetch_cli::config::Settings;

#[derive(Parser)]
#[command(
    name = "carfetch",
    about = "Fetch mtcars.json, keep cars above 25 MPG, and render them as an HTML table",
    version
)]
struct Cli {
    /// Base URL that mtcars.json is resolved against.
    /// Also reads from CARFETCH_BASE_URL env var.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// How malformed records are handled (strict, skip, lenient).
    #[arg(long, global = true, default_value = "strict")]
    policy: DecodePolicy,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch once and print the rendered output (default).
    Fetch {
        /// Orchestrator to use (callback, promise, async).
        #[arg(short, long, default_value = "async")]
        method: FetchMethod,
    },

    /// Launch interactive REPL mode.
    Repl,

    /// Serve mtcars.json over HTTP.
    #[cfg(feature = "serve")]
    Serve {
        /// Listen address (host:port).
        #[arg(long, default_value = carfetch_cli::config::DEFAULT_ADDR)]
        addr: String,

        /// JSON file to serve instead of the bundled dataset.
        #[arg(long)]
        data: Option<std::path::PathBuf>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   carfetch completions bash > ~/.local/share/bash-completion/completions/carfetch
    ///   carfetch completions zsh > ~/.zfunc/_carfetch
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::resolve(cli.base_url.as_deref(), cli.policy);

    match cli.command.unwrap_or(Commands::Fetch {
        method: FetchMethod::AsyncAwait,
    }) {
        Commands::Fetch { method } => {
            let target = RenderTarget::new();
            let pipeline = settings.pipeline(target.clone());
            let outcome = pipeline.run(method).await;
            println!("{}", target.contents());
            if let Outcome::Failed { .. } = outcome {
                std::process::exit(1);
            }
        }

        Commands::Repl => {
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || carfetch_cli::repl::run(settings, runtime))
                .await??;
        }

        #[cfg(feature = "serve")]
        Commands::Serve { addr, data } => {
            let dataset = carfetch_cli::config::load_dataset(data.as_deref())?;
            carfetch_cli::serve::run(&addr, dataset).await?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "carfetch", &mut std::io::stdout());
        }
    }

    Ok(())
}
