use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use recentfeat::{
    cli,
    config::{self, Config},
    error, spotify, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth(AuthOptions),

    /// Save audio features of recently played tracks
    Fetch(FetchOptions),

    /// Show the cached token
    Status,

    /// Remove the cached token
    Logout,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Discard the cached token and log in again
    #[clap(long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FetchOptions {
    /// File the audio features are written to
    #[clap(long, short, default_value = "features.json")]
    pub output: PathBuf,

    /// Number of recently played tracks to look at (1-50)
    #[clap(long, default_value_t = spotify::tracks::MAX_RECENTLY_PLAYED)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        warning!("No .env file loaded, using process environment. ({})", e);
    }

    // Cache inspection works without client credentials.
    match &cli.command {
        Command::Status => return cli::status(&config::token_path_from_env()).await,
        Command::Logout => return cli::logout(&config::token_path_from_env()).await,
        _ => {}
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    match cli.command {
        Command::Auth(opt) => cli::auth(&config, opt.force).await,
        Command::Fetch(opt) => cli::fetch(&config, &opt.output, opt.limit).await,
        Command::Status | Command::Logout | Command::Completions(_) => {}
    }
}
