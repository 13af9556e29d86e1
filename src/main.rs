use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use beatsync::{cli, config, error};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Store BeatSaver credentials and log in
    Init(InitOptions),

    /// Log in again and replace the stored session cookie
    Login,

    /// Empty a playlist and refill it from a catalog search
    Sync(SyncArgs),

    /// Remove every song from a playlist
    Drain(DrainArgs),

    /// Sync every playlist listed in jobs.json
    Run,

    /// Run all jobs now and then on a fixed interval
    Schedule(ScheduleOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct InitOptions {
    #[clap(long)]
    username: String,
    #[clap(long)]
    password: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncArgs {
    /// Playlist ID or URL, e.g. 986760 or https://beatsaver.com/playlists/986760
    playlist: String,

    /// Number of search pages to walk (20 maps per page)
    #[clap(long)]
    pages: Option<u32>,

    /// Search text; empty matches everything
    #[clap(long)]
    query: Option<String>,

    #[clap(long)]
    leaderboard: Option<String>,

    #[clap(long)]
    sort_order: Option<String>,

    /// Raw query-string suffix appended to the search URL, e.g. "&vivify=true"
    #[clap(long, allow_hyphen_values = true)]
    args: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DrainArgs {
    /// Playlist ID or URL
    playlist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ScheduleOptions {
    /// Days between runs
    #[clap(long)]
    every_days: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Init(opt) => cli::init(opt.username, opt.password).await,
        Command::Login => cli::login().await,
        Command::Sync(opt) => {
            let options = cli::SyncOptions {
                pages: opt.pages,
                query: opt.query,
                leaderboard: opt.leaderboard,
                sort_order: opt.sort_order,
                args: opt.args,
            };
            cli::sync(opt.playlist, options).await
        }
        Command::Drain(opt) => cli::drain(opt.playlist).await,
        Command::Run => cli::run().await,
        Command::Schedule(opt) => cli::schedule(opt.every_days).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
