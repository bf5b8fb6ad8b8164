use std::sync::Arc;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use titled::{
    cli,
    config::{self, Config},
    error,
    logging::{self, LogFormat},
    service::TitledService,
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
    /// More log output (-v debug, -vv trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(long, value_enum, default_value = "pretty", env = "TITLED_LOG_FORMAT", global = true)]
    log_format: LogFormat,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[clap(about = "Run the web front end")]
    Serve(ServeOptions),

    #[clap(about = "Create a sample playlist for an album")]
    Generate(GenerateOptions),

    #[clap(about = "List users who signed in")]
    Users,

    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Open the front end in the default browser
    #[clap(long)]
    open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// Album link, `spotify:album:` URI or album ID
    album: String,

    /// Spotify user ID of a signed-in user
    #[clap(long)]
    user: String,

    /// Resolve samples again even if the album is cached
    #[clap(long)]
    no_cache: bool,

    /// Open the playlist in the default browser
    #[clap(long)]
    open: bool,
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

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    logging::init(cli.verbose, cli.log_format);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    let service = match TitledService::new(config) {
        Ok(service) => Arc::new(service),
        Err(e) => error!("Cannot start Titled. Err: {}", e),
    };

    match cli.command {
        Command::Serve(opt) => cli::serve(service, opt.open).await,
        Command::Generate(opt) => {
            cli::generate(&service, &opt.album, &opt.user, opt.no_cache, opt.open).await
        }
        Command::Users => cli::users(&service).await,
        Command::Completions(_) => {}
    }
}
