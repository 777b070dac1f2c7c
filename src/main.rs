use clap::{ArgAction, Parser, Subcommand};
use memeify::caption::Captions;
use memeify::config::{self, MemeifyConfig};
use memeify::imaging::Filter;
use memeify::output;
use memeify::script;
use memeify::shell::{Event, MemeRequest, Shell, Step};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "memeify")]
#[command(about = "Caption an image, fry it, and save the meme")]
#[command(long_about = "\
Caption an image, fry it, and save the meme

Loads one image, applies top/bottom captions in outlined bold type (sized
automatically to fit the image width), optionally runs one of the filters,
and writes the result as a PNG to your pictures directory:

  ~/Pictures/memeify-YYYY-MM-DD-HH-MM-SS.png

Filters: deep fry, liquid rescale, implode, explode, swirl, invert,
rotational blur. Run 'memeify filters' for the menu.

Run 'memeify gen-config' to generate a documented memeify.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults to ./memeify.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load an image, memeify it, and export it in one go
    Make(MakeArgs),
    /// Read events from stdin, one per line (load, memeify, export, close)
    Session,
    /// List the filter menu
    Filters,
    /// Print a stock memeify.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct MakeArgs {
    /// Image to start from
    input: PathBuf,

    /// Filter to apply after captioning
    #[arg(long, short)]
    filter: Option<Filter>,

    /// Top caption
    #[arg(long, default_value = "")]
    top: String,

    /// Bottom caption
    #[arg(long, default_value = "")]
    bottom: String,

    /// Run the memeify step this many times, each pass on the previous result
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    passes: u32,

    /// Write the result here instead of the pictures directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Make(args) => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(dir) = args.output_dir.clone() {
                config.export.directory = Some(dir);
            }
            let mut shell = Shell::from_config(&config)?;
            run_make(&mut shell, args)?;
        }
        Command::Session => {
            let config = load_config(cli.config.as_deref())?;
            let mut shell = Shell::from_config(&config)?;
            output::print_session_banner(&config.ui.theme, &shell.output_dir());

            let stdin = std::io::stdin();
            let events = stdin
                .lock()
                .lines()
                .map_while(Result::ok)
                .enumerate()
                .filter_map(|(index, line)| match script::parse_line(&line) {
                    Ok(event) => event,
                    Err(e) => {
                        output::print_script_error(index + 1, &e);
                        None
                    }
                });

            shell.run(events, |outcome| match outcome {
                Ok(update) => output::print_update(update),
                Err(e) => output::print_error(e),
            })?;
        }
        Command::Filters => {
            output::print_filter_menu();
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_make(shell: &mut Shell, args: MakeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let request = MemeRequest {
        filter: args.filter,
        captions: Captions::new(args.top, args.bottom),
    };

    let mut events = vec![Event::Load(args.input)];
    events.extend((0..args.passes).map(|_| Event::Memeify(request.clone())));
    events.push(Event::Export);

    for event in events {
        if let Step::Updated(update) = shell.handle(event)? {
            output::print_update(&update);
        }
    }
    Ok(())
}

/// `--config` must exist; otherwise `./memeify.toml` is optional.
fn load_config(explicit: Option<&Path>) -> Result<MemeifyConfig, config::ConfigError> {
    let config = match explicit {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(Path::new("."))?,
    };
    info!(theme = %config.ui.theme, "configuration loaded");
    Ok(config)
}

/// Logs go to stderr so stdout stays clean for results.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
