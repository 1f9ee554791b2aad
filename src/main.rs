//! PortalMouse - Proportional cursor remapping across monitors
//!
//! Moves the cursor between screens of different size and density so that it
//! lands at the physically matching point on the neighbouring screen.

mod config;
mod input;
mod redirect;
mod screen;

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use input::mock::{MockMouseHook, RecordingCursor};
use input::{HookSession, MouseMoveEvent, Verdict};
use redirect::PointerRedirector;
use screen::{Point, ScreenLayout};

/// PortalMouse - Proportional cursor remapping across monitors
#[derive(Parser)]
#[command(name = "portalmouse")]
#[command(author = "PortalMouse Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Remap the cursor across mismatched monitor edges")]
#[command(long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the mouse hook and redirect until Ctrl+C
    Run,

    /// Validate the configuration and print the layout
    Check,

    /// Show current configuration
    Config {
        /// Generate sample configuration
        #[arg(long)]
        generate: bool,

        /// Output path for generated config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Evaluate a single movement between two raw positions
    Map {
        /// Previous raw position, as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        from: Point,

        /// New raw position, as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        to: Point,
    },

    /// Feed recorded movements (JSON lines of {"x":..,"y":..}) through the redirector
    Replay {
        /// File with one event per line
        file: PathBuf,
    },

    /// Show system information
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default()?
    };

    // Initialize logging
    let level = if cli.verbose || config.general.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(level),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run => {
            run(config).await?;
        }
        Commands::Check => {
            let layout = config.build_layout()?;
            print_layout(&layout);
            println!("\nConfiguration OK");
        }
        Commands::Config { generate, output } => {
            if generate {
                let sample = config::generate_sample_config()?;
                if let Some(path) = output {
                    std::fs::write(&path, &sample)?;
                    println!("Configuration written to: {}", path.display());
                } else {
                    println!("{}", sample);
                }
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Commands::Map { from, to } => {
            let redirector = PointerRedirector::new(config.build_layout()?);
            match redirector.evaluate(from, to) {
                Some(target) => println!("{} -> {}: move cursor to {}", from, to, target),
                None => println!("{} -> {}: pass through", from, to),
            }
        }
        Commands::Replay { file } => {
            replay(config, &file)?;
        }
        Commands::Info => {
            print_system_info();
        }
    }

    Ok(())
}

/// Redirect live cursor movement until interrupted
async fn run(config: Config) -> anyhow::Result<()> {
    let layout = config.build_layout()?;
    let every = config.general.status_interval;
    let redirector = Arc::new(PointerRedirector::new(layout).with_status_interval(every));

    tracing::info!(
        "Starting redirection on {} with {} portals",
        input::platform_name(),
        redirector.layout().boundary_count()
    );

    let hook = input::platform_hook();
    let cursor = input::platform_cursor();
    let mut session = HookSession::start(hook, cursor, redirector)
        .context("could not start the mouse hook")?;

    println!("PortalMouse running. Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;
    println!("\nShutting down...");

    session.stop()?;
    let state = session.redirector().snapshot();
    tracing::info!(
        "Stopped after {} events ({} redirected, {} blocked)",
        state.events,
        state.redirects,
        state.vetoes
    );

    Ok(())
}

/// Replay recorded raw movements through an in-process hook
fn replay(config: Config, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("cannot open {}", path.display()))?;
    let redirector = Arc::new(PointerRedirector::new(config.build_layout()?));
    let hook = MockMouseHook::new();
    let cursor = RecordingCursor::new();
    let mock = Box::new(hook.clone());
    let mut session = HookSession::start(mock, Arc::new(cursor), redirector)?;

    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event: MouseMoveEvent = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid event", path.display(), number + 1))?;
        let pos = event.position();

        match hook.inject(pos) {
            Some(Verdict::Consume(target)) => {
                println!("{} -> moved to {}", pos, target);
                // the OS reports the forced move back through the hook
                hook.inject(target);
            }
            _ => println!("{} -> pass", pos),
        }
    }

    session.stop()?;
    let state = session.redirector().snapshot();
    println!(
        "\n{} events, {} redirected, {} blocked",
        state.events, state.redirects, state.vetoes
    );

    Ok(())
}

/// Print the validated layout
fn print_layout(layout: &ScreenLayout) {
    let bound = |b: Option<i32>| b.map_or_else(|| "..".to_string(), |v| v.to_string());

    let (native_min, native_max) = layout.scale().native_range();
    println!(
        "Scale: x{} outside raw X {}..={}",
        layout.scale().factor(),
        native_min,
        native_max
    );

    println!("\nScreens:");
    for screen in layout.screens() {
        println!(
            "  {:<10} X {} ..= {}",
            screen.name,
            bound(screen.x_min),
            bound(screen.x_max)
        );
    }

    println!("\nPortals:");
    for index in 0..layout.boundary_count() {
        if let (Some(portal), Some((left_max, right_min))) =
            (layout.portal(index), layout.boundary_edges(index))
        {
            let (left_min_y, left_max_y) = portal.left_range();
            let (right_min_y, right_max_y) = portal.right_range();
            println!(
                "  X {} | {}: Y {}..={} <-> Y {}..={}",
                left_max, right_min, left_min_y, left_max_y, right_min_y, right_max_y
            );
        }
    }
}

/// Print system information
fn print_system_info() {
    println!("PortalMouse System Information");
    println!("==============================\n");

    println!("Platform: {}", input::platform_name());

    #[cfg(target_os = "windows")]
    {
        println!("\nWindows Requirements:");
        println!("  - Uses a WH_MOUSE_LL hook; no elevation needed for desktop apps");
        println!("  - Run elevated to redirect over elevated windows");
    }

    #[cfg(not(target_os = "windows"))]
    {
        println!("\nLive redirection is only available on Windows.");
        println!("Use `map` and `replay` to evaluate layouts offline.");
    }
}

/// Parse a raw position given as `X,Y`
fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad X: {}", e))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y: {}", e))?;
    Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["portalmouse", "info"]);
        assert!(cli.is_ok());

        let cli = Cli::try_parse_from([
            "portalmouse",
            "map",
            "--from",
            "-5,2000",
            "--to",
            "10,2000",
        ])
        .unwrap();
        match cli.command {
            Commands::Map { from, to } => {
                assert_eq!(from, Point::new(-5, 2000));
                assert_eq!(to, Point::new(10, 2000));
            }
            _ => panic!("Expected map command"),
        }
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point(" 3 , -4"), Ok(Point::new(3, -4)));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,4").is_err());
    }

    #[test]
    fn test_replay_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# seed").unwrap();
        writeln!(file, r#"{{"x": -5, "y": 2000}}"#).unwrap();
        writeln!(file, r#"{{"x": 10, "y": 2000}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"x": 20, "y": 2010}}"#).unwrap();

        replay(Config::default(), file.path()).unwrap();
    }

    #[test]
    fn test_replay_rejects_bad_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(replay(Config::default(), file.path()).is_err());
    }
}
