/// Tonearm - headless playback and profiling
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tonearm_cli::{commands, CliConfig, PlayOptions};
use tonearm_playback::RepeatMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tonearm")]
#[command(about = "Dual-deck playback engine and sonic profiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a track list on simulated audio
    Play {
        /// JSON array of tracks
        queue: PathBuf,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Crossfade between tracks instead of cutting
        #[arg(long)]
        crossfade: bool,
        /// Pick the next track at random
        #[arg(long)]
        shuffle: bool,
        /// Repeat mode
        #[arg(long, value_enum)]
        repeat: Option<Repeat>,
        /// Simulated seconds per second of wall-clock time
        #[arg(long, env = "TONEARM_TIME_SCALE")]
        time_scale: Option<f64>,
        /// Stop after this many tracks have played through
        #[arg(long)]
        max_tracks: Option<usize>,
        /// Shuffle seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print profile labels, mood and key for a track list
    Classify {
        /// JSON array of tracks with optional features and chroma
        tracks: PathBuf,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Repeat {
    Off,
    All,
    One,
}

impl From<Repeat> for RepeatMode {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Off => RepeatMode::Off,
            Repeat::All => RepeatMode::All,
            Repeat::One => RepeatMode::One,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tonearm=info,tonearm_cli=info,tonearm_playback=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            queue,
            config,
            crossfade,
            shuffle,
            repeat,
            time_scale,
            max_tracks,
            seed,
        } => {
            let mut config = CliConfig::load(config.as_deref())?;
            if let Some(scale) = time_scale {
                config.simulation.time_scale = scale;
            }
            config.validate()?;

            let options = PlayOptions {
                crossfade,
                shuffle,
                repeat: repeat.map(RepeatMode::from),
                max_tracks,
                seed,
            };
            play(&queue, &config, options).await?;
        }
        Commands::Classify { tracks, pretty } => {
            classify(&tracks, pretty)?;
        }
    }

    Ok(())
}

async fn play(queue: &Path, config: &CliConfig, options: PlayOptions) -> anyhow::Result<()> {
    let tracks = commands::load_tracks(queue)?
        .into_iter()
        .map(|input| input.track)
        .collect();

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, stopping playback");
            ctrl_c.cancel();
        }
    });

    let summary = commands::play::play(tracks, config, options, shutdown).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn classify(path: &Path, pretty: bool) -> anyhow::Result<()> {
    let inputs = commands::load_tracks(path)?;
    let report = commands::classify::classify(&inputs);

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
