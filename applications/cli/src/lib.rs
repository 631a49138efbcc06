//! Tonearm CLI Library
//!
//! Headless driver for the playback engine (simulated audio, log output)
//! and the sonic profiler.
//!
//! This library exposes the command implementations for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod simulate;

pub use commands::classify::{classify, ClassifyReport, TrackReport};
pub use commands::play::{play, PlayOptions, PlaySummary, StopReason};
pub use commands::{load_tracks, TrackInput};
pub use config::{CliConfig, SimulationSettings};
pub use error::{CliError, Result};
pub use simulate::{LogHistory, SimulatedProvider, SimulatedSource, TracingOutput};
