//! Tonearm - Sonic Profiling
//!
//! Descriptive tags from already-extracted audio features:
//! - [`SonicProfileClassifier`]: rule-based profile labels per track, and an
//!   album-level consensus over them
//! - [`classify_mood`]: one primary mood from energy, valence and tempo
//! - [`estimate_key`]: musical key from a mean chroma vector
//!
//! Feature extraction itself (RMS, onset strength, chroma) happens elsewhere.
//!
//! # Example
//!
//! ```rust
//! use tonearm_core::AudioFeatures;
//! use tonearm_profile::SonicProfileClassifier;
//!
//! let classifier = SonicProfileClassifier::new();
//! let labels = classifier
//!     .classify(&AudioFeatures {
//!         energy: Some(0.85),
//!         valence: Some(0.5),
//!         danceability: Some(0.2),
//!         bpm: Some(100.0),
//!     })
//!     .unwrap();
//!
//! assert!(labels.contains("High Energy"));
//! assert!(!labels.contains("Chill"));
//! ```

mod catalog;
mod classifier;
mod error;
mod key;
mod mood;

pub use catalog::{Bound, SonicProfile, CATALOG};
pub use classifier::{LabelSet, SonicProfileClassifier};
pub use error::{ProfileError, Result};
pub use key::{estimate_key, Mode, MusicalKey, MAJOR_PROFILE, MINOR_PROFILE, PITCH_CLASSES};
pub use mood::{classify_mood, Mood};
