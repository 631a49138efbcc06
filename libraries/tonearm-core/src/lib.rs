//! Tonearm Core
//!
//! Platform-agnostic domain types shared by the Tonearm libraries.
//!
//! The core crate defines:
//! - **Identifiers**: `TrackId`
//! - **Tracks**: immutable `Track` values supplied by the library/API layer
//! - **Audio features**: `AudioFeatures`, the optional analysis attributes a
//!   track may carry (energy, valence, danceability, bpm)
//!
//! # Example
//!
//! ```rust
//! use tonearm_core::{AudioFeatures, Track};
//!
//! let track = Track::new("t1", "Hyperballad", "Björk", "Post", 321.0)
//!     .with_features(AudioFeatures {
//!         energy: Some(0.62),
//!         valence: Some(0.41),
//!         danceability: Some(0.55),
//!         bpm: Some(120.0),
//!     });
//!
//! assert_eq!(track.id.as_str(), "t1");
//! assert!(track.features.is_usable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod types;

pub use types::{AudioFeatures, Track, TrackId};
