//! "What plays next" resolution
//!
//! Pure index arithmetic over a queue length. The random source is injected
//! so shuffle is reproducible under a seeded RNG.

use crate::types::RepeatMode;
use rand::Rng;

/// Queue navigation rules
#[derive(Debug, Default, Clone, Copy)]
pub struct QueueNavigator;

impl QueueNavigator {
    /// Index to play after `current`
    ///
    /// Rules, first match wins:
    /// 1. empty queue: `None`
    /// 2. shuffle: uniform draw over the whole queue (repeats allowed)
    /// 3. repeat one: `current` unchanged
    /// 4. `current + 1` (`None` counts as -1); past the end wraps to 0 under
    ///    repeat all, otherwise `None`
    pub fn next<R: Rng + ?Sized>(
        len: usize,
        current: Option<usize>,
        shuffle: bool,
        repeat: RepeatMode,
        rng: &mut R,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }

        if shuffle {
            return Some(rng.gen_range(0..len));
        }

        if repeat == RepeatMode::One {
            return current.filter(|i| *i < len);
        }

        let candidate = current.map_or(0, |i| i + 1);
        if candidate < len {
            Some(candidate)
        } else if repeat == RepeatMode::All {
            Some(0)
        } else {
            None
        }
    }

    /// Index to play before `current`
    ///
    /// `None` (nothing to do) at the head of the queue or when nothing is
    /// current.
    pub fn previous(current: Option<usize>) -> Option<usize> {
        current.and_then(|i| i.checked_sub(1))
    }
}
