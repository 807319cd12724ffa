//! Navigation policy
//!
//! Computes the next/previous queue index from the queue length, current
//! index, play mode and shuffle history. Everything here is pure: the only
//! input beyond the context is the random source used by shuffle, and
//! nothing is mutated. Callers commit [`NextPick::history`] when they act on
//! a pick.

use crate::types::PlayMode;
use rand::seq::SliceRandom;
use rand::Rng;

/// Recently visited queue indices (oldest first)
///
/// Only consulted in shuffle mode. After every recorded pick the history
/// holds at most `floor(queue_len / 2)` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleHistory {
    indices: Vec<usize>,
}

impl ShuffleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History seeded with the current index
    pub fn starting_at(current: Option<usize>) -> Self {
        Self {
            indices: current.into_iter().collect(),
        }
    }

    /// Replace the contents with just `current`
    pub fn reset_to(&mut self, current: Option<usize>) {
        self.indices.clear();
        self.indices.extend(current);
    }

    /// Append a pick and drop the oldest entries beyond `queue_len / 2`
    pub fn record(&mut self, index: usize, queue_len: usize) {
        self.indices.push(index);
        let cap = queue_len / 2;
        if self.indices.len() > cap {
            let excess = self.indices.len() - cap;
            self.indices.drain(..excess);
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// First position of `index` in the history
    pub fn position(&self, index: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == index)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

/// Read-only view of the state navigation depends on
#[derive(Debug, Clone, Copy)]
pub struct NavigationContext<'a> {
    pub queue_len: usize,
    pub current_index: Option<usize>,
    pub mode: PlayMode,
    pub shuffle_history: &'a ShuffleHistory,
}

impl NavigationContext<'_> {
    /// Current index if it points into the queue
    fn current(&self) -> Option<usize> {
        self.current_index.filter(|&i| i < self.queue_len)
    }
}

/// Result of a forward navigation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPick {
    /// Queue index to play
    pub index: usize,

    /// Shuffle history to commit if the pick is acted on
    pub history: ShuffleHistory,
}

/// Index to play after the current one
///
/// - Linear: `current + 1`, none at the end (no wrap)
/// - Repeat-one: the current index
/// - Shuffle: uniform among indices not in history; when every index has
///   been visited, history restarts at the current index and the pick is
///   uniform over the whole queue
///
/// Empty queues and tracks outside the queue yield none.
pub fn next_index<R: Rng + ?Sized>(ctx: &NavigationContext<'_>, rng: &mut R) -> Option<NextPick> {
    let current = ctx.current()?;
    let history = ctx.shuffle_history.clone();

    match ctx.mode {
        PlayMode::Linear => {
            let index = current + 1;
            (index < ctx.queue_len).then_some(NextPick { index, history })
        }
        PlayMode::RepeatOne => Some(NextPick {
            index: current,
            history,
        }),
        PlayMode::Shuffle => Some(shuffle_pick(ctx.queue_len, current, history, rng)),
    }
}

fn shuffle_pick<R: Rng + ?Sized>(
    queue_len: usize,
    current: usize,
    mut history: ShuffleHistory,
    rng: &mut R,
) -> NextPick {
    let available: Vec<usize> = (0..queue_len).filter(|&i| !history.contains(i)).collect();

    let index = if let Some(&index) = available.choose(rng) {
        index
    } else {
        // Every index visited recently: start over from the current one
        history.reset_to(Some(current));
        rng.gen_range(0..queue_len)
    };

    history.record(index, queue_len);
    NextPick { index, history }
}

/// Index to play before the current one
///
/// - Linear: `current - 1`, none at index 0
/// - Repeat-one: the current index
/// - Shuffle: the entry preceding the current index in history, or the
///   current index when it is at (or absent from) the start of history
pub fn previous_index(ctx: &NavigationContext<'_>) -> Option<usize> {
    let current = ctx.current()?;

    match ctx.mode {
        PlayMode::Linear => current.checked_sub(1),
        PlayMode::RepeatOne => Some(current),
        PlayMode::Shuffle => match ctx.shuffle_history.position(current) {
            Some(pos) if pos > 0 => Some(ctx.shuffle_history.as_slice()[pos - 1]),
            _ => Some(current),
        },
    }
}

/// Whether [`next_index`] would yield a track
///
/// Consumes no randomness and never touches history.
pub fn has_next(ctx: &NavigationContext<'_>) -> bool {
    match (ctx.current(), ctx.mode) {
        (None, _) => false,
        (Some(current), PlayMode::Linear) => current + 1 < ctx.queue_len,
        (Some(_), PlayMode::RepeatOne | PlayMode::Shuffle) => true,
    }
}

/// Whether [`previous_index`] would yield a track
pub fn has_previous(ctx: &NavigationContext<'_>) -> bool {
    previous_index(ctx).is_some()
}
