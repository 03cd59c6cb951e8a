use serde::{Deserialize, Serialize};

use super::track_store::{TrackKey, TrackStore};

/// How a track shorter than one clip is extended on both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingStrategy {
    /// Repeat the track's interior (every index but the two endpoints):
    /// reversed after the track, forward before it.
    #[default]
    Interior,
    /// Repeat a full reflection of the track so the padded sequence
    /// bounces between both ends.
    Reflect,
}

impl std::str::FromStr for PaddingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interior" => Ok(Self::Interior),
            "reflect" => Ok(Self::Reflect),
            other => Err(format!("unknown padding strategy '{other}'")),
        }
    }
}

impl std::fmt::Display for PaddingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaddingStrategy::Interior => write!(f, "interior"),
            PaddingStrategy::Reflect => write!(f, "reflect"),
        }
    }
}

/// A fixed-length window of crops from a single track.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clip {
    pub track_id: usize,
    pub keys: Vec<TrackKey>,
}

/// Slices tracks into overlapping clips of `clip_size` crops, stride 1.
#[derive(Clone, Debug)]
pub struct ClipWindower {
    clip_size: usize,
    padding: PaddingStrategy,
}

impl ClipWindower {
    /// `clip_size` must be at least 1; the config layer rejects zero.
    pub fn new(clip_size: usize, padding: PaddingStrategy) -> Self {
        Self {
            clip_size: clip_size.max(1),
            padding,
        }
    }

    pub fn clip_size(&self) -> usize {
        self.clip_size
    }

    /// Index sequence for a track of length `n`, padded to at least one clip.
    ///
    /// Tracks of `clip_size` or more are returned as `0..n`. Shorter tracks
    /// get `clip_size - 1` indices prepended and appended, so the result
    /// has length `n + 2 * (clip_size - 1)`.
    pub fn padded_indices(&self, n: usize) -> Vec<usize> {
        let inner: Vec<usize> = (0..n).collect();
        if n == 0 || n >= self.clip_size {
            return inner;
        }

        let pad = self.clip_size - 1;
        let (pre_cycle, post_cycle) = match self.padding {
            PaddingStrategy::Interior => interior_cycles(&inner),
            PaddingStrategy::Reflect => reflect_cycles(&inner),
        };

        let mut padded = Vec::with_capacity(n + 2 * pad);
        padded.extend(tail_of_cycle(&pre_cycle, pad));
        padded.extend_from_slice(&inner);
        padded.extend(post_cycle.iter().cycle().take(pad));
        padded
    }

    /// Index windows for a track of length `n`.
    pub fn windows(&self, n: usize) -> Vec<Vec<usize>> {
        self.padded_indices(n)
            .windows(self.clip_size)
            .map(<[usize]>::to_vec)
            .collect()
    }

    /// Clips for one track whose surviving crops sit at `positions`.
    ///
    /// Windows run over `positions`, so a skipped crop shortens the track
    /// instead of leaving a hole in a clip.
    pub fn clips_for_track(&self, track_id: usize, positions: &[usize]) -> Vec<Clip> {
        self.windows(positions.len())
            .into_iter()
            .map(|window| Clip {
                track_id,
                keys: window
                    .into_iter()
                    .map(|i| TrackKey::new(track_id, positions[i]))
                    .collect(),
            })
            .collect()
    }

    /// All clips for every track in `store`, in track order then window start.
    pub fn clips(&self, store: &TrackStore) -> Vec<Clip> {
        store
            .track_ids()
            .into_iter()
            .flat_map(|track_id| self.clips_for_track(track_id, &store.positions(track_id)))
            .collect()
    }
}

/// `(pre, post)` cycles built from the interior of `inner`.
///
/// With no interior (`n <= 2`) the endpoints repeat instead.
fn interior_cycles(inner: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let n = inner.len();
    if n <= 2 {
        return (vec![inner[0]], vec![inner[n - 1]]);
    }
    let interior = &inner[1..n - 1];
    let reversed: Vec<usize> = interior.iter().rev().copied().collect();
    (interior.to_vec(), reversed)
}

fn reflect_cycles(inner: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let n = inner.len();
    let reversed: Vec<usize> = if n > 2 {
        inner[1..n - 1].iter().rev().copied().collect()
    } else {
        Vec::new()
    };
    let pre = inner.iter().chain(reversed.iter()).copied().collect();
    let post = reversed.iter().chain(inner.iter()).copied().collect();
    (pre, post)
}

/// Last `len` elements of `cycle` repeated enough times to cover `len`.
fn tail_of_cycle(cycle: &[usize], len: usize) -> Vec<usize> {
    let repeated = cycle.repeat(len / cycle.len() + 1);
    repeated[repeated.len() - len..].to_vec()
}
