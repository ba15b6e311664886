//! Fixed tuning values shared by the clock, the ladder and the input map.

/// Seek distance for the arrow keys, in seconds.
pub const SEEK_STEP_SHORT: f64 = 5.0;

/// Seek distance for `j` / `l`, in seconds.
pub const SEEK_STEP_LONG: f64 = 10.0;

/// Allowed playback rates, strictly increasing.
pub const RATE_LADDER: [f64; 12] = [0.2, 0.4, 0.6, 0.8, 1.0, 1.2, 1.4, 1.6, 1.8, 2.0, 3.0, 5.0];

/// Two rates closer than this are considered the same ladder entry.
pub const RATE_TOLERANCE: f64 = 0.001;

/// Rate a fresh controller starts at.
pub const DEFAULT_RATE: f64 = 1.0;
