//! Interpolation helpers:
//! - scalar lerp and its angular counterpart
//! - bracket lookup for sparse keyframe tracks
//! - gap filling and fractional sampling for dense per-frame series

use crate::angle::{normalize_radians, shortest_diff};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Shortest-arc interpolation of radian values; the result is normalized.
#[inline]
pub fn lerp_radians(a: f64, b: f64, t: f64) -> f64 {
    normalize_radians(a + shortest_diff(b, a) * t)
}

/// Blend factor of `frame` between two keyframe indices.
#[inline]
pub fn blend_factor(left: usize, right: usize, frame: usize) -> f64 {
    if right <= left {
        return 0.0;
    }
    (frame - left) as f64 / (right - left) as f64
}

/// Nearest keyframe at or before `frame` and nearest at or after it.
///
/// `track` yields `(frame, value)`. A keyframe exactly at `frame` is returned on both sides.
pub fn bracket<T, I>(track: I, frame: usize) -> (Option<(usize, T)>, Option<(usize, T)>)
where
    T: Copy,
    I: IntoIterator<Item = (usize, T)>,
{
    let mut left: Option<(usize, T)> = None;
    let mut right: Option<(usize, T)> = None;
    for (idx, value) in track {
        if idx <= frame && left.map_or(true, |(l, _)| idx > l) {
            left = Some((idx, value));
        }
        if idx >= frame && right.map_or(true, |(r, _)| idx < r) {
            right = Some((idx, value));
        }
    }
    (left, right)
}

/// How gaps inside a series are bridged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GapMode {
    Linear,
    Angular,
}

/// Replace every `None` in `values`.
///
/// Leading gaps copy the first known value, trailing gaps hold the last, interior gaps
/// blend between their neighbours. A series with no values at all becomes zeros.
pub fn fill_gaps(values: &[Option<f64>], mode: GapMode) -> Vec<f64> {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    let Some(&(_, first)) = known.first() else {
        return vec![0.0; values.len()];
    };

    let mut out = Vec::with_capacity(values.len());
    let mut next = 0usize;
    let mut prev: Option<(usize, f64)> = None;
    for (i, v) in values.iter().enumerate() {
        if let Some(v) = *v {
            out.push(v);
            prev = Some((i, v));
            next += 1;
            continue;
        }
        let filled = match (prev, known.get(next)) {
            (None, _) => first,
            (Some((_, p)), None) => p,
            (Some((pi, p)), Some(&(ni, n))) => {
                let t = blend_factor(pi, ni, i);
                match mode {
                    GapMode::Linear => lerp_f64(p, n, t),
                    GapMode::Angular => lerp_radians(p, n, t),
                }
            }
        };
        out.push(filled);
    }
    out
}

/// Sample a dense series at a fractional index. The index is clamped to the series and
/// the last entry is returned from its own index onward.
pub fn sample_series(values: &[f64], at: f64, mode: GapMode) -> f64 {
    let Some(&last) = values.last() else {
        return 0.0;
    };
    let max = (values.len() - 1) as f64;
    let at = if at.is_nan() { 0.0 } else { at.clamp(0.0, max) };
    let lo = at.floor() as usize;
    if lo + 1 >= values.len() {
        return last;
    }
    let t = at - lo as f64;
    match mode {
        GapMode::Linear => lerp_f64(values[lo], values[lo + 1], t),
        GapMode::Angular => lerp_radians(values[lo], values[lo + 1], t),
    }
}
