//! Pivot scanner.
//!
//! A pivot is confirmed `right` bars after it forms: the candidate at
//! `index - right` must be a strict extremum over `[index - left - right, index]`.
//! Once confirmed it never changes, because every bar in the window is final.

use crate::domain::Direction;
use crate::series::Series;

/// Position of the pivot candidate for the newest bar `index`, if the window fits.
pub fn candidate(index: usize, left: usize, right: usize) -> Option<usize> {
    let span = left.checked_add(right)?;
    if index < span {
        return None;
    }
    Some(index - right)
}

/// True iff the value `right` bars before `index` is strictly below every
/// other value in the window.
pub fn is_pivot_low<S: Series + ?Sized>(
    series: &S,
    index: usize,
    left: usize,
    right: usize,
) -> bool {
    is_strict_extremum(series, index, left, right, |candidate, other| candidate < other)
}

/// True iff the value `right` bars before `index` is strictly above every
/// other value in the window.
pub fn is_pivot_high<S: Series + ?Sized>(
    series: &S,
    index: usize,
    left: usize,
    right: usize,
) -> bool {
    is_strict_extremum(series, index, left, right, |candidate, other| candidate > other)
}

/// Pivot check for the extremum kind a divergence direction is built from.
pub fn is_pivot<S: Series + ?Sized>(
    series: &S,
    direction: Direction,
    index: usize,
    left: usize,
    right: usize,
) -> bool {
    match direction {
        Direction::Bullish => is_pivot_low(series, index, left, right),
        Direction::Bearish => is_pivot_high(series, index, left, right),
    }
}

fn is_strict_extremum<S, F>(series: &S, index: usize, left: usize, right: usize, beats: F) -> bool
where
    S: Series + ?Sized,
    F: Fn(f64, f64) -> bool,
{
    if index >= series.len() {
        return false;
    }
    let Some(p) = candidate(index, left, right) else {
        return false;
    };
    let value = match series.get(p) {
        Some(v) if !v.is_nan() => v,
        _ => return false,
    };

    (p - left..=index).filter(|&i| i != p).all(|i| match series.get(i) {
        // NaN compares false, so a NaN neighbour also rejects the candidate.
        Some(other) => beats(value, other),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_needs_full_window() {
        assert_eq!(candidate(1, 1, 1), None);
        assert_eq!(candidate(2, 1, 1), Some(1));
        assert_eq!(candidate(10, 5, 5), Some(5));
        assert_eq!(candidate(9, 5, 5), None);
    }

    #[test]
    fn oversized_window_never_overflows() {
        assert_eq!(candidate(usize::MAX, usize::MAX, 1), None);
        assert_eq!(candidate(2, 1, usize::MAX), None);
        let s = vec![3.0, 1.0, 3.0];
        assert!(!is_pivot_low(&s, 2, usize::MAX, 1));
        assert!(!is_pivot_high(&s, 2, 1, usize::MAX));
    }

    #[test]
    fn detects_simple_low() {
        let s = vec![30.0, 25.0, 20.0, 28.0, 35.0];
        // index 3, right 1 → candidate 2 over [1, 3]
        assert!(is_pivot_low(&s, 3, 1, 1));
        assert!(!is_pivot_high(&s, 3, 1, 1));
        // candidate 1 (25) is not below 20
        assert!(!is_pivot_low(&s, 2, 1, 1));
    }

    #[test]
    fn detects_simple_high() {
        let s = vec![1.0, 3.0, 9.0, 4.0, 2.0, 1.0];
        assert!(is_pivot_high(&s, 4, 2, 2));
        assert!(is_pivot(&s, Direction::Bearish, 4, 2, 2));
        assert!(!is_pivot(&s, Direction::Bullish, 4, 2, 2));
    }

    #[test]
    fn plateau_is_not_a_pivot() {
        let s = vec![5.0, 3.0, 3.0, 5.0];
        assert!(!is_pivot_low(&s, 2, 1, 1));
        assert!(!is_pivot_low(&s, 3, 1, 1));
    }

    #[test]
    fn nan_in_window_rejects() {
        let s = vec![f64::NAN, 25.0, 20.0, 28.0];
        assert!(!is_pivot_low(&s, 3, 2, 1));
        let s = vec![30.0, 25.0, 20.0, f64::NAN];
        assert!(!is_pivot_low(&s, 3, 1, 1));
        let s = vec![30.0, f64::NAN, 40.0];
        assert!(!is_pivot_low(&s, 2, 1, 1));
        assert!(!is_pivot_high(&s, 2, 1, 1));
    }

    #[test]
    fn index_past_end_is_not_a_pivot() {
        let s = vec![3.0, 1.0, 3.0];
        assert!(is_pivot_low(&s, 2, 1, 1));
        assert!(!is_pivot_low(&s, 3, 1, 1));
    }

    #[test]
    fn asymmetric_window() {
        // left 3, right 1: candidate at 3 must beat 0..=2 and 4
        let s = vec![10.0, 8.0, 9.0, 7.0, 7.5];
        assert!(is_pivot_low(&s, 4, 3, 1));
        let s = vec![6.0, 8.0, 9.0, 7.0, 7.5];
        assert!(!is_pivot_low(&s, 4, 3, 1));
    }
}
