use crate::error::RollingError;
use core_types::Window;

/// Produces every contiguous window of `window_size` periods over `observations` observations.
///
/// Windows are `[start, start + window_size]` for `start` in `0..observations - window_size`,
/// in ascending start order. When `window_size >= observations` the result is empty; callers
/// decide whether that is an error.
pub fn identify_windows(
    observations: usize,
    window_size: usize,
) -> Result<Vec<Window>, RollingError> {
    if window_size == 0 {
        return Err(RollingError::ZeroWindowSize);
    }

    Ok((0..observations.saturating_sub(window_size))
        .map(|start| Window::new(start, start + window_size))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(windows: &[Window]) -> Vec<(usize, usize)> {
        windows.iter().map(|w| (w.start, w.end)).collect()
    }

    #[test]
    fn enumerates_four_observations() {
        assert_eq!(
            pairs(&identify_windows(4, 1).unwrap()),
            vec![(0, 1), (1, 2), (2, 3)]
        );
        assert_eq!(pairs(&identify_windows(4, 2).unwrap()), vec![(0, 2), (1, 3)]);
        assert_eq!(pairs(&identify_windows(4, 3).unwrap()), vec![(0, 3)]);
    }

    #[test]
    fn oversized_window_yields_nothing() {
        assert!(identify_windows(4, 4).unwrap().is_empty());
        assert!(identify_windows(4, 10).unwrap().is_empty());
        assert!(identify_windows(0, 1).unwrap().is_empty());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            identify_windows(4, 0),
            Err(RollingError::ZeroWindowSize)
        ));
    }
}
