/// Returns `true` if the equity path ever reaches zero or below.
///
/// A path that touches zero is insolvent even if the recurrence would carry it back above
/// zero later, so the whole path is scanned rather than just its final value.
pub fn detect_bust(equity_path: &[f64]) -> bool {
    equity_path.iter().any(|&value| value <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_non_positive_values() {
        assert!(detect_bust(&[1.0, 0.5, -0.1]));
        assert!(detect_bust(&[1.0, 0.0, 0.3]));
        assert!(!detect_bust(&[1.0, 1.2, 0.8]));
        assert!(!detect_bust(&[]));
    }
}
