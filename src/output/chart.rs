//! Inline bar column for tables, a stand-in for a plotted series.

const BAR_CHAR: char = '▇';

/// Render a bar proportional to `value / max`, at most `width` characters.
/// Nonzero values always get at least one block.
pub(super) fn render_bar(value: f64, max: f64, width: usize) -> String {
    if width == 0 || max <= 0.0 || value <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let ratio = (value / max).clamp(0.0, 1.0);
    let len = ((ratio * width as f64).round() as usize).clamp(1, width);
    BAR_CHAR.to_string().repeat(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_half_bars() {
        assert_eq!(render_bar(10.0, 10.0, 20).chars().count(), 20);
        assert_eq!(render_bar(5.0, 10.0, 20).chars().count(), 10);
    }

    #[test]
    fn small_nonzero_gets_one_block() {
        assert_eq!(render_bar(0.01, 100.0, 20).chars().count(), 1);
    }

    #[test]
    fn zero_and_degenerate_inputs_are_empty() {
        assert_eq!(render_bar(0.0, 10.0, 20), "");
        assert_eq!(render_bar(5.0, 0.0, 20), "");
        assert_eq!(render_bar(f64::NAN, 10.0, 20), "");
        assert_eq!(render_bar(5.0, 10.0, 0), "");
    }

    #[test]
    fn value_above_max_is_clamped() {
        assert_eq!(render_bar(50.0, 10.0, 20).chars().count(), 20);
    }
}
