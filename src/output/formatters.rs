//! Formatting utilities for terminal output

use crate::core::Code;

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Bucket sizes with repeats collapsed, e.g. `256×3 208 114`
#[must_use]
pub fn format_sizes(sizes: &[usize]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut iter = sizes.iter().peekable();
    while let Some(&size) = iter.next() {
        let mut run = 1;
        while iter.next_if_eq(&&size).is_some() {
            run += 1;
        }
        parts.push(if run > 1 {
            format!("{size}×{run}")
        } else {
            size.to_string()
        });
    }
    parts.join(" ")
}

/// Codes separated by spaces
#[must_use]
pub fn format_codes(codes: &[Code]) -> String {
    codes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numeric value followed by the color form, e.g. `51 [3210]`
#[must_use]
pub fn code_label(code: Code) -> String {
    format!("{} {code}", code.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_empty() {
        let bar = create_progress_bar(0.0, 100.0, 10);
        assert_eq!(bar, "░░░░░░░░░░");
    }

    #[test]
    fn progress_bar_full() {
        let bar = create_progress_bar(100.0, 100.0, 10);
        assert_eq!(bar, "██████████");
    }

    #[test]
    fn progress_bar_half() {
        let bar = create_progress_bar(50.0, 100.0, 10);
        assert_eq!(bar, "█████░░░░░");
    }

    #[test]
    fn progress_bar_zero_max() {
        assert_eq!(create_progress_bar(3.0, 0.0, 4), "░░░░");
    }

    #[test]
    fn sizes_collapse_runs() {
        let sizes = [256, 256, 256, 208, 114, 96, 36, 32, 20, 16, 4, 1, 1];
        assert_eq!(format_sizes(&sizes), "256×3 208 114 96 36 32 20 16 4 1×2");
        assert_eq!(format_sizes(&[]), "");
    }

    #[test]
    fn code_forms() {
        let a = Code::new(51).unwrap();
        let b = Code::new(0).unwrap();
        assert_eq!(code_label(a), "51 [3210]");
        assert_eq!(format_codes(&[b, a]), "[0000] [3210]");
    }
}
