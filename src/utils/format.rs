use unicode_width::UnicodeWidthStr;

/// Format a countdown in whole minutes as "Xh Ym" or "Ym"
pub fn format_minutes(minutes: i64) -> String {
    if minutes <= 0 {
        return "now".to_string();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// 50000 → "Rp 50.000"
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Right-pad by display width, so labels with diacritics line up.
pub fn pad(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_format() {
        assert_eq!(format_minutes(0), "now");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(140), "2h 20m");
    }

    #[test]
    fn rupiah_groups_thousands() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(500), "Rp 500");
        assert_eq!(format_rupiah(50_000), "Rp 50.000");
        assert_eq!(format_rupiah(1_250_000), "Rp 1.250.000");
    }

    #[test]
    fn progress_bar_caps_at_total() {
        assert_eq!(progress_bar(10, 5, 4), "████");
        assert_eq!(progress_bar(0, 0, 3), "░░░");
        assert_eq!(progress_bar(1, 2, 4), "██░░");
    }

    #[test]
    fn pad_uses_display_width() {
        assert_eq!(pad("Isya'", 7), "Isya'  ");
        assert_eq!(pad("Maghrib (Iftar)", 4), "Maghrib (Iftar)");
    }
}
