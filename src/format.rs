use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::history::UsageSample;
use crate::system::snapshot::{ProcessInfo, is_high_usage};

const NAME_WIDTH: usize = 28;

/// One decimal place, the precision the table shows for percentages.
pub fn format_percent(value: f32) -> String {
    format!("{value:.1}")
}

pub fn table_header() -> String {
    format!(
        "{:>8}  {:<width$} {:<12} {:>8} {:>8}",
        "PID",
        "NAME",
        "STATUS",
        "CPU%",
        "MEM%",
        width = NAME_WIDTH
    )
}

/// One table row; high-usage rows are prefixed with `!` so they stand
/// out without a display layer.
pub fn format_row(info: &ProcessInfo) -> String {
    let marker = if is_high_usage(info) { '!' } else { ' ' };
    let name = pad_display_width(&truncate_display_width(&info.name, NAME_WIDTH), NAME_WIDTH);
    format!(
        "{marker}{:>7}  {name} {:<12} {:>8} {:>8}",
        info.pid,
        info.status,
        format_percent(info.cpu_percent),
        format_percent(info.memory_percent),
    )
}

pub fn format_sample(sample: &UsageSample) -> String {
    format!(
        "CPU {}% | Mem {}% | Disk {}%",
        format_percent(sample.cpu_percent),
        format_percent(sample.memory_percent),
        format_percent(sample.disk_percent),
    )
}

/// Truncate to at most `max_width` display columns, not chars; process
/// names can carry wide glyphs that would otherwise shift every column
/// after the name cell.
fn truncate_display_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

fn pad_display_width(s: &str, width: usize) -> String {
    let mut result = s.to_string();
    for _ in s.width()..width {
        result.push(' ');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, cpu: f32, mem: f32) -> ProcessInfo {
        ProcessInfo {
            pid: 9,
            name: name.to_string(),
            status: "running".to_string(),
            cpu_percent: cpu,
            memory_percent: mem,
        }
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(0.0), "0.0");
        assert_eq!(format_percent(12.34), "12.3");
        assert_eq!(format_percent(100.0), "100.0");
    }

    #[test]
    fn high_usage_rows_are_marked() {
        assert!(format_row(&row("miner", 93.0, 2.0)).starts_with('!'));
        assert!(format_row(&row("editor", 1.0, 2.0)).starts_with(' '));
    }

    #[test]
    fn long_names_are_truncated_with_ellipsis() {
        let name = "a".repeat(40);
        let truncated = truncate_display_width(&name, 28);
        assert_eq!(truncated.width(), 28);
        assert!(truncated.ends_with('\u{2026}'));
    }

    #[test]
    fn truncation_counts_display_columns_not_chars() {
        // 40 wide CJK glyphs: 40 chars but 80 display columns.
        let name = "\u{6F22}".repeat(40);
        let truncated = truncate_display_width(&name, 28);
        assert!(truncated.width() <= 28);
        assert!(truncated.ends_with('\u{2026}'));
    }

    #[test]
    fn rows_align_with_header_for_wide_glyph_names() {
        let header_width = table_header().width();
        for name in ["init", &"a".repeat(40), &"\u{6F22}".repeat(40), "日本語サーバ"] {
            let rendered = format_row(&row(name, 1.0, 2.0));
            assert_eq!(
                rendered.width(),
                header_width,
                "row for {name:?} misaligns with header"
            );
        }
    }

    #[test]
    fn short_names_are_padded_to_the_cell_width() {
        assert_eq!(pad_display_width("ab", 5), "ab   ");
        // Two wide glyphs already occupy four columns.
        assert_eq!(pad_display_width("\u{6F22}\u{6F22}", 5), "\u{6F22}\u{6F22} ");
    }

    #[test]
    fn sample_line_shows_all_three_metrics() {
        let sample = UsageSample {
            cpu_percent: 10.0,
            memory_percent: 20.5,
            disk_percent: 30.0,
        };
        assert_eq!(format_sample(&sample), "CPU 10.0% | Mem 20.5% | Disk 30.0%");
    }
}
