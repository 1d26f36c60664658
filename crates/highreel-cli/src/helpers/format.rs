// crates/highreel-cli/src/helpers/format.rs
//
// Terminal string utilities that don't belong in highreel-core.
//
// Time formatting lives in highreel_core::helpers::time; use that for
// anything involving seconds. This module only shapes strings for the
// terminal (column fitting, the text highlight bar).

use highreel_core::helpers::geometry::SegmentGeometry;

/// Truncates `text` to at most `max_chars` characters, ending in "…" when
/// anything was cut.
pub fn fit_label(text: &str, max_chars: usize) -> String {
    const ELLIPSIS: &str = "…";
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    // Reserve one slot for the ellipsis character itself.
    let keep = max_chars - 1;
    text.chars().take(keep).collect::<String>() + ELLIPSIS
}

/// Draw the highlight bar as `width` characters: `-` for plain timeline,
/// `#` under a highlight, `|` at the playhead.
///
/// Markers overflowing the end are cut at the bar edge here; the geometry
/// itself stays unclamped.
pub fn render_bar(geometry: &[SegmentGeometry], progress_pct: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut cells = vec!['-'; width];
    let cell_of = |pct: f64| ((pct / 100.0) * width as f64).floor().max(0.0) as usize;

    for g in geometry {
        let from = cell_of(g.left_pct).min(width);
        // Every visible highlight gets at least one cell.
        let to = cell_of(g.left_pct + g.width_pct).max(from + 1).min(width);
        for cell in &mut cells[from..to] {
            *cell = '#';
        }
    }

    let head = cell_of(progress_pct).min(width - 1);
    cells[head] = '|';
    cells.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_unchanged() {
        assert_eq!(fit_label("Goal", 10), "Goal");
    }

    #[test]
    fn zero_budget_returns_empty() {
        assert_eq!(fit_label("Goal", 0), "");
    }

    #[test]
    fn truncated_text_has_ellipsis() {
        assert_eq!(fit_label("Highlight 12", 6), "Highl…");
    }

    #[test]
    fn bar_marks_highlights_and_playhead() {
        let g = [SegmentGeometry { left_pct: 50.0, width_pct: 20.0 }];
        assert_eq!(render_bar(&g, 0.0, 10), "|----##---");
    }

    #[test]
    fn tiny_highlight_still_visible() {
        let g = [SegmentGeometry { left_pct: 31.0, width_pct: 0.5 }];
        assert_eq!(render_bar(&g, 90.0, 10), "---#-----|");
    }

    #[test]
    fn overflowing_highlight_stops_at_edge() {
        let g = [SegmentGeometry { left_pct: 80.0, width_pct: 70.0 }];
        assert_eq!(render_bar(&g, 100.0, 10), "--------#|");
    }
}
