//! Progress bar rendering.
//!
//! `render` is pure; the reporters in `todo-client` decide where the text
//! goes and how lines are overwritten.

/// Number of cells in the bar.
pub const BAR_WIDTH: usize = 30;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Render `[bar] completed/total (percent%)`.
///
/// Both the filled width and the percentage use `f64::round`, which rounds
/// halves away from zero. `completed` is clamped to `total`; a zero `total`
/// renders as complete.
pub fn render(completed: usize, total: usize) -> String {
    let completed = completed.min(total);
    let ratio = if total == 0 {
        1.0
    } else {
        completed as f64 / total as f64
    };
    let filled = ((BAR_WIDTH as f64) * ratio).round() as usize;
    let percent = (100.0 * ratio).round() as usize;

    let mut bar = String::with_capacity(BAR_WIDTH * FILLED.len_utf8() + 24);
    bar.push('[');
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(BAR_WIDTH - filled));
    bar.push_str(&format!("] {}/{} ({}%)", completed, total, percent));
    bar
}
