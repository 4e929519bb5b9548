//! Line windows for oversized blocks.

use crate::config::ChunkingOptions;

/// 1-indexed inclusive line windows covering `start..=end`
///
/// Blocks up to [`ChunkingOptions::split_threshold`] lines stay whole. Larger
/// blocks become `chunk_size`-line windows that share `chunk_overlap` lines
/// with their predecessor; the last window ends exactly at `end`.
#[must_use]
pub fn line_windows(start: usize, end: usize, options: &ChunkingOptions) -> Vec<(usize, usize)> {
    let end = end.max(start);
    let line_count = end - start + 1;
    if line_count <= options.split_threshold() || options.chunk_size == 0 {
        return vec![(start, end)];
    }

    let step = options.window_step();
    let mut windows = Vec::new();
    let mut window_start = start;
    loop {
        let window_end = (window_start + options.chunk_size - 1).min(end);
        windows.push((window_start, window_end));
        if window_end == end {
            break;
        }
        window_start += step;
    }
    windows
}

/// Lines `start..=end` (1-indexed) joined with `\n`
#[must_use]
pub fn slice_lines(lines: &[&str], start: usize, end: usize) -> String {
    let from = start.saturating_sub(1).min(lines.len());
    let to = end.min(lines.len()).max(from);
    lines[from..to].join("\n")
}

/// Maximal runs of lines not marked in `covered`, with blank lines trimmed
/// from both ends; runs holding only whitespace are dropped
#[must_use]
pub fn uncovered_runs(lines: &[&str], covered: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        if covered.get(index).copied().unwrap_or(false) {
            index += 1;
            continue;
        }

        let run_start = index;
        while index < lines.len() && !covered.get(index).copied().unwrap_or(false) {
            index += 1;
        }

        let run = &lines[run_start..index];
        let first = run.iter().position(|line| !line.trim().is_empty());
        let last = run.iter().rposition(|line| !line.trim().is_empty());
        if let (Some(first), Some(last)) = (first, last) {
            runs.push((run_start + first + 1, run_start + last + 1));
        }
    }

    runs
}
