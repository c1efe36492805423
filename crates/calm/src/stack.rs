//! Stack snapshots for diagnostic info.
//!
//! A snapshot is a header line naming the thread, followed by the frames of a
//! [`Backtrace`] rendered the way std renders them: one numbered symbol line per
//! frame, followed by zero or more indented `at file:line:col` locator lines.
//!
//! The frames belonging to the capture machinery (std's own backtrace frames
//! and [`capture`]) plus a caller-chosen number of further frames are spliced
//! out, so that the first visible frame is the code the caller is interested
//! in. If the machinery frame cannot be found, or too few frames remain, the
//! snapshot is kept untrimmed.
//!
//! Snapshots taken from the panic hook ([`fault_site`]) additionally hide std's
//! panic machinery, so that they start at the frame that panicked.
//!
//! std only offers a backtrace of the current thread, so snapshots cover the
//! capturing thread rather than every thread of the process.

use std::backtrace::Backtrace;

use crate::config;

/// Sentinel line that [`crate::Outcome::add_info`] replaces with a snapshot.
pub const STACK_SENTINEL: &str = "debug.stack";

/// Symbol of [`capture`] as it appears in a rendered backtrace.
const CAPTURE_SYMBOL: &str = concat!(module_path!(), "::capture");

/// Symbol of [`fault_site`] as it appears in a rendered backtrace.
const FAULT_SITE_SYMBOL: &str = concat!(module_path!(), "::fault_site");

/// Frame std places directly above the panic entry points; std's own short
/// backtraces start right after it.
const SHORT_BACKTRACE_END: &str = "__rust_end_short_backtrace";

/// Panic entry points that may sit between [`SHORT_BACKTRACE_END`] and the
/// panicking frame.
const PANIC_ENTRY: [&str; 4] = [
    "rust_begin_unwind",
    "core::panicking::",
    "std::panicking::begin_panic",
    "std::panic::panic_any",
];

/// Captures a snapshot of the current thread's stack.
///
/// `skip` frames directly above `capture` are hidden in addition to the
/// capture machinery, e.g. `skip = 1` makes the first visible frame the
/// caller of whoever called `capture`.
#[inline(never)]
pub fn capture(skip: usize) -> String {
    let rendered = Backtrace::force_capture().to_string();
    let trimmed = trim(&rendered, CAPTURE_SYMBOL, skip);
    finish(trimmed.unwrap_or(rendered))
}

/// Captures a snapshot from inside a panic hook, starting at the frame that
/// panicked.
///
/// Falls back to hiding `skip` frames above `fault_site` when std's panic
/// frames cannot be recognised.
#[inline(never)]
pub(crate) fn fault_site(skip: usize) -> String {
    let rendered = Backtrace::force_capture().to_string();
    let trimmed =
        trim_panic(&rendered).or_else(|| trim(&rendered, FAULT_SITE_SYMBOL, skip));
    finish(trimmed.unwrap_or(rendered))
}

/// Prefixes the header and applies the configured size limit.
fn finish(frames: String) -> String {
    let mut snapshot = header();
    snapshot.push('\n');
    snapshot.push_str(&frames);
    truncate_at_line(&mut snapshot, config::settings().buffer_size);
    snapshot
}

/// Header line naming the capturing thread, e.g. `thread 'main' (ThreadId(1)):`.
fn header() -> String {
    let current = std::thread::current();
    format!(
        "thread '{}' ({:?}):",
        current.name().unwrap_or("<unnamed>"),
        current.id()
    )
}

/// Returns `true` for a numbered symbol line such as `  12: core::ops::…`.
fn is_frame_start(line: &str) -> bool {
    let trimmed = line.trim_start();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && trimmed[digits..].starts_with(':')
}

/// Splices out every frame up to and including the last one whose symbol
/// contains `marker`, plus `skip` further frames.
///
/// Lines before the first frame are kept. Returns `None` when `marker` is not
/// found or when nothing would remain after the splice.
fn trim(rendered: &str, marker: &str, skip: usize) -> Option<String> {
    let lines: Vec<&str> = rendered.lines().collect();
    let starts = frame_starts(&lines);

    let machinery = starts.iter().rposition(|&i| lines[i].contains(marker))?;
    splice(&lines, &starts, machinery + 1 + skip)
}

/// Splices out every frame up to std's short-backtrace marker above
/// [`fault_site`], plus the panic entry frames directly after it.
///
/// Returns `None` when either marker is missing or nothing would remain.
fn trim_panic(rendered: &str) -> Option<String> {
    let lines: Vec<&str> = rendered.lines().collect();
    let starts = frame_starts(&lines);

    let hook = starts
        .iter()
        .rposition(|&i| lines[i].contains(FAULT_SITE_SYMBOL))?;
    let short_end = hook
        + starts[hook..]
            .iter()
            .position(|&i| lines[i].contains(SHORT_BACKTRACE_END))?;
    let entry = starts[short_end + 1..]
        .iter()
        .take_while(|&&i| PANIC_ENTRY.iter().any(|symbol| lines[i].contains(symbol)))
        .count();
    splice(&lines, &starts, short_end + 1 + entry)
}

/// Indices of the numbered symbol lines.
fn frame_starts(lines: &[&str]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_frame_start(line))
        .map(|(i, _)| i)
        .collect()
}

/// Joins the lines before the first frame with every line from frame
/// `first_visible` on.
fn splice(lines: &[&str], starts: &[usize], first_visible: usize) -> Option<String> {
    let keep_from = *starts.get(first_visible)?;
    let preamble = &lines[..starts[0]];
    let kept = preamble
        .iter()
        .chain(&lines[keep_from..])
        .copied()
        .collect::<Vec<_>>()
        .join("\n");
    Some(kept)
}

/// Shortens `snapshot` to at most `limit` bytes, cutting after the last whole
/// line that fits (or at a char boundary if not even one line fits).
fn truncate_at_line(snapshot: &mut String, limit: usize) {
    if snapshot.len() <= limit {
        return;
    }
    let mut end = limit;
    while !snapshot.is_char_boundary(end) {
        end -= 1;
    }
    if let Some(newline) = snapshot[..end].rfind('\n') {
        end = newline;
    }
    snapshot.truncate(end);
}
