use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;
use tracing::debug;

/// Fixed padding added after the last timestamp when estimating total
/// playable length.
const DURATION_PADDING: Duration = Duration::from_secs(5);

/// A single line of lyrics with its display time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    pub time: Duration,
    pub text: String,
}

/// Parsed LRC content: lines sorted by time plus an estimated total duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricSheet {
    pub lines: Vec<LyricLine>,
    /// Last line's time plus [`DURATION_PADDING`], or zero when empty.
    pub duration: Duration,
}

impl LyricSheet {
    /// Parse an LRC string into a sheet.
    ///
    /// Parsing never fails: lines without a valid `[MM:SS.fff]` tag simply
    /// contribute no entries. A line carrying several tags produces one entry
    /// per tag, all sharing the line's cleaned text.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut lines = Vec::new();

        for raw in input.lines() {
            if raw.trim().is_empty() {
                continue;
            }

            let tags = scan_time_tags(raw);
            if tags.is_empty() {
                continue;
            }

            let text = strip_time_tags(raw, &tags);
            for tag in &tags {
                lines.push(LyricLine {
                    time: tag.time,
                    text: text.clone(),
                });
            }
        }

        // Stable sort: equal timestamps keep their encounter order
        lines.sort_by_key(|line| line.time);

        let duration = lines
            .last()
            .map_or(Duration::ZERO, |line| line.time + DURATION_PADDING);

        debug!(lines = lines.len(), ?duration, "parsed LRC input");

        Self { lines, duration }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A matched `[MM:SS.fff]` tag: its byte span within the line and the time
/// it decodes to.
struct TimeTag {
    span: Range<usize>,
    time: Duration,
}

/// Find all non-overlapping timestamp tags in a line, left to right.
fn scan_time_tags(line: &str) -> Vec<TimeTag> {
    let bytes = line.as_bytes();
    let mut tags = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'[' {
            if let Some((len, time)) = match_time_tag(&bytes[i..]) {
                tags.push(TimeTag {
                    span: i..i + len,
                    time,
                });
                i += len;
                continue;
            }
        }
        i += 1;
    }

    tags
}

/// Match `[MM:SS.fff]` at the start of `bytes`: exactly two digits each for
/// minutes and seconds, two or three for the fractional token. Returns the
/// matched byte length and the decoded time, or `None` if the grammar does
/// not match here.
///
/// The fractional token is taken literally as milliseconds regardless of its
/// width, so `[00:01.50]` decodes to 1.050s rather than 1.500s. Minutes and
/// seconds are not range-checked; `[00:75.00]` folds to 75 seconds.
fn match_time_tag(bytes: &[u8]) -> Option<(usize, Duration)> {
    if bytes.first() != Some(&b'[') {
        return None;
    }

    let minutes = two_digits(bytes, 1)?;
    if bytes.get(3) != Some(&b':') {
        return None;
    }
    let seconds = two_digits(bytes, 4)?;
    if bytes.get(6) != Some(&b'.') {
        return None;
    }

    let mut millis = two_digits(bytes, 7)?;
    let mut end = 9;
    if let Some(third) = bytes.get(9).copied().and_then(digit) {
        millis = millis * 10 + third;
        end = 10;
    }

    if bytes.get(end) != Some(&b']') {
        return None;
    }

    let total_ms = minutes * 60_000 + seconds * 1_000 + millis;
    Some((end + 1, Duration::from_millis(total_ms)))
}

fn two_digits(bytes: &[u8], at: usize) -> Option<u64> {
    let tens = digit(*bytes.get(at)?)?;
    let ones = digit(*bytes.get(at + 1)?)?;
    Some(tens * 10 + ones)
}

fn digit(byte: u8) -> Option<u64> {
    match byte {
        b'0'..=b'9' => Some(u64::from(byte - b'0')),
        _ => None,
    }
}

/// Remove every matched tag from the line and trim the remainder. Spans are
/// byte ranges over ASCII tags, so slicing stays on char boundaries.
fn strip_time_tags(line: &str, tags: &[TimeTag]) -> String {
    let mut text = String::with_capacity(line.len());
    let mut cursor = 0;

    for tag in tags {
        text.push_str(&line[cursor..tag.span.start]);
        cursor = tag.span.end;
    }
    text.push_str(&line[cursor..]);

    text.trim().to_string()
}
