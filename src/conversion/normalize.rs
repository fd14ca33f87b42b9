/*!
 * Display normalization of subtitle entries.
 *
 * Timing is truncated to whole seconds and text loses its leading whitespace.
 * Both rules are pure; nothing else about an entry changes, including a start
 * that lies after its end.
 */

use std::time::Duration;

use crate::errors::SubtitleError;
use crate::subtitle_processor::SubtitleEntry;

/// Subtitle entry ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    /// Sequence number, as in the source
    pub seq_num: usize,
    /// Start offset, whole seconds
    pub start: Duration,
    /// End offset, whole seconds
    pub end: Duration,
    /// Text without leading whitespace
    pub text: String,
}

/// Drop the sub-second remainder of a duration (toward zero)
pub fn truncate_to_seconds(duration: Duration) -> Duration {
    Duration::from_secs(duration.as_secs())
}

/// Remove leading whitespace only
pub fn trim_leading(text: &str) -> &str {
    text.trim_start()
}

/// Normalize one raw entry
pub fn normalize_entry(entry: SubtitleEntry) -> NormalizedEntry {
    NormalizedEntry {
        seq_num: entry.seq_num,
        start: truncate_to_seconds(entry.start),
        end: truncate_to_seconds(entry.end),
        text: trim_leading(&entry.text).to_string(),
    }
}

/// Lazy, single-pass normalizing adapter over a parser.
///
/// Yields exactly one item per item pulled from the inner iterator, in the same
/// order; errors pass through untouched. Once consumed it cannot be rewound:
/// reading the entries again means parsing the source again.
#[derive(Debug)]
pub struct Normalized<I> {
    inner: I,
}

impl<I> Iterator for Normalized<I>
where
    I: Iterator<Item = Result<SubtitleEntry, SubtitleError>>,
{
    type Item = Result<NormalizedEntry, SubtitleError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|item| item.map(normalize_entry))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Wrap a raw entry sequence in the normalizing adapter
pub fn normalize<I>(entries: I) -> Normalized<I::IntoIter>
where
    I: IntoIterator<Item = Result<SubtitleEntry, SubtitleError>>,
{
    Normalized {
        inner: entries.into_iter(),
    }
}
