use std::fmt;
use std::time::Duration;
use regex::Regex;
use once_cell::sync::Lazy;
use crate::errors::SubtitleError;

// @module: SRT parsing into raw subtitle entries

// @const: SRT timing line, `HH:MM:SS,mmm --> HH:MM:SS,mmm` with optional trailing position data
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})\s*-->\s*(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})(?:\s.*)?$")
        .expect("timestamp pattern is valid")
});

// @struct: Single subtitle entry as read from the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start offset
    pub start: Duration,

    // @field: End offset
    pub end: Duration,

    // @field: Subtitle text, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start: Duration, end: Duration, text: impl Into<String>) -> Self {
        SubtitleEntry {
            seq_num,
            start,
            end,
            text: text.into(),
        }
    }

    /// Format a duration in SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;
        let millis = duration.subsec_millis();

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    // None when the clock value does not fit a Duration
    fn duration_from_parts(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<Duration> {
        let secs = hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)?;
        Duration::from_secs(secs).checked_add(Duration::from_millis(millis))
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", Self::format_timestamp(self.start), Self::format_timestamp(self.end))?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Lazy SRT parser.
///
/// Owns the source text and yields one entry per `next()` call. Timing values
/// are taken as written: entries are neither sorted, renumbered nor checked for
/// `start <= end`. The first malformed block yields an error, after which the
/// parser is exhausted.
#[derive(Debug)]
pub struct SrtParser {
    content: String,
    pos: usize,
    line_no: usize,
    failed: bool,
}

impl SrtParser {
    /// Create a parser over `content`; a leading byte-order mark is skipped
    pub fn new(content: String) -> Self {
        let pos = if content.starts_with('\u{feff}') { '\u{feff}'.len_utf8() } else { 0 };
        SrtParser {
            content,
            pos,
            line_no: 0,
            failed: false,
        }
    }

    /// Create a parser from raw file bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SubtitleError> {
        Ok(Self::new(String::from_utf8(bytes)?))
    }

    // Returns the next line without its terminator, or None at end of input
    fn next_line(&mut self) -> Option<(usize, &str)> {
        if self.pos >= self.content.len() {
            return None;
        }
        let rest = &self.content[self.pos..];
        let (line, consumed) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        self.line_no += 1;
        Some((self.line_no, line.strip_suffix('\r').unwrap_or(line)))
    }

    fn parse_block(&mut self) -> Option<Result<SubtitleEntry, SubtitleError>> {
        // Skip separators until the index line of the next block
        let (index_line_no, index_line) = loop {
            let (line_no, line) = self.next_line()?;
            if !line.trim().is_empty() {
                break (line_no, line.trim().to_string());
            }
        };

        let seq_num = match index_line.parse::<usize>() {
            Ok(num) => num,
            Err(_) => {
                return Some(Err(SubtitleError::InvalidIndex {
                    line: index_line_no,
                    found: index_line,
                }));
            }
        };

        let Some((timing_line_no, timing_line)) = self.next_line() else {
            return Some(Err(SubtitleError::UnexpectedEof { line: index_line_no }));
        };
        let (start, end) = match Self::parse_timing_line(timing_line) {
            Some(times) => times,
            None => {
                return Some(Err(SubtitleError::InvalidTimestamp {
                    line: timing_line_no,
                    found: timing_line.to_string(),
                }));
            }
        };

        let mut text = String::new();
        let mut first = true;
        while let Some((_, line)) = self.next_line() {
            if line.trim().is_empty() {
                break;
            }
            if !first {
                text.push('\n');
            }
            text.push_str(line);
            first = false;
        }

        Some(Ok(SubtitleEntry::new(seq_num, start, end, text)))
    }

    fn parse_timing_line(line: &str) -> Option<(Duration, Duration)> {
        let caps = TIMESTAMP_REGEX.captures(line)?;
        let field = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u64>().ok());

        let start = SubtitleEntry::duration_from_parts(field(1)?, field(2)?, field(3)?, field(4)?)?;
        let end = SubtitleEntry::duration_from_parts(field(5)?, field(6)?, field(7)?, field(8)?)?;
        Some((start, end))
    }
}

impl Iterator for SrtParser {
    type Item = Result<SubtitleEntry, SubtitleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.parse_block();
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }
}

impl std::iter::FusedIterator for SrtParser {}
