use std::fmt;
use std::path::Path;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::CaptionError;

// @module: Caption documents and their WebVTT/SRT codecs

// @const: SRT timing line
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2}):(\d{2}):(\d{2}),(\d{3})")
        .expect("SRT timestamp regex is valid")
});

// @const: WebVTT timestamp, hours optional
static VTT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})$").expect("WebVTT timestamp regex is valid")
});

/// Supported caption file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionFormat {
    WebVtt,
    Srt,
}

impl CaptionFormat {
    /// Pick the format from a file extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CaptionError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "vtt" => Ok(Self::WebVtt),
            "srt" => Ok(Self::Srt),
            _ => Err(CaptionError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

// @struct: Single timed caption entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Cue identifier, empty when the source had none
    pub identifier: String,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Cue text, lines joined with '\n'
    pub text: String,

    // @field: WebVTT cue settings (e.g. "align:start line:0"), passed through untouched
    pub settings: String,
}

impl Cue {
    pub fn new(
        identifier: impl Into<String>,
        start_time_ms: u64,
        end_time_ms: u64,
        text: impl Into<String>,
    ) -> Self {
        Cue {
            identifier: identifier.into(),
            start_time_ms,
            end_time_ms,
            text: text.into(),
            settings: String::new(),
        }
    }

    /// Same cue with cue settings attached
    pub fn with_settings(mut self, settings: impl Into<String>) -> Self {
        self.settings = settings.into();
        self
    }

    /// A copy of this cue carrying `text` instead of the original text
    pub fn with_text(&self, text: impl Into<String>) -> Cue {
        Cue {
            text: text.into(),
            ..self.clone()
        }
    }

    /// Format a timestamp in milliseconds as `HH:MM:SS<sep>mmm`
    pub fn format_timestamp(ms: u64, separator: char) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, seconds, separator, millis)
    }
}

/// Document-level data that is not a cue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Text following `WEBVTT` on the signature line
    pub title: Option<String>,

    /// Header `Key: value` lines, in file order
    pub meta: Vec<(String, String)>,
}

/// An ordered collection of cues plus metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub format: CaptionFormat,
    pub metadata: DocumentMetadata,
    pub cues: Vec<Cue>,
}

impl Document {
    pub fn new(format: CaptionFormat) -> Self {
        Document {
            format,
            metadata: DocumentMetadata::default(),
            cues: Vec::new(),
        }
    }

    /// Parse caption text in the given format
    pub fn parse(format: CaptionFormat, content: &str) -> Result<Self, CaptionError> {
        match format {
            CaptionFormat::WebVtt => Self::parse_webvtt(content),
            CaptionFormat::Srt => Self::parse_srt(content),
        }
    }

    /// Render the document back to caption text in its own format
    pub fn compile(&self) -> String {
        self.to_string()
    }

    /// Same document with `cues` in place of the current ones
    pub fn with_cues(&self, cues: Vec<Cue>) -> Document {
        Document {
            format: self.format,
            metadata: self.metadata.clone(),
            cues,
        }
    }

    /// Parse WebVTT content; NOTE, STYLE and REGION blocks are dropped
    pub fn parse_webvtt(content: &str) -> Result<Self, CaptionError> {
        let content = content.trim_start_matches('\u{feff}');
        let blocks = split_blocks(content);

        let mut blocks_iter = blocks.iter().enumerate();
        let Some((_, header)) = blocks_iter.next() else {
            return Err(CaptionError::MissingHeader);
        };

        let signature = header.first().copied().unwrap_or_default();
        let Some(rest) = signature.strip_prefix("WEBVTT") else {
            return Err(CaptionError::MissingHeader);
        };
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return Err(CaptionError::MissingHeader);
        }

        let mut document = Document::new(CaptionFormat::WebVtt);
        let title = rest.trim();
        if !title.is_empty() {
            document.metadata.title = Some(title.to_string());
        }

        for line in &header[1..] {
            match line.split_once(':') {
                Some((key, value)) => document
                    .metadata
                    .meta
                    .push((key.trim().to_string(), value.trim().to_string())),
                None => warn!("Ignoring malformed WebVTT header line: {}", line),
            }
        }

        for (index, block) in blocks_iter {
            let block_number = index + 1;
            let first = block[0];
            let kind = first.split_whitespace().next().unwrap_or_default();
            if ["NOTE", "STYLE", "REGION"].contains(&kind) {
                debug!("Skipping {} block {}", kind, block_number);
                continue;
            }

            let (identifier, timing_index) = if first.contains("-->") {
                ("", 0)
            } else {
                (first, 1)
            };

            let Some(timing) = block.get(timing_index) else {
                return Err(CaptionError::InvalidCue {
                    block: block_number,
                    reason: "missing timing line".to_string(),
                });
            };
            let Some((start, rest)) = timing.split_once("-->") else {
                return Err(CaptionError::InvalidCue {
                    block: block_number,
                    reason: format!("expected timing line, found: {}", timing),
                });
            };

            let rest = rest.trim();
            let (end, settings) = match rest.split_once(char::is_whitespace) {
                Some((end, settings)) => (end, settings.trim()),
                None => (rest, ""),
            };

            let start_time_ms = parse_vtt_timestamp(start.trim(), block_number)?;
            let end_time_ms = parse_vtt_timestamp(end, block_number)?;
            let text = block[timing_index + 1..].join("\n");

            document.cues.push(
                Cue::new(identifier, start_time_ms, end_time_ms, text).with_settings(settings),
            );
        }

        Ok(document)
    }

    /// Parse SRT content, keeping entries in file order
    pub fn parse_srt(content: &str) -> Result<Self, CaptionError> {
        let content = content.trim_start_matches('\u{feff}');
        let mut document = Document::new(CaptionFormat::Srt);

        for (index, block) in split_blocks(content).iter().enumerate() {
            let block_number = index + 1;
            let (identifier, timing_index) = if SRT_TIMESTAMP_REGEX.is_match(block[0]) {
                ("", 0)
            } else {
                (block[0].trim(), 1)
            };

            let Some(caps) = block
                .get(timing_index)
                .and_then(|line| SRT_TIMESTAMP_REGEX.captures(line))
            else {
                warn!("Skipping SRT block {} without a valid timing line", block_number);
                continue;
            };

            let start_time_ms = srt_captures_to_ms(&caps, 1);
            let end_time_ms = srt_captures_to_ms(&caps, 5);
            if end_time_ms < start_time_ms {
                warn!(
                    "Skipping SRT entry {}: end time {} < start time {}",
                    block_number, end_time_ms, start_time_ms
                );
                continue;
            }

            let text = block[timing_index + 1..].join("\n");
            document.cues.push(Cue::new(identifier, start_time_ms, end_time_ms, text));
        }

        if document.cues.is_empty() {
            warn!("No valid subtitle entries found in content");
            return Err(CaptionError::Empty);
        }

        Ok(document)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.format {
            CaptionFormat::WebVtt => {
                match &self.metadata.title {
                    Some(title) => writeln!(f, "WEBVTT {}", title)?,
                    None => writeln!(f, "WEBVTT")?,
                }
                for (key, value) in &self.metadata.meta {
                    writeln!(f, "{}: {}", key, value)?;
                }
                writeln!(f)?;

                for cue in &self.cues {
                    if !cue.identifier.is_empty() {
                        writeln!(f, "{}", cue.identifier)?;
                    }
                    write!(
                        f,
                        "{} --> {}",
                        Cue::format_timestamp(cue.start_time_ms, '.'),
                        Cue::format_timestamp(cue.end_time_ms, '.')
                    )?;
                    if !cue.settings.is_empty() {
                        write!(f, " {}", cue.settings)?;
                    }
                    writeln!(f)?;
                    writeln!(f, "{}", cue.text)?;
                    writeln!(f)?;
                }
            }
            CaptionFormat::Srt => {
                for (index, cue) in self.cues.iter().enumerate() {
                    if cue.identifier.is_empty() {
                        writeln!(f, "{}", index + 1)?;
                    } else {
                        writeln!(f, "{}", cue.identifier)?;
                    }
                    writeln!(
                        f,
                        "{} --> {}",
                        Cue::format_timestamp(cue.start_time_ms, ','),
                        Cue::format_timestamp(cue.end_time_ms, ',')
                    )?;
                    writeln!(f, "{}", cue.text)?;
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

/// Group non-blank lines into blocks separated by blank lines
fn split_blocks(content: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_vtt_timestamp(value: &str, block: usize) -> Result<u64, CaptionError> {
    let invalid = || CaptionError::InvalidTimestamp {
        block,
        value: value.to_string(),
    };
    let caps = VTT_TIMESTAMP_REGEX.captures(value).ok_or_else(invalid)?;

    let field = |idx: usize| -> Result<u64, CaptionError> {
        match caps.get(idx) {
            Some(m) => m.as_str().parse::<u64>().map_err(|_| invalid()),
            None => Ok(0),
        }
    };
    let (hours, minutes, seconds, millis) = (field(1)?, field(2)?, field(3)?, field(4)?);
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
        .ok_or_else(invalid)
}

fn srt_captures_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
    let part = |idx: usize| -> u64 {
        caps.get(idx)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };

    (part(start_idx) * 3600 + part(start_idx + 1) * 60 + part(start_idx + 2)) * 1000
        + part(start_idx + 3)
}
