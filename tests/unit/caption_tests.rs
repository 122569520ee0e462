/*!
 * Tests for caption parsing and compiling
 */

use anyhow::Result;
use subtrans::caption::{CaptionFormat, Cue, Document};
use subtrans::errors::CaptionError;
use crate::common;

/// Test timestamp formatting for both separators
#[test]
fn test_formatTimestamp_withBothSeparators_shouldPadFields() {
    assert_eq!(Cue::format_timestamp(5_025_678, ','), "01:23:45,678");
    assert_eq!(Cue::format_timestamp(61_234, '.'), "00:01:01.234");
    assert_eq!(Cue::format_timestamp(0, '.'), "00:00:00.000");
}

/// Test the shared sample file parses with metadata, ids and settings
#[test]
fn test_parseWebVtt_withSampleFile_shouldReadEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_captions(temp_dir.path(), "sample.vtt")?;
    let content = std::fs::read_to_string(&path)?;

    let document = Document::parse(CaptionFormat::from_path(&path)?, &content)?;

    assert_eq!(document.format, CaptionFormat::WebVtt);
    assert_eq!(document.metadata.title.as_deref(), Some("Sample"));
    assert_eq!(document.metadata.meta, vec![("Kind".to_string(), "captions".to_string())]);
    let ids: Vec<&str> = document.cues.iter().map(|c| c.identifier.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(document.cues[0].settings, "align:start");
    assert_eq!(document.cues[1].settings, "");
    assert_eq!(document.cues[2].settings, "line:0");
    assert_eq!(document.cues[2].end_time_ms, 14_000);
    Ok(())
}

/// Test compiling the sample reproduces the source text
#[test]
fn test_compile_withSampleFile_shouldReproduceSource() -> Result<()> {
    let document = Document::parse(CaptionFormat::WebVtt, common::sample_vtt())?;
    assert_eq!(document.compile(), format!("{}\n", common::sample_vtt()));
    Ok(())
}

/// Test CRLF input and a byte order mark are accepted
#[test]
fn test_parseWebVtt_withCrlfAndBom_shouldParse() -> Result<()> {
    let content = "\u{feff}WEBVTT\r\n\r\n00:00:01.500 --> 00:00:02.000\r\nHi\r\nthere\r\n";
    let document = Document::parse_webvtt(content)?;
    assert_eq!(document.cues.len(), 1);
    assert_eq!(document.cues[0].start_time_ms, 1_500);
    assert_eq!(document.cues[0].text, "Hi\nthere");
    Ok(())
}

/// Test cue blocks without timing are rejected with their position
#[test]
fn test_parseWebVtt_withMissingTiming_shouldReportBlock() {
    let err = Document::parse_webvtt("WEBVTT\n\nintro\nHello\n").unwrap_err();
    assert!(matches!(err, CaptionError::InvalidCue { block: 2, .. }));
}

/// Test out-of-range minutes are rejected
#[test]
fn test_parseWebVtt_withMinutesOutOfRange_shouldFail() {
    let err = Document::parse_webvtt("WEBVTT\n\n00:61:00.000 --> 00:62:00.000\nHi\n").unwrap_err();
    assert!(matches!(err, CaptionError::InvalidTimestamp { block: 2, .. }));
}

/// Test SRT entries with broken timing are skipped
#[test]
fn test_parseSrt_withBrokenEntry_shouldSkipIt() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nFirst\n\n2\nnot a timing line\nLost\n\n3\n00:00:05,000 --> 00:00:04,000\nBackwards\n\n4\n00:00:06,000 --> 00:00:07,000\nLast\n";
    let document = Document::parse_srt(content)?;
    let texts: Vec<&str> = document.cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["First", "Last"]);
    assert_eq!(document.cues[1].identifier, "4");
    Ok(())
}

/// Test SRT content without any entry is an error
#[test]
fn test_parseSrt_withoutEntries_shouldFail() {
    assert!(matches!(Document::parse_srt("\n\n"), Err(CaptionError::Empty)));
}
