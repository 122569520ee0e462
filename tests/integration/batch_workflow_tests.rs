/*!
 * End-to-end tests for the batch workflow: discovery, fan-out over
 * files and locales, and output naming
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use subtrans::app_controller::{BatchSettings, Controller, TranslationUnit, expand_units};
use subtrans::caption::{CaptionFormat, Document};
use subtrans::translation::TranslateOptions;

use crate::common::{self, mock_transport::StubTransport};

fn settings(pattern: String, locales: &[&str], output_dir: PathBuf) -> BatchSettings {
    BatchSettings {
        source_pattern: pattern,
        locales: locales.iter().map(|l| l.to_string()).collect(),
        output_dir,
        options: TranslateOptions::default(),
        show_progress: false,
    }
}

/// Test that every file is paired with every locale
#[test]
fn test_expandUnits_shouldCrossFilesAndLocales() {
    let files: Vec<PathBuf> = vec!["in/a.vtt".into(), "in/b.srt".into()];
    let locales = vec!["it".to_string(), "fr".to_string()];

    let units = expand_units(&files, &locales, Path::new("out"));

    assert_eq!(units.len(), 4);
    assert_eq!(
        units[0],
        TranslationUnit {
            source: "in/a.vtt".into(),
            destination: "out/a.it.vtt".into(),
            target_locale: "it".to_string(),
        }
    );
    assert_eq!(units[3].destination, PathBuf::from("out/b.fr.srt"));
}

/// Test two files times three locales produce six named outputs
#[tokio::test]
async fn test_run_withTwoFilesAndThreeLocales_shouldWriteSixOutputs() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");
    fs::create_dir(&input_dir)?;
    common::create_test_captions(&input_dir, "lesson1.vtt")?;
    common::create_test_captions(&input_dir, "lesson2.vtt")?;

    let stub = StubTransport::new();
    let tracker = stub.tracker();
    let client = Arc::new(common::client_with(stub));
    let controller = Controller::new(
        settings(format!("{}/*.vtt", input_dir.display()), &["it", "fr", "de"], output_dir.clone()),
        client,
    );

    let report = controller.run().await?;

    assert_eq!(report.total(), 6);
    assert!(!report.has_failures());
    for basename in ["lesson1", "lesson2"] {
        for locale in ["it", "fr", "de"] {
            let path = output_dir.join(format!("{}.{}.vtt", basename, locale));
            let content = fs::read_to_string(&path)?;
            let document = Document::parse(CaptionFormat::WebVtt, &content)?;
            assert_eq!(document.cues.len(), 3);
            assert_eq!(document.cues[0].text, format!("[{}] Hello", locale));
            assert_eq!(document.metadata.title.as_deref(), Some("Sample"));
        }
    }
    // 2 files × 3 locales × 3 cues
    assert_eq!(tracker.lock().unwrap().requests.len(), 18);
    Ok(())
}

/// Test that one failing unit does not stop the others
#[tokio::test]
async fn test_run_withOneFailingUnit_shouldCompleteTheRest() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");
    fs::create_dir(&input_dir)?;
    common::create_test_captions(&input_dir, "lesson1.vtt")?;
    common::create_test_file(
        &input_dir,
        "lesson2.vtt",
        "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nSee you\n",
    )?;

    let client = Arc::new(common::client_with(StubTransport::new().failing_on("See you", "de")));
    let controller = Controller::new(
        settings(format!("{}/*.vtt", input_dir.display()), &["it", "fr", "de"], output_dir.clone()),
        client,
    );

    let report = controller.run().await?;

    assert_eq!(report.succeeded.len(), 5);
    assert_eq!(report.failed.len(), 1);
    let (failed_unit, message) = &report.failed[0];
    assert_eq!(failed_unit.target_locale, "de");
    assert_eq!(failed_unit.source, input_dir.join("lesson2.vtt"));
    assert!(message.contains("500"));

    assert!(!output_dir.join("lesson2.de.vtt").exists());
    assert!(output_dir.join("lesson2.it.vtt").exists());
    assert!(output_dir.join("lesson1.de.vtt").exists());
    Ok(())
}

/// Test that an unparsable source fails only its own units
#[tokio::test]
async fn test_run_withInvalidSource_shouldFailOnlyItsUnits() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");
    fs::create_dir(&input_dir)?;
    common::create_test_captions(&input_dir, "good.vtt")?;
    common::create_test_file(&input_dir, "broken.vtt", "not a caption file\n")?;

    let client = Arc::new(common::client_with(StubTransport::new()));
    let controller = Controller::new(
        settings(format!("{}/*.vtt", input_dir.display()), &["it"], output_dir.clone()),
        client,
    );

    let report = controller.run().await?;

    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0.source, input_dir.join("broken.vtt"));
    assert!(report.failed[0].1.starts_with("Caption error"));
    assert!(output_dir.join("good.it.vtt").exists());
    Ok(())
}

/// Test that an unwritable output location is reported as a file error
#[tokio::test]
async fn test_run_withOutputDirBlockedByFile_shouldReportFileErrors() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    fs::create_dir(&input_dir)?;
    common::create_test_captions(&input_dir, "lesson1.vtt")?;
    let blocked = common::create_test_file(temp_dir.path(), "output", "not a directory")?;

    let controller = Controller::new(
        settings(format!("{}/*.vtt", input_dir.display()), &["it", "fr"], blocked),
        Arc::new(common::client_with(StubTransport::new())),
    );

    let report = controller.run().await?;

    assert_eq!(report.failed.len(), 2);
    assert!(report.succeeded.is_empty());
    for (_, message) in &report.failed {
        assert!(message.starts_with("File error"), "unexpected message: {}", message);
    }
    Ok(())
}

/// Test that no matching file means an empty report and no requests
#[tokio::test]
async fn test_run_withNoMatchingFiles_shouldReturnEmptyReport() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let stub = StubTransport::new();
    let tracker = stub.tracker();
    let controller = Controller::new(
        settings(format!("{}/*.vtt", temp_dir.path().display()), &["it"], temp_dir.path().join("out")),
        Arc::new(common::client_with(stub)),
    );

    let report = controller.run().await?;

    assert_eq!(report.total(), 0);
    assert!(tracker.lock().unwrap().requests.is_empty());
    assert!(!temp_dir.path().join("out").exists());
    Ok(())
}
