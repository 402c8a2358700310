use std::fs;
use std::path::Path;

use house_qr::{
    decode_artifact, format_identifier, verify_directory, BatchConfig, BatchEvent, Generator, QrPng, TracingSink,
};
use tempfile::TempDir;
use tracing_test::traced_test;

fn png_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

fn expected_names() -> Vec<String> {
    (1..=100).map(|n| format!("{}.png", format_identifier(n))).collect()
}

#[test]
fn default_batch_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("qrcodes");
    assert!(!out.exists());

    let mut events = Vec::new();
    let summary = Generator::new(BatchConfig::with_output_dir(&out))
        .run(&mut |e: &BatchEvent| events.push(e.clone()))
        .unwrap();

    assert!(out.is_dir());
    assert_eq!(summary.count(), 100);
    assert_eq!(png_names(&out), expected_names());

    let qr = QrPng::default();
    for artifact in &summary.artifacts {
        assert_eq!(decode_artifact(&qr, &artifact.path).unwrap(), artifact.identifier);
    }
    assert_eq!(decode_artifact(&qr, out.join("H037.png")).unwrap(), "H037");

    assert_eq!(events.len(), 101);
    assert!(events[..100].iter().all(|e| matches!(e, BatchEvent::Written(_))));
    assert_eq!(
        events[100],
        BatchEvent::Finished {
            output_dir: out.clone(),
            count: 100
        }
    );
}

#[test]
fn rerun_overwrites_instead_of_duplicating() {
    let tmp = TempDir::new().unwrap();
    let generator = Generator::new(BatchConfig::with_output_dir(tmp.path()));

    let first = generator.run(&mut TracingSink).unwrap();
    let h001 = fs::read(tmp.path().join("H001.png")).unwrap();
    let second = generator.run(&mut TracingSink).unwrap();

    assert_eq!(first, second);
    assert_eq!(png_names(tmp.path()), expected_names());
    assert_eq!(fs::read(tmp.path().join("H001.png")).unwrap(), h001);
}

#[test]
fn generated_directory_verifies_clean() {
    let tmp = TempDir::new().unwrap();
    let config = BatchConfig::with_output_dir(tmp.path());
    let expected: Vec<String> = config.identifiers().unwrap().collect();
    Generator::new(config).run(&mut TracingSink).unwrap();

    let report = verify_directory(&QrPng::default(), tmp.path(), Some(&expected)).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.checked.len(), 100);
}

#[test]
fn deleted_artifact_is_reported_missing() {
    let tmp = TempDir::new().unwrap();
    let config = BatchConfig::with_output_dir(tmp.path());
    let expected: Vec<String> = config.identifiers().unwrap().collect();
    Generator::new(config).run(&mut TracingSink).unwrap();
    fs::remove_file(tmp.path().join("H050.png")).unwrap();

    let report = verify_directory(&QrPng::default(), tmp.path(), Some(&expected)).unwrap();
    assert_eq!(report.missing, vec!["H050".to_string()]);
    assert_eq!(report.checked.len(), 99);
}

#[test]
#[traced_test]
fn tracing_sink_logs_each_artifact() {
    let tmp = TempDir::new().unwrap();
    let mut config = BatchConfig::with_output_dir(tmp.path());
    config.last = 3;

    Generator::new(config).run(&mut TracingSink).unwrap();

    assert!(logs_contain("QR code generated"));
    assert!(logs_contain("identifier=H003"));
    assert!(logs_contain("Finished generating all QR codes"));
    assert!(logs_contain("count=3"));
}
