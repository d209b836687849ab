use mp3_shuffle::constants::DEFAULT_REPORT_NAME;
use mp3_shuffle::interleave::InterleaveOptions;
use mp3_shuffle::label::extract_label;
use mp3_shuffle::plan::NamingOptions;
use mp3_shuffle::randomize::{RandomizeOptions, randomize};
use mp3_shuffle::tools::Tool;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_wav(path: &Path, seconds: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for _ in 0..seconds * 8000 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// `[A]1.wav`, `[A]2.wav`, `[B]3.wav`, `[B]4.wav`, two seconds each.
fn music_folder(root: &Path) -> std::path::PathBuf {
    let input = root.join("music");
    fs::create_dir(&input).unwrap();
    for name in ["[A]1.wav", "[A]2.wav", "[B]3.wav", "[B]4.wav"] {
        write_wav(&input.join(name), 2);
    }
    input
}

fn options(root: &Path, input: &Path) -> RandomizeOptions {
    RandomizeOptions {
        input: input.to_path_buf(),
        output: root.join("shuffled"),
        report: Some(root.join("report.txt")),
        naming: NamingOptions::default(),
        remove_source: false,
        interleave: InterleaveOptions {
            seed: Some(5),
            ..Default::default()
        },
        ffprobe: Tool::new("/nonexistent/bin/ffprobe-missing"),
        dry_run: false,
        show_progress: false,
    }
}

fn sorted_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_shuffle_copies_in_interleaved_order() {
    let temp_dir = TempDir::new().unwrap();
    let input = music_folder(temp_dir.path());
    let options = options(temp_dir.path(), &input);

    let summary = randomize(&options).unwrap();
    let plan = summary.plan.unwrap();

    assert_eq!(summary.copied, 4);
    assert_eq!(plan.collisions, 0);
    assert_eq!(plan.quality, 100.0);
    assert_eq!(
        sorted_listing(&options.output),
        ["1.wav", "2.wav", "3.wav", "4.wav"]
    );

    // Each copy carries the bytes of the source planned for its slot
    for entry in &plan.entries {
        assert_eq!(
            fs::read(options.output.join(&entry.destination)).unwrap(),
            fs::read(input.join(&entry.source)).unwrap()
        );
    }
    let labels: Vec<&str> = plan.entries.iter().map(|e| extract_label(&e.source)).collect();
    assert!(labels.windows(2).all(|pair| pair[0] != pair[1]));

    // Sources are untouched
    assert_eq!(sorted_listing(&input).len(), 4);
}

#[test]
fn test_shuffle_report() {
    let temp_dir = TempDir::new().unwrap();
    let input = music_folder(temp_dir.path());
    let options = options(temp_dir.path(), &input);

    let plan = randomize(&options).unwrap().plan.unwrap();
    let report = fs::read_to_string(options.report.as_ref().unwrap()).unwrap();

    assert!(report.starts_with("mp3shuffle report - "));
    assert!(report.contains("[Label Statistics]\nlabel: count - total - average\n"));
    assert!(report.contains("total: 4 - 00:00:08 - 00:02\n"));
    assert!(report.contains("B: 2 - 00:00:04 - 00:02\nA: 2 - 00:00:04 - 00:02\n"));
    assert!(report.contains("[Shuffle Result]\n  adjacent collisions: 0\n  quality: 100.0%\n"));
    for entry in &plan.entries {
        assert!(report.contains(&format!("{} {}\n", entry.id, entry.source)));
    }
}

#[test]
fn test_shuffle_naming_and_move() {
    let temp_dir = TempDir::new().unwrap();
    let input = music_folder(temp_dir.path());
    let mut options = options(temp_dir.path(), &input);
    options.naming = NamingOptions {
        with_label: true,
        with_name: true,
    };
    options.remove_source = true;

    let plan = randomize(&options).unwrap().plan.unwrap();

    for entry in &plan.entries {
        let expected = format!("{}{}", entry.id, entry.source);
        assert_eq!(entry.destination, expected);
        assert!(options.output.join(&expected).exists());
    }
    assert!(sorted_listing(&input).is_empty());
}

#[test]
fn test_shuffle_replaces_previous_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = music_folder(temp_dir.path());
    let options = options(temp_dir.path(), &input);
    fs::create_dir(&options.output).unwrap();
    fs::write(options.output.join("stale.mp3"), b"old").unwrap();

    randomize(&options).unwrap();

    assert!(!options.output.join("stale.mp3").exists());
    assert_eq!(sorted_listing(&options.output).len(), 4);
}

#[test]
fn test_shuffle_missing_input_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let options = options(temp_dir.path(), &temp_dir.path().join("missing"));

    assert!(randomize(&options).is_err());
    assert!(!options.output.exists());
    assert!(!options.report.as_ref().unwrap().exists());
}

#[test]
fn test_shuffle_empty_folder() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("music");
    fs::create_dir(&input).unwrap();
    fs::write(input.join(".hidden.mp3"), b"x").unwrap();
    fs::write(input.join("notes.txt"), b"x").unwrap();
    let options = options(temp_dir.path(), &input);

    let summary = randomize(&options).unwrap();

    assert!(summary.plan.is_none());
    assert_eq!(summary.copied, 0);
    let report = fs::read_to_string(options.report.as_ref().unwrap()).unwrap();
    assert!(report.contains("total: 0 - 00:00:00 - 00:00\n"));
    assert!(report.contains("  adjacent collisions: -\n  quality: -%\n"));
}

#[test]
fn test_dry_run_leaves_output_alone() {
    let temp_dir = TempDir::new().unwrap();
    let input = music_folder(temp_dir.path());
    let mut options = options(temp_dir.path(), &input);
    options.dry_run = true;

    let summary = randomize(&options).unwrap();

    assert_eq!(summary.copied, 0);
    assert_eq!(summary.plan.unwrap().entries.len(), 4);
    assert!(!options.output.exists());
    assert!(options.report.as_ref().unwrap().exists());
}

#[test]
fn test_dry_run_refuses_report_inside_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = music_folder(temp_dir.path());
    let mut options = options(temp_dir.path(), &input);
    options.dry_run = true;
    options.report = Some(options.output.join(DEFAULT_REPORT_NAME));

    assert!(randomize(&options).is_err());
    assert!(!options.output.exists());
}

#[test]
fn test_dry_run_without_report_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let input = music_folder(temp_dir.path());
    let mut options = options(temp_dir.path(), &input);
    options.dry_run = true;
    options.report = None;

    let summary = randomize(&options).unwrap();

    assert_eq!(summary.plan.unwrap().total, 4);
    assert!(!options.output.exists());
    assert!(!temp_dir.path().join("report.txt").exists());
}

#[test]
fn test_output_containing_input_is_refused() {
    let temp_dir = TempDir::new().unwrap();
    let input = music_folder(temp_dir.path());
    let mut options = options(temp_dir.path(), &input);
    options.output = temp_dir.path().to_path_buf();

    assert!(randomize(&options).is_err());
    assert_eq!(sorted_listing(&input).len(), 4);
}
