//! End-to-end draw pipeline: JSON file → draw → trim → artifacts.

use std::fs;

use trendify_core::{DrawRng, ShuffleStrategy, WeightedRecord};
use trendify_runner::{
    draw_from_file, load_entries, load_manifest, parse_entries, save_draw_artifacts, DrawError,
    DrawOptions, LoadError, TrendifyConfig,
};

const PARTICIPANTS: &str = r#"[
    {"name": "Ada", "tickets": 40, "email": "ada@example.com"},
    {"name": "Bo", "tickets": 25, "meta": {"tier": "gold", "joined": 2019}},
    {"name": "Cy", "tickets": 20},
    {"name": "Di", "tickets": 10},
    {"name": "Ed", "tickets": 5}
]"#;

#[test]
fn draw_from_file_preserves_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("participants.json");
    fs::write(&input, PARTICIPANTS).unwrap();

    let mut rng = DrawRng::from_seed(2024);
    let result = draw_from_file(&input, &DrawOptions::default(), &mut rng).unwrap();

    let original = parse_entries(PARTICIPANTS).unwrap();
    assert_eq!(result.entries.len(), original.len());
    for entry in &original {
        assert!(result.entries.contains(entry), "missing {entry:?}");
    }
    assert_eq!(result.total_tickets, 100.0);
}

#[test]
fn config_drives_strategy_and_trim() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("participants.json");
    let config_path = dir.path().join("trendify.toml");
    fs::write(&input, PARTICIPANTS).unwrap();
    fs::write(
        &config_path,
        "[draw]\nseed = 5\nmax_entries = 3\nstrategy = \"fenwick\"\n",
    )
    .unwrap();

    let config = TrendifyConfig::from_file(&config_path).unwrap();
    let mut rng = DrawRng::from_seed(config.draw.seed.unwrap());
    let result = draw_from_file(&input, &DrawOptions::from(&config.draw), &mut rng).unwrap();

    assert_eq!(result.entries.len(), 3);
    assert_eq!(result.trimmed_count(), 2);
    assert_eq!(result.strategy, ShuffleStrategy::Fenwick);
    assert_eq!(result.seed, 5);
}

#[test]
fn artifacts_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("participants.json");
    fs::write(&input, PARTICIPANTS).unwrap();

    let mut rng = DrawRng::from_seed(77);
    let result = draw_from_file(&input, &DrawOptions::default(), &mut rng).unwrap();
    let run_dir = save_draw_artifacts(&result, dir.path(), "name").unwrap();

    assert!(run_dir.join("entries.csv").exists());
    let manifest = load_manifest(&run_dir).unwrap();
    assert_eq!(manifest.seed, 77);
    assert_eq!(manifest.output_count, 5);

    let saved = load_entries(&run_dir.join("entries.json")).unwrap();
    assert_eq!(saved, result.entries);
    let tickets: Vec<f64> = saved.iter().map(|e| e.tickets()).collect();
    assert_eq!(tickets.len(), 5);
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = DrawRng::from_seed(1);
    let err = draw_from_file(&dir.path().join("nope.json"), &DrawOptions::default(), &mut rng)
        .unwrap_err();
    assert!(matches!(err, DrawError::Load(LoadError::Io { .. })));
}

#[test]
fn non_array_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("object.json");
    fs::write(&input, r#"{"name": "solo", "tickets": 1}"#).unwrap();
    let mut rng = DrawRng::from_seed(1);
    let err = draw_from_file(&input, &DrawOptions::default(), &mut rng).unwrap_err();
    assert!(matches!(err, DrawError::Load(LoadError::NotAnArray)));
}
