// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::{Path, PathBuf};

use super::*;
use crate::classify::{FlatClassifier, VelocityFolderClassifier};
use crate::features::HihatStep;
use crate::kit::{SampleError, SampleFile};

fn stereo() -> Vec<String> {
    vec!["L".to_string(), "R".to_string()]
}

fn path(segments: &[&str]) -> PathBuf {
    segments.iter().collect()
}

fn flat_config(features: Vec<InstrumentFeature>) -> KitConfig {
    KitConfig::new(
        "Test Kit",
        "A kit for tests",
        vec!["wav".to_string()],
        Box::new(FlatClassifier::new(stereo())),
        features,
    )
}

fn sdd3_config(features: Vec<InstrumentFeature>) -> KitConfig {
    KitConfig::new(
        "Super Dry Drums",
        "",
        vec!["wav".to_string()],
        Box::new(VelocityFolderClassifier::new(
            Some("SDD 3 ".to_string()),
            stereo(),
        )),
        features,
    )
}

fn sdd3_paths() -> Vec<PathBuf> {
    vec![
        path(&["SDD 3 Kick", "Kick V1.wav"]),
        path(&["SDD 3 Kick", "Kick V2.wav"]),
        path(&["SDD 3 Kick", "Kick V4.wav"]),
        path(&["SDD 3 Snare", "SDD 3 Snare V1", "Snare V1_a.wav"]),
        path(&["SDD 3 Snare", "SDD 3 Snare V1", "Snare V1_b.wav"]),
        path(&["SDD 3 Snare", "SDD 3 Snare V8", "Snare V8_a.wav"]),
        path(&["SDD 3 HH Closed", "HH Closed V1.wav"]),
        path(&["SDD 3 HH Closed", "HH Closed V2.wav"]),
        path(&["SDD 3 HH Open", "HH Open V1.wav"]),
        path(&["Loose.wav"]),
    ]
}

#[test]
fn test_kick_end_to_end() {
    let paths = vec![PathBuf::from("Kick V3.wav"), PathBuf::from("Kick V5.wav")];
    let (kit, summary) = generate(&flat_config(vec![]), &paths, 2).unwrap();

    assert_eq!(kit.name, "Test Kit");
    assert_eq!(kit.description, "A kit for tests");
    assert_eq!(kit.instruments.len(), 1);

    let kick = &kit.instruments["Kick"];
    assert_eq!(kick.samples().len(), 2);
    let v3 = kick.sample("Kick_V3").unwrap();
    let v5 = kick.sample("Kick_V5").unwrap();
    assert!((v3.power() - 0.6).abs() < 1e-9);
    assert!((v5.power() - 1.0).abs() < 1e-9);
    assert_eq!(v3.files().len(), 2);
    assert_eq!(v5.files()[1].output_channel(), "R");

    assert_eq!(summary.classified, 2);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.instruments, 1);
}

#[test]
fn test_library_end_to_end() {
    let (kit, summary) = generate(&sdd3_config(vec![]), &sdd3_paths(), 4).unwrap();

    assert_eq!(summary.classified, 9);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].path, PathBuf::from("Loose.wav"));
    assert!(matches!(
        summary.failures[0].error,
        ClassificationError::TooShallow { .. }
    ));

    let names: Vec<&str> = kit.instruments.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["HH_Closed", "HH_Open", "Kick", "Snare"]);

    let kick = &kit.instruments["Kick"];
    assert_eq!(kick.sample("Kick_V1.wav").unwrap().power(), 0.25);
    assert_eq!(kick.sample("Kick_V4.wav").unwrap().power(), 1.0);

    let snare = &kit.instruments["Snare"];
    assert_eq!(snare.samples().len(), 3);
    assert_eq!(snare.sample("Snare_V1_a.wav a").unwrap().power(), 0.125);
    assert_eq!(snare.sample("Snare_V8_a.wav a").unwrap().power(), 1.0);

    // A single sample at V1 is left at its natural power.
    assert_eq!(kit.instruments["HH_Open"].sample("HH_Open_V1.wav").unwrap().power(), 1.0);
}

#[test]
fn test_features_end_to_end() {
    let features = vec![
        InstrumentFeature::ContinuousHihat {
            steps: vec![
                HihatStep {
                    instrument: "HH_Closed".to_string(),
                    openness: 0.0,
                },
                HihatStep {
                    instrument: "HH_Open".to_string(),
                    openness: 1.0,
                },
            ],
            combined_name: "HH".to_string(),
        },
        InstrumentFeature::ChokesOthers {
            instrument: "HH".to_string(),
            chokes: vec!["Crash".to_string()],
        },
    ];
    let (kit, summary) = generate(&sdd3_config(features), &sdd3_paths(), 1).unwrap();

    assert_eq!(summary.instruments, 5);
    let hh = &kit.instruments["HH"];
    assert_eq!(hh.samples().len(), 3);
    assert_eq!(hh.sample("HH_Closed_V1.wav").unwrap().openness(), Some(0.0));
    assert_eq!(hh.sample("HH_Closed_V2.wav").unwrap().openness(), Some(0.0));
    assert_eq!(hh.sample("HH_Open_V1.wav").unwrap().openness(), Some(1.0));
    // Synthetic samples keep the power normalized within their source instrument.
    assert_eq!(hh.sample("HH_Closed_V1.wav").unwrap().power(), 0.5);
    assert!(hh.chokes().contains("Crash"));
}

#[test]
fn test_missing_feature_instrument_aborts() {
    let features = vec![InstrumentFeature::ContinuousHihat {
        steps: vec![HihatStep {
            instrument: "HH_Pedal".to_string(),
            openness: 0.1,
        }],
        combined_name: "HH".to_string(),
    }];

    match generate(&sdd3_config(features), &sdd3_paths(), 2) {
        Err(PipelineError::Feature {
            source: FeatureError::MissingInstrument { instrument, .. },
            summary,
        }) => {
            assert_eq!(instrument, "HH_Pedal");
            // The aggregated instruments are still reported.
            assert_eq!(
                summary.to_string(),
                "Parsed 4 instruments from 9 paths successfully, 1 paths failed"
            );
        }
        other => panic!("unexpected result: {:?}", other.map(|(_, summary)| summary)),
    }
}

#[test]
fn test_no_paths() {
    let (kit, summary) = generate(&sdd3_config(vec![]), &[], 2).unwrap();
    assert!(kit.instruments.is_empty());
    assert_eq!(
        summary.to_string(),
        "Parsed 0 instruments from 0 paths successfully, 0 paths failed"
    );
}

#[test]
fn test_all_paths_fail() {
    let paths = vec![PathBuf::from("a.wav"), PathBuf::from("b.wav")];
    let (kit, summary) = generate(&sdd3_config(vec![]), &paths, 2).unwrap();
    assert!(kit.instruments.is_empty());
    assert_eq!(
        summary.to_string(),
        "Parsed 0 instruments from 0 paths successfully, 2 paths failed"
    );
}

#[test]
fn test_order_independence() {
    let paths = sdd3_paths();
    let config = sdd3_config(vec![]);
    let (expected, _) = generate(&config, &paths, 3).unwrap();

    // A fixed permutation stands in for a shuffle.
    let mut shuffled = paths.clone();
    shuffled.reverse();
    shuffled.rotate_left(3);
    assert_ne!(shuffled, paths);

    let (mut actual, _) = generate(&config, &shuffled, 3).unwrap();

    // Only the order of files within a sample may differ; restore the input path order.
    let position = |file: &SampleFile| paths.iter().position(|p| p == file.source_path());
    for instrument in actual.instruments.values_mut() {
        for sample in instrument.samples_mut().values_mut() {
            sample.files_mut().sort_by_key(position);
        }
    }
    assert_eq!(actual.instruments, expected.instruments);
}

#[test]
fn test_classification_keeps_path_order() {
    let paths: Vec<PathBuf> = (1..=64)
        .map(|i| path(&["Kick", &format!("Kick V{}.wav", i)]))
        .collect();
    let classified = classify_all(
        &VelocityFolderClassifier::new(None, stereo()),
        &paths,
        8,
    )
    .unwrap();

    let sample_paths: Vec<&Path> = classified
        .samples
        .iter()
        .map(|sample| sample.files()[0].source_path())
        .collect();
    let expected: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    assert_eq!(sample_paths, expected);
}

/// Routes every file to the same channel twice.
struct BrokenClassifier;

impl PathClassifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken"
    }

    fn classify(&self, path: &Path) -> Result<Vec<Sample>, ClassificationError> {
        Ok(vec![Sample::new(
            "Broken",
            "broken",
            1.0,
            vec![
                SampleFile::new(path.to_path_buf(), 1, "L"),
                SampleFile::new(path.to_path_buf(), 2, "L"),
            ],
        )])
    }
}

#[test]
fn test_malformed_samples_rejected() {
    let classified = classify_all(&BrokenClassifier, &[PathBuf::from("x.wav")], 1).unwrap();
    assert!(classified.samples.is_empty());
    assert_eq!(classified.summary.classified, 0);
    assert!(matches!(
        &classified.summary.failures[0].error,
        ClassificationError::Malformed {
            source: SampleError::DuplicateChannel { channel, .. },
            ..
        } if channel == "L"
    ));
}

/// Splits every file into a close and an overhead sample, the way a multi-mic layout would.
struct MultiMicClassifier;

impl PathClassifier for MultiMicClassifier {
    fn name(&self) -> &str {
        "multi_mic"
    }

    fn classify(&self, path: &Path) -> Result<Vec<Sample>, ClassificationError> {
        Ok(["Close", "Overhead"]
            .iter()
            .zip(1u16..)
            .map(|(mic, channel)| {
                Sample::new(
                    "Snare",
                    "Snare_V1",
                    1.0,
                    vec![SampleFile::new(path.to_path_buf(), channel, mic)],
                )
            })
            .collect())
    }
}

#[test]
fn test_one_path_many_samples() {
    let (kit, summary) = generate(
        &KitConfig::new(
            "Multi",
            "",
            vec!["wav".to_string()],
            Box::new(MultiMicClassifier),
            vec![],
        ),
        &[PathBuf::from("snare.wav")],
        1,
    )
    .unwrap();

    assert_eq!(summary.classified, 1);
    let files = kit.instruments["Snare"].sample("Snare_V1").unwrap().files();
    let channels: Vec<&str> = files.iter().map(|f| f.output_channel()).collect();
    assert_eq!(channels, vec!["Close", "Overhead"]);
}
