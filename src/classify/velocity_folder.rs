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
use std::path::Path;

use super::{
    channel_files, display, path_segments, underscored, variant_letter, velocity_number,
    ClassificationError, PathClassifier,
};
use crate::kit::Sample;

/// Classifies libraries laid out as `<instrument>/<file>` or
/// `<instrument>/<instrument> V<n>/<file>`, where the file name may carry a `V<n>` velocity
/// token and a `_<letter>` round-robin marker.
pub struct VelocityFolderClassifier {
    /// Text removed from every instrument name, e.g. a library prefix.
    strip_prefix: Option<String>,
    /// The output channels, in source channel order.
    channels: Vec<String>,
}

impl VelocityFolderClassifier {
    pub const NAME: &'static str = "velocity_folder";

    /// Creates a new velocity folder classifier.
    pub fn new(strip_prefix: Option<String>, channels: Vec<String>) -> VelocityFolderClassifier {
        VelocityFolderClassifier {
            strip_prefix: strip_prefix.filter(|prefix| !prefix.is_empty()),
            channels,
        }
    }

    /// Whether the folder looks like a velocity subfolder of the given instrument folder,
    /// i.e. it starts with `<instrument> V<digits>`.
    fn is_velocity_folder(folder: &str, instrument_folder: &str) -> bool {
        folder
            .strip_prefix(instrument_folder)
            .and_then(|rest| rest.strip_prefix(" V"))
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
    }

    fn instrument_name(&self, folder: &str) -> String {
        let name = match &self.strip_prefix {
            Some(prefix) => folder.replace(prefix.as_str(), ""),
            None => folder.to_string(),
        };
        name.replace(' ', "_").trim().to_string()
    }
}

impl PathClassifier for VelocityFolderClassifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn classify(&self, path: &Path) -> Result<Vec<Sample>, ClassificationError> {
        let segments = path_segments(path)?;
        let depth = segments.len();
        if depth < 2 {
            return Err(ClassificationError::TooShallow {
                path: display(path),
                depth,
                required: 2,
            });
        }

        let parent = segments[depth - 2];
        let folder = if depth >= 3 && Self::is_velocity_folder(parent, segments[depth - 3]) {
            segments[depth - 3]
        } else {
            parent
        };
        let instrument = self.instrument_name(folder);
        if instrument.is_empty() {
            return Err(ClassificationError::Unrecognized {
                path: display(path),
                reason: format!("folder \"{}\" leaves an empty instrument name", folder),
            });
        }

        let filename = segments[depth - 1].trim();
        let mut name = underscored(filename);
        if let Some(letter) = variant_letter(filename) {
            name = format!("{} {}", name, letter);
        }

        let velocity =
            velocity_number(filename).map_err(|_| ClassificationError::Unrecognized {
                path: display(path),
                reason: format!("velocity in \"{}\" is out of range", filename),
            })?;
        let power = velocity.map_or(1.0, f64::from);

        Ok(vec![Sample::new(
            &instrument,
            &name,
            power,
            channel_files(path, &self.channels),
        )])
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn classifier() -> VelocityFolderClassifier {
        VelocityFolderClassifier::new(
            Some("SDD 3 ".to_string()),
            vec!["L".to_string(), "R".to_string()],
        )
    }

    fn path(segments: &[&str]) -> PathBuf {
        segments.iter().collect()
    }

    #[test]
    fn test_instrument_folder() {
        let samples = classifier()
            .classify(&path(&["SDD 3 Kick In", "Kick In V3.wav"]))
            .unwrap();
        assert_eq!(samples.len(), 1);

        let sample = &samples[0];
        assert_eq!(sample.instrument(), "Kick_In");
        assert_eq!(sample.name(), "Kick_In_V3.wav");
        assert_eq!(sample.power(), 3.0);
        assert_eq!(sample.openness(), None);
    }

    #[test]
    fn test_velocity_subfolder() {
        let samples = classifier()
            .classify(&path(&[
                "Drums",
                "SDD 3 Snare",
                "SDD 3 Snare V10",
                "Snare V10_c.wav",
            ]))
            .unwrap();

        let sample = &samples[0];
        assert_eq!(sample.instrument(), "Snare");
        assert_eq!(sample.name(), "Snare_V10_c.wav c");
        assert_eq!(sample.power(), 10.0);
    }

    #[test]
    fn test_non_velocity_subfolder() {
        // "Snare Rimshot" isn't a velocity folder of "Snare", so it is the instrument.
        let samples = classifier()
            .classify(&path(&["Snare", "Snare Rimshot", "Rim.wav"]))
            .unwrap();
        assert_eq!(samples[0].instrument(), "Snare_Rimshot");
        assert_eq!(samples[0].power(), 1.0);
    }

    #[test]
    fn test_velocity_folder_needs_digits() {
        let samples = classifier()
            .classify(&path(&["Tom", "Tom Vintage", "Hit.wav"]))
            .unwrap();
        assert_eq!(samples[0].instrument(), "Tom_Vintage");
    }

    #[test]
    fn test_channel_files() {
        let file = path(&["Kick", "Kick V1.wav"]);
        let samples = classifier().classify(&file).unwrap();
        let files = samples[0].files();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].output_channel(), "L");
        assert_eq!(files[0].source_channel(), 1);
        assert_eq!(files[1].output_channel(), "R");
        assert_eq!(files[1].source_channel(), 2);
        assert_eq!(files[0].source_path(), file.as_path());
    }

    #[test]
    fn test_custom_channels() {
        let classifier = VelocityFolderClassifier::new(
            None,
            vec!["OH".to_string(), "Room".to_string(), "Close".to_string()],
        );
        let samples = classifier
            .classify(&path(&["Kick", "Kick V1.wav"]))
            .unwrap();
        let channels: Vec<&str> = samples[0]
            .files()
            .iter()
            .map(|file| file.output_channel())
            .collect();
        assert_eq!(channels, vec!["OH", "Room", "Close"]);
        assert_eq!(samples[0].files()[2].source_channel(), 3);
    }

    #[test]
    fn test_too_shallow() {
        let result = classifier().classify(Path::new("Kick.wav"));
        assert_eq!(
            result,
            Err(ClassificationError::TooShallow {
                path: "Kick.wav".to_string(),
                depth: 1,
                required: 2,
            })
        );
    }

    #[test]
    fn test_empty_instrument_name() {
        let result = classifier().classify(&path(&["SDD 3 ", "Kick.wav"]));
        assert!(matches!(
            result,
            Err(ClassificationError::Unrecognized { .. })
        ));
    }

    #[test]
    fn test_huge_velocity() {
        let classifier =
            VelocityFolderClassifier::new(None, vec!["L".to_string(), "R".to_string()]);
        assert!(matches!(
            classifier.classify(&path(&["Kick", "Kick V99999999999.wav"])),
            Err(ClassificationError::Unrecognized { .. })
        ));
    }
}
