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

//! Path classification: turning a library-relative file path into samples.
//!
//! Each sample library lays its files out differently, so the interpretation of a path is a
//! swappable strategy behind the [`PathClassifier`] trait. Strategies are picked by name from
//! [`CLASSIFIERS`] when the kit configuration is loaded.

use std::num::ParseIntError;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::kit::{Sample, SampleError, SampleFile};

mod flat;
mod velocity_folder;

pub use flat::FlatClassifier;
pub use velocity_folder::VelocityFolderClassifier;

/// The output channels used when a classifier configuration doesn't name any.
pub const DEFAULT_CHANNELS: &[&str] = &["L", "R"];

/// The registered classifiers and a short description of each.
pub const CLASSIFIERS: &[(&str, &str)] = &[
    (
        VelocityFolderClassifier::NAME,
        "<instrument>/[<instrument> V<n>/]<file>: instrument from the folder, power from V<n>",
    ),
    (
        FlatClassifier::NAME,
        "<instrument> V<n>.<ext>: instrument and power from the file name alone",
    ),
];

/// Matches a `V<digits>` velocity token right before an optional `_<letter>` and the extension.
static VELOCITY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*V(?<velocity>[0-9]+)(?:_[a-z])?\.[^.]+$").unwrap());

/// Matches a `_<letter>` variant marker right before the extension.
static VARIANT_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*_(?<letter>[a-z])\.[^.]+$").unwrap());

/// Errors produced while classifying a single path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassificationError {
    #[error("path {path} is not deep enough: found {depth} segment(s), need at least {required}")]
    TooShallow {
        path: String,
        depth: usize,
        required: usize,
    },

    #[error("path {0} is not valid UTF-8")]
    InvalidEncoding(String),

    #[error("path {path} does not match a known pattern: {reason}")]
    Unrecognized { path: String, reason: String },

    #[error("path {path} produced a malformed sample: {source}")]
    Malformed {
        path: String,
        #[source]
        source: SampleError,
    },
}

/// A strategy that interprets library-relative paths as samples.
pub trait PathClassifier: Send + Sync {
    /// The registry name of this classifier.
    fn name(&self) -> &str;

    /// Classifies a single path, relative to the library root. A path may produce any number
    /// of samples.
    fn classify(&self, path: &Path) -> Result<Vec<Sample>, ClassificationError>;
}

/// Splits a relative path into its UTF-8 segments.
pub(crate) fn path_segments(path: &Path) -> Result<Vec<&str>, ClassificationError> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => segments.push(
                segment
                    .to_str()
                    .ok_or_else(|| ClassificationError::InvalidEncoding(display(path)))?,
            ),
            Component::CurDir => {}
            _ => {
                return Err(ClassificationError::Unrecognized {
                    path: display(path),
                    reason: "path must be relative to the library root".to_string(),
                })
            }
        }
    }

    if segments.is_empty() {
        return Err(ClassificationError::TooShallow {
            path: display(path),
            depth: 0,
            required: 1,
        });
    }
    Ok(segments)
}

/// Replaces every whitespace character with an underscore.
pub(crate) fn underscored(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Extracts the number of a `V<digits>` velocity token from a file name. A token too large to
/// be a velocity is an error rather than a missing token.
pub(crate) fn velocity_number(filename: &str) -> Result<Option<u32>, ParseIntError> {
    match VELOCITY_TOKEN.captures(filename) {
        Some(captures) => captures["velocity"].parse().map(Some),
        None => Ok(None),
    }
}

/// Extracts the variant letter of a `_<letter>.<ext>` file name.
pub(crate) fn variant_letter(filename: &str) -> Option<&str> {
    VARIANT_LETTER
        .captures(filename)
        .and_then(|captures| captures.name("letter"))
        .map(|letter| letter.as_str())
}

/// Routes each source channel of the file at path to the output channel at the same position.
pub(crate) fn channel_files(path: &Path, channels: &[String]) -> Vec<SampleFile> {
    channels
        .iter()
        .zip(1u16..)
        .map(|(channel, source_channel)| {
            SampleFile::new(PathBuf::from(path), source_channel, channel)
        })
        .collect()
}

pub(crate) fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        let path = PathBuf::from("Kick").join("Kick V1").join("Kick V1.wav");
        assert_eq!(
            path_segments(&path).unwrap(),
            vec!["Kick", "Kick V1", "Kick V1.wav"]
        );

        let path = PathBuf::from(".").join("Snare.wav");
        assert_eq!(path_segments(&path).unwrap(), vec!["Snare.wav"]);
    }

    #[test]
    fn test_path_segments_empty() {
        assert!(matches!(
            path_segments(Path::new("")),
            Err(ClassificationError::TooShallow { depth: 0, .. })
        ));
    }

    #[test]
    fn test_path_segments_parent_dir() {
        let path = PathBuf::from("..").join("Kick.wav");
        assert!(matches!(
            path_segments(&path),
            Err(ClassificationError::Unrecognized { .. })
        ));
    }

    #[test]
    fn test_velocity_number() {
        assert_eq!(velocity_number("Kick V3.wav"), Ok(Some(3)));
        assert_eq!(velocity_number("Kick V12.wav"), Ok(Some(12)));
        assert_eq!(velocity_number("Kick V3_b.wav"), Ok(Some(3)));
        assert_eq!(velocity_number("Kick.wav"), Ok(None));
        assert_eq!(velocity_number("Kick V3 room.wav"), Ok(None));
        assert!(velocity_number("Kick V99999999999.wav").is_err());
    }

    #[test]
    fn test_variant_letter() {
        assert_eq!(variant_letter("Kick V3_b.wav"), Some("b"));
        assert_eq!(variant_letter("Kick V3.wav"), None);
        assert_eq!(variant_letter("Kick_B.wav"), None);
    }

    #[test]
    fn test_underscored() {
        assert_eq!(underscored("Kick In V1.wav"), "Kick_In_V1.wav");
        assert_eq!(underscored("Ride\tBell"), "Ride_Bell");
    }

    #[test]
    fn test_channel_files() {
        let channels = vec!["L".to_string(), "R".to_string()];
        let files = channel_files(Path::new("Kick/Kick.wav"), &channels);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].source_channel(), 1);
        assert_eq!(files[0].output_channel(), "L");
        assert_eq!(files[1].source_channel(), 2);
        assert_eq!(files[1].output_channel(), "R");
        assert_eq!(files[1].source_path(), Path::new("Kick/Kick.wav"));
    }
}
