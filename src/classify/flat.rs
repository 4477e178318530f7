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
use std::sync::LazyLock;

use regex::Regex;

use super::{
    channel_files, display, path_segments, underscored, ClassificationError, PathClassifier,
};
use crate::kit::Sample;

static LAYERED_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<instrument>.+?)\s+V(?<velocity>[0-9]+)$").unwrap());

/// Classifies libraries that keep every layer of an instrument side by side, named
/// `<instrument> V<n>.<ext>`. Folders are ignored.
pub struct FlatClassifier {
    /// The output channels, in source channel order.
    channels: Vec<String>,
}

impl FlatClassifier {
    pub const NAME: &'static str = "flat";

    /// Creates a new flat classifier.
    pub fn new(channels: Vec<String>) -> FlatClassifier {
        FlatClassifier { channels }
    }
}

impl PathClassifier for FlatClassifier {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn classify(&self, path: &Path) -> Result<Vec<Sample>, ClassificationError> {
        let segments = path_segments(path)?;
        let filename = segments[segments.len() - 1];
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(filename)
            .trim();

        if !stem.chars().any(char::is_alphanumeric) {
            return Err(ClassificationError::Unrecognized {
                path: display(path),
                reason: format!("file name \"{}\" has no usable stem", filename),
            });
        }

        let (instrument, power) = match LAYERED_STEM.captures(stem) {
            Some(captures) => {
                let velocity: u32 = captures["velocity"].parse().map_err(|_| {
                    ClassificationError::Unrecognized {
                        path: display(path),
                        reason: format!("velocity in \"{}\" is out of range", filename),
                    }
                })?;
                (underscored(captures["instrument"].trim()), f64::from(velocity))
            }
            None => (underscored(stem), 1.0),
        };

        Ok(vec![Sample::new(
            &instrument,
            &underscored(stem),
            power,
            channel_files(path, &self.channels),
        )])
    }
}
