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
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::classify::{
    FlatClassifier, PathClassifier, VelocityFolderClassifier, CLASSIFIERS, DEFAULT_CHANNELS,
};

/// A YAML representation of the classifier to use for a sample library.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ClassifierDefinition {
    /// The registry name of the classifier.
    #[serde(rename = "type")]
    kind: String,

    /// Text to remove from instrument names (velocity_folder only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strip_prefix: Option<String>,

    /// The output channels, in source channel order.
    #[serde(default = "default_channels")]
    channels: Vec<String>,
}

fn default_channels() -> Vec<String> {
    DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect()
}

impl ClassifierDefinition {
    /// Creates a new classifier definition.
    #[cfg(test)]
    pub fn new(kind: &str, strip_prefix: Option<String>, channels: Vec<String>) -> Self {
        Self {
            kind: kind.to_string(),
            strip_prefix,
            channels,
        }
    }

    /// Gets the classifier type.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Looks the classifier up in the registry and builds it.
    pub fn to_classifier(&self) -> Result<Box<dyn PathClassifier>, ConfigError> {
        self.validate_channels()?;

        match self.kind.as_str() {
            VelocityFolderClassifier::NAME => Ok(Box::new(VelocityFolderClassifier::new(
                self.strip_prefix.clone(),
                self.channels.clone(),
            ))),
            FlatClassifier::NAME => {
                if self.strip_prefix.is_some() {
                    return Err(ConfigError::Invalid(format!(
                        "strip_prefix is not supported by the {} classifier",
                        FlatClassifier::NAME
                    )));
                }
                Ok(Box::new(FlatClassifier::new(self.channels.clone())))
            }
            _ => Err(ConfigError::UnknownClassifier {
                name: self.kind.clone(),
                expected: CLASSIFIERS
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<&str>>()
                    .join(", "),
            }),
        }
    }

    fn validate_channels(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::Invalid(
                "classifier needs at least one channel".to_string(),
            ));
        }
        if self.channels.len() > usize::from(u16::MAX) {
            return Err(ConfigError::Invalid(format!(
                "classifier has too many channels ({})",
                self.channels.len()
            )));
        }

        let mut seen = HashSet::new();
        for channel in &self.channels {
            if channel.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "classifier channel names can't be empty".to_string(),
                ));
            }
            if !seen.insert(channel.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "classifier channel \"{}\" is listed more than once",
                    channel
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn channels(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_registry_lookup() {
        let classifier = ClassifierDefinition::new("velocity_folder", None, channels(&["L", "R"]))
            .to_classifier()
            .unwrap();
        assert_eq!(classifier.name(), "velocity_folder");

        let classifier = ClassifierDefinition::new("flat", None, channels(&["L", "R"]))
            .to_classifier()
            .unwrap();
        assert_eq!(classifier.name(), "flat");
        assert_eq!(
            classifier.classify(Path::new("Kick V2.wav")).unwrap()[0].power(),
            2.0
        );
    }

    #[test]
    fn test_unknown_classifier() {
        let result = ClassifierDefinition::new("python", None, channels(&["L"])).to_classifier();
        match result {
            Err(ConfigError::UnknownClassifier { name, expected }) => {
                assert_eq!(name, "python");
                assert!(expected.contains("velocity_folder"));
                assert!(expected.contains("flat"));
            }
            _ => panic!("expected unknown classifier error"),
        }
    }

    #[test]
    fn test_invalid_channels() {
        for bad in [channels(&[]), channels(&["L", "L"]), channels(&["L", " "])] {
            let result = ClassifierDefinition::new("velocity_folder", None, bad).to_classifier();
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn test_flat_rejects_strip_prefix() {
        let result =
            ClassifierDefinition::new("flat", Some("SDD ".to_string()), channels(&["L"]))
                .to_classifier();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
