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

use config::{Config, File};
use serde::{Deserialize, Serialize};

use super::classifier::ClassifierDefinition;
use super::error::ConfigError;
use super::feature::FeatureDefinition;
use crate::features::InstrumentFeature;
use crate::pipeline::KitConfig;

/// A YAML representation of a kit generation config.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Kit {
    /// The default name of the generated kit.
    name: String,
    /// The default description of the generated kit.
    #[serde(default)]
    description: String,
    /// The file extensions of the audio files in the library.
    #[serde(default = "default_extensions")]
    extensions: Vec<String>,
    /// The classifier that interprets library paths.
    classifier: ClassifierDefinition,
    /// The instrument features, applied in order.
    #[serde(default)]
    features: Vec<FeatureDefinition>,
}

fn default_extensions() -> Vec<String> {
    vec!["wav".to_string()]
}

impl Kit {
    /// Loads a kit configuration from a file. The format is picked from the file extension.
    pub fn load(path: &Path) -> Result<Kit, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Kit>()?)
    }

    /// Parses a kit configuration from a YAML string.
    #[cfg(test)]
    pub fn from_yaml(yaml: &str) -> Result<Kit, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from_str(yaml, config::FileFormat::Yaml))
            .build()?
            .try_deserialize::<Kit>()?)
    }

    /// Serializes the kit configuration to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Gets the name of the kit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the classifier definition.
    pub fn classifier(&self) -> &ClassifierDefinition {
        &self.classifier
    }

    /// Validates the configuration and resolves the classifier and features.
    pub fn to_kit_config(&self) -> Result<KitConfig, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("kit name can't be empty".to_string()));
        }

        let extensions = self
            .extensions
            .iter()
            .map(|extension| extension.trim().trim_start_matches('.').to_lowercase())
            .filter(|extension| !extension.is_empty())
            .collect::<Vec<String>>();
        if extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one audio file extension is required".to_string(),
            ));
        }

        let classifier = self.classifier.to_classifier()?;
        let features = self
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| feature.to_feature(index))
            .collect::<Result<Vec<InstrumentFeature>, ConfigError>>()?;

        Ok(KitConfig::new(
            &self.name,
            &self.description,
            extensions,
            classifier,
            features,
        ))
    }
}
