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
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::features::{FeatureError, HihatStep, InstrumentFeature};

const CHOKES: &str = "chokes";
const CONTINUOUS_HIHAT: &str = "continuous_hihat";

/// A YAML representation of an instrument feature. The fields in use depend on the type.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct FeatureDefinition {
    /// The type of the feature.
    #[serde(rename = "type")]
    kind: String,

    /// The choking instrument (chokes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    instrument: Option<String>,

    /// The choked instruments (chokes).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    chokes: Vec<String>,

    /// The name of the instrument to create (continuous_hihat).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    combined_name: Option<String>,

    /// The source instruments, in priority order (continuous_hihat).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    steps: Vec<HihatStepDefinition>,
}

/// A YAML representation of one continuous hi-hat step.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct HihatStepDefinition {
    /// The source instrument.
    instrument: String,
    /// The openness of the source instrument, from 0.0 (closed) to 1.0 (open).
    openness: f64,
}

#[cfg(test)]
impl FeatureDefinition {
    /// Creates a chokes feature definition (test only).
    pub fn chokes(instrument: &str, chokes: &[&str]) -> Self {
        Self {
            kind: CHOKES.to_string(),
            instrument: Some(instrument.to_string()),
            chokes: chokes.iter().map(|c| c.to_string()).collect(),
            combined_name: None,
            steps: Vec::new(),
        }
    }

    /// Creates a continuous hi-hat feature definition (test only).
    pub fn continuous_hihat(combined_name: &str, steps: &[(&str, f64)]) -> Self {
        Self {
            kind: CONTINUOUS_HIHAT.to_string(),
            instrument: None,
            chokes: Vec::new(),
            combined_name: Some(combined_name.to_string()),
            steps: steps
                .iter()
                .map(|(instrument, openness)| HihatStepDefinition {
                    instrument: instrument.to_string(),
                    openness: *openness,
                })
                .collect(),
        }
    }

    /// Creates a feature definition of an arbitrary type (test only).
    pub fn of_kind(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            instrument: None,
            chokes: Vec::new(),
            combined_name: None,
            steps: Vec::new(),
        }
    }
}

impl FeatureDefinition {
    /// Converts this definition into an instrument feature. The index is the position of the
    /// feature in the config, used for error messages.
    pub fn to_feature(&self, index: usize) -> Result<InstrumentFeature, ConfigError> {
        let invalid =
            |reason: String| ConfigError::Invalid(format!("feature #{}: {}", index, reason));

        match self.kind.as_str() {
            CHOKES => {
                let instrument = non_empty(self.instrument.as_deref())
                    .ok_or_else(|| invalid(format!("{} needs an instrument", CHOKES)))?;
                if self.chokes.is_empty() || self.chokes.iter().any(|c| c.trim().is_empty()) {
                    return Err(invalid(format!(
                        "{} needs a list of instrument names to choke",
                        CHOKES
                    )));
                }
                Ok(InstrumentFeature::ChokesOthers {
                    instrument: instrument.to_string(),
                    chokes: self.chokes.clone(),
                })
            }
            CONTINUOUS_HIHAT => {
                let combined_name = non_empty(self.combined_name.as_deref()).ok_or_else(|| {
                    invalid(format!("{} needs a combined_name", CONTINUOUS_HIHAT))
                })?;
                if self.steps.is_empty() {
                    return Err(invalid(format!(
                        "{} needs at least one step",
                        CONTINUOUS_HIHAT
                    )));
                }

                let steps = self
                    .steps
                    .iter()
                    .map(|step| {
                        if step.instrument.trim().is_empty() {
                            return Err(invalid("step has an empty instrument".to_string()));
                        }
                        if !(0.0..=1.0).contains(&step.openness) {
                            return Err(invalid(format!(
                                "openness {} of step {} must be between 0.0 and 1.0",
                                step.openness, step.instrument
                            )));
                        }
                        Ok(HihatStep {
                            instrument: step.instrument.clone(),
                            openness: step.openness,
                        })
                    })
                    .collect::<Result<Vec<HihatStep>, ConfigError>>()?;

                Ok(InstrumentFeature::ContinuousHihat {
                    steps,
                    combined_name: combined_name.to_string(),
                })
            }
            _ => Err(ConfigError::Feature {
                index,
                source: FeatureError::UnknownKind(self.kind.clone()),
            }),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
