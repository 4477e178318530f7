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

//! Instrument features applied to the aggregated instrument table.
//!
//! Features run in the order they are configured. A feature sees every instrument produced by
//! the classifier and by the features before it.

use std::fmt;

use tracing::{info, warn};

use crate::kit::{Instrument, Instruments};

/// Errors raised while applying instrument features. These abort kit generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("{feature} references instrument \"{instrument}\", which doesn't exist")]
    MissingInstrument { feature: String, instrument: String },

    #[error("{feature} would create instrument \"{instrument}\", which already exists")]
    InstrumentExists { feature: String, instrument: String },

    #[error("unknown instrument feature type \"{0}\"")]
    UnknownKind(String),
}

/// One source instrument of a continuous hi-hat.
#[derive(Debug, Clone, PartialEq)]
pub struct HihatStep {
    /// The instrument whose samples are used for this step.
    pub instrument: String,
    /// The openness assigned to the samples of this step.
    pub openness: f64,
}

/// A feature that transforms the instrument table.
#[derive(Debug, Clone, PartialEq)]
pub enum InstrumentFeature {
    /// The instrument silences the listed instruments when triggered.
    ChokesOthers {
        instrument: String,
        chokes: Vec<String>,
    },
    /// A new instrument assembled from the samples of several hi-hat instruments, each tagged
    /// with an openness.
    ContinuousHihat {
        steps: Vec<HihatStep>,
        combined_name: String,
    },
}

impl InstrumentFeature {
    /// The configuration type name of the feature.
    pub fn kind(&self) -> &'static str {
        match self {
            InstrumentFeature::ChokesOthers { .. } => "chokes",
            InstrumentFeature::ContinuousHihat { .. } => "continuous_hihat",
        }
    }
}

impl fmt::Display for InstrumentFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentFeature::ChokesOthers { instrument, chokes } => {
                write!(f, "{} chokes {}", instrument, chokes.join(", "))
            }
            InstrumentFeature::ContinuousHihat {
                steps,
                combined_name,
            } => {
                let steps: Vec<String> = steps
                    .iter()
                    .map(|step| format!("{}@{}", step.instrument, step.openness))
                    .collect();
                write!(
                    f,
                    "continuous hi-hat {} from {}",
                    combined_name,
                    steps.join(", ")
                )
            }
        }
    }
}

/// Applies the features in order, returning the transformed table. On error the table is
/// dropped, as it can no longer be trusted.
pub fn apply_features(
    mut instruments: Instruments,
    features: &[InstrumentFeature],
) -> Result<Instruments, FeatureError> {
    for feature in features {
        info!(feature = %feature, "Applying instrument feature");
        match feature {
            InstrumentFeature::ChokesOthers { instrument, chokes } => {
                apply_chokes(&mut instruments, instrument, chokes)
            }
            InstrumentFeature::ContinuousHihat {
                steps,
                combined_name,
            } => {
                let combined = continuous_hihat(&instruments, steps, combined_name)?;
                instruments.insert(combined_name.clone(), combined);
            }
        }
    }

    Ok(instruments)
}

fn apply_chokes(instruments: &mut Instruments, instrument: &str, chokes: &[String]) {
    match instruments.get_mut(instrument) {
        Some(instrument) => {
            for choke in chokes {
                instrument.add_choke(choke);
            }
        }
        None => warn!(instrument, "Choke instrument doesn't exist, ignoring"),
    }
}

/// Builds the combined instrument without touching the table, so a failed step leaves nothing
/// behind.
fn continuous_hihat(
    instruments: &Instruments,
    steps: &[HihatStep],
    combined_name: &str,
) -> Result<Instrument, FeatureError> {
    let feature = format!("continuous hi-hat \"{}\"", combined_name);
    if instruments.contains_key(combined_name) {
        return Err(FeatureError::InstrumentExists {
            feature,
            instrument: combined_name.to_string(),
        });
    }

    let mut combined = Instrument::new(combined_name);
    for step in steps {
        let source = instruments
            .get(&step.instrument)
            .ok_or_else(|| FeatureError::MissingInstrument {
                feature: feature.clone(),
                instrument: step.instrument.clone(),
            })?;

        for (name, sample) in source.samples() {
            if combined.samples().contains_key(name) {
                continue;
            }
            let mut sample = sample.clone();
            sample.set_instrument(combined_name);
            sample.set_openness(step.openness);
            combined.samples_mut().insert(name.clone(), sample);
        }
    }

    Ok(combined)
}
