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

//! The drum kit data model shared by every stage of kit generation.
//!
//! - [`SampleFile`]: one audio file routed to one output channel.
//! - [`Sample`]: a playable variant of an instrument (velocity or articulation layer).
//! - [`Instrument`]: a named drum voice with its samples and choke targets.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Reasons a classified sample can't be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    #[error("empty instrument name")]
    EmptyInstrument,

    #[error("empty sample name for instrument {0}")]
    EmptyName(String),

    #[error("sample {sample} has invalid power {power}")]
    InvalidPower { sample: String, power: f64 },

    #[error("sample {0} has no files")]
    NoFiles(String),

    #[error("sample {sample} routes more than one file to channel {channel}")]
    DuplicateChannel { sample: String, channel: String },
}

/// The instrument table, keyed by instrument name.
pub type Instruments = BTreeMap<String, Instrument>;

/// A single audio file feeding one output channel of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFile {
    /// The path of the audio file. Relative to the library root unless rewritten for export.
    source_path: PathBuf,
    /// The channel within the audio file to read (1-indexed).
    source_channel: u16,
    /// The kit output channel this file is routed to.
    output_channel: String,
}

impl SampleFile {
    /// Creates a new sample file.
    pub fn new(source_path: PathBuf, source_channel: u16, output_channel: &str) -> SampleFile {
        SampleFile {
            source_path,
            source_channel,
            output_channel: output_channel.to_string(),
        }
    }

    /// Gets the path of the audio file.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Gets the channel within the audio file.
    pub fn source_channel(&self) -> u16 {
        self.source_channel
    }

    /// Gets the output channel.
    pub fn output_channel(&self) -> &str {
        &self.output_channel
    }

    /// Returns a copy of this file pointing at a different path.
    pub(crate) fn with_source_path(&self, source_path: PathBuf) -> SampleFile {
        SampleFile {
            source_path,
            source_channel: self.source_channel,
            output_channel: self.output_channel.clone(),
        }
    }
}

/// A named playback variant of an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// The instrument this sample belongs to.
    instrument: String,
    /// The name of the sample, unique within its instrument.
    name: String,
    /// The relative loudness of the sample.
    power: f64,
    /// The hi-hat openness of the sample, if it belongs to a continuous instrument.
    openness: Option<f64>,
    /// The audio files of this sample, at most one per output channel.
    files: Vec<SampleFile>,
}

impl Sample {
    /// Creates a new sample without openness.
    pub fn new(instrument: &str, name: &str, power: f64, files: Vec<SampleFile>) -> Sample {
        Sample {
            instrument: instrument.to_string(),
            name: name.to_string(),
            power,
            openness: None,
            files,
        }
    }

    /// Gets the instrument name.
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Gets the sample name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the power of the sample.
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Gets the openness of the sample.
    pub fn openness(&self) -> Option<f64> {
        self.openness
    }

    /// Gets the audio files of the sample.
    pub fn files(&self) -> &[SampleFile] {
        &self.files
    }

    pub(crate) fn set_power(&mut self, power: f64) {
        self.power = power;
    }

    pub(crate) fn set_openness(&mut self, openness: f64) {
        self.openness = Some(openness);
    }

    pub(crate) fn set_instrument(&mut self, instrument: &str) {
        self.instrument = instrument.to_string();
    }

    pub(crate) fn files_mut(&mut self) -> &mut Vec<SampleFile> {
        &mut self.files
    }

    /// Returns a copy of this sample with no files, used to seed an aggregated entry.
    pub(crate) fn without_files(&self) -> Sample {
        Sample {
            instrument: self.instrument.clone(),
            name: self.name.clone(),
            power: self.power,
            openness: self.openness,
            files: Vec::new(),
        }
    }

    /// Checks that a freshly classified sample is well formed: a finite, non-negative
    /// power, at least one file, and no output channel used twice.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.instrument.is_empty() {
            return Err(SampleError::EmptyInstrument);
        }
        if self.name.is_empty() {
            return Err(SampleError::EmptyName(self.instrument.clone()));
        }
        if !self.power.is_finite() || self.power < 0.0 {
            return Err(SampleError::InvalidPower {
                sample: self.name.clone(),
                power: self.power,
            });
        }
        if self.files.is_empty() {
            return Err(SampleError::NoFiles(self.name.clone()));
        }

        let mut channels = BTreeSet::new();
        for file in &self.files {
            if !channels.insert(file.output_channel()) {
                return Err(SampleError::DuplicateChannel {
                    sample: self.name.clone(),
                    channel: file.output_channel().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} (Power={}, Files={})",
            self.instrument,
            self.name,
            self.power,
            self.files.len()
        )?;
        if let Some(openness) = self.openness {
            write!(f, " (Openness={})", openness)?;
        }
        Ok(())
    }
}

/// A drum voice made up of samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Instrument {
    /// The name of the instrument.
    name: String,
    /// The samples of the instrument by name.
    samples: BTreeMap<String, Sample>,
    /// The instruments this instrument silences when triggered.
    chokes: BTreeSet<String>,
}

impl Instrument {
    /// Creates a new, empty instrument.
    pub fn new(name: &str) -> Instrument {
        Instrument {
            name: name.to_string(),
            samples: BTreeMap::new(),
            chokes: BTreeSet::new(),
        }
    }

    /// Gets the instrument name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the samples by name.
    pub fn samples(&self) -> &BTreeMap<String, Sample> {
        &self.samples
    }

    /// Gets a single sample by name.
    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.get(name)
    }

    /// Gets the names of the instruments this instrument chokes.
    pub fn chokes(&self) -> &BTreeSet<String> {
        &self.chokes
    }

    pub(crate) fn samples_mut(&mut self) -> &mut BTreeMap<String, Sample> {
        &mut self.samples
    }

    pub(crate) fn add_choke(&mut self, instrument: &str) {
        self.chokes.insert(instrument.to_string());
    }

    /// Returns the output channels used by this instrument in first-seen order.
    pub fn output_channels(&self) -> Vec<&str> {
        let mut channels: Vec<&str> = Vec::new();
        for file in self.samples.values().flat_map(|sample| sample.files()) {
            if !channels.contains(&file.output_channel()) {
                channels.push(file.output_channel());
            }
        }
        channels
    }

    /// Returns the highest power across all samples, or None for an empty instrument.
    pub fn max_power(&self) -> Option<f64> {
        self.samples
            .values()
            .map(|sample| sample.power())
            .reduce(f64::max)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Samples={}, Channels={})",
            self.name,
            self.samples.len(),
            self.output_channels().join(",")
        )?;
        if !self.chokes.is_empty() {
            write!(
                f,
                " (Chokes={})",
                self.chokes.iter().cloned().collect::<Vec<String>>().join(",")
            )?;
        }
        Ok(())
    }
}
