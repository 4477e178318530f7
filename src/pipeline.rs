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

//! Kit generation: classify every path, aggregate the samples into instruments, normalize
//! their power and apply the configured features.
//!
//! Classification is spread over a rayon pool. Everything after it runs on the calling thread
//! and sees samples in input path order.

use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::classify::{ClassificationError, PathClassifier};
use crate::features::{apply_features, FeatureError, InstrumentFeature};
use crate::kit::{Instruments, Sample};
use crate::normalize::normalize_all;

#[cfg(test)]
mod tests;

/// Errors that abort kit generation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Unable to start classification workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),

    /// A feature failed after classification finished. The summary covers the classified
    /// paths and the instruments aggregated before the features ran.
    #[error("Feature error: {source}")]
    Feature {
        #[source]
        source: FeatureError,
        summary: RunSummary,
    },
}

/// Everything needed to generate one kit.
pub struct KitConfig {
    /// The name of the kit.
    name: String,
    /// The description of the kit.
    description: String,
    /// The extensions of the audio files to scan for.
    extensions: Vec<String>,
    /// Interprets library paths as samples.
    classifier: Box<dyn PathClassifier>,
    /// The instrument features, in application order.
    features: Vec<InstrumentFeature>,
}

impl KitConfig {
    /// Creates a new kit config.
    pub fn new(
        name: &str,
        description: &str,
        extensions: Vec<String>,
        classifier: Box<dyn PathClassifier>,
        features: Vec<InstrumentFeature>,
    ) -> KitConfig {
        KitConfig {
            name: name.to_string(),
            description: description.to_string(),
            extensions,
            classifier,
            features,
        }
    }

    /// Replaces the configured name, if a new one is given.
    pub fn with_name(mut self, name: Option<String>) -> KitConfig {
        if let Some(name) = name {
            self.name = name;
        }
        self
    }

    /// Replaces the configured description, if a new one is given.
    pub fn with_description(mut self, description: Option<String>) -> KitConfig {
        if let Some(description) = description {
            self.description = description;
        }
        self
    }

    /// Gets the kit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the kit description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Gets the audio file extensions.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Gets the path classifier.
    pub fn classifier(&self) -> &dyn PathClassifier {
        self.classifier.as_ref()
    }

    /// Gets the instrument features.
    pub fn features(&self) -> &[InstrumentFeature] {
        &self.features
    }
}

impl fmt::Debug for KitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KitConfig")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("extensions", &self.extensions)
            .field("classifier", &self.classifier.name())
            .field("features", &self.features)
            .finish()
    }
}

/// A path that could not be classified.
#[derive(Debug, Clone)]
pub struct PathFailure {
    pub path: PathBuf,
    pub error: ClassificationError,
}

/// Counts reported at the end of every run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// The number of paths classified successfully.
    pub classified: usize,
    /// The paths that failed classification.
    pub failures: Vec<PathFailure>,
    /// The number of instruments in the generated kit.
    pub instruments: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsed {} instruments from {} paths successfully, {} paths failed",
            self.instruments,
            self.classified,
            self.failures.len()
        )
    }
}

/// The samples produced by classification, in input path order.
#[derive(Debug)]
pub struct Classified {
    pub samples: Vec<Sample>,
    pub summary: RunSummary,
}

/// A generated kit, ready for export.
#[derive(Debug, Clone)]
pub struct GeneratedKit {
    pub name: String,
    pub description: String,
    pub instruments: Instruments,
}

/// Classifies one path and checks the samples it produced.
pub fn classify_path(
    classifier: &dyn PathClassifier,
    path: &Path,
) -> Result<Vec<Sample>, ClassificationError> {
    let samples = classifier.classify(path)?;
    for sample in &samples {
        sample
            .validate()
            .map_err(|source| ClassificationError::Malformed {
                path: path.display().to_string(),
                source,
            })?;
    }
    Ok(samples)
}

/// Classifies every path on a pool of the given number of threads. Failed paths are recorded
/// in the summary and don't stop the run.
pub fn classify_all(
    classifier: &dyn PathClassifier,
    paths: &[PathBuf],
    jobs: usize,
) -> Result<Classified, PipelineError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .thread_name(|i| format!("kitgen-classify-{i}"))
        .build()?;

    // Collecting an indexed parallel iterator keeps the input order.
    let results: Vec<Result<Vec<Sample>, ClassificationError>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| classify_path(classifier, path))
            .collect()
    });

    let mut samples = Vec::new();
    let mut summary = RunSummary::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(classified) => {
                summary.classified += 1;
                samples.extend(classified);
            }
            Err(error) => {
                debug!(path = ?path, err = %error, "Failed to classify path");
                summary.failures.push(PathFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }

    info!(
        classified = summary.classified,
        failed = summary.failures.len(),
        samples = samples.len(),
        "Classified library paths"
    );
    Ok(Classified { samples, summary })
}

/// Aggregates the classified samples into instruments and normalizes their power.
pub fn assemble(samples: Vec<Sample>) -> Instruments {
    let mut instruments = aggregate(samples);
    info!(instruments = instruments.len(), "Remapping power values to linear scale");
    normalize_all(&mut instruments);
    instruments
}

/// Runs the whole pipeline over the given library-relative paths: classification, assembly and
/// the configured features, in order.
pub fn generate(
    config: &KitConfig,
    paths: &[PathBuf],
    jobs: usize,
) -> Result<(GeneratedKit, RunSummary), PipelineError> {
    let Classified {
        samples,
        mut summary,
    } = classify_all(config.classifier(), paths, jobs)?;
    let instruments = assemble(samples);
    summary.instruments = instruments.len();

    let instruments = match apply_features(instruments, config.features()) {
        Ok(instruments) => instruments,
        Err(source) => return Err(PipelineError::Feature { source, summary }),
    };
    summary.instruments = instruments.len();

    Ok((
        GeneratedKit {
            name: config.name().to_string(),
            description: config.description().to_string(),
            instruments,
        },
        summary,
    ))
}
