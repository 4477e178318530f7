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
use crate::features::FeatureError;

/// Typed error for kit config failures so callers can distinguish a file that
/// doesn't parse from one that parses but describes an unusable kit.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] serde_yml::Error),

    #[error("Unknown classifier \"{name}\", expected one of: {expected}")]
    UnknownClassifier { name: String, expected: String },

    #[error("Invalid feature #{index}: {source}")]
    Feature {
        index: usize,
        #[source]
        source: FeatureError,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}
