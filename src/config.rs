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

use tracing::info;

use crate::pipeline::KitConfig;

mod classifier;
mod error;
mod feature;
mod kit;

pub use classifier::ClassifierDefinition;
pub use error::ConfigError;
pub use feature::{FeatureDefinition, HihatStepDefinition};
pub use kit::Kit;

/// Loads and validates a kit config file, resolving its classifier and features.
pub fn load_kit_config(path: &Path) -> Result<KitConfig, ConfigError> {
    let kit = Kit::load(path)?;
    let config = kit.to_kit_config()?;
    info!(
        path = ?path,
        name = config.name(),
        classifier = config.classifier().name(),
        features = config.features().len(),
        "Loaded kit config"
    );
    Ok(config)
}
