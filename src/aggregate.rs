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
use tracing::warn;

use crate::kit::{Instrument, Instruments, Sample};

/// Folds classified samples into the instrument table.
///
/// Samples sharing an instrument and sample name are merged into one entry: the files of every
/// occurrence are appended in input order, while power and openness are taken from the first
/// occurrence only. The resulting table doesn't depend on input order except for the order of
/// files within a sample.
pub fn aggregate<I>(samples: I) -> Instruments
where
    I: IntoIterator<Item = Sample>,
{
    let mut instruments = Instruments::new();

    for sample in samples {
        let instrument = instruments
            .entry(sample.instrument().to_string())
            .or_insert_with(|| Instrument::new(sample.instrument()));

        let aggregated = instrument
            .samples_mut()
            .entry(sample.name().to_string())
            .or_insert_with(|| sample.without_files());

        for file in sample.files() {
            if aggregated
                .files()
                .iter()
                .any(|existing| existing.output_channel() == file.output_channel())
            {
                warn!(
                    instrument = sample.instrument(),
                    sample = sample.name(),
                    channel = file.output_channel(),
                    path = ?file.source_path(),
                    "Sample already has a file for this channel"
                );
            }
            aggregated.files_mut().push(file.clone());
        }
    }

    instruments
}
