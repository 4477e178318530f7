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

//! DrumGizmo kit export.
//!
//! A kit is written as one drumkit file plus one instrument file per instrument:
//!
//! ```text
//! <output>/<kit>.xml
//! <output>/<kit>_instruments/<instrument>.xml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::kit::{Instrument, Instruments};
use crate::pipeline::GeneratedKit;
use crate::util::{portable_path, relative_path};

use self::xml::XmlWriter;

mod xml;

const INSTRUMENT_VERSION: &str = "2.0";

/// Errors raised while writing a kit to disk.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Output directory {0} already exists, please delete it first")]
    OutputExists(PathBuf),

    #[error("Name \"{0}\" can't be used as a file name")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Renders an instrument file.
pub fn instrument_xml(instrument: &Instrument) -> String {
    let mut writer = XmlWriter::new();
    writer.open(
        "instrument",
        &[("name", instrument.name()), ("version", INSTRUMENT_VERSION)],
    );
    writer.open("samples", &[]);

    for sample in instrument.samples().values() {
        let power = format_value(sample.power());
        let openness = sample.openness().map(format_value);
        let mut attributes = vec![("name", sample.name()), ("power", power.as_str())];
        if let Some(openness) = &openness {
            attributes.push(("openness", openness.as_str()));
        }
        writer.open("sample", &attributes);

        for file in sample.files() {
            let path = portable_path(file.source_path());
            let file_channel = file.source_channel().to_string();
            writer.empty(
                "audiofile",
                &[
                    ("channel", file.output_channel()),
                    ("file", path.as_str()),
                    ("filechannel", file_channel.as_str()),
                ],
            );
        }
        writer.close("sample");
    }

    writer.close("samples");
    writer.close("instrument");
    writer.finish()
}

/// Renders the drumkit file. instruments_dir is the instrument directory relative to the
/// drumkit file.
pub fn drumkit_xml(kit: &GeneratedKit, instruments_dir: &str) -> String {
    let mut writer = XmlWriter::new();
    writer.open(
        "drumkit",
        &[
            ("name", kit.name.as_str()),
            ("description", kit.description.as_str()),
        ],
    );

    writer.open("channels", &[]);
    for channel in kit_channels(&kit.instruments) {
        writer.empty("channel", &[("name", channel)]);
    }
    writer.close("channels");

    writer.open("instruments", &[]);
    for (name, instrument) in &kit.instruments {
        let file = format!("{}/{}.xml", instruments_dir, name);
        writer.open("instrument", &[("name", name.as_str()), ("file", file.as_str())]);
        for channel in instrument.output_channels() {
            writer.empty("channelmap", &[("in", channel), ("out", channel)]);
        }
        if !instrument.chokes().is_empty() {
            writer.open("chokes", &[]);
            for choke in instrument.chokes() {
                writer.empty("choke", &[("instrument", choke.as_str())]);
            }
            writer.close("chokes");
        }
        writer.close("instrument");
    }
    writer.close("instruments");

    writer.close("drumkit");
    writer.finish()
}

/// Every output channel used in the kit, in first-seen order.
fn kit_channels(instruments: &Instruments) -> Vec<&str> {
    let mut channels: Vec<&str> = Vec::new();
    for channel in instruments.values().flat_map(|i| i.output_channels()) {
        if !channels.contains(&channel) {
            channels.push(channel);
        }
    }
    channels
}

/// Formats powers and openness values so whole numbers keep a decimal point.
fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

/// The directory instrument files are written to, relative to the output directory.
pub fn instruments_dir_name(kit_name: &str) -> String {
    format!("{}_instruments", kit_name)
}

/// Rewrites every sample file path, given relative to root, to be relative to the directory
/// the instrument files are written to.
pub fn make_paths_relative(
    instruments: &mut Instruments,
    root: &Path,
    instruments_dir: &Path,
) -> Result<(), ExportError> {
    let root = std::path::absolute(root)?;
    let instruments_dir = std::path::absolute(instruments_dir)?;

    for instrument in instruments.values_mut() {
        for sample in instrument.samples_mut().values_mut() {
            for file in sample.files_mut().iter_mut() {
                let path = relative_path(&root.join(file.source_path()), &instruments_dir);
                *file = file.with_source_path(path);
            }
        }
    }
    Ok(())
}

fn check_file_name(name: &str) -> Result<(), ExportError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ExportError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Writes the kit into a new output directory and returns the path of the drumkit file. When
/// root is given, sample paths are rewritten relative to the instrument directory first.
pub fn write_kit(
    kit: &GeneratedKit,
    output_dir: &Path,
    root: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    if output_dir.exists() {
        return Err(ExportError::OutputExists(output_dir.to_path_buf()));
    }
    check_file_name(&kit.name)?;
    for name in kit.instruments.keys() {
        check_file_name(name)?;
    }

    let instruments_dir_name = instruments_dir_name(&kit.name);
    let instruments_dir = output_dir.join(&instruments_dir_name);

    let mut instruments = kit.instruments.clone();
    if let Some(root) = root {
        info!(root = ?root, "Resolving relative paths");
        make_paths_relative(&mut instruments, root, &instruments_dir)?;
    }

    fs::create_dir_all(&instruments_dir)?;
    for (name, instrument) in &instruments {
        let path = instruments_dir.join(format!("{}.xml", name));
        fs::write(&path, instrument_xml(instrument))?;
        info!(path = ?path, samples = instrument.samples().len(), "Wrote instrument");
    }

    let kit = GeneratedKit {
        name: kit.name.clone(),
        description: kit.description.clone(),
        instruments,
    };
    let drumkit_path = output_dir.join(format!("{}.xml", kit.name));
    fs::write(&drumkit_path, drumkit_xml(&kit, &instruments_dir_name))?;
    info!(path = ?drumkit_path, instruments = kit.instruments.len(), "Wrote drumkit");

    Ok(drumkit_path)
}
