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
use tracing::debug;

use crate::kit::{Instrument, Instruments};

/// The smallest divisor used when normalizing, so instruments whose powers are all below 1.0
/// are never scaled up.
const MIN_SCALE: f64 = 1.0;

/// Remaps the sample powers of an instrument onto a linear scale with a maximum of 1.0.
/// Every power is divided by the instrument's highest power, or by 1.0 if that is smaller.
pub fn normalize(instrument: &mut Instrument) {
    let scale = instrument.max_power().map_or(MIN_SCALE, |max| max.max(MIN_SCALE));
    debug!(instrument = instrument.name(), scale, "Normalizing sample power");

    for sample in instrument.samples_mut().values_mut() {
        sample.set_power(sample.power() / scale);
    }
}

/// Normalizes every instrument in the table independently.
pub fn normalize_all(instruments: &mut Instruments) {
    for instrument in instruments.values_mut() {
        normalize(instrument);
    }
}
