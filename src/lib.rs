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

//! Generates DrumGizmo drum kits from folders of audio samples.
//!
//! Paths found in a sample library are classified into samples, aggregated into instruments,
//! normalized and extended with instrument features before being written out as kit files.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod export;
pub mod features;
pub mod kit;
pub mod normalize;
pub mod pipeline;
pub mod scan;
pub mod util;
