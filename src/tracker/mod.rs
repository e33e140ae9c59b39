// sim-tracker - Status tracker cards for chat messages
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Data pipeline: raw message text to card payloads.
//!
//! `extract` finds the fenced block, `format` parses it into a generic tree,
//! `model` reconciles the legacy and current shapes into a [`CanonicalTracker`],
//! and `project` turns that into the payloads templates consume.

pub mod extract;
pub mod format;
pub mod model;
pub mod project;

pub use extract::{BlockExtractor, RawBlock};
pub use format::{GenericTree, SourceFormat};
pub use model::{CanonicalTracker, CharacterRecord, TrackerShape, WorldData};
pub use project::{CardPayload, Derived, ProjectionContext, RenderPayload, TabbedPayload};
