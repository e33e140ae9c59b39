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

use std::cell::Cell;
use std::rc::Rc;

use crate::error::TrackerError;

/// Flag set while the host is generating a reply.
///
/// The only way to set it is [`GenerationGate::begin`], whose guard clears it
/// again on drop, so set and clear always pair up.
#[derive(Debug, Clone, Default)]
pub struct GenerationGate {
    active: Rc<Cell<bool>>,
}

impl GenerationGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Result<GenerationGuard, TrackerError> {
        if self.active.replace(true) {
            return Err(TrackerError::GenerationInProgress);
        }
        tracing::debug!("generation gate set");
        Ok(GenerationGuard { active: Rc::clone(&self.active) })
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.active.get()
    }
}

#[derive(Debug)]
#[must_use = "the gate clears as soon as the guard is dropped"]
pub struct GenerationGuard {
    active: Rc<Cell<bool>>,
}

impl Drop for GenerationGuard {
    fn drop(&mut self) {
        self.active.set(false);
        tracing::debug!("generation gate cleared");
    }
}
