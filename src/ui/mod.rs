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

pub mod activation;
pub mod dom;
pub mod placement;
pub mod sidebar;
pub mod template;
pub mod theme;

pub use activation::{ActivationState, ClickOutcome, MobileRule};
pub use dom::{Document, NodeId};
pub use placement::{PlaceOutcome, Position};
pub use sidebar::{Side, SidebarRegistry, SidebarUpdate};
pub use template::{BuiltinTemplates, TemplateSet};
pub use theme::{DefaultHelpers, Helpers};
