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

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("tracker block is neither valid JSON nor valid YAML: {reason}")]
    Parse { reason: String },
    #[error("tracker data must be a mapping, found {found}")]
    Shape { found: &'static str },
    #[error("anchor `{anchor}` not found in page")]
    MissingAnchor { anchor: String },
    #[error("a generation cycle is already in progress")]
    GenerationInProgress,
    #[error("settings file could not be loaded: {reason}")]
    SettingsUnreadable { reason: String },
    #[error("chat transcript could not be loaded: {reason}")]
    TranscriptUnreadable { reason: String },
}

impl TrackerError {
    pub const PARSE_EXIT_CODE: i32 = 20;
    pub const SHAPE_EXIT_CODE: i32 = 21;
    pub const MISSING_ANCHOR_EXIT_CODE: i32 = 22;
    pub const GENERATION_IN_PROGRESS_EXIT_CODE: i32 = 23;
    pub const SETTINGS_UNREADABLE_EXIT_CODE: i32 = 24;
    pub const TRANSCRIPT_UNREADABLE_EXIT_CODE: i32 = 25;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parse { .. } => Self::PARSE_EXIT_CODE,
            Self::Shape { .. } => Self::SHAPE_EXIT_CODE,
            Self::MissingAnchor { .. } => Self::MISSING_ANCHOR_EXIT_CODE,
            Self::GenerationInProgress => Self::GENERATION_IN_PROGRESS_EXIT_CODE,
            Self::SettingsUnreadable { .. } => Self::SETTINGS_UNREADABLE_EXIT_CODE,
            Self::TranscriptUnreadable { .. } => Self::TRANSCRIPT_UNREADABLE_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "Invalid tracker data format in code block.",
            Self::Shape { .. } => "Tracker data must be an object of characters.",
            Self::MissingAnchor { .. } => "The chat page is missing an expected element.",
            Self::GenerationInProgress => "Another generation cycle is still running.",
            Self::SettingsUnreadable { .. } => {
                "Settings file could not be read. Fix or remove it to fall back to defaults."
            }
            Self::TranscriptUnreadable { .. } => {
                "Chat transcript could not be read. Pass a JSON array of chat messages."
            }
        }
    }
}
