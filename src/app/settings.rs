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

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

const CONFIG_DIR_NAME: &str = "sim-tracker";
const SETTINGS_FILE: &str = "settings.json";

/// User-facing settings, stored as camelCase JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub is_enabled: bool,
    pub code_block_identifier: String,
    pub hide_sim_blocks: bool,
    pub template_file: String,
    pub custom_template_html: String,
    pub default_bg_color: String,
    pub show_thought_bubble: bool,
    pub template_position: String,
    pub mobile_breakpoint: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_enabled: true,
            code_block_identifier: "sim".to_owned(),
            hide_sim_blocks: true,
            template_file: "dating-card-template.html".to_owned(),
            custom_template_html: String::new(),
            default_bg_color: "#6a5acd".to_owned(),
            show_thought_bubble: true,
            template_position: "BOTTOM".to_owned(),
            mobile_breakpoint: 768,
        }
    }
}

#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE))
}

/// Read settings from `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<Settings, TrackerError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "settings file missing; using defaults");
            return Ok(Settings::default());
        }
        Err(err) => {
            return Err(TrackerError::SettingsUnreadable {
                reason: format!("{}: {err}", path.display()),
            });
        }
    };
    serde_json::from_str(&raw).map_err(|err| TrackerError::SettingsUnreadable {
        reason: format!("{}: {err}", path.display()),
    })
}
