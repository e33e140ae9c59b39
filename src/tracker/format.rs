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

use crate::error::TrackerError;

/// Nested mapping / sequence / scalar tree produced by either format.
/// Mapping order follows the source text.
pub type GenericTree = serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

/// Parse tracker text, trying JSON before YAML.
pub fn parse(text: &str) -> Result<GenericTree, TrackerError> {
    parse_with_format(text).map(|(tree, _)| tree)
}

pub fn parse_with_format(text: &str) -> Result<(GenericTree, SourceFormat), TrackerError> {
    let json_err = match serde_json::from_str::<GenericTree>(text) {
        Ok(tree) => return Ok((tree, SourceFormat::Json)),
        Err(err) => err,
    };
    tracing::debug!("tracker block is not JSON ({json_err}); trying YAML");

    let yaml = serde_yaml::from_str::<serde_yaml::Value>(text).map_err(|yaml_err| {
        TrackerError::Parse { reason: format!("json: {json_err}; yaml: {yaml_err}") }
    })?;
    let tree = serde_json::to_value(yaml).map_err(|err| TrackerError::Parse {
        reason: format!("json: {json_err}; yaml: unsupported structure: {err}"),
    })?;
    Ok((tree, SourceFormat::Yaml))
}
