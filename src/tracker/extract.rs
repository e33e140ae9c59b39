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

use regex::Regex;

const FENCE: &str = "```";

/// Text between the fences of a tracker block, identifier stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock(String);

impl RawBlock {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Locates tracker blocks fenced as ```` ```<identifier> ... ``` ````.
#[derive(Debug, Clone)]
pub struct BlockExtractor {
    identifier: String,
    pattern: Regex,
}

impl BlockExtractor {
    pub fn new(identifier: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(r"(?s){FENCE}{}.*?{FENCE}", regex::escape(identifier)))?;
        Ok(Self { identifier: identifier.to_owned(), pattern })
    }

    #[must_use]
    pub fn contains_block(&self, raw_text: &str) -> bool {
        self.pattern.is_match(raw_text)
    }

    /// First block in `raw_text`, or `None` when the message carries none.
    #[must_use]
    pub fn extract(&self, raw_text: &str) -> Option<RawBlock> {
        let found = self.pattern.find(raw_text)?;
        let unfenced = found.as_str().replace(FENCE, "");
        let body = unfenced.strip_prefix(self.identifier.as_str()).unwrap_or(&unfenced);
        Some(RawBlock(body.trim().to_owned()))
    }

    /// Wrap every block in a hidden span so display formatting keeps the
    /// source but the reader does not see it.
    #[must_use]
    pub fn hide_blocks(&self, raw_text: &str) -> String {
        self.pattern
            .replace_all(raw_text, |caps: &regex::Captures<'_>| {
                format!(r#"<span style="display: none !important;">{}</span>"#, &caps[0])
            })
            .into_owned()
    }
}
