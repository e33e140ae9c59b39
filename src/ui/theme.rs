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

/// Divider placed between message text and inline tracker cards.
pub const DIVIDER_CLASS: &str = "sst-divider";
pub const DIVIDER_HTML: &str =
    r#"<hr class="sst-divider" style="margin-top: 15px; margin-bottom: 20px;">"#;

pub const PARSE_ERROR_HTML: &str = r#"<div class="sst-parse-error" style="color: red; font-family: monospace;">[SillySimTracker] Error: Invalid tracker data format in code block.</div>"#;

pub const ICON_INJURED: &str = "🤕";
pub const ICON_DEAD: &str = "💀";
pub const REACTION_NEUTRAL: &str = "😐";

/// Each channel is scaled by `DARKEN_NUMERATOR / DARKEN_DENOMINATOR`.
pub const DARKEN_NUMERATOR: u16 = 7;
pub const DARKEN_DENOMINATOR: u16 = 10;

const REACTIONS: &[(&str, &str)] = &[
    ("1", "👍"),
    ("2", "👎"),
    ("like", "👍"),
    ("dislike", "👎"),
    ("smile", "😊"),
    ("laugh", "😂"),
    ("love", "😍"),
    ("blush", "😳"),
    ("sad", "😢"),
    ("angry", "😠"),
    ("surprised", "😮"),
    ("neutral", REACTION_NEUTRAL),
];

/// Presentation helpers the card projector borrows from the host.
pub trait Helpers {
    fn reaction_emoji(&self, code: Option<&str>) -> String;
    fn darken_color(&self, hex: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHelpers;

impl Helpers for DefaultHelpers {
    fn reaction_emoji(&self, code: Option<&str>) -> String {
        let Some(code) = code.map(str::trim) else {
            return REACTION_NEUTRAL.to_owned();
        };
        let lower = code.to_ascii_lowercase();
        REACTIONS
            .iter()
            .find(|(key, _)| *key == lower)
            .map_or(REACTION_NEUTRAL, |(_, emoji)| *emoji)
            .to_owned()
    }

    fn darken_color(&self, hex: &str) -> String {
        let Some((r, g, b)) = parse_hex_color(hex) else {
            return hex.to_owned();
        };
        format!("#{:02x}{:02x}{:02x}", scale(r), scale(g), scale(b))
    }
}

/// Icon for a numeric `health` attribute: 1 injured, 2 dead.
#[must_use]
pub fn health_icon(health: Option<f64>) -> Option<&'static str> {
    match health {
        Some(h) if (h - 1.0).abs() < f64::EPSILON => Some(ICON_INJURED),
        Some(h) if (h - 2.0).abs() < f64::EPSILON => Some(ICON_DEAD),
        _ => None,
    }
}

fn scale(channel: u8) -> u8 {
    u8::try_from(u16::from(channel) * DARKEN_NUMERATOR / DARKEN_DENOMINATOR).unwrap_or(u8::MAX)
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().strip_prefix('#')?;
    match digits.len() {
        3 => {
            let mut channels = digits.chars().map(|c| c.to_digit(16));
            let mut next = || channels.next().flatten().and_then(|d| u8::try_from(d * 17).ok());
            Some((next()?, next()?, next()?))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}
