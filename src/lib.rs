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

pub mod app;
pub mod error;
pub mod tracker;
pub mod ui;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sst-render", about = "Render status tracker cards for a chat transcript")]
pub struct Cli {
    /// Chat transcript: a JSON array of `{name, mes, is_user, is_system}`
    #[arg(long, short)]
    pub transcript: std::path::PathBuf,

    /// Settings file (defaults to the user config dir)
    #[arg(long, short)]
    pub settings: Option<std::path::PathBuf>,

    /// Override the card position (ABOVE, BELOW, LEFT, RIGHT, MACRO)
    #[arg(long, short)]
    pub position: Option<String>,

    /// Render only this message id instead of refreshing every message
    #[arg(long, short)]
    pub message: Option<usize>,

    /// Viewport width in pixels, used for the mobile sidebar rule
    #[arg(long, value_name = "PX")]
    pub viewport_width: Option<u32>,

    /// Write tracing diagnostics to a file (disabled unless explicitly set)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<std::path::PathBuf>,

    /// Tracing filter directives (example: `info,sim_tracker=debug`)
    /// Falls back to `RUST_LOG` when omitted.
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to `--log-file` instead of truncating on startup
    #[arg(long)]
    pub log_append: bool,
}
