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

use clap::Parser;
use sim_tracker::Cli;
use sim_tracker::app::{
    ChatHost as _, Settings, Tracker, TranscriptHost, build_chat_page, default_settings_path,
    load_settings,
};
use sim_tracker::error::TrackerError;
use sim_tracker::ui::{BuiltinTemplates, DefaultHelpers, Position, TemplateSet as _};
use std::fs::OpenOptions;

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        if let Some(tracker_error) = extract_tracker_error(&err) {
            eprintln!("{}", tracker_error.user_message());
            std::process::exit(tracker_error.exit_code());
        }
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let settings = resolve_settings(&cli)?;
    let host = TranscriptHost::load(&cli.transcript)?;

    let mut templates = BuiltinTemplates::from_settings(&settings);
    if let Some(name) = cli.position.as_deref() {
        templates = BuiltinTemplates::new(templates.is_tabbed(), Position::parse(name));
    }
    let mut tracker =
        Tracker::with_collaborators(settings, Box::new(templates), Box::new(DefaultHelpers))?;
    if let Some(px) = cli.viewport_width {
        tracker.set_viewport_width(px);
    }

    let mut page = build_chat_page(host.messages().len());
    if let Some(id) = cli.message {
        if host.message(id).is_none() {
            return Err(anyhow::anyhow!("message {id} is not in the transcript"));
        }
        let outcome = tracker.render_tracker(&mut page, &host, id);
        tracing::info!(id, ?outcome, "rendered message");
    } else {
        let outcomes = tracker.refresh_all_cards(&mut page, &host);
        tracing::info!(rendered = outcomes.len(), "refreshed transcript");
    }

    println!("{}", page.inner_html(page.root()));
    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<Settings, TrackerError> {
    match cli.settings.as_deref() {
        Some(path) => load_settings(path),
        None => default_settings_path()
            .map_or_else(|| Ok(Settings::default()), |path| load_settings(&path)),
    }
}

fn extract_tracker_error(err: &anyhow::Error) -> Option<TrackerError> {
    err.chain().find_map(|cause| cause.downcast_ref::<TrackerError>().cloned())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!(
                "RUST_LOG is set, but tracing is disabled without --log-file <PATH>. \
Use --log-file to enable diagnostics."
            );
        }
        return Ok(());
    };

    let directives = cli
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_owned());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.as_str())
        .map_err(|e| anyhow::anyhow!("invalid tracing filter `{directives}`: {e}"))?;

    let mut options = OpenOptions::new();
    options.create(true).write(true);
    if cli.log_append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    let file = options
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(
        target: "diagnostics",
        version = env!("CARGO_PKG_VERSION"),
        log_file = %path.display(),
        log_filter = %directives,
        log_append = cli.log_append,
        "tracing enabled"
    );

    Ok(())
}
