use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr, Stdout};

use meeple_bgg::{EnrichReport, Settings, create_pipeline, run_with_events};
use meeple_core::{GameRecord, Suggestions, validate_owner_name, validate_player_count};

use crate::CliError;
use crate::commands::format_record;
use crate::progress::EnrichProgress;

/// Run the suggest command.
pub(crate) fn run_suggest(
    owner: &str,
    players: u32,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let owner = validate_owner_name(owner)?;
    let players = validate_player_count(players)?;

    let settings = Settings::load()?;
    let pipeline = create_pipeline(&settings)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {e}")))?;

    let report = rt.block_on(async {
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();
        let mut progress = EnrichProgress::new(
            quiet || json,
            format!("Fetching collection for {}...", owner),
        );

        let result = run_with_events(
            pipeline.suggest_for_owner(owner, players, event_tx),
            event_rx,
            |e| progress.handle(e),
        )
        .await;

        progress.finish();
        result
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.records)?);
        return Ok(());
    }

    for line in failure_lines(&report) {
        log::warn!("{}", line);
    }
    for line in report_lines(owner, players, &report) {
        println!("{}", line);
    }
    Ok(())
}

/// One warning per game that could not be checked.
fn failure_lines(report: &EnrichReport) -> Vec<String> {
    report
        .failures
        .iter()
        .map(|failure| {
            format!(
                "  {} Skipped game {}: {}",
                "\u{2718}".if_supports_color(Stderr, |t| t.red()),
                failure.id,
                failure.error,
            )
        })
        .collect()
}

/// The answer: Best and Recommended groups plus a summary line.
fn report_lines(owner: &str, players: u32, report: &EnrichReport) -> Vec<String> {
    let suggestions = Suggestions::from_records(players, &report.records);
    if suggestions.is_empty() {
        return vec![format!(
            "None of {}'s {} games are recommended for {} players.",
            owner,
            report.records.len(),
            players,
        )];
    }

    let mut lines = Vec::new();
    group_lines(
        &mut lines,
        &format!("Best with {} players", players),
        &suggestions.best,
    );
    group_lines(
        &mut lines,
        &format!("Recommended with {} players", players),
        &suggestions.recommended,
    );
    lines.push(format!(
        "{}",
        format!(
            "{} of {} games suit {} players ({} could not be checked)",
            suggestions.best.len() + suggestions.recommended.len(),
            report.records.len(),
            players,
            report.failures.len(),
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    ));
    lines
}

fn group_lines(lines: &mut Vec<String>, title: &str, records: &[&GameRecord]) {
    if records.is_empty() {
        return;
    }
    lines.push(format!("{}", title.if_supports_color(Stdout, |t| t.bold())));
    for record in records {
        lines.push(format!(
            "  {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            format_record(record),
        ));
    }
    lines.push(String::new());
}
