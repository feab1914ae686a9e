use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_bgg::{Settings, create_pipeline};
use meeple_core::{GameRecord, Suitability, validate_player_count};

use crate::CliError;
use crate::commands::{format_counts, format_record};
use crate::progress::EnrichProgress;

/// Run the game command.
pub(crate) fn run_game(id: &str, players: u32, json: bool, quiet: bool) -> Result<(), CliError> {
    let players = validate_player_count(players)?;

    let settings = Settings::load()?;
    let pipeline = create_pipeline(&settings)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {e}")))?;

    let progress = EnrichProgress::new(quiet || json, format!("Looking up game {}...", id));
    let result = rt.block_on(pipeline.enricher().enrich(id, players));
    progress.finish();
    let record = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        for line in record_lines(&record) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn record_lines(record: &GameRecord) -> Vec<String> {
    let verdict = match record.suitability {
        Suitability::Best => format!("{}", "best".if_supports_color(Stdout, |t| t.green())),
        Suitability::Recommended => {
            format!("{}", "recommended".if_supports_color(Stdout, |t| t.cyan()))
        }
        Suitability::Unsuitable => {
            format!("{}", "not suitable".if_supports_color(Stdout, |t| t.yellow()))
        }
    };

    vec![
        format!("{}", format_record(record).if_supports_color(Stdout, |t| t.bold())),
        format!("  With {} players: {}", record.player_count, verdict),
        format!("  Best at:        {}", format_counts(&record.breakdown.best)),
        format!(
            "  Recommended at: {}",
            format_counts(&record.breakdown.recommended)
        ),
        format!(
            "  Geek rating {:.2} from {} ratings",
            record.stats.bayes_average, record.stats.users_rated,
        ),
    ]
}
