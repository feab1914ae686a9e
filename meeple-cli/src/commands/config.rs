use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_bgg::{Settings, setting_sources, settings_path};

use crate::CliError;

/// Show effective settings and where each one came from.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let settings = Settings::load()?;
    let sources = setting_sources();

    println!(
        "{}",
        "meeple settings".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    match settings_path() {
        Some(p) if p.exists() => {
            println!(
                "  Settings file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            println!(
                "  Settings file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            println!(
                "  Settings file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    println!();

    let fields = [
        ("base_url", settings.bgg.base_url.clone(), &sources.base_url),
        ("user_agent", settings.bgg.user_agent.clone(), &sources.user_agent),
        (
            "timeout_secs",
            settings.bgg.timeout_secs.to_string(),
            &sources.timeout_secs,
        ),
        (
            "max_retries",
            settings.retry.max_retries.to_string(),
            &sources.max_retries,
        ),
    ];

    for (name, value, source) in &fields {
        println!(
            "  {:<14} {} {}",
            name,
            value,
            format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    println!(
        "  {:<14} {}-{} ms",
        "retry_delay",
        settings.retry.initial_delay_ms,
        settings.retry.max_delay_ms,
    );
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    match settings_path() {
        Some(p) => println!("{}", p.display()),
        None => log::warn!("Could not determine the settings directory"),
    }
    Ok(())
}
