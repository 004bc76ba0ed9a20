mod config;
mod logger;
mod samples;

use anyhow::{anyhow, bail};
use clap::{App, Arg, ArgMatches};
use config::Config;
use regex::Regex;
use timeago::Messages;

type Res<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Normal,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn from_occurrences(count: u64) -> Verbosity {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Info,
            2 => Verbosity::Debug,
            _ => Verbosity::Trace,
        }
    }
}

fn locale_arg() -> Arg<'static> {
    Arg::new("locale")
        .short('l')
        .long("locale")
        .takes_value(true)
        .help("Locale tag for messages, e.g. es or pt_BR")
}

fn main() -> Res<()> {
    let mut app = App::new("timeago")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Localized 'time ago' phrases")
        .arg(
            Arg::new("verbose")
                .short('v')
                .multiple_occurrences(true)
                .global(true)
                .help("More logging on stderr; repeat for more"),
        )
        .subcommand(
            App::new("at")
                .about("Shows how long ago (or from now) a point in time is")
                .arg(
                    Arg::new("time")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("Epoch milliseconds, RFC 3339, or an offset such as -45m or +3d"),
                )
                .arg(
                    Arg::new("now")
                        .long("now")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .help("Reference time instead of the clock"),
                )
                .arg(locale_arg())
                .arg(
                    Arg::new("past-only")
                        .long("past-only")
                        .help("Print nothing for times that are not in the past"),
                ),
        )
        .subcommand(
            App::new("samples")
                .about("Shows a fixed set of sample times, from a minute to almost six years away")
                .arg(
                    Arg::new("future")
                        .long("future")
                        .help("Sample times after now instead of before"),
                )
                .arg(locale_arg()),
        )
        .subcommand(App::new("locales").about("Lists locales with a message catalog"));

    let matches = app.clone().get_matches();

    let verbose = matches
        .subcommand()
        .map(|(_, sub)| sub.occurrences_of("verbose"))
        .unwrap_or(0)
        .max(matches.occurrences_of("verbose"));
    logger::init(Verbosity::from_occurrences(verbose))?;

    let config = Config::load()?;

    if let Some(sub) = matches.subcommand_matches("at") {
        return command_at(sub, &config);
    }

    if let Some(sub) = matches.subcommand_matches("samples") {
        let messages = config.messages(sub.value_of("locale"))?;
        return samples::command_samples(&messages, sub.is_present("future"));
    }

    if matches.subcommand_matches("locales").is_some() {
        return command_locales(&config);
    }

    app.print_help()?;
    println!();
    Ok(())
}

fn command_at(matches: &ArgMatches, config: &Config) -> Res<()> {
    let clock = timeago::now_millis();
    let now = match matches.value_of("now") {
        Some(text) => parse_instant(text, clock)?,
        None => clock,
    };

    let text = matches
        .value_of("time")
        .ok_or_else(|| anyhow!("a time is required"))?;
    let instant = parse_instant(text, now)?;

    let messages = config.messages(matches.value_of("locale"))?;
    tracing::info!(
        "{} is {} minutes before {} (locale `{}`)",
        instant,
        timeago::distance_in_minutes(instant, now),
        now,
        messages.locale()
    );

    if matches.is_present("past-only") {
        match timeago::time_ago_past_only(instant, now, &messages)? {
            Some(phrase) => println!("{}", phrase),
            None => tracing::warn!("`{}` is not in the past", text),
        }
        return Ok(());
    }

    println!("{}", timeago::time_ago_at(instant, now, &messages)?);
    Ok(())
}

fn command_locales(config: &Config) -> Res<()> {
    for locale in timeago::bundled_locales() {
        println!("{}", locale);
    }

    for catalog in config.catalogs()? {
        println!("{} (user)", catalog.locale());
    }

    Ok(())
}

/// Parses epoch milliseconds, an RFC 3339 timestamp, or a signed offset from
/// `now` such as `-45m`, `+3d` or `-2mo`.
fn parse_instant(text: &str, now: i64) -> Res<i64> {
    let text = text.trim();
    let offset = Regex::new(r"^([+-])(\d+)(s|mo|m|h|d|w|y)$")?;

    if let Some(cap) = offset.captures(text) {
        let amount = cap[2]
            .parse::<i64>()
            .map_err(|_| anyhow!("invalid offset amount: `{}`", &cap[2]))?;

        let seconds = match &cap[3] {
            "s" => 1,
            "m" => 60,
            "h" => 60 * 60,
            "d" => 60 * 60 * 24,
            "w" => 60 * 60 * 24 * 7,
            "mo" => 60 * 60 * 24 * 30,
            "y" => 60 * 60 * 24 * 365,
            unit => bail!("invalid offset unit: `{}`", unit),
        };

        let millis = amount
            .checked_mul(seconds * 1000)
            .ok_or_else(|| anyhow!("offset out of range: `{}`", text))?;

        return Ok(if &cap[1] == "-" {
            now.saturating_sub(millis)
        } else {
            now.saturating_add(millis)
        });
    }

    if let Ok(millis) = text.parse::<i64>() {
        return Ok(millis);
    }

    chrono::DateTime::parse_from_rfc3339(text)
        .map(|datetime| datetime.timestamp_millis())
        .map_err(|_| anyhow!("unrecognized time: `{}`", text))
}
