use crate::Res;
use chrono::{DateTime, Days, Duration, Months, TimeZone};
use timeago::Messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Offset {
    Minutes(i64),
    Hours(i64),
    Days(u64),
    Months(u32),
}

/// One sample per phrase family, from a minute up to almost six years.
const SAMPLE_OFFSETS: [Offset; 12] = [
    Offset::Minutes(1),
    Offset::Minutes(9),
    Offset::Minutes(51),
    Offset::Hours(3),
    Offset::Days(1),
    Offset::Days(10),
    Offset::Days(30),
    Offset::Months(6),
    Offset::Months(12),
    Offset::Months(12 + 4),
    Offset::Months(12 + 10),
    Offset::Months(5 * 12 + 10),
];

struct SampleInfo {
    when: String,
    ago: String,
}

/// Shifts `now` by `offset` on the calendar, backwards unless `future`.
fn shift<Tz: TimeZone>(now: &DateTime<Tz>, offset: Offset, future: bool) -> Option<DateTime<Tz>> {
    let now = now.clone();

    match (offset, future) {
        (Offset::Minutes(n), true) => now.checked_add_signed(Duration::minutes(n)),
        (Offset::Minutes(n), false) => now.checked_sub_signed(Duration::minutes(n)),
        (Offset::Hours(n), true) => now.checked_add_signed(Duration::hours(n)),
        (Offset::Hours(n), false) => now.checked_sub_signed(Duration::hours(n)),
        (Offset::Days(n), true) => now.checked_add_days(Days::new(n)),
        (Offset::Days(n), false) => now.checked_sub_days(Days::new(n)),
        (Offset::Months(n), true) => now.checked_add_months(Months::new(n)),
        (Offset::Months(n), false) => now.checked_sub_months(Months::new(n)),
    }
}

fn sample_instants<Tz: TimeZone>(now: &DateTime<Tz>, future: bool) -> Res<Vec<DateTime<Tz>>> {
    SAMPLE_OFFSETS
        .iter()
        .map(|offset| {
            shift(now, *offset, future)
                .ok_or_else(|| anyhow::anyhow!("sample {:?} is out of range", offset))
        })
        .collect()
}

pub fn command_samples<M: Messages>(messages: &M, future: bool) -> Res<()> {
    let now = chrono::Local::now();
    let mut sample_infos = Vec::new();

    for instant in sample_instants(&now, future)? {
        sample_infos.push(SampleInfo {
            when: instant.to_rfc2822(),
            ago: timeago::time_ago_at(&instant, &now, messages)?,
        });
    }

    tracing::debug!(
        "{} {} samples in locale `{}`",
        sample_infos.len(),
        if future { "future" } else { "past" },
        messages.locale()
    );

    let col1 = sample_infos.iter().map(|o| o.when.chars().count()).max().unwrap_or(0);

    let (ansi1, ansi2) = if atty::is(atty::Stream::Stdout) {
        ("\x1b[32;1m", "\x1b[m")
    } else {
        ("", "")
    };

    for entry in sample_infos.iter() {
        println!("{:col1$}   {}{}{}", entry.when, ansi1, entry.ago, ansi2, col1 = col1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use timeago::Catalog;

    fn phrases(future: bool) -> Vec<String> {
        let english = Catalog::bundled("en").unwrap();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        sample_instants(&now, future)
            .unwrap()
            .iter()
            .map(|instant| timeago::time_ago_at(instant, &now, &english).unwrap())
            .collect()
    }

    #[test]
    fn test_past_samples() {
        assert_eq!(
            phrases(false),
            vec![
                "one minute ago",
                "9 minutes ago",
                "about an hour ago",
                "3 hours ago",
                "one day ago",
                "10 days ago",
                "about a month ago",
                "6 months ago",
                "about a year ago",
                "over a year ago",
                "almost two years ago",
                "6 years ago",
            ]
        );
    }

    #[test]
    fn test_future_samples() {
        assert_eq!(
            phrases(true),
            vec![
                "in one minute",
                "in 9 minutes",
                "in about an hour",
                "in 3 hours",
                "in one day",
                "in 10 days",
                "in about a month",
                "in 6 months",
                "in about a year",
                "in over a year",
                "in almost two years",
                "in 6 years",
            ]
        );
    }

    #[test]
    fn test_months_follow_the_calendar() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();

        assert_eq!(
            shift(&now, Offset::Months(1), false).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
        assert_eq!(
            shift(&now, Offset::Days(1), true).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap()
        );
    }
}
