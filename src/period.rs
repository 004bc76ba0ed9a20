use crate::distance::div_round;
use std::fmt;

pub(crate) const MINUTES_PER_HOUR: i64 = 60;
pub(crate) const MINUTES_PER_DAY: i64 = 1_440;
pub(crate) const MINUTES_PER_MONTH: i64 = 43_200;
pub(crate) const MINUTES_PER_YEAR: i64 = 525_600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tense {
    Past,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Now,
    OneMinute,
    XMinutes,
    AboutAnHour,
    XHours,
    OneDay,
    XDays,
    AboutAMonth,
    XMonths,
    AboutAYear,
    OverAYear,
    AlmostTwoYears,
    XYears,
}

/// A matched bucket of time distances. `Now` carries no meaningful tense and
/// is always stored as past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub category: Category,
    pub tense: Tense,
}

#[derive(Debug, Clone, Copy)]
enum Span {
    /// Inclusive minute bounds.
    Between(i64, i64),
    /// Rounded whole years strictly greater than the bound.
    YearsOver(i64),
    /// Rounded whole years strictly less than the bound.
    YearsUnder(i64),
}

impl Span {
    fn contains(self, distance: i64) -> bool {
        match self {
            Span::Between(low, high) => low <= distance && distance <= high,
            Span::YearsOver(bound) => div_round(distance, MINUTES_PER_YEAR) > bound,
            Span::YearsUnder(bound) => div_round(distance, MINUTES_PER_YEAR) < bound,
        }
    }
}

const fn past(category: Category) -> Period {
    Period {
        category,
        tense: Tense::Past,
    }
}

const fn future(category: Category) -> Period {
    Period {
        category,
        tense: Tense::Future,
    }
}

// Order matters: the open-ended year rules round, so every bounded range has
// to be tried before them.
static RULES: [(Span, Period); 25] = [
    (Span::Between(0, 0), past(Category::Now)),
    (Span::Between(1, 1), past(Category::OneMinute)),
    (Span::Between(2, 44), past(Category::XMinutes)),
    (Span::Between(45, 89), past(Category::AboutAnHour)),
    (Span::Between(90, 1_439), past(Category::XHours)),
    (Span::Between(1_440, 2_519), past(Category::OneDay)),
    (Span::Between(2_520, 43_199), past(Category::XDays)),
    (Span::Between(43_200, 86_399), past(Category::AboutAMonth)),
    (Span::Between(86_400, 525_599), past(Category::XMonths)),
    (Span::Between(525_600, 655_199), past(Category::AboutAYear)),
    (Span::Between(655_200, 914_399), past(Category::OverAYear)),
    (Span::Between(914_400, 1_051_199), past(Category::AlmostTwoYears)),
    (Span::YearsOver(1), past(Category::XYears)),
    (Span::Between(-1, -1), future(Category::OneMinute)),
    (Span::Between(-44, -2), future(Category::XMinutes)),
    (Span::Between(-89, -45), future(Category::AboutAnHour)),
    (Span::Between(-1_439, -90), future(Category::XHours)),
    (Span::Between(-2_519, -1_440), future(Category::OneDay)),
    (Span::Between(-43_199, -2_520), future(Category::XDays)),
    (Span::Between(-86_399, -43_200), future(Category::AboutAMonth)),
    (Span::Between(-525_599, -86_400), future(Category::XMonths)),
    (Span::Between(-655_199, -525_600), future(Category::AboutAYear)),
    (Span::Between(-914_399, -655_200), future(Category::OverAYear)),
    (Span::Between(-1_051_199, -914_400), future(Category::AlmostTwoYears)),
    (Span::YearsUnder(-1), future(Category::XYears)),
];

impl Period {
    pub const NOW: Period = past(Category::Now);

    /// Maps a signed minute distance to its period. First matching rule wins.
    pub fn classify(distance: i64) -> Period {
        let Some((_, period)) = RULES.iter().find(|(span, _)| span.contains(distance)) else {
            unreachable!("no period rule matches a distance of {} minutes", distance);
        };

        tracing::trace!("{} minutes classified as `{}`", distance, period);
        *period
    }

    /// Every period in rule order.
    pub fn all() -> impl Iterator<Item = Period> {
        RULES.iter().map(|(_, period)| *period)
    }

    /// Stable catalog key, e.g. `x-hours.future`.
    pub fn key(&self) -> &'static str {
        use Category::*;
        use Tense::*;

        match (self.category, self.tense) {
            (Now, _) => "now",
            (OneMinute, Past) => "one-minute.past",
            (OneMinute, Future) => "one-minute.future",
            (XMinutes, Past) => "x-minutes.past",
            (XMinutes, Future) => "x-minutes.future",
            (AboutAnHour, Past) => "about-an-hour.past",
            (AboutAnHour, Future) => "about-an-hour.future",
            (XHours, Past) => "x-hours.past",
            (XHours, Future) => "x-hours.future",
            (OneDay, Past) => "one-day.past",
            (OneDay, Future) => "one-day.future",
            (XDays, Past) => "x-days.past",
            (XDays, Future) => "x-days.future",
            (AboutAMonth, Past) => "about-a-month.past",
            (AboutAMonth, Future) => "about-a-month.future",
            (XMonths, Past) => "x-months.past",
            (XMonths, Future) => "x-months.future",
            (AboutAYear, Past) => "about-a-year.past",
            (AboutAYear, Future) => "about-a-year.future",
            (OverAYear, Past) => "over-a-year.past",
            (OverAYear, Future) => "over-a-year.future",
            (AlmostTwoYears, Past) => "almost-two-years.past",
            (AlmostTwoYears, Future) => "almost-two-years.future",
            (XYears, Past) => "x-years.past",
            (XYears, Future) => "x-years.future",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOUNDARIES: [i64; 13] = [
        0, 1, 2, 44, 45, 89, 90, 1_439, 1_440, 2_519, 2_520, 43_199, 43_200,
    ];

    fn matching_rules(distance: i64) -> usize {
        RULES
            .iter()
            .filter(|(span, _)| span.contains(distance))
            .count()
    }

    #[test]
    fn test_bounded_rules_never_overlap_and_cover_the_line() {
        // Bounded ranges are disjoint; only the rounding year rules may also
        // claim a distance, and those sit last in the table.
        let bounded = |distance: i64| {
            RULES
                .iter()
                .filter(|(span, _)| matches!(span, Span::Between(..)))
                .filter(|(span, _)| span.contains(distance))
                .count()
        };

        for distance in -1_100_000..=1_100_000 {
            assert!(bounded(distance) <= 1, "overlap at {}", distance);
            assert!(matching_rules(distance) >= 1, "gap at {}", distance);
        }
    }

    #[test]
    fn test_every_distance_classifies() {
        for distance in [i64::MIN / 2, -100_000_000, -1_051_200, 1_051_200, 100_000_000, i64::MAX / 2] {
            let period = Period::classify(distance);
            assert_eq!(period.category, Category::XYears);
        }

        for distance in BOUNDARIES {
            Period::classify(distance);
            Period::classify(-distance);
        }
    }

    #[test]
    fn test_now() {
        assert_eq!(Period::classify(0), Period::NOW);
        assert_eq!(Period::classify(0).key(), "now");
    }

    #[test]
    fn test_one_minute_both_tenses() {
        assert_eq!(Period::classify(1).key(), "one-minute.past");
        assert_eq!(Period::classify(-1).key(), "one-minute.future");
    }

    #[test]
    fn test_boundaries() {
        #[track_caller]
        fn case(distance: i64, key: &str) {
            assert_eq!(Period::classify(distance).key(), key);
        }

        case(2, "x-minutes.past");
        case(44, "x-minutes.past");
        case(45, "about-an-hour.past");
        case(89, "about-an-hour.past");
        case(90, "x-hours.past");
        case(1_439, "x-hours.past");
        case(1_440, "one-day.past");
        case(2_519, "one-day.past");
        case(2_520, "x-days.past");
        case(43_199, "x-days.past");
        case(43_200, "about-a-month.past");
        case(86_399, "about-a-month.past");
        case(86_400, "x-months.past");
        case(525_599, "x-months.past");
        case(525_600, "about-a-year.past");
        case(655_199, "about-a-year.past");
        case(655_200, "over-a-year.past");
        case(914_399, "over-a-year.past");
        case(914_400, "almost-two-years.past");
        case(1_051_199, "almost-two-years.past");
        case(1_051_200, "x-years.past");

        case(-44, "x-minutes.future");
        case(-45, "about-an-hour.future");
        case(-1_439, "x-hours.future");
        case(-1_440, "one-day.future");
        case(-525_600, "about-a-year.future");
        case(-914_399, "over-a-year.future");
        case(-914_400, "almost-two-years.future");
        case(-1_051_199, "almost-two-years.future");
        case(-1_051_200, "x-years.future");
    }

    #[test]
    fn test_all_keys_are_unique() {
        let mut keys = Period::all().map(|period| period.key()).collect::<Vec<_>>();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();

        assert_eq!(keys.len(), total);
        assert_eq!(total, 25);
    }
}
