use crate::error::Result;
use crate::messages::Messages;
use crate::period::{
    Category, Period, Tense, MINUTES_PER_DAY, MINUTES_PER_HOUR, MINUTES_PER_MONTH,
    MINUTES_PER_YEAR,
};

const HOURS_PER_DAY: i64 = 24;
const MONTHS_PER_YEAR: i64 = 12;

/// Renders a classified distance through `messages`.
///
/// Magnitudes round the signed quotient with ties toward positive infinity
/// before dropping the sign, so an exact half rounds up in the past and down
/// in the future. Hours, days and months fall back to their singular phrase
/// when the rounded magnitude is 1. Minutes and years always take the number. In the future
/// direction only, 24 hours reads as one day and 12 months as about a year.
pub fn format_period<M: Messages + ?Sized>(messages: &M, period: Period, distance: i64) -> Result<String> {
    let key = period.key();

    let unit = match period.category {
        Category::XMinutes => return messages.get_with(key, distance.abs()),
        Category::XYears => return messages.get_with(key, magnitude(distance, MINUTES_PER_YEAR)),
        Category::XHours => MINUTES_PER_HOUR,
        Category::XDays => MINUTES_PER_DAY,
        Category::XMonths => MINUTES_PER_MONTH,
        _ => return messages.get(key).map(str::to_owned),
    };

    let value = magnitude(distance, unit);

    if let Some(collapsed) = collapse(period, value) {
        tracing::trace!("{} of {} collapsed into `{}`", key, value, collapsed);
        return messages.get(collapsed.key()).map(str::to_owned);
    }

    if value == 1 {
        let singular = Period {
            category: singular_of(period.category),
            tense: period.tense,
        };
        return messages.get(singular.key()).map(str::to_owned);
    }

    messages.get_with(key, value)
}

fn magnitude(distance: i64, unit: i64) -> i64 {
    let doubled = i128::from(distance) * 2 + i128::from(unit);
    let rounded = doubled.div_euclid(i128::from(unit) * 2).abs();
    i64::try_from(rounded).unwrap_or(i64::MAX)
}

fn collapse(period: Period, value: i64) -> Option<Period> {
    if period.tense != Tense::Future {
        return None;
    }

    let category = match (period.category, value) {
        (Category::XHours, HOURS_PER_DAY) => Category::OneDay,
        (Category::XMonths, MONTHS_PER_YEAR) => Category::AboutAYear,
        _ => return None,
    };

    Some(Period {
        category,
        tense: Tense::Future,
    })
}

fn singular_of(category: Category) -> Category {
    match category {
        Category::XHours => Category::AboutAnHour,
        Category::XDays => Category::OneDay,
        Category::XMonths => Category::AboutAMonth,
        other => other,
    }
}
