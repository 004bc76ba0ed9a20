//! Localized "time ago" phrases.
//!
//! An instant is turned into a signed minute distance from now, classified
//! into a period such as `x-hours.past` or `about-a-year.future`, and rendered
//! through a [`Messages`] implementation:
//!
//! ```
//! use timeago::{time_ago_at, Catalog};
//!
//! let now = 1_700_000_000_000_i64;
//! let english = Catalog::bundled("en").unwrap();
//!
//! assert_eq!(time_ago_at(now - 9 * 60_000, now, &english).unwrap(), "9 minutes ago");
//! assert_eq!(time_ago_at(now + 120 * 60_000, now, &english).unwrap(), "in 2 hours");
//! ```

mod distance;
mod error;
mod formatter;
mod messages;
mod period;
mod template;

pub use distance::{distance_in_minutes, now_millis, IntoEpochMillis};
pub use error::{Error, Result};
pub use formatter::format_period;
pub use messages::{
    bundled_locales, locale_candidates, messages, process_locale, Catalog, Messages,
    MessagesConfig, GROUPING_KEY, ROOT_LOCALE,
};
pub use period::{Category, Period, Tense};

/// Phrase for `instant` relative to the wall clock, in the process locale.
pub fn time_ago(instant: impl IntoEpochMillis) -> Result<String> {
    let catalog = messages(&MessagesConfig::default())?;
    time_ago_with(instant, &catalog)
}

/// Phrase for `instant` relative to the wall clock, using `messages`.
pub fn time_ago_with<M: Messages + ?Sized>(instant: impl IntoEpochMillis, messages: &M) -> Result<String> {
    time_ago_at(instant, now_millis(), messages)
}

/// Phrase for `instant` relative to an explicit `now`.
pub fn time_ago_at<M: Messages + ?Sized>(
    instant: impl IntoEpochMillis,
    now: impl IntoEpochMillis,
    messages: &M,
) -> Result<String> {
    let distance = distance_in_minutes(instant, now);
    let period = Period::classify(distance);
    format_period(messages, period, distance)
}

/// Past-only surface kept for callers of the older single-direction API.
///
/// Returns `Ok(None)` when `instant` is not positive or lies after `now`;
/// every other instant renders as in [`time_ago_at`].
pub fn time_ago_past_only<M: Messages + ?Sized>(
    instant: impl IntoEpochMillis,
    now: impl IntoEpochMillis,
    messages: &M,
) -> Result<Option<String>> {
    let instant = instant.into_epoch_millis();
    let now = now.into_epoch_millis();

    if instant <= 0 || instant > now {
        tracing::debug!("past-only lookup rejected instant {} (now {})", instant, now);
        return Ok(None);
    }

    time_ago_at(instant, now, messages).map(Some)
}
