use crate::error::{Error, Result};
use crate::template::Template;
use std::collections::HashMap;
use std::env;

/// Locale of the catalog used when the process locale has none of its own.
pub const ROOT_LOCALE: &str = "en";

/// Catalog key holding the thousands separator for substituted numbers.
pub const GROUPING_KEY: &str = "number.grouping";

const BUNDLED: [(&str, &str); 19] = [
    ("ar", include_str!("../locales/ar.properties")),
    ("cs", include_str!("../locales/cs.properties")),
    ("da", include_str!("../locales/da.properties")),
    ("de", include_str!("../locales/de.properties")),
    ("en", include_str!("../locales/en.properties")),
    ("es", include_str!("../locales/es.properties")),
    ("eu", include_str!("../locales/eu.properties")),
    ("fa", include_str!("../locales/fa.properties")),
    ("fr", include_str!("../locales/fr.properties")),
    ("hi", include_str!("../locales/hi.properties")),
    ("hu", include_str!("../locales/hu.properties")),
    ("id", include_str!("../locales/id.properties")),
    ("it", include_str!("../locales/it.properties")),
    ("nl", include_str!("../locales/nl.properties")),
    ("pl", include_str!("../locales/pl.properties")),
    ("pt", include_str!("../locales/pt.properties")),
    ("tr", include_str!("../locales/tr.properties")),
    ("zh", include_str!("../locales/zh.properties")),
    ("zh-tw", include_str!("../locales/zh-tw.properties")),
];

/// Resolves period keys to localized text.
pub trait Messages {
    fn locale(&self) -> &str;

    /// The raw template stored under `key`.
    fn get(&self, key: &str) -> Result<&str>;

    /// The template under `key` with `value` substituted for its placeholder.
    fn get_with(&self, key: &str, value: i64) -> Result<String>;
}

impl<T: Messages + ?Sized> Messages for &T {
    fn locale(&self) -> &str {
        (**self).locale()
    }

    fn get(&self, key: &str) -> Result<&str> {
        (**self).get(key)
    }

    fn get_with(&self, key: &str, value: i64) -> Result<String> {
        (**self).get_with(key, value)
    }
}

/// Options for building the default resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagesConfig {
    /// Locale tag such as `es` or `pt_BR.UTF-8`. `None` uses the process locale.
    pub locale: Option<String>,
}

impl MessagesConfig {
    pub fn with_locale(locale: impl Into<String>) -> Self {
        MessagesConfig {
            locale: Some(locale.into()),
        }
    }
}

/// Builds the bundled catalog selected by `config`.
pub fn messages(config: &MessagesConfig) -> Result<Catalog> {
    match &config.locale {
        Some(locale) => Catalog::bundled(locale),
        None => {
            let locale = process_locale();
            match locale.as_deref().map(Catalog::bundled) {
                Some(Ok(catalog)) => Ok(catalog),
                Some(Err(Error::UnsupportedLocale(tag))) => {
                    tracing::debug!("no catalog for process locale `{}`, using `{}`", tag, ROOT_LOCALE);
                    Catalog::bundled(ROOT_LOCALE)
                }
                Some(Err(e)) => Err(e),
                None => Catalog::bundled(ROOT_LOCALE),
            }
        }
    }
}

/// The first usable locale from `LC_ALL`, `LC_MESSAGES` or `LANG`.
pub fn process_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
}

/// Lookup order for a locale tag: `pt_BR.UTF-8` yields `pt-br`, then `pt`.
/// The retired code `in` is read as Indonesian, so `in_ID` yields `id-id`,
/// then `id`.
pub fn locale_candidates(tag: &str) -> Vec<String> {
    let tag = tag
        .split(|c: char| c == '.' || c == '@')
        .next()
        .unwrap_or_default()
        .trim()
        .replace('_', "-")
        .to_lowercase();

    let mut candidates = Vec::new();
    let mut subtags = tag.split('-').collect::<Vec<_>>();
    if subtags.first() == Some(&"in") {
        subtags[0] = "id";
    }

    while !subtags.is_empty() {
        let candidate = subtags.join("-");
        if !candidate.is_empty() {
            candidates.push(candidate);
        }
        subtags.pop();
    }

    candidates
}

/// Locales compiled into the library.
pub fn bundled_locales() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|(locale, _)| *locale)
}

/// A locale's key to template map.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    locale: String,
    templates: HashMap<String, Template>,
}

impl Catalog {
    /// The bundled catalog for `tag`, following [`locale_candidates`].
    pub fn bundled(tag: &str) -> Result<Catalog> {
        for candidate in locale_candidates(tag) {
            if let Some((locale, source)) = BUNDLED.iter().find(|(locale, _)| *locale == candidate) {
                tracing::debug!("locale `{}` resolved to bundled catalog `{}`", tag, locale);
                return Catalog::parse(locale, source);
            }
        }

        Err(Error::UnsupportedLocale(tag.to_owned()))
    }

    /// Parses `.properties`-style text: `key = value`, `key: value` or
    /// `key value` lines, `#` or `!` comments, `\uXXXX` and `\\` escapes in
    /// values. Every value must be a valid template.
    pub fn parse(locale: &str, source: &str) -> Result<Catalog> {
        let malformed = |line: usize, reason: String| Error::MalformedCatalog {
            locale: locale.to_owned(),
            line,
            reason,
        };

        let mut templates = HashMap::new();

        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let (key, value) = split_entry(line)
                .ok_or_else(|| malformed(index + 1, format!("expected `key = value`, found `{}`", line)))?;

            if key.is_empty() {
                return Err(malformed(index + 1, "empty key".to_owned()));
            }

            let template = unescape(value)
                .and_then(|value| Template::parse(&value))
                .map_err(|reason| malformed(index + 1, reason))?;
            templates.insert(key.to_owned(), template);
        }

        Ok(Catalog {
            locale: locale.to_owned(),
            templates,
        })
    }

    /// Layers `other` on top of this catalog; keys in `other` win.
    pub fn merge(mut self, other: Catalog) -> Catalog {
        self.templates.extend(other.templates);
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    fn template(&self, key: &str) -> Result<&Template> {
        self.templates.get(key).ok_or_else(|| Error::MissingTemplate {
            locale: self.locale.clone(),
            key: key.to_owned(),
        })
    }

    fn format_number(&self, value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let sign = if value < 0 { "-" } else { "" };

        let separator = match self.templates.get(GROUPING_KEY).map(Template::source) {
            Some(separator) if !separator.is_empty() => separator,
            _ => return format!("{}{}", sign, digits),
        };

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
        for (index, digit) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                grouped.push_str(separator);
            }
            grouped.push(digit);
        }

        format!("{}{}", sign, grouped)
    }
}

impl Messages for Catalog {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn get(&self, key: &str) -> Result<&str> {
        self.template(key).map(Template::source)
    }

    fn get_with(&self, key: &str, value: i64) -> Result<String> {
        let template = self.template(key)?;
        Ok(template.render(value, &self.format_number(value)))
    }
}

/// Splits a trimmed line at the first `=`, `:` or whitespace. Whitespace
/// around the separator is dropped.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let end = line.find(|c: char| c == '=' || c == ':' || c.is_whitespace())?;
    let rest = line[end..].trim_start();
    let value = rest.strip_prefix(|c: char| c == '=' || c == ':').unwrap_or(rest);

    Some((&line[..end], value.trim_start()))
}

fn unescape(value: &str) -> std::result::Result<String, String> {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.next() {
            Some('u') => {
                let hex = chars.by_ref().take(4).collect::<String>();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4)
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("invalid unicode escape `\\u{}`", hex))?;
                unescaped.push(decoded);
            }
            Some('t') => unescaped.push('\t'),
            Some('n') => unescaped.push('\n'),
            Some(other) => unescaped.push(other),
            None => return Err("dangling `\\` at end of value".to_owned()),
        }
    }

    Ok(unescaped)
}
