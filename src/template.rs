//! Catalog templates: literal text with `{0}` placeholders.
//!
//! Besides `{0}`, `{0,number}` and `{0,number,integer}`, a template may pick
//! its wording from the value with a choice placeholder such as
//! `{0,choice,1#minute|1<minutes}`. Each option is a limit, a mark and a
//! text: `N#text` applies from `N` upward, `N<text` applies above `N`, and
//! the last option whose limit the value reaches wins. The first option
//! covers everything below its own limit. Option texts may contain `{0}`.
//!
//! Any other placeholder is rejected when the template is parsed.

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Number,
    Choice(Vec<Choice>),
}

#[derive(Debug, Clone, PartialEq)]
struct Choice {
    limit: f64,
    inclusive: bool,
    segments: Vec<Segment>,
}

impl Choice {
    fn reached_by(&self, value: f64) -> bool {
        if self.inclusive {
            value >= self.limit
        } else {
            value > self.limit
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub(crate) fn parse(source: &str) -> Result<Template, String> {
        Ok(Template {
            source: source.to_owned(),
            segments: parse_segments(source)?,
        })
    }

    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    /// Renders the template for `value`, writing `number` wherever the value
    /// itself appears.
    pub(crate) fn render(&self, value: i64, number: &str) -> String {
        let mut rendered = String::with_capacity(self.source.len() + number.len());
        render_segments(&self.segments, value as f64, number, &mut rendered);
        rendered
    }
}

fn render_segments(segments: &[Segment], value: f64, number: &str, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Number => out.push_str(number),
            Segment::Choice(choices) => {
                let mut selected = &choices[0];
                for choice in choices.iter().skip(1) {
                    if !choice.reached_by(value) {
                        break;
                    }
                    selected = choice;
                }
                render_segments(&selected.segments, value, number, out);
            }
        }
    }
}

fn parse_segments(source: &str) -> Result<Vec<Segment>, String> {
    let mut segments = Vec::new();
    let mut rest = source;

    while let Some(open) = rest.find('{') {
        if open > 0 {
            segments.push(Segment::Text(rest[..open].to_owned()));
        }

        let close = open
            + matching_brace(&rest[open..])
                .ok_or_else(|| format!("unclosed `{{` in `{}`", source))?;
        segments.push(placeholder(&rest[open + 1..close])?);
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest.to_owned()));
    }

    Ok(segments)
}

/// Byte offset of the `}` closing the `{` that starts `text`.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;

    for (index, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }

    None
}

fn placeholder(inner: &str) -> Result<Segment, String> {
    let mut parts = inner.splitn(3, ',');
    let argument = parts.next().unwrap_or_default().trim();

    if argument != "0" {
        return Err(format!("unsupported argument in `{{{}}}`, only `{{0}}` is substituted", inner));
    }

    match (parts.next().map(str::trim), parts.next()) {
        (None, _) | (Some("number"), None) => Ok(Segment::Number),
        (Some("number"), Some(style)) if style.trim() == "integer" => Ok(Segment::Number),
        (Some("choice"), Some(options)) => Ok(Segment::Choice(parse_choices(options)?)),
        _ => Err(format!("unsupported placeholder `{{{}}}`", inner)),
    }
}

fn parse_choices(options: &str) -> Result<Vec<Choice>, String> {
    let mut choices: Vec<Choice> = Vec::new();

    for option in split_top_level(options, '|') {
        let (at, mark) = option
            .char_indices()
            .find(|(_, c)| matches!(c, '#' | '<' | '\u{2264}'))
            .ok_or_else(|| format!("choice option `{}` has no `#` or `<`", option))?;

        let limit = parse_limit(option[..at].trim())?;
        if let Some(previous) = choices.last() {
            if limit < previous.limit {
                return Err(format!("choice limits must ascend, found `{}`", option));
            }
        }

        choices.push(Choice {
            limit,
            inclusive: mark != '<',
            segments: parse_segments(&option[at + mark.len_utf8()..])?,
        });
    }

    if choices.is_empty() {
        return Err("choice placeholder without options".to_owned());
    }

    Ok(choices)
}

fn parse_limit(text: &str) -> Result<f64, String> {
    match text {
        "\u{221e}" => Ok(f64::INFINITY),
        "-\u{221e}" => Ok(f64::NEG_INFINITY),
        _ => text
            .parse::<f64>()
            .map_err(|_| format!("invalid choice limit `{}`", text)),
    }
}

/// Splits on `separator` outside of nested braces.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }

    if start < text.len() {
        parts.push(&text[start..]);
    }

    parts
}
