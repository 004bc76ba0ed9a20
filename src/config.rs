use crate::Res;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use timeago::{Catalog, Messages, MessagesConfig};

const RC_FILE: &str = ".timeagorc";

/// Settings from `~/.timeagorc`.
///
/// ```text
/// # default locale for the CLI
/// locale = es
/// # user catalogs; the file stem is the locale
/// ~/.config/timeago/*.properties
/// !~/.config/timeago/draft.properties
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub locale: Option<String>,
    pub catalog_paths: Vec<PathBuf>,
}

impl Config {
    pub fn load() -> Res<Config> {
        let homedir = dirs::home_dir().ok_or(anyhow::anyhow!("cannot locate user home dir"))?;
        let config_path = homedir.join(RC_FILE);

        match fs::read_to_string(&config_path) {
            Ok(text) => Config::parse(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no config file at {:?}", &config_path);
                Ok(Config::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "cannot open config file {:?}: {}",
                &config_path,
                e
            )),
        }
    }

    pub fn parse(text: &str) -> Res<Config> {
        let mut config = Config::default();
        let mut include_rules = Vec::new();
        let mut exclude_patterns = Vec::new();

        for line in text
            .lines()
            .map(str::trim)
            .filter(|s| !s.starts_with('#') && !s.is_empty())
        {
            if let Some(pattern) = line.strip_prefix('!') {
                exclude_patterns.push(glob::Pattern::new(&shellexpand::tilde(pattern.trim()))?);
            } else if let Some((key, value)) = line.split_once('=') {
                match key.trim() {
                    "locale" => config.locale = Some(value.trim().to_owned()),
                    other => anyhow::bail!("unknown setting `{}` in {}", other, RC_FILE),
                }
            } else {
                include_rules.push(line.to_owned());
            }
        }

        for include_rule in include_rules {
            for glob_result in glob::glob(&shellexpand::tilde(&include_rule))? {
                let path = glob_result?;

                if !path.is_file() {
                    continue;
                }

                if exclude_patterns.iter().any(|p| p.matches_path(&path)) {
                    tracing::info!("Excluded catalog: {:?}", &path);
                    continue;
                }

                config.catalog_paths.push(path);
            }
        }

        config.catalog_paths.sort();
        config.catalog_paths.dedup();

        Ok(config)
    }

    /// User catalogs, one per configured file.
    pub fn catalogs(&self) -> Res<Vec<Catalog>> {
        self.catalog_paths
            .iter()
            .map(|path| load_catalog(path))
            .collect()
    }

    /// Resolves the catalog for `locale` (falling back to the configured
    /// locale, then the process locale). A user catalog for the same locale
    /// is layered over the bundled one; a user catalog for a locale with no
    /// bundled counterpart is used on its own.
    pub fn messages(&self, locale: Option<&str>) -> Res<Catalog> {
        let locale = locale.map(str::to_owned).or_else(|| self.locale.clone());
        let tag = locale.clone().or_else(timeago::process_locale);

        let user = match tag.as_deref() {
            Some(tag) => self.user_catalog(tag)?,
            None => None,
        };

        let bundled = timeago::messages(&MessagesConfig { locale });

        match (bundled, user) {
            (Ok(bundled), Some(user)) if bundled.locale() == user.locale() => {
                tracing::debug!("layering user catalog over bundled `{}`", user.locale());
                Ok(bundled.merge(user))
            }
            (_, Some(user)) => Ok(user),
            (Ok(bundled), None) => Ok(bundled),
            (Err(e), None) => Err(e.into()),
        }
    }

    fn user_catalog(&self, tag: &str) -> Res<Option<Catalog>> {
        let catalogs = self.catalogs()?;

        for candidate in timeago::locale_candidates(tag) {
            if let Some(catalog) = catalogs.iter().find(|c| c.locale() == candidate) {
                return Ok(Some(catalog.clone()));
            }
        }

        Ok(None)
    }
}

fn load_catalog(path: &Path) -> Res<Catalog> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("catalog file name is not valid UTF-8: {:?}", path))?;

    let locale = timeago::locale_candidates(stem)
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("cannot derive a locale from {:?}", path))?;

    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot open catalog {:?}: {}", path, e))?;

    Ok(Catalog::parse(&locale, &text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn catalog_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();

        fs::write(
            dir.path().join("eo.properties"),
            "now = \u{0109}i-momente\nx-minutes.past = anta\u{016d} {0} minutoj\n",
        )
        .unwrap();
        fs::write(dir.path().join("es.properties"), "now = ahora mismo\n").unwrap();
        fs::write(dir.path().join("draft.properties"), "not a catalog\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();

        dir
    }

    fn rc(dir: &TempDir, extra: &str) -> String {
        format!(
            "# user catalogs\n{}/*.properties\n!{}/draft.properties\n{}",
            dir.path().display(),
            dir.path().display(),
            extra
        )
    }

    #[test]
    fn test_parse_locale_and_catalogs() {
        let dir = catalog_dir();
        let config = Config::parse(&rc(&dir, "locale = eo\n")).unwrap();

        assert_eq!(config.locale.as_deref(), Some("eo"));
        assert_eq!(
            config.catalog_paths,
            vec![dir.path().join("eo.properties"), dir.path().join("es.properties")]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_setting() {
        assert_eq!(
            Config::parse("colour = red\n").unwrap_err().to_string(),
            "unknown setting `colour` in .timeagorc"
        );
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(Config::parse("# nothing\n\n").unwrap(), Config::default());
    }

    #[test]
    fn test_user_only_locale() {
        let dir = catalog_dir();
        let config = Config::parse(&rc(&dir, "")).unwrap();
        let messages = config.messages(Some("eo.UTF-8")).unwrap();

        assert_eq!(messages.locale(), "eo");
        assert_eq!(messages.get_with("x-minutes.past", 3).unwrap(), "anta\u{016d} 3 minutoj");
        assert!(messages.get("x-hours.past").is_err());
    }

    #[test]
    fn test_user_catalog_overrides_bundled() {
        let dir = catalog_dir();
        let config = Config::parse(&rc(&dir, "locale = es\n")).unwrap();
        let messages = config.messages(None).unwrap();

        assert_eq!(messages.locale(), "es");
        assert_eq!(messages.get("now").unwrap(), "ahora mismo");
        assert_eq!(messages.get("one-day.past").unwrap(), "hace un día");
    }

    #[test]
    fn test_command_line_locale_wins() {
        let dir = catalog_dir();
        let config = Config::parse(&rc(&dir, "locale = es\n")).unwrap();

        assert_eq!(config.messages(Some("de")).unwrap().locale(), "de");
    }

    #[test]
    fn test_unknown_locale_is_an_error() {
        let config = Config::default();
        assert!(config.messages(Some("tlh")).is_err());
    }
}
