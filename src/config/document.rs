//! Merged INI configuration document and typed accessors
//!
//! A [`ConfigDocument`] is the result of layering one or more `.cfg` files:
//! section name → key → string value. Section and option names are stored
//! lower-cased and every lookup is lower-cased the same way, so
//! `[Redis_Cache] Host` and `redis_cache.host` address the same value.
//!
//! Typed reads go through the [`ConfigAccessor`] trait, whose provided
//! methods implement the fallback rules:
//!
//! - absent section/option + fallback → the fallback
//! - absent section/option, no fallback → [`AilError::SectionNotFound`] /
//!   [`AilError::OptionNotFound`]
//! - present but unparsable → [`AilError::TypeCoercion`], fallback or not

use crate::domain::errors::AilError;
use crate::domain::result::Result;
use ini::{Ini, ParseOption};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

type Section = BTreeMap<String, String>;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

/// Values are kept as written: no escape sequences, no quote stripping.
fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Section → option → value mapping merged from one or more files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: BTreeMap<String, Section>,
}

impl ConfigDocument {
    /// Creates an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and merges INI files in order.
    ///
    /// Later files shadow same-section/same-option values of earlier files;
    /// sections and options that only appear in earlier files survive.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or is not valid INI.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut document = Self::new();
        for path in paths {
            let path = path.as_ref();
            tracing::debug!(path = %path.display(), "Loading configuration");
            let ini = Ini::load_from_file_opt(path, parse_option())?;
            document.merge(Self::from_ini(&ini, &path.display().to_string())?);
        }
        Ok(document)
    }

    /// Parses a single INI string (used for in-memory documents and tests)
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid INI.
    pub fn from_ini_str(text: &str) -> Result<Self> {
        let ini = Ini::load_from_str_opt(text, parse_option())?;
        Self::from_ini(&ini, "<string>")
    }

    fn from_ini(ini: &Ini, origin: &str) -> Result<Self> {
        let mut document = Self::new();
        for (section, options) in ini.iter() {
            let Some(section) = section else {
                if options.is_empty() {
                    continue;
                }
                return Err(AilError::Configuration(format!(
                    "{origin}: option outside of any section"
                )));
            };

            // Header with no keys still creates the section.
            let entry = document.sections.entry(normalize(section)).or_default();
            for (option, value) in options.iter() {
                entry.insert(normalize(option), value.to_string());
            }
        }
        Ok(document)
    }

    /// Sets a value, creating the section when needed
    pub fn set(&mut self, section: &str, option: &str, value: impl Into<String>) {
        self.sections
            .entry(normalize(section))
            .or_default()
            .insert(normalize(option), value.into());
    }

    /// Layers `other` on top of this document
    pub fn merge(&mut self, other: ConfigDocument) {
        for (section, options) in other.sections {
            self.sections.entry(section).or_default().extend(options);
        }
    }

    /// Section names (normalized)
    pub fn sections(&self) -> Vec<&str> {
        self.sections.keys().map(String::as_str).collect()
    }

    /// Whether a section exists
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&normalize(section))
    }

    /// Whether an option exists within a section
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.sections
            .get(&normalize(section))
            .is_some_and(|options| options.contains_key(&normalize(option)))
    }

    /// All option/value pairs of a section; empty when the section is absent
    pub fn section(&self, section: &str) -> Vec<(String, String)> {
        self.sections
            .get(&normalize(section))
            .map(|options| {
                options
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Looks up a raw value
    ///
    /// # Errors
    ///
    /// [`AilError::SectionNotFound`] or [`AilError::OptionNotFound`].
    pub fn lookup(&self, section: &str, option: &str) -> Result<&str> {
        let options = self
            .sections
            .get(&normalize(section))
            .ok_or_else(|| AilError::SectionNotFound(section.to_string()))?;

        options
            .get(&normalize(option))
            .map(String::as_str)
            .ok_or_else(|| AilError::OptionNotFound {
                section: section.to_string(),
                option: option.to_string(),
            })
    }

    /// Replaces `${NAME}` placeholders with process environment variables.
    ///
    /// See [`ConfigDocument::substitute_with`].
    pub fn substitute_env_vars(&mut self) -> Vec<String> {
        self.substitute_with(&|name| std::env::var(name).ok())
    }

    /// Replaces `${NAME}` placeholders using `lookup`.
    ///
    /// A placeholder whose variable is unset or empty stays literal and a
    /// warning is logged. Returns the names of the unresolved variables.
    pub fn substitute_with(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Vec<String> {
        let pattern = placeholder_pattern();
        let mut unresolved = Vec::new();

        for (section, options) in self.sections.iter_mut() {
            for (option, value) in options.iter_mut() {
                if !value.contains("${") {
                    continue;
                }

                let replaced = pattern.replace_all(value.as_str(), |caps: &regex::Captures<'_>| {
                    let name = &caps[1];
                    match lookup(name).filter(|v| !v.is_empty()) {
                        Some(resolved) => resolved,
                        None => {
                            tracing::warn!(
                                variable = name,
                                section = %section,
                                option = %option,
                                "Environment variable not found"
                            );
                            if !unresolved.iter().any(|n: &String| n == name) {
                                unresolved.push(name.to_string());
                            }
                            caps[0].to_string()
                        }
                    }
                });
                let replaced = replaced.into_owned();
                *value = replaced;
            }
        }

        unresolved
    }
}

/// Resolves a directory option value against the installation root.
///
/// A value starting with `/` is absolute and returned unchanged; anything
/// else is joined to `install_root`.
pub fn resolve_directory(value: &str, install_root: &Path) -> PathBuf {
    if value.starts_with('/') {
        PathBuf::from(value)
    } else {
        install_root.join(value)
    }
}

/// Parses a boolean the way INI configuration files spell them
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Typed read access over a configuration document
pub trait ConfigAccessor {
    /// Raw lookup; absent values fail with the section/option errors
    fn raw(&self, section: &str, option: &str) -> Result<&str>;

    /// Whether a section exists
    fn has_section(&self, section: &str) -> bool;

    /// Required string value
    fn require(&self, section: &str, option: &str) -> Result<&str> {
        self.raw(section, option)
    }

    /// Optional string value; `None` when the section or option is absent
    fn optional(&self, section: &str, option: &str) -> Option<&str> {
        self.raw(section, option).ok()
    }

    /// String value with an optional fallback for absence
    fn get(&self, section: &str, option: &str, fallback: Option<&str>) -> Result<String> {
        match self.raw(section, option) {
            Ok(value) => Ok(value.to_string()),
            Err(e) if e.is_missing() => fallback.map(str::to_string).ok_or(e),
            Err(e) => Err(e),
        }
    }

    /// Integer value with an optional fallback for absence
    fn get_int(&self, section: &str, option: &str, fallback: Option<i64>) -> Result<i64> {
        typed(self.raw(section, option), fallback, |raw| {
            raw.trim().parse::<i64>().map_err(|_| coercion(section, option, raw, "an integer"))
        })
    }

    /// Boolean value with an optional fallback for absence
    fn get_bool(&self, section: &str, option: &str, fallback: Option<bool>) -> Result<bool> {
        typed(self.raw(section, option), fallback, |raw| {
            parse_bool(raw).ok_or_else(|| coercion(section, option, raw, "a boolean"))
        })
    }

    /// Float value with an optional fallback for absence
    fn get_float(&self, section: &str, option: &str, fallback: Option<f64>) -> Result<f64> {
        typed(self.raw(section, option), fallback, |raw| {
            raw.trim().parse::<f64>().map_err(|_| coercion(section, option, raw, "a float"))
        })
    }

    /// Directory option from `[Directories]` resolved against `install_root`
    fn files_directory(&self, option: &str, install_root: &Path) -> Result<PathBuf> {
        let value = self.require("Directories", option)?;
        Ok(resolve_directory(value, install_root))
    }
}

impl ConfigAccessor for ConfigDocument {
    fn raw(&self, section: &str, option: &str) -> Result<&str> {
        self.lookup(section, option)
    }

    fn has_section(&self, section: &str) -> bool {
        ConfigDocument::has_section(self, section)
    }
}

fn typed<T, F>(raw: Result<&str>, fallback: Option<T>, parse: F) -> Result<T>
where
    F: FnOnce(&str) -> Result<T>,
{
    match raw {
        Ok(value) => parse(value),
        Err(e) if e.is_missing() => fallback.ok_or(e),
        Err(e) => Err(e),
    }
}

fn coercion(section: &str, option: &str, value: &str, expected: &'static str) -> AilError {
    AilError::TypeCoercion {
        section: section.to_string(),
        option: option.to_string(),
        value: value.to_string(),
        expected,
    }
}
