//! Naming conventions used to derive hrefs, rel values and XML element names.
//!
//! Inflection is consumed through the [`Inflector`] trait so hosts can plug in
//! their own word lists. [`EnglishInflector`] is a small ordered rule table
//! covering the common English cases, with uncountable and irregular words.

use convert_case::{Case, Casing};
use regex::Regex;
use std::sync::OnceLock;

/// Word-inflection capability consumed by every other component.
pub trait Inflector: Send + Sync {
    /// Plural form of a word (`artist` -> `artists`).
    fn pluralize(&self, word: &str) -> String;

    /// Singular form of a word (`groups` -> `group`).
    fn singularize(&self, word: &str) -> String;

    /// lowerCamelCase form of an underscored token (`part_of` -> `partOf`).
    fn camelize_lower(&self, word: &str) -> String {
        to_lower_camel_case(word)
    }

    /// Lowercased type name (`Artist` -> `artist`).
    fn lowercase_type(&self, type_name: &str) -> String {
        type_name.to_lowercase()
    }

    /// Resource collection name for a type (`Artist` -> `artists`).
    fn collection_name(&self, type_name: &str) -> String {
        self.pluralize(&self.lowercase_type(type_name))
    }
}

/// Convert a string to lowerCamelCase
pub fn to_lower_camel_case(s: &str) -> String {
    s.to_case(Case::Camel)
}

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("inflection rule must be a valid regex"),
            replacement,
        }
    }
}

const UNCOUNTABLES: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
];

const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

// First matching rule wins.
const PLURAL_RULES: &[(&str, &str)] = &[
    (r"(?i)(quiz)$", "${1}zes"),
    (r"(?i)^(oxen)$", "${1}"),
    (r"(?i)^(ox)$", "${1}en"),
    (r"(?i)^(m|l)ice$", "${1}ice"),
    (r"(?i)^(m|l)ouse$", "${1}ice"),
    (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
    (r"(?i)(x|ch|ss|sh)$", "${1}es"),
    (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
    (r"(?i)(hive)$", "${1}s"),
    (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
    (r"(?i)sis$", "ses"),
    (r"(?i)([ti])a$", "${1}a"),
    (r"(?i)([ti])um$", "${1}a"),
    (r"(?i)(buffal|tomat)o$", "${1}oes"),
    (r"(?i)(bu)s$", "${1}ses"),
    (r"(?i)(alias|status)$", "${1}es"),
    (r"(?i)(octop|vir)i$", "${1}i"),
    (r"(?i)(octop|vir)us$", "${1}i"),
    (r"(?i)^(ax|test)is$", "${1}es"),
    (r"(?i)s$", "s"),
    (r"$", "s"),
];

const SINGULAR_RULES: &[(&str, &str)] = &[
    (r"(?i)(database)s$", "${1}"),
    (r"(?i)(quiz)zes$", "${1}"),
    (r"(?i)(matr)ices$", "${1}ix"),
    (r"(?i)(vert|ind)ices$", "${1}ex"),
    (r"(?i)^(ox)en", "${1}"),
    (r"(?i)(alias|status)(es)?$", "${1}"),
    (r"(?i)(octop|vir)(us|i)$", "${1}us"),
    (r"(?i)^(a)x[ie]s$", "${1}xis"),
    (r"(?i)(cris|test)(is|es)$", "${1}is"),
    (r"(?i)(shoe)s$", "${1}"),
    (r"(?i)(o)es$", "${1}"),
    (r"(?i)(bus)(es)?$", "${1}"),
    (r"(?i)^(m|l)ice$", "${1}ouse"),
    (r"(?i)(x|ch|ss|sh)es$", "${1}"),
    (r"(?i)(m)ovies$", "${1}ovie"),
    (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
    (r"(?i)([lr])ves$", "${1}f"),
    (r"(?i)(tive)s$", "${1}"),
    (r"(?i)(hive)s$", "${1}"),
    (r"(?i)([^f])ves$", "${1}fe"),
    (r"(?i)(analy|ba|diagno|parenthe|progno|synop|the)(sis|ses)$", "${1}sis"),
    (r"(?i)([ti])a$", "${1}um"),
    (r"(?i)(ss)$", "${1}"),
    (r"(?i)s$", ""),
];

static PLURALS: OnceLock<Vec<Rule>> = OnceLock::new();
static SINGULARS: OnceLock<Vec<Rule>> = OnceLock::new();

fn compile(table: &[(&str, &'static str)]) -> Vec<Rule> {
    table.iter().map(|&(p, r)| Rule::new(p, r)).collect()
}

/// Compiled plural rules, shared by every inflector.
fn plural_rules() -> &'static [Rule] {
    PLURALS.get_or_init(|| compile(PLURAL_RULES))
}

fn singular_rules() -> &'static [Rule] {
    SINGULARS.get_or_init(|| compile(SINGULAR_RULES))
}

/// Default English inflector.
///
/// The rule tables are compiled on first use and shared process-wide, so
/// constructing an inflector is free.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

impl EnglishInflector {
    pub fn new() -> Self {
        EnglishInflector
    }

    fn inflect(
        &self,
        word: &str,
        rules: &[Rule],
        irregular: impl Fn(&str) -> Option<&'static str>,
    ) -> String {
        if word.is_empty() {
            return String::new();
        }

        let lower = word.to_lowercase();
        if UNCOUNTABLES.contains(&lower.as_str()) {
            return word.to_string();
        }
        if let Some(form) = irregular(&lower) {
            return form.to_string();
        }

        rules
            .iter()
            .find(|rule| rule.pattern.is_match(word))
            .map(|rule| rule.pattern.replace(word, rule.replacement).into_owned())
            .unwrap_or_else(|| word.to_string())
    }
}

impl Inflector for EnglishInflector {
    fn pluralize(&self, word: &str) -> String {
        self.inflect(word, plural_rules(), |w| {
            IRREGULARS
                .iter()
                .find(|(singular, plural)| *singular == w || *plural == w)
                .map(|(_, plural)| *plural)
        })
    }

    fn singularize(&self, word: &str) -> String {
        self.inflect(word, singular_rules(), |w| {
            IRREGULARS
                .iter()
                .find(|(singular, plural)| *singular == w || *plural == w)
                .map(|(singular, _)| *singular)
        })
    }
}
