use regex::Regex;
use serde::Deserialize;

/// Options of an IR build.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "RawIrConfig")]
pub struct IrConfig {
    always_generate_types_matching: Vec<Regex>,
}

/// The serialized form of [`IrConfig`].
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields, default, rename_all = "camelCase")]
struct RawIrConfig {
    /// Regular expressions matched against whole type names. Matching enums, input objects and
    /// custom scalars are generated even when no operation uses them.
    always_generate_types_matching: Vec<String>,
}

impl TryFrom<RawIrConfig> for IrConfig {
    type Error = regex::Error;

    fn try_from(raw: RawIrConfig) -> Result<Self, Self::Error> {
        Self::new(raw.always_generate_types_matching)
    }
}

impl IrConfig {
    /// # Errors
    ///
    /// Returns an error if one of the patterns is not a valid regular expression.
    pub fn new<I, S>(always_generate_types_matching: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let always_generate_types_matching = always_generate_types_matching
            .into_iter()
            .map(|pattern| Regex::new(&format!("^(?:{})$", pattern.as_ref())))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            always_generate_types_matching,
        })
    }

    /// Whether the type must be generated even if unused.
    pub fn should_always_generate(&self, type_name: &str) -> bool {
        self.always_generate_types_matching
            .iter()
            .any(|pattern| pattern.is_match(type_name))
    }
}
