//! Target template dialects
//!
//! A dialect decides the three things that differ between template languages: how an iteration
//! header reads, how a field is spelled in an access path, and which stringification call wraps
//! a non-string value read through an iteration variable.
//!
//! Cast tables come in pairs. A value reached through a loop variable and one reached through a
//! keyed-map value variable are cast independently, with their own tables.

use crate::markers::Binding;
use crate::schema::{PropType, Scalar};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Name of the root properties object in generated expressions
pub const PROPS_ROOT: &str = "props";

/// Which kind of iteration a scope performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationMode {
    List,
    Map,
}

impl From<&Binding> for IterationMode {
    fn from(binding: &Binding) -> Self {
        match binding {
            Binding::Loop { .. } => IterationMode::List,
            Binding::KeyedMap { .. } => IterationMode::Map,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Language-neutral `for each` blocks
    #[default]
    Generic,
    /// Go templ components
    Templ,
}

type CastTable = HashMap<PropType, &'static str>;

fn table(entries: &[(PropType, &'static str)]) -> CastTable {
    entries.iter().copied().collect()
}

static GENERIC_LIST_CASTS: Lazy<CastTable> = Lazy::new(|| {
    table(&[
        (PropType::Scalar(Scalar::Int), "string"),
        (PropType::Scalar(Scalar::Bool), "string"),
        (PropType::List(Scalar::Int), "string"),
        (PropType::List(Scalar::Bool), "string"),
    ])
});

static GENERIC_MAP_CASTS: Lazy<CastTable> = Lazy::new(|| {
    let mut casts = table(&[
        (PropType::Scalar(Scalar::Int), "format"),
        (PropType::Scalar(Scalar::Bool), "format"),
    ]);
    for key in Scalar::ALL {
        casts.insert(PropType::Map(key, Scalar::Int), "format");
        casts.insert(PropType::Map(key, Scalar::Bool), "format");
    }
    casts
});

static TEMPL_LIST_CASTS: Lazy<CastTable> = Lazy::new(|| {
    table(&[
        (PropType::Scalar(Scalar::Int), "strconv.Itoa"),
        (PropType::Scalar(Scalar::Bool), "strconv.FormatBool"),
        (PropType::List(Scalar::Int), "strconv.Itoa"),
        (PropType::List(Scalar::Bool), "strconv.FormatBool"),
    ])
});

static TEMPL_MAP_CASTS: Lazy<CastTable> = Lazy::new(|| {
    let mut casts = table(&[
        (PropType::Scalar(Scalar::Int), "fmt.Sprint"),
        (PropType::Scalar(Scalar::Bool), "fmt.Sprint"),
    ]);
    for key in Scalar::ALL {
        casts.insert(PropType::Map(key, Scalar::Int), "fmt.Sprint");
        casts.insert(PropType::Map(key, Scalar::Bool), "fmt.Sprint");
    }
    casts
});

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Generic, Dialect::Templ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Templ => "templ",
        }
    }

    /// Iteration header, without the opening brace
    pub fn header(&self, binding: &Binding, collection: &str) -> String {
        match (self, binding) {
            (Dialect::Generic, Binding::Loop { index }) => {
                format!("for each {index} in {collection}")
            }
            (Dialect::Generic, Binding::KeyedMap { key, value }) => {
                format!("for each {key}, {value} in {collection}")
            }
            (Dialect::Templ, Binding::Loop { index }) => {
                format!("for _, {index} := range {collection}")
            }
            (Dialect::Templ, Binding::KeyedMap { key, value }) => {
                format!("for {key}, {value} := range {collection}")
            }
        }
    }

    /// Spelling of a property name in an access path.
    ///
    /// Go only marshals exported fields, so templ upper-cases the first letter.
    pub fn field_name<'n>(&self, name: &'n str) -> Cow<'n, str> {
        match self {
            Dialect::Generic => Cow::Borrowed(name),
            Dialect::Templ => Cow::Owned(export(name)),
        }
    }

    /// `root.a.b` for a path of property names
    pub fn access_path<S: AsRef<str>>(&self, root: &str, path: &[S]) -> String {
        let mut expr = root.to_string();
        for name in path {
            expr.push('.');
            expr.push_str(&self.field_name(name.as_ref()));
        }
        expr
    }

    /// Stringification call for a value of type `ty` read in an iteration of kind `mode`
    pub fn cast(&self, mode: IterationMode, ty: PropType) -> Option<&'static str> {
        let casts: &CastTable = match (self, mode) {
            (Dialect::Generic, IterationMode::List) => &GENERIC_LIST_CASTS,
            (Dialect::Generic, IterationMode::Map) => &GENERIC_MAP_CASTS,
            (Dialect::Templ, IterationMode::List) => &TEMPL_LIST_CASTS,
            (Dialect::Templ, IterationMode::Map) => &TEMPL_MAP_CASTS,
        };
        casts.get(&ty).copied()
    }

    /// Stringification call for a value read straight off the root properties object.
    ///
    /// templ only interpolates strings, so root scalars are converted there too.
    pub fn root_cast(&self, ty: PropType) -> Option<&'static str> {
        match (self, ty) {
            (Dialect::Templ, PropType::Scalar(Scalar::Int)) => Some("strconv.Itoa"),
            (Dialect::Templ, PropType::Scalar(Scalar::Bool)) => Some("strconv.FormatBool"),
            _ => None,
        }
    }
}

/// Upper-case the first character of a name
pub fn export(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|dialect| dialect.as_str() == s)
            .ok_or_else(|| {
                format!("unknown dialect '{s}' (expected one of: generic, templ)")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed() -> Binding {
        Binding::KeyedMap {
            key: "k".to_string(),
            value: "v".to_string(),
        }
    }

    #[test]
    fn test_generic_headers() {
        let each = Binding::Loop {
            index: "item".to_string(),
        };
        assert_eq!(
            Dialect::Generic.header(&each, "props.items"),
            "for each item in props.items"
        );
        assert_eq!(
            Dialect::Generic.header(&keyed(), "item.meta"),
            "for each k, v in item.meta"
        );
    }

    #[test]
    fn test_templ_headers_and_field_names() {
        assert_eq!(
            Dialect::Templ.header(&keyed(), "props.Labels"),
            "for k, v := range props.Labels"
        );
        assert_eq!(
            Dialect::Templ.access_path(PROPS_ROOT, &["items", "name"]),
            "props.Items.Name"
        );
        assert_eq!(
            Dialect::Generic.access_path("item", &["name"]),
            "item.name"
        );
    }

    #[test]
    fn test_strings_are_never_cast() {
        for dialect in Dialect::ALL {
            for mode in [IterationMode::List, IterationMode::Map] {
                assert_eq!(dialect.cast(mode, PropType::DEFAULT_LEAF), None);
            }
        }
    }

    #[test]
    fn test_root_cast_only_in_templ() {
        let int = PropType::Scalar(Scalar::Int);
        let flag = PropType::Scalar(Scalar::Bool);
        assert_eq!(Dialect::Templ.root_cast(int), Some("strconv.Itoa"));
        assert_eq!(Dialect::Templ.root_cast(flag), Some("strconv.FormatBool"));
        assert_eq!(Dialect::Templ.root_cast(PropType::DEFAULT_LEAF), None);
        assert_eq!(Dialect::Templ.root_cast(PropType::List(Scalar::Int)), None);
        assert_eq!(Dialect::Generic.root_cast(int), None);
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!("templ".parse::<Dialect>(), Ok(Dialect::Templ));
        assert!("jinja".parse::<Dialect>().is_err());
    }
}
