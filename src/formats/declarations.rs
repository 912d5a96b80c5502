//! Go struct declarations for a schema
//!
//! The root properties become `<prefix>Props`. Every composite with two or more fields gets a
//! named declaration `<prefix><Ancestors><Name>`, emitted depth-first in name order right after
//! the declarations that use it. Collapsed single-field wrappers have no name of their own and
//! render as an anonymous `struct{ Field T }`.
//!
//! Field names are exported; the JSON tag keeps the marker's spelling with a lower-case first
//! letter, which is what the client-side component reads back.

use super::registry::SchemaFormat;
use super::template::escape_string;
use crate::error::FormatError;
use crate::rewrite::dialect::export;
use crate::schema::{PropType, Property, Scalar, Schema};
use std::collections::BTreeMap;
use std::fmt::Write;

pub const GENERATED_HEADER: &str = "// Code generated by ssr2templ. DO NOT EDIT.";

/// Renders the `.go` side of a component
#[derive(Debug, Clone)]
pub struct Declarations<'a> {
    package: &'a str,
    prefix: &'a str,
    head: Option<&'a [String]>,
}

impl<'a> Declarations<'a> {
    pub fn new(package: &'a str, prefix: &'a str) -> Self {
        Declarations {
            package,
            prefix,
            head: None,
        }
    }

    /// Also emit `var <prefix>Head` holding these lines
    pub fn with_head(mut self, head: &'a [String]) -> Self {
        self.head = Some(head);
        self
    }

    pub fn render(&self, schema: &Schema) -> String {
        let mut out = String::new();
        out.push_str(GENERATED_HEADER);
        out.push_str("\n\n");
        let _ = writeln!(out, "package {}", self.package);
        out.push('\n');

        self.write_struct(&mut out, &format!("{}Props", self.prefix), &schema.properties, &[]);
        for property in schema.properties.values() {
            self.write_nested(&mut out, property, &[]);
        }

        if let Some(head) = self.head {
            self.write_head(&mut out, head);
        }
        out
    }

    fn write_struct(
        &self,
        out: &mut String,
        name: &str,
        fields: &BTreeMap<String, Property>,
        ancestors: &[&str],
    ) {
        let rows: Vec<[String; 3]> = fields
            .values()
            .map(|field| {
                [
                    export(&field.name),
                    self.field_type(field, ancestors),
                    json_tag(&field.name),
                ]
            })
            .collect();

        let name_width = rows.iter().map(|row| row[0].len()).max().unwrap_or(0);
        let type_width = rows.iter().map(|row| row[1].len()).max().unwrap_or(0);

        let _ = writeln!(out, "type {name} struct {{");
        for [field, ty, tag] in &rows {
            let _ = writeln!(out, "\t{field:name_width$} {ty:type_width$} {tag}");
        }
        out.push_str("}\n\n");
    }

    fn write_nested(&self, out: &mut String, property: &Property, ancestors: &[&str]) {
        let mut path = ancestors.to_vec();
        path.push(&property.name);

        if property.is_composite() {
            self.write_struct(out, &self.type_name(&path), &property.children, &path);
        }
        for field in property.fields() {
            self.write_nested(out, field, &path);
        }
    }

    fn write_head(&self, out: &mut String, head: &[String]) {
        let _ = writeln!(out, "var {}Head = [...]string{{", self.prefix);
        for line in head {
            if line.contains('`') {
                let _ = writeln!(out, "\t\"{}\",", escape_string(line));
            } else {
                let _ = writeln!(out, "\t`{line}`,");
            }
        }
        out.push_str("}\n");
    }

    fn type_name(&self, path: &[&str]) -> String {
        let mut name = self.prefix.to_string();
        for segment in path {
            name.push_str(&export(segment));
        }
        name
    }

    /// Go type of a field declared inside the struct for `ancestors`
    fn field_type(&self, property: &Property, ancestors: &[&str]) -> String {
        match property.ty {
            PropType::Scalar(scalar) => go_scalar(scalar).to_string(),
            PropType::List(element) => format!("[]{}", go_scalar(element)),
            PropType::Map(key, value) => format!("map[{}]{}", go_scalar(key), go_scalar(value)),
            PropType::Composite => self.element_type(property, ancestors),
            PropType::CompositeList => format!("[]{}", self.element_type(property, ancestors)),
            PropType::CompositeMap => {
                format!("map[string]{}", self.element_type(property, ancestors))
            }
        }
    }

    /// Named type, anonymous wrapper, or empty struct for a structural property
    fn element_type(&self, property: &Property, ancestors: &[&str]) -> String {
        let mut path = ancestors.to_vec();
        path.push(&property.name);

        if property.is_composite() {
            return self.type_name(&path);
        }
        match property.inlined.as_deref() {
            Some(field) => format!(
                "struct{{ {} {} {} }}",
                export(&field.name),
                self.field_type(field, &path),
                json_tag(&field.name)
            ),
            None => "struct{}".to_string(),
        }
    }
}

fn go_scalar(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::String => "string",
        Scalar::Int => "int",
        Scalar::Bool => "bool",
    }
}

fn json_tag(name: &str) -> String {
    let mut chars = name.chars();
    let lower: String = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("`json:\"{lower}\"`")
}

/// `go-structs`: the declarations without a head array
pub struct GoStructsFormat {
    package: String,
    prefix: String,
}

impl GoStructsFormat {
    pub fn new(package: impl Into<String>, prefix: impl Into<String>) -> Self {
        GoStructsFormat {
            package: package.into(),
            prefix: prefix.into(),
        }
    }
}

impl Default for GoStructsFormat {
    fn default() -> Self {
        GoStructsFormat::new("main", "")
    }
}

impl SchemaFormat for GoStructsFormat {
    fn name(&self) -> &str {
        "go-structs"
    }

    fn description(&self) -> &str {
        "Go struct declarations with JSON tags"
    }

    fn serialize(&self, schema: &Schema) -> Result<String, FormatError> {
        Ok(Declarations::new(&self.package, &self.prefix).render(schema))
    }
}
