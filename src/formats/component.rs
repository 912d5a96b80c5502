//! templ component frame
//!
//! Wraps a rendered template body into a complete `.templ` file: package clause, imports, the
//! marshaling and head-injection helpers, and the component itself. The body is placed inside a
//! wrapper element that carries the serialized props for client-side hydration.

use super::declarations::GENERATED_HEADER;
use crate::config::ComponentConfig;
use std::fmt::Write;

/// Go package name for a document stem: lower case, identifier characters only
pub fn package_name(stem: &str) -> String {
    let mut name: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.insert(0, 'p');
    }
    name
}

pub struct ComponentFrame<'a> {
    package: &'a str,
    prefix: &'a str,
    config: &'a ComponentConfig,
    indent: &'a str,
}

impl<'a> ComponentFrame<'a> {
    pub fn new(
        package: &'a str,
        prefix: &'a str,
        config: &'a ComponentConfig,
        indent: &'a str,
    ) -> Self {
        ComponentFrame {
            package,
            prefix,
            config,
            indent,
        }
    }

    pub fn render(&self, body: &str) -> String {
        let ComponentConfig {
            name,
            marshal_fn,
            head_fn,
            wrapper_tag,
        } = self.config;
        let prefix = self.prefix;

        let mut out = String::new();
        let _ = writeln!(out, "{GENERATED_HEADER}");
        let _ = writeln!(out, "package {}", self.package);
        out.push('\n');
        self.write_imports(&mut out, body);

        let _ = write!(
            out,
            concat!(
                "func {marshal_fn}(props *{prefix}Props) string {{\n",
                "\tjsonProps, err := json.Marshal(*props)\n",
                "\tif err != nil {{\n",
                "\t\tpanic(err)\n",
                "\t}}\n",
                "\treturn string(jsonProps)\n",
                "}}\n",
                "\n",
                "func {head_fn}(headContents map[string]struct{{}}) {{\n",
                "\tfor _, content := range {prefix}Head {{\n",
                "\t\theadContents[content] = struct{{}}{{}}\n",
                "\t}}\n",
                "}}\n",
                "\n",
            ),
            marshal_fn = marshal_fn,
            head_fn = head_fn,
            prefix = prefix,
        );

        let indent = self.indent;
        let _ = writeln!(
            out,
            "templ {name}(props *{prefix}Props, headContents map[string]struct{{}}) {{"
        );
        let _ = writeln!(out, "{indent}{{{{ {head_fn}(headContents) }}}}");
        let _ = writeln!(
            out,
            "{indent}<{wrapper_tag} class=\"{}\" svelte={{ {marshal_fn}(props) }}>",
            self.package
        );
        for line in body.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                let _ = writeln!(out, "{indent}{indent}{line}");
            }
        }
        let _ = writeln!(out, "{indent}</{wrapper_tag}>");
        out.push_str("}\n");
        out
    }

    fn write_imports(&self, out: &mut String, body: &str) {
        let mut imports = vec!["encoding/json"];
        if body.contains("fmt.") {
            imports.push("fmt");
        }
        if body.contains("strconv.") {
            imports.push("strconv");
        }

        out.push_str("import (\n");
        for import in imports {
            let _ = writeln!(out, "\t\"{import}\"");
        }
        out.push_str(")\n\n");
    }
}
