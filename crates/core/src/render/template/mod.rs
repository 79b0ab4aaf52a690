//! Go-style text templates.
//!
//! Testbench and run-script templates are written in Go `text/template` syntax. This
//! module implements the subset those templates use:
//! 1. **Actions:** `{{.field}}`, `{{$.field}}`, `{{$var.field}}`, literals, and `|` pipes.
//! 2. **Control:** `if`/`else if`/`else`, `range` (with `$i, $e :=`), `with`, `end`, and
//!    block-scoped `$name := pipeline` declarations.
//! 3. **Functions:** `replaceDots`, `index`, `len`, `hex`, `eq`, `ne`, `not`.
//! 4. **Whitespace:** `{{-` and `-}}` trim markers and `{{/* */}}` comments.

mod exec;
mod lexer;
mod parser;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::common::{Error, Result};
use parser::Node;

/// A syntax error at a template line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line of the offending action.
    pub line: usize,
    /// Description of the error.
    pub message: String,
}

/// A parsed template, ready to render.
#[derive(Debug, Clone)]
pub struct Template {
    name: PathBuf,
    nodes: Vec<Node>,
}

impl Template {
    /// Parses template `source`; `name` identifies it in diagnostics.
    pub fn parse(name: impl Into<PathBuf>, source: &str) -> Result<Self> {
        let name = name.into();
        let nodes = lexer::lex(source)
            .and_then(|tokens| parser::parse(&tokens))
            .map_err(|e| Error::TemplateParse {
                template: name.clone(),
                line: e.line,
                message: e.message,
            })?;
        Ok(Self { name, nodes })
    }

    /// Reads and parses the template file at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source =
            fs::read_to_string(path).map_err(|e| Error::io("can't read template file", path, e))?;
        Self::parse(path, &source)
    }

    /// Template name used in diagnostics.
    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Renders the template with `data` as dot and `$`.
    pub fn render(&self, data: &Value) -> Result<String> {
        let mut out = String::new();
        exec::execute(&self.nodes, data, &mut out).map_err(|message| Error::TemplateRender {
            template: self.name.clone(),
            message,
        })?;
        Ok(out)
    }

    /// Renders the template into a new file at `path`.
    ///
    /// The file is only created once rendering has succeeded.
    pub fn render_to_file(&self, data: &Value, path: &Path) -> Result<()> {
        let text = self.render(data)?;
        fs::write(path, text).map_err(|e| Error::io("can't create", path, e))
    }
}
