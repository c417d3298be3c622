//! `config.md`: a table of the environment variables.

use std::fmt::Write as _;
use std::path::Path;

use swipe_diagnostic::Diagnostic;
use swipe_gen::{GenContext, Generator};
use swipe_ir::Package;

use super::ConfigModel;

pub struct MarkdownGenerator<'m> {
    model: &'m ConfigModel,
}

impl<'m> MarkdownGenerator<'m> {
    pub fn new(model: &'m ConfigModel) -> Self {
        MarkdownGenerator { model }
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

impl Generator for MarkdownGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn output_path(&self) -> Option<&Path> {
        self.model.markdown_output.as_deref()
    }

    fn filename(&self) -> &str {
        "config.md"
    }

    fn generate(&self, _ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let mut out = String::from("# Config\n\n");
        out.push_str("| Name | Type | Required | Use zero | Flag | Description |\n");
        out.push_str("|------|------|----------|----------|------|-------------|\n");
        for field in &self.model.fields {
            let flag = if field.use_flag() {
                format!("`-{}`", field.flag_name())
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {flag} | {} |",
                field.name,
                field.kind.doc_name(),
                yes_no(field.required()),
                yes_no(field.use_zero()),
                field.desc.replace('|', "\\|"),
            );
        }
        Ok(out.into_bytes())
    }
}
