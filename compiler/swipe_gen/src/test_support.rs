//! A configurable plugin for exercising the framework.

use std::path::PathBuf;

use swipe_diagnostic::Diagnostic;
use swipe_ir::{OptionValue, Package};

use crate::plugin::{ConfigureContext, GenContext, Generator, Plugin};

pub(crate) const MODULE: &str = "example.com/app";

pub(crate) const ECHO_STUB: &str = "type Option string

// @swipe:\"Echo\"
func Echo(opts ...Option) Option { return \"implementation not generated, run swipe\" }

func Fail() Option { return \"implementation not generated, run swipe\" }
";

pub(crate) fn app_package() -> Package {
    Package {
        name: "app".into(),
        path: MODULE.into(),
        module: None,
    }
}

#[derive(Clone)]
pub(crate) struct FakeGenerator {
    pub pkg: Package,
    pub filename: String,
    pub output: Option<PathBuf>,
    pub body: Result<String, String>,
    /// `(name, path)` imported while generating.
    pub import: Option<(String, String)>,
}

impl FakeGenerator {
    pub fn new(filename: &str, body: &str) -> Self {
        FakeGenerator {
            pkg: app_package(),
            filename: filename.into(),
            output: None,
            body: Ok(body.into()),
            import: None,
        }
    }
}

impl Generator for FakeGenerator {
    fn package(&self) -> &Package {
        &self.pkg
    }

    fn output_path(&self) -> Option<&std::path::Path> {
        self.output.as_deref()
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        if let Some((name, path)) = &self.import {
            ctx.importer.import(name, path);
        }
        match &self.body {
            Ok(body) => Ok(body.clone().into_bytes()),
            Err(message) => Err(Diagnostic::generate(message.clone())),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakePlugin {
    pub gens: Vec<FakeGenerator>,
    pub seen: Option<OptionValue>,
}

impl FakePlugin {
    pub fn boxed() -> Box<dyn Plugin> {
        Box::new(FakePlugin::default())
    }
}

impl Plugin for FakePlugin {
    fn id(&self) -> &'static str {
        "Echo"
    }

    fn configure(
        &mut self,
        _ctx: &ConfigureContext<'_>,
        options: &OptionValue,
    ) -> Result<(), Vec<Diagnostic>> {
        if options.as_nested().is_some_and(|m| m.contains_key("Fail")) {
            return Err(vec![
                Diagnostic::config("echo: first"),
                Diagnostic::config("echo: second"),
            ]);
        }
        self.seen = Some(options.clone());
        self.gens.push(FakeGenerator::new("echo.go", "var echo = 1\n"));
        Ok(())
    }

    fn generators(&self) -> Vec<Box<dyn Generator + '_>> {
        let mut out: Vec<Box<dyn Generator + '_>> = Vec::with_capacity(self.gens.len());
        for g in &self.gens {
            out.push(Box::new(g.clone()));
        }
        out
    }
}
