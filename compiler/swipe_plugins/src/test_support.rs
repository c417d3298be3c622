//! End-to-end helpers: load a module from memory and run the plugins.

use std::path::PathBuf;

use swipe_analysis::Analysis;
use swipe_diagnostic::Diagnostics;
use swipe_gen::orchestrate::ConfiguredPlugin;
use swipe_gen::{configure_all, generate, GeneratedFile, GlobalConfig, Passthrough};
use swipe_ir::CancellationToken;
use swipe_types::{LoadOptions, MemoryDriver};

pub(crate) const MODULE: &str = "example.com/app";

/// Everything one run produced.
pub(crate) struct Run {
    pub analysis: Analysis,
    pub plugins: Vec<ConfiguredPlugin>,
    pub files: Vec<GeneratedFile>,
    pub diagnostics: Diagnostics,
}

impl Run {
    /// Content of the generated file whose name ends with `suffix`.
    pub fn file(&self, suffix: &str) -> String {
        let file = self
            .files
            .iter()
            .find(|f| f.path.to_string_lossy().ends_with(suffix))
            .unwrap_or_else(|| {
                let names: Vec<_> = self.files.iter().map(|f| f.path.display().to_string()).collect();
                panic!("no file ending in {suffix}; have {names:?}")
            });
        assert!(file.is_ok(), "{suffix}: {:?}", file.errors);
        String::from_utf8_lossy(&file.content).into_owned()
    }

    pub fn has_file(&self, suffix: &str) -> bool {
        self.files
            .iter()
            .any(|f| f.path.to_string_lossy().ends_with(suffix))
    }

    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

/// Load `files` (`(import path, file name, source)`) plus the DSL stubs of
/// every registered plugin under `example.com/app/pkg/swipe/<id>`, then
/// decode, configure and generate.
pub(crate) fn run(files: &[(&str, &str, &str)]) -> Run {
    let registry = crate::registry();
    let mut driver = MemoryDriver::new(MODULE, "/work").with_std_stubs();
    for entry in registry.iter() {
        let name = entry.package_name();
        let src = format!("package {name}\n\n{}", entry.stub);
        driver.add_file(&format!("{MODULE}/pkg/swipe/{name}"), "swipe.go", &src);
    }
    for (pkg, name, src) in files {
        driver.add_file(pkg, name, src);
    }
    let opts = LoadOptions {
        work_dir: PathBuf::from("/work"),
        env: Vec::new(),
        patterns: vec!["./...".into()],
    };
    let mut analysis = Analysis::load(&driver, &opts, &CancellationToken::new())
        .unwrap_or_else(|e| panic!("load failed: {e}"));
    let errors: Vec<_> = analysis.package_diagnostics();
    assert!(errors.is_empty(), "package errors: {errors:?}");

    let mut diagnostics = Diagnostics::new();
    let ids = registry.ids();
    let decoded = analysis
        .decode(&ids, &mut diagnostics)
        .unwrap_or_else(|e| panic!("decode failed: {e}"));
    let global = GlobalConfig {
        work_dir: PathBuf::from("/work"),
        version: "1.0.0".into(),
        verbose: false,
    };
    let plugins = configure_all(&registry, &global, &analysis, &decoded, &mut diagnostics);
    let files = generate(
        &global,
        analysis.arena(),
        &plugins,
        &Passthrough,
        &CancellationToken::new(),
    )
    .unwrap_or_else(|e| panic!("generate failed: {e}"));
    Run {
        analysis,
        plugins,
        files,
        diagnostics,
    }
}
