use pretty_assertions::assert_eq;
use swipe_diagnostic::ErrorKind;
use swipe_gen::Plugin;

use super::{ConfigPlugin, EnvFlags, FieldKind};
use crate::test_support::{run, MODULE};

const APP: &str = "package app

type DB struct {
	Host string `env:\"HOST,required\"`
	Port uint16
}

type Config struct {
	FldStringReq string   `env:\"FLD_STRING_REQ,required\"`
	Debug        bool     `env:\"DEBUG,use_zero\"`
	Workers      int32    `env:\"WORKERS,use_flag,desc:Number of workers, at least one\"`
	Tags         []string `env:\"TAGS\"`
	Ratio        float64
	DB           *DB
	Ignored      string `env:\"-\"`
	internal     string
}
";

const DSL: &str = "//go:build swipe

package app

import \"example.com/app/pkg/swipe/config\"

func Swipe() {
	config.Config(
		config.Environment(&Config{}),
		config.ConfigMarkdownDoc(\"docs\"),
	)
}
";

fn run_app() -> crate::test_support::Run {
    run(&[(MODULE, "app.go", APP), (MODULE, "swipe.go", DSL)])
}

#[test]
fn collects_fields_with_prefixes() {
    let run = run_app();
    assert!(run.diagnostics.is_empty(), "{:?}", run.messages());
    assert_eq!(run.plugins.len(), 1);

    let files = run.files.iter().map(|f| f.path.display().to_string()).collect::<Vec<_>>();
    assert_eq!(
        files,
        vec![
            "/work/swipe_gen_config_config.go".to_string(),
            "/work/docs/swipe_gen_config_config.md".to_string(),
        ]
    );
}

#[test]
fn required_variables_report_their_name() {
    let run = run_app();
    let src = run.file("swipe_gen_config_config.go");
    assert!(src.contains("func LoadConfig() (cfg *Config, errs []error) {"), "{src}");
    assert!(src.contains("if s, ok := os.LookupEnv(\"FLD_STRING_REQ\"); ok && s != \"\" {"));
    assert!(src.contains("\t\tcfg.FldStringReq = s\n"));
    assert!(src.contains("errs = append(errs, errors.New(\"env FLD_STRING_REQ required\"))"));
}

#[test]
fn options_shape_the_lookup() {
    let run = run_app();
    let src = run.file("swipe_gen_config_config.go");
    // use_zero accepts an empty value.
    assert!(src.contains("if s, ok := os.LookupEnv(\"DEBUG\"); ok {"));
    assert!(src.contains("if v, err := strconv.ParseBool(s); err != nil {"));
    // use_flag registers a flag that overrides the variable.
    assert!(src.contains("fv2 := fs.String(\"workers\", \"\", \"Number of workers, at least one\")"));
    assert!(src.contains("ok && s != \"\" || *fv2 != \"\" {"));
    assert!(src.contains("cfg.Workers = int32(v)"));
    // Untagged fields use their upper snake name; nested structs prefix.
    assert!(src.contains("os.LookupEnv(\"RATIO\")"));
    assert!(src.contains("cfg.DB = &DB{}"));
    assert!(src.contains("os.LookupEnv(\"DB_HOST\")"));
    assert!(src.contains("env DB_HOST required"));
    assert!(src.contains("strconv.ParseUint(s, 10, 16)"));
    assert!(src.contains("cfg.DB.Port = uint16(v)"));
    // Slices split on commas.
    assert!(src.contains("parts := strings.Split(s, \",\")"));
    assert!(src.contains("cfg.Tags = vals"));
    assert!(!src.contains("Ignored"));
    assert!(!src.contains("internal"));
    assert!(src.contains("import (\n\t\"errors\"\n\t\"flag\"\n\t\"fmt\"\n\t\"os\"\n\t\"strconv\"\n\t\"strings\"\n)"));
}

#[test]
fn markdown_lists_every_variable() {
    let run = run_app();
    let doc = run.file("swipe_gen_config_config.md");
    assert!(doc.starts_with("# Config\n\n| Name | Type |"));
    assert!(doc.contains("| FLD_STRING_REQ | string | yes | no |  |  |\n"));
    assert!(doc.contains("| WORKERS | int | no | no | `-workers` | Number of workers, at least one |\n"));
    assert!(doc.contains("| TAGS | []string | no | no |  |  |\n"));
    assert!(doc.contains("| DB_HOST | string | yes |"));
}

#[test]
fn model_exposes_leaf_kinds() {
    let run = run_app();
    let plugin = &run.plugins[0].plugin;
    assert_eq!(plugin.id(), "Config");
    let gens = plugin.generators();
    assert_eq!(gens.len(), 2);

    let standalone = ConfigPlugin::default();
    assert!(standalone.model().is_none());
    assert!(standalone.generators().is_empty());

    let arena = run.analysis.arena();
    let kinds: Vec<_> = arena
        .iter()
        .filter_map(|(id, _)| super::field_kind(arena, id))
        .collect();
    assert!(kinds.contains(&FieldKind::Slice(Box::new(FieldKind::String))));
}

const BAD_DSL: &str = "//go:build swipe

package app

import \"example.com/app/pkg/swipe/config\"

func Swipe() {
	config.Config(config.Environment(42))
}
";

#[test]
fn non_struct_environments_are_config_errors() {
    let run = run(&[(MODULE, "app.go", APP), (MODULE, "swipe.go", BAD_DSL)]);
    assert!(run.plugins.is_empty());
    assert_eq!(run.diagnostics.count(ErrorKind::Config), 1, "{:?}", run.messages());
    let diag = run
        .diagnostics
        .iter()
        .find(|d| d.kind == ErrorKind::Config)
        .unwrap_or_else(|| panic!("no config error"));
    assert_eq!(diag.pos.as_ref().map(|p| p.line), Some(8));
}

#[test]
fn env_tag_options_map_to_flags() {
    let tags = swipe_ir::TagSet::parse(r#"env:"PORT,required,use_flag,desc:Listen port""#)
        .unwrap_or_else(|e| panic!("{e}"));
    let flags = EnvFlags::from_tag(tags.get("env"));
    assert_eq!(flags, EnvFlags::REQUIRED | EnvFlags::USE_FLAG);
    assert_eq!(EnvFlags::from_tag(None), EnvFlags::empty());
}
