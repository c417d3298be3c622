use std::path::PathBuf;

use pretty_assertions::assert_eq;
use swipe_diagnostic::{Diagnostics, ErrorKind};
use swipe_ir::{CancellationToken, OptionValue};
use swipe_types::{LoadOptions, MemoryDriver};

use super::Analysis;
use crate::test_support::MODULE;

const STUB: &str = "package service

type Option string

// @swipe:\"Service\"
func Service(opts ...Option) Option { return \"implementation not generated, run swipe\" }

// @type:\"repeat\"
func Interface(iface interface{}, ns string) Option { return \"implementation not generated, run swipe\" }
";

const APP: &str = "package app

import \"context\"

type ErrUnauthorized struct{}

func (*ErrUnauthorized) Error() string { return \"unauthorized\" }

func (*ErrUnauthorized) ErrorCode() int { return -32001 }

type Svc interface {
	Create(ctx context.Context, name string) (int, error)
}

type svc struct{}

func (s *svc) Create(ctx context.Context, name string) (int, error) {
	if name == \"\" {
		return 0, &ErrUnauthorized{}
	}
	return 1, nil
}
";

const DSL: &str = "//go:build swipe

package app

import \"example.com/app/swipe/service\"

func Swipe() {
	service.Service(service.Interface((*Svc)(nil), \"\"))
}
";

fn driver() -> MemoryDriver {
    let mut driver = MemoryDriver::new(MODULE, "/work").with_std_stubs();
    driver
        .add_file("example.com/app/swipe/service", "swipe.go", STUB)
        .add_file(MODULE, "app.go", APP)
        .add_file(MODULE, "swipe.go", DSL);
    driver
}

fn options() -> LoadOptions {
    LoadOptions {
        work_dir: PathBuf::from("/work"),
        env: Vec::new(),
        patterns: vec!["./...".into()],
    }
}

#[test]
fn interface_errors_from_decoded_options() {
    let mut analysis = Analysis::load(&driver(), &options(), &CancellationToken::new())
        .unwrap_or_else(|e| panic!("load failed: {e}"));
    assert!(analysis.package_diagnostics().is_empty());

    let mut warnings = Diagnostics::new();
    let result = analysis
        .decode(&["Service"], &mut warnings)
        .unwrap_or_else(|e| panic!("decode failed: {e}"));
    let (_, inject) = result
        .injects()
        .next()
        .unwrap_or_else(|| panic!("no inject"));
    let Some(OptionValue::Slice(ifaces)) = inject.options["Service"]
        .as_nested()
        .and_then(|o| o.get("Interface"))
    else {
        panic!("Interface option missing");
    };
    let Some(OptionValue::Named(svc)) = ifaces[0].as_nested().and_then(|o| o.get("iface")) else {
        panic!("iface missing");
    };

    let errors = analysis.find_errors();
    assert_eq!(errors.len(), 1);
    let found = analysis.iface_errors(&[*svc], &errors);
    let create = &found["example.com/app.Svc"]["Create"];
    assert_eq!(create.len(), 1);
    assert_eq!(create[0].name, "ErrUnauthorized");
    assert_eq!(create[0].code(), Some(-32001));
}

#[test]
fn normalizing_twice_yields_the_same_node() {
    let mut analysis = Analysis::load(&driver(), &options(), &CancellationToken::new())
        .unwrap_or_else(|e| panic!("load failed: {e}"));
    let pkg = analysis
        .program()
        .package_by_path(MODULE)
        .unwrap_or_else(|| panic!("app missing"));
    let obj = analysis
        .program()
        .lookup(pkg.id, "Svc")
        .unwrap_or_else(|| panic!("Svc missing"));
    let ty = analysis.program().object(obj).ty;
    let first = analysis.normalize(ty).unwrap_or_else(|e| panic!("{e}"));
    let len = analysis.arena().len();
    let second = analysis.normalize(ty).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(first, second);
    assert_eq!(analysis.arena().len(), len);
    assert_eq!(analysis.visited().origin(first), Some(ty));
}

#[test]
fn cancelled_loads_fail() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = Analysis::load(&driver(), &options(), &cancel).err();
    assert_eq!(err.map(|e| e.kind), Some(ErrorKind::Cancelled));
}
