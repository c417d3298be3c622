//! `config.go`: the loader function.

use swipe_diagnostic::Diagnostic;
use swipe_gen::emit::{quote, type_string, CodeWriter};
use swipe_gen::{w, GenContext, Generator};
use swipe_ir::{IrType, Package};

use super::{ConfigModel, EnvField, FieldKind};

pub struct LoaderGenerator<'m> {
    model: &'m ConfigModel,
}

impl<'m> LoaderGenerator<'m> {
    pub fn new(model: &'m ConfigModel) -> Self {
        LoaderGenerator { model }
    }
}

impl Generator for LoaderGenerator<'_> {
    fn package(&self) -> &Package {
        &self.model.pkg
    }

    fn filename(&self) -> &str {
        "config.go"
    }

    fn generate(&self, ctx: &mut GenContext<'_>) -> Result<Vec<u8>, Diagnostic> {
        let model = self.model;
        let root = type_string(ctx.arena, ctx.importer, model.root);
        let os = ctx.importer.qualifier("", "os");
        let mut w = CodeWriter::new();

        w!(w, "// {} loads {root} from the environment.", model.func_name);
        w.block(
            &format!("func {}() (cfg *{root}, errs []error)", model.func_name),
            "}",
            |w| {
                w!(w, "cfg = &{root}{{}}");
                for init in &model.inits {
                    let ty = pointee(ctx, init.ty);
                    w!(w, "cfg.{} = &{ty}{{}}", init.path);
                }

                if model.fields.iter().any(|f| f.use_flag()) {
                    let flag = ctx.importer.qualifier("", "flag");
                    w!(w, "fs := {flag}NewFlagSet({os}Args[0], {flag}ContinueOnError)");
                    for (i, field) in model.fields.iter().enumerate() {
                        if field.use_flag() {
                            w!(
                                w,
                                "fv{i} := fs.String({}, \"\", {})",
                                quote(&field.flag_name()),
                                quote(&field.desc)
                            );
                        }
                    }
                    w.block(&format!("if err := fs.Parse({os}Args[1:]); err != nil"), "}", |w| {
                        w!(w, "errs = append(errs, err)");
                    });
                }

                for (i, field) in model.fields.iter().enumerate() {
                    write_field(ctx, w, i, field);
                }
                w!(w, "return");
            },
        );
        Ok(w.into_bytes())
    }
}

/// Struct type behind a pointer-to-struct field, without the `*`.
fn pointee(ctx: &mut GenContext<'_>, ty: swipe_ir::IrId) -> String {
    let printed = type_string(ctx.arena, ctx.importer, ty);
    printed.strip_prefix('*').unwrap_or(&printed).to_string()
}

fn write_field(ctx: &mut GenContext<'_>, w: &mut CodeWriter, index: usize, field: &EnvField) {
    let os = ctx.importer.qualifier("", "os");
    let name = quote(&field.name);
    let present = if field.use_zero() { "ok" } else { "ok && s != \"\"" };
    let condition = if field.use_flag() {
        format!("if s, ok := {os}LookupEnv({name}); {present} || *fv{index} != \"\"")
    } else {
        format!("if s, ok := {os}LookupEnv({name}); {present}")
    };
    w.line(&format!("{condition} {{"));
    w.indent();
    if field.use_flag() {
        w.block(&format!("if *fv{index} != \"\""), "}", |w| {
            w!(w, "s = *fv{index}");
        });
    }
    let target = format!("cfg.{}", field.path);
    match &field.kind {
        FieldKind::Slice(inner) => {
            let strings = ctx.importer.qualifier("", "strings");
            let slice_ty = type_string(ctx.arena, ctx.importer, field.ty);
            let elem = match ctx.arena.underlying(field.ty) {
                IrType::Slice(s) => type_string(ctx.arena, ctx.importer, s.value),
                _ => String::new(),
            };
            w!(w, "parts := {strings}Split(s, \",\")");
            w!(w, "vals := make({slice_ty}, 0, len(parts))");
            w.block("for _, part := range parts", "}", |w| {
                w!(w, "part = {strings}TrimSpace(part)");
                write_parse(ctx, w, field, inner, "part", "vals = append(vals, {})", &elem);
            });
            w!(w, "{target} = vals");
        }
        kind => {
            let ty = type_string(ctx.arena, ctx.importer, field.ty);
            let assign = format!("{target} = {{}}");
            write_parse(ctx, w, field, kind, "s", &assign, &ty);
        }
    }
    w.dedent();
    if field.required() {
        let errors = ctx.importer.qualifier("", "errors");
        w.line("} else {");
        w.indent();
        w!(
            w,
            "errs = append(errs, {errors}New({}))",
            quote(&format!("env {} required", field.name))
        );
        w.dedent();
    }
    w.line("}");
}

/// Parse `input` as `kind` and feed the converted value to `assign`, whose
/// `{}` is replaced by the value expression.
#[allow(clippy::too_many_arguments)]
fn write_parse(
    ctx: &mut GenContext<'_>,
    w: &mut CodeWriter,
    field: &EnvField,
    kind: &FieldKind,
    input: &str,
    assign: &str,
    ty: &str,
) {
    let strconv = ctx.importer.qualifier("", "strconv");
    let parse = match kind {
        FieldKind::String => {
            let value = if ty == "string" {
                input.to_string()
            } else {
                format!("{ty}({input})")
            };
            w.line(&assign.replace("{}", &value));
            return;
        }
        FieldKind::Bool => format!("{strconv}ParseBool({input})"),
        FieldKind::Int { bits } => format!("{strconv}ParseInt({input}, 10, {bits})"),
        FieldKind::Uint { bits } => format!("{strconv}ParseUint({input}, 10, {bits})"),
        FieldKind::Float { bits } => format!("{strconv}ParseFloat({input}, {bits})"),
        FieldKind::Duration => {
            let time = ctx.importer.qualifier("", "time");
            format!("{time}ParseDuration({input})")
        }
        FieldKind::Slice(_) => return,
    };
    let fmt = ctx.importer.qualifier("", "fmt");
    let value = if ty == kind_go_type(kind) {
        "v".to_string()
    } else {
        format!("{ty}(v)")
    };
    w.line(&format!("if v, err := {parse}; err != nil {{"));
    w.indent();
    w!(
        w,
        "errs = append(errs, {fmt}Errorf(\"env {} failed parse: %w\", err))",
        field.name
    );
    w.dedent();
    w.line("} else {");
    w.indent();
    w.line(&assign.replace("{}", &value));
    w.dedent();
    w.line("}");
}

/// Type returned by the strconv/time parse function for `kind`.
fn kind_go_type(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Bool => "bool",
        FieldKind::Int { .. } => "int64",
        FieldKind::Uint { .. } => "uint64",
        FieldKind::Float { .. } => "float64",
        FieldKind::Duration => "time.Duration",
        FieldKind::String | FieldKind::Slice(_) => "string",
    }
}
