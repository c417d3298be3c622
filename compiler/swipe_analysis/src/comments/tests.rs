use pretty_assertions::assert_eq;

use super::CommentIndex;
use crate::test_support::load_app;

const SRC: &str = "package app

import \"context\"

// User is a registered account.
type User struct {
	// ID is the primary key.
	ID   int
	Name string // display name
	Base
}

type Base struct{}

// Svc manages users.
type Svc interface {
	// Create stores a new user.
	Create(ctx context.Context, name string) (int, error)
	Delete(id int) error // removes a user
}

type svc struct{}

// Create implements Svc.
func (s *svc) Create(ctx context.Context, name string) (int, error) { return 0, nil }

// New returns the service.
func New() Svc { return &svc{} }

const (
	// Max bounds the page size.
	Max = 10
)
";

#[test]
fn function_and_method_docs() {
    let prog = load_app(SRC);
    let index = CommentIndex::build(&prog);
    assert_eq!(index.func_comment("example.com/app.New"), ["New returns the service."]);
    assert_eq!(
        index.func_comment("example.com/app.svc.Create"),
        ["Create implements Svc."]
    );
    assert_eq!(
        index.func_comment("example.com/app.Svc.Create"),
        ["Create stores a new user."]
    );
    assert_eq!(
        index.func_comment("example.com/app.Svc.Delete"),
        ["removes a user"]
    );
    assert!(index.func_comment("example.com/app.Missing").is_empty());
}

#[test]
fn field_comments_prefer_the_line_comment() {
    let prog = load_app(SRC);
    let index = CommentIndex::build(&prog);
    assert_eq!(index.field_comment("example.com/app.User", "ID"), "ID is the primary key.");
    assert_eq!(index.field_comment("example.com/app.User", "Name"), "display name");
    assert_eq!(index.field_comment("example.com/app.User", "Base"), "");
}

#[test]
fn object_docs_fall_back_to_the_declaration() {
    let prog = load_app(SRC);
    let index = CommentIndex::build(&prog);
    assert_eq!(index.object_comment("example.com/app.User"), ["User is a registered account."]);
    assert_eq!(index.object_comment("example.com/app.Max"), ["Max bounds the page size."]);
    assert!(index.object_comment("example.com/app.Base").is_empty());
}
