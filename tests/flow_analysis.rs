mod common;

use common::*;
use vela_lang::ast::BinaryOperator;

#[test]
fn missing_return_on_fall_through_path() {
    // fn f(x: bool): int { if (x) return 1; }
    let program = file(
        vec![function(
            "f",
            vec![param("x", simple_ty("bool"))],
            Some(simple_ty("int")),
            vec![if_stmt(var("x"), vec![ret(vec![int(1)])], None)],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(error_codes(&analysis).contains(&"ErrReturnTypeMismatch"));
}

#[test]
fn return_on_every_branch_is_clean() {
    let program = file(
        vec![function(
            "f",
            vec![param("x", simple_ty("bool"))],
            Some(simple_ty("int")),
            vec![if_stmt(
                var("x"),
                vec![ret(vec![int(1)])],
                Some(vec![ret(vec![int(2)])]),
            )],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);
}

#[test]
fn statements_after_return_are_unreachable() {
    // fn f(): void { return; return; }
    let program = file(
        vec![function(
            "f",
            vec![],
            Some(simple_ty("void")),
            vec![ret(vec![]), ret(vec![])],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(warning_codes(&analysis).contains(&"compiler.unreachable_code"));
}

#[test]
fn return_inside_loop_does_not_cover_the_exit_path() {
    // fn f(c: bool): int { while (c) { return 1; } }
    let program = file(
        vec![function(
            "f",
            vec![param("c", simple_ty("bool"))],
            Some(simple_ty("int")),
            vec![while_stmt(var("c"), vec![ret(vec![int(1)])])],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(error_codes(&analysis).contains(&"ErrReturnTypeMismatch"));
}

#[test]
fn loop_followed_by_return_is_clean() {
    let program = file(
        vec![function(
            "f",
            vec![param("c", simple_ty("bool"))],
            Some(simple_ty("int")),
            vec![
                while_stmt(var("c"), vec![expr_stmt(var("c"))]),
                ret(vec![int(0)]),
            ],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);
}

#[test]
fn conditional_initialization_is_reported() {
    // fn f(c: bool) { var x: int; if (c) { x = 1; } echo x; }
    let program = file(
        vec![function(
            "f",
            vec![param("c", simple_ty("bool"))],
            None,
            vec![
                var_decl("x", Some(simple_ty("int")), None),
                if_stmt(var("c"), vec![expr_stmt(assign(var("x"), int(1)))], None),
                echo(vec![var("x")]),
            ],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(error_codes(&analysis).contains(&"compiler.uninitialized_variable"));
}

#[test]
fn initialization_on_both_branches_is_definite() {
    let program = file(
        vec![function(
            "f",
            vec![param("c", simple_ty("bool"))],
            None,
            vec![
                var_decl("x", Some(simple_ty("int")), None),
                if_stmt(
                    var("c"),
                    vec![expr_stmt(assign(var("x"), int(1)))],
                    Some(vec![expr_stmt(assign(var("x"), int(2)))]),
                ),
                echo(vec![var("x")]),
            ],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(
        !error_codes(&analysis).contains(&"compiler.uninitialized_variable"),
        "{:?}",
        analysis.errors
    );
}

#[test]
fn use_before_any_assignment_is_reported_once() {
    // fn f() { var x: int; echo x; }
    let program = file(
        vec![function(
            "f",
            vec![],
            None,
            vec![
                var_decl("x", Some(simple_ty("int")), None),
                echo(vec![var("x")]),
            ],
        )],
        vec![],
    );

    let analysis = run(&program);
    let uninit = error_codes(&analysis)
        .iter()
        .filter(|c| **c == "compiler.uninitialized_variable")
        .count();
    assert_eq!(uninit, 1, "{:?}", analysis.errors);
}

#[test]
fn parameters_count_as_initialized() {
    let program = file(
        vec![function(
            "f",
            vec![param("x", simple_ty("int"))],
            None,
            vec![echo(vec![var("x")])],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);
}

#[test]
fn switch_case_type_mismatch() {
    use vela_lang::ast::{Case, Statement, Switch};

    let program = file(
        vec![function(
            "f",
            vec![param("s", simple_ty("int"))],
            None,
            vec![Statement::Switch(Switch {
                subject: var("s"),
                cases: vec![Case {
                    value: string("one"),
                    body: vec![],
                    position: span(),
                }],
                default: None,
                position: span(),
            })],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(error_codes(&analysis).contains(&"ErrTypeMismatch"));
}

#[test]
fn arithmetic_on_booleans_is_rejected() {
    let program = file(
        vec![function(
            "f",
            vec![param("b", simple_ty("bool"))],
            None,
            vec![expr_stmt(binary(var("b"), BinaryOperator::Add, int(1)))],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(error_codes(&analysis).contains(&"ErrOperandsMustBeNumbers"));
}
