mod common;

use common::*;
use vela_lang::ast::{
    AccessorBody, AccessorDecl, BinaryOperator, ConstDecl, Declaration, EnumCase, EnumDecl,
    PropertyDecl,
};
use vela_lang::bytecode::{OpCode, Value, Visibility};

#[test]
fn abstract_final_conflict_is_reported() {
    let mut class = class_decl("C");
    class.is_abstract = true;
    class.is_final = true;

    let analysis = run(&file(vec![Declaration::Class(class)], vec![]));
    assert!(error_codes(&analysis).contains(&"ErrFinalAndAbstractConflict"));
}

#[test]
fn expression_bodied_getter_ends_in_return() {
    // int X { get => this.n + 1; }
    let mut class = class_decl("C");
    class.properties.push(PropertyDecl {
        name: "X".into(),
        ty: Some(simple_ty("int")),
        default: None,
        visibility: Visibility::Public,
        is_static: false,
        is_final: false,
        getter: Some(AccessorDecl {
            body: AccessorBody::Expression(binary(
                prop_access(this(), "n"),
                BinaryOperator::Add,
                int(1),
            )),
            position: span(),
        }),
        setter: None,
        annotations: vec![],
        position: span(),
    });
    // the backing field the getter reads
    class.properties.push(PropertyDecl {
        name: "n".into(),
        ty: Some(simple_ty("int")),
        default: Some(int(0)),
        visibility: Visibility::Private,
        is_static: false,
        is_final: false,
        getter: None,
        setter: None,
        annotations: vec![],
        position: span(),
    });

    let analysis = run(&file(vec![Declaration::Class(class)], vec![]));
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);

    let lowered = analysis.program.classes.get("C").expect("class missing");
    let getter = lowered.find_method("get_X", 0).expect("getter missing");

    assert_eq!(getter.arity, 0);
    assert_eq!(getter.min_arity, 0);
    assert_eq!(getter.return_type.to_string(), "int");
    assert_eq!(getter.chunk.last_op(), Some(OpCode::Return));
}

#[test]
fn setter_synthesizes_single_parameter_method() {
    let mut class = class_decl("C");
    class.properties.push(PropertyDecl {
        name: "X".into(),
        ty: Some(simple_ty("int")),
        default: None,
        visibility: Visibility::Protected,
        is_static: false,
        is_final: false,
        getter: None,
        setter: Some(AccessorDecl {
            body: AccessorBody::Block(vec![]),
            position: span(),
        }),
        annotations: vec![],
        position: span(),
    });

    let analysis = run(&file(vec![Declaration::Class(class)], vec![]));
    let lowered = analysis.program.classes.get("C").expect("class missing");
    let setter = lowered.find_method("set_X", 1).expect("setter missing");

    assert_eq!(setter.arity, 1);
    assert_eq!(setter.visibility, Visibility::Protected);
    assert_eq!(setter.chunk.last_op(), Some(OpCode::ReturnNull));
}

#[test]
fn class_constants_are_folded() {
    let mut class = class_decl("C");
    class.constants.push(ConstDecl {
        name: "ANSWER".into(),
        value: binary(int(6), BinaryOperator::Multiply, int(7)),
        position: span(),
    });
    class.constants.push(ConstDecl {
        name: "BROKEN".into(),
        value: binary(int(1), BinaryOperator::Divide, int(0)),
        position: span(),
    });

    let analysis = run(&file(vec![Declaration::Class(class)], vec![]));
    let lowered = analysis.program.classes.get("C").expect("class missing");

    assert_eq!(lowered.constants.get("ANSWER"), Some(&Value::Int(42)));
    // division by zero folds to null, never traps
    assert_eq!(lowered.constants.get("BROKEN"), Some(&Value::Null));
}

#[test]
fn static_properties_live_in_their_own_table() {
    let mut class = class_decl("C");
    class.properties.push(PropertyDecl {
        name: "shared".into(),
        ty: Some(simple_ty("int")),
        default: Some(int(1)),
        visibility: Visibility::Public,
        is_static: true,
        is_final: false,
        getter: None,
        setter: None,
        annotations: vec![],
        position: span(),
    });

    let analysis = run(&file(vec![Declaration::Class(class)], vec![]));
    let lowered = analysis.program.classes.get("C").expect("class missing");

    assert!(lowered.properties.is_empty());
    assert_eq!(
        lowered.static_properties.get("shared").map(|p| &p.default),
        Some(&Value::Int(1))
    );
}

#[test]
fn enum_cases_fold_with_auto_numbering() {
    let decl = EnumDecl {
        name: "Color".into(),
        cases: vec![
            EnumCase {
                name: "Red".into(),
                value: None,
                position: span(),
            },
            EnumCase {
                name: "Green".into(),
                value: Some(int(7)),
                position: span(),
            },
            EnumCase {
                name: "Blue".into(),
                value: None,
                position: span(),
            },
        ],
        annotations: vec![],
        position: span(),
    };

    let analysis = run(&file(vec![Declaration::Enum(decl)], vec![]));
    let lowered = analysis.program.enums.get("Color").expect("enum missing");

    assert_eq!(
        lowered.cases,
        vec![
            ("Red".to_string(), Value::Int(0)),
            ("Green".to_string(), Value::Int(7)),
            ("Blue".to_string(), Value::Int(2)),
        ]
    );
}

#[test]
fn methods_compile_with_receiver_slot() {
    let mut class = class_decl("C");
    class.methods.push(method(
        "id",
        vec![param("x", simple_ty("int"))],
        Some(simple_ty("int")),
        Some(vec![ret(vec![var("x")])]),
    ));

    let analysis = run(&file(vec![Declaration::Class(class)], vec![]));
    assert!(analysis.errors.is_empty(), "{:?}", analysis.errors);

    let lowered = analysis.program.classes.get("C").expect("class missing");
    let compiled = lowered.find_method("id", 1).expect("method missing");

    // receiver occupies slot 0, so the parameter loads from slot 1
    let code = compiled.chunk.code();
    assert_eq!(code[0], OpCode::LoadLocal as u8);
    assert_eq!(u16::from_be_bytes([code[1], code[2]]), 1);
    assert_eq!(compiled.return_arity, 1);
}

#[test]
fn free_functions_are_lowered() {
    let program = file(
        vec![function(
            "main",
            vec![],
            None,
            vec![echo(vec![string("hello")])],
        )],
        vec![],
    );

    let analysis = run(&program);
    assert!(analysis.program.functions.contains_key("main"));
}

#[test]
fn namespaced_file_records_namespace() {
    let mut program = file(vec![Declaration::Class(class_decl("C"))], vec![]);
    program.namespace = Some("app".into());

    let analysis = run(&program);
    let lowered = analysis.program.classes.get("C").expect("class missing");
    assert_eq!(lowered.namespace.as_deref(), Some("app"));
}

#[test]
fn expression_bodied_getter_must_match_property_type() {
    // string X { get => 1; } is a type error
    let mut class = class_decl("C");
    class.properties.push(PropertyDecl {
        name: "X".into(),
        ty: Some(simple_ty("string")),
        default: None,
        visibility: Visibility::Public,
        is_static: false,
        is_final: false,
        getter: Some(AccessorDecl {
            body: AccessorBody::Expression(int(1)),
            position: span(),
        }),
        setter: None,
        annotations: vec![],
        position: span(),
    });

    let analysis = run(&file(vec![Declaration::Class(class)], vec![]));
    assert!(error_codes(&analysis).contains(&"ErrTypeMismatch"));
}
