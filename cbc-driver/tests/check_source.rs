//! End-to-end checks of JSON ASTs through the driver

use cbc_driver::{check_source, Format, Target};
use cbc_frontend::{ExprKind, StmtKind};
use indoc::indoc;

const WIDEN_RETURN: &str = indoc! {r#"
    {
      "functions": [
        {
          "name": "f",
          "return_type": {"integer": {"kind": "long", "signed": true, "size": 8}},
          "params": [
            {"name": "x", "type": {"integer": {"kind": "int", "signed": true, "size": 4}}}
          ],
          "body": {
            "stmts": [
              {
                "kind": {
                  "return": {
                    "kind": {
                      "variable": {
                        "name": "x",
                        "entity_type": {"integer": {"kind": "int", "signed": true, "size": 4}}
                      }
                    }
                  }
                }
              }
            ]
          }
        }
      ]
    }
"#};

const STRUCT_BY_VALUE: &str = indoc! {r#"
    {
      "types": [
        {
          "id": 0,
          "name": "S",
          "members": [
            {"name": "a", "type": {"integer": {"kind": "int", "signed": true, "size": 4}}}
          ]
        }
      ],
      "functions": [
        {
          "name": "f",
          "return_type": {"struct": {"id": 0, "name": "S"}},
          "params": [
            {
              "name": "x",
              "type": {"struct": {"id": 0, "name": "S"}},
              "span": {
                "start": {"filename": "s.cb", "line": 1, "column": 12},
                "end": {"filename": "s.cb", "line": 1, "column": 21}
              }
            }
          ],
          "body": {
            "stmts": [
              {
                "kind": {
                  "return": {
                    "kind": {
                      "variable": {"name": "x", "entity_type": {"struct": {"id": 0, "name": "S"}}}
                    }
                  }
                }
              }
            ]
          }
        }
      ]
    }
"#};

const NARROWING_GLOBAL: &str = indoc! {r#"
    {
      "variables": [
        {
          "name": "g",
          "type": {"integer": {"kind": "char", "signed": true, "size": 1}},
          "is_toplevel": true,
          "initializer": {
            "kind": {
              "int_literal": {
                "value": 300,
                "literal_type": {"integer": {"kind": "int", "signed": true, "size": 4}}
              }
            }
          }
        }
      ]
    }
"#};

const LONG_TO_INT: &str = indoc! {r#"
    {
      "functions": [
        {
          "name": "f",
          "return_type": {"integer": {"kind": "int", "signed": true, "size": 4}},
          "params": [
            {"name": "l", "type": {"integer": {"kind": "long", "signed": true, "size": 8}}}
          ],
          "body": {
            "variables": [
              {
                "name": "y",
                "type": {"integer": {"kind": "int", "signed": true, "size": 4}},
                "initializer": {
                  "kind": {
                    "variable": {
                      "name": "l",
                      "entity_type": {"integer": {"kind": "long", "signed": true, "size": 8}}
                    }
                  }
                }
              }
            ],
            "stmts": [
              {
                "kind": {
                  "return": {
                    "kind": {
                      "variable": {
                        "name": "y",
                        "entity_type": {"integer": {"kind": "int", "signed": true, "size": 4}}
                      }
                    }
                  }
                }
              }
            ]
          }
        }
      ]
    }
"#};

#[test]
fn target_decides_integer_widths() {
    let report = check_source(LONG_TO_INT, Target::Ilp32).unwrap();
    assert!(report.passed);
    assert_eq!(report.warnings, 0);
    let ast = report.ast.expect("checked tree");
    assert_eq!(
        ast.functions[0].params[0].param_type.integer().map(|i| i.size),
        Some(4)
    );

    let report = check_source(LONG_TO_INT, Target::Lp64).unwrap();
    assert!(report.passed);
    assert_eq!(
        report.render(Format::Text).unwrap(),
        "warning: implicit cast from long to int\n"
    );
}

#[test]
fn widening_return_is_wrapped_in_cast() {
    let report = check_source(WIDEN_RETURN, Target::Lp64).unwrap();

    assert!(report.passed);
    assert_eq!(report.errors, 0);
    assert_eq!(report.warnings, 0);

    let ast = report.ast.expect("checked tree");
    match &ast.functions[0].body.stmts[0].kind {
        StmtKind::Return(Some(expr)) => match &expr.kind {
            ExprKind::Cast { operand, implicit, .. } => {
                assert!(*implicit);
                assert!(matches!(operand.kind, ExprKind::Variable { .. }));
            }
            other => panic!("Expected cast, got {other:?}"),
        },
        other => panic!("Expected return, got {other:?}"),
    }
}

#[test]
fn struct_by_value_fails_the_pass() {
    let report = check_source(STRUCT_BY_VALUE, Target::Lp64).unwrap();

    assert!(!report.passed);
    assert!(report.ast.is_none());
    assert_eq!(report.errors, 2);
    assert_eq!(
        report.render(Format::Text).unwrap(),
        indoc! {"
            error: returns a struct: f
            s.cb:1:12-21: error: invalid parameter type: struct S
        "}
    );
}

#[test]
fn json_format_lists_diagnostics() {
    let report = check_source(STRUCT_BY_VALUE, Target::Lp64).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.render(Format::Json).unwrap()).unwrap();

    assert_eq!(json["passed"], false);
    assert_eq!(json["errors"], 2);
    assert_eq!(json["diagnostics"][0]["severity"], "error");
    assert_eq!(json["diagnostics"][0]["message"], "returns a struct: f");
    assert_eq!(json["diagnostics"][1]["span"]["start"]["line"], 1);
}

#[test]
fn narrowing_initializer_only_warns() {
    let report = check_source(NARROWING_GLOBAL, Target::Ilp32).unwrap();

    assert!(report.passed);
    assert_eq!(report.warnings, 1);
    assert_eq!(
        report.render(Format::Text).unwrap(),
        "warning: implicit cast from int to char\n"
    );
}

#[test]
fn duplicate_type_ids_are_rejected() {
    let json = indoc! {r#"
        {
          "types": [
            {"id": 1, "name": "a", "members": []},
            {"id": 1, "name": "b", "is_union": true, "members": []}
          ]
        }
    "#};
    let err = check_source(json, Target::Lp64).unwrap_err();
    assert!(err.to_string().contains("duplicate type definition id 1"));
}
