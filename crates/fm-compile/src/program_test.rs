use super::*;

const SAMPLE: &str = r#"# forma bootstrap program
use core
include "includes/helpers.sql" as helpers
project "forma.yml"
project.schema_suffix "dev"
project.merge {"default_schema":"analytics"}
session.init "/abs/project"

define "definitions/orders.sql"
return graph
"#;

#[test]
fn test_parse_sample_program() {
    let program = Program::parse(SAMPLE).unwrap();
    let overrides = ProjectConfigOverride {
        default_schema: Some("analytics".to_string()),
        ..Default::default()
    };

    assert_eq!(
        program.directives(),
        &[
            Directive::Use {
                module: "core".to_string()
            },
            Directive::Include {
                path: "includes/helpers.sql".to_string(),
                global: "helpers".to_string()
            },
            Directive::Project {
                path: "forma.yml".to_string()
            },
            Directive::SchemaSuffix {
                suffix: "dev".to_string()
            },
            Directive::Merge { overrides },
            Directive::SessionInit {
                project_dir: "/abs/project".to_string()
            },
            Directive::Define {
                path: "definitions/orders.sql".to_string()
            },
            Directive::Return(ReturnExpr::Graph),
        ]
    );
}

#[test]
fn test_display_parses_back() {
    let mut program = Program::new();
    program.push(Directive::Use {
        module: "core".to_string(),
    });
    program.push(Directive::Define {
        path: "definitions/a \"quoted\" name.sql".to_string(),
    });
    program.push(Directive::Return(ReturnExpr::Template(
        "select *\nfrom {{ ref('a') }}".to_string(),
    )));

    let text = program.to_string();
    assert!(text.starts_with(PROGRAM_HEADER));
    assert_eq!(text.lines().count(), 4);
    assert_eq!(Program::parse(&text).unwrap(), program);
}

#[test]
fn test_template_return_is_single_line() {
    let directive = Directive::Return(ReturnExpr::Template("select 1\nunion all\nselect 2".into()));
    assert_eq!(
        directive.to_string(),
        r#"return template "select 1\nunion all\nselect 2""#
    );
}

#[test]
fn test_unknown_directive_reports_line() {
    let err = Program::parse("use core\n\nimport \"x\"\n").unwrap_err();
    assert!(matches!(err, CompileError::ProgramSyntax { line: 3, .. }));
}

#[test]
fn test_include_requires_global() {
    let err = Directive::parse_line(r#"include "includes/a.sql""#, 1).unwrap_err();
    assert!(err.to_string().contains("as <identifier>"));

    let err = Directive::parse_line(r#"include "includes/a.sql" as 1abc"#, 1).unwrap_err();
    assert!(matches!(err, CompileError::ProgramSyntax { .. }));
}

#[test]
fn test_trailing_input_rejected() {
    let err = Directive::parse_line(r#"define "a.sql" "b.sql""#, 7).unwrap_err();
    assert!(matches!(err, CompileError::ProgramSyntax { line: 7, .. }));
}

#[test]
fn test_unquoted_operand_rejected() {
    assert!(Directive::parse_line("define definitions/a.sql", 1).is_err());
    assert!(Directive::parse_line("return everything", 1).is_err());
}

#[test]
fn test_merge_rejects_unknown_keys() {
    assert!(Directive::parse_line(r#"project.merge {"schema":"x"}"#, 1).is_err());
}

#[test]
fn test_override_return_replaces_last_return() {
    let mut program = Program::parse(SAMPLE).unwrap();
    program.override_return(r#"template "select 1""#).unwrap();

    let returns: Vec<&Directive> = program
        .directives()
        .iter()
        .filter(|d| matches!(d, Directive::Return(_)))
        .collect();
    assert_eq!(
        returns,
        vec![&Directive::Return(ReturnExpr::Template("select 1".to_string()))]
    );
}

#[test]
fn test_override_return_appends_when_missing() {
    let mut program = Program::parse("use core").unwrap();
    program.override_return("graph").unwrap();
    assert_eq!(
        program.directives().last(),
        Some(&Directive::Return(ReturnExpr::Graph))
    );
}

#[test]
fn test_override_return_rejects_garbage() {
    let mut program = Program::new();
    assert!(program.override_return("rm -rf /").is_err());
}
