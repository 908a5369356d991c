use std::fs;

use expect_test::expect;
use labsp::render::{descriptor_markdown, index_markdown, write_help_site};
use labsp::types::BUILTINS;
use labsp::{
    discover_registry, hover_at_position, to_diagnostics, DocumentState, FunctionRegistry,
    RegistryError,
};
use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticSeverity, HoverContents, NumberOrString, Position,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Format diagnostics into a deterministic, human-readable string.
///
/// Each diagnostic becomes one line:
///   <start_line>:<start_col>-<end_line>:<end_col> <severity> [<code>]: <message>
fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return "OK (no diagnostics)".to_string();
    }

    let mut lines: Vec<String> = diagnostics
        .iter()
        .map(|d| {
            let range = &d.range;
            let severity = match d.severity {
                Some(DiagnosticSeverity::ERROR) => "error",
                Some(DiagnosticSeverity::WARNING) => "warning",
                Some(DiagnosticSeverity::INFORMATION) => "info",
                Some(DiagnosticSeverity::HINT) => "hint",
                _ => "unknown",
            };
            let code = match &d.code {
                Some(NumberOrString::String(s)) => format!(" [{}]", s),
                Some(NumberOrString::Number(n)) => format!(" [{}]", n),
                None => String::new(),
            };
            format!(
                "{}:{}-{}:{} {}{}: {}",
                range.start.line,
                range.start.character,
                range.end.line,
                range.end.character,
                severity,
                code,
                d.message,
            )
        })
        .collect();

    lines.sort();
    lines.join("\n")
}

fn check_document(source: &str, registry: &FunctionRegistry) -> String {
    let state = DocumentState::new(source.to_string(), 0);
    format_diagnostics(&to_diagnostics(&state, registry))
}

fn hover_markdown(source: &str, position: Position) -> String {
    let state = DocumentState::new(source.to_string(), 0);
    match hover_at_position(&state, &BUILTINS, position).map(|h| h.contents) {
        Some(HoverContents::Markup(m)) => m.value,
        Some(_) => panic!("expected markup content"),
        None => "(no hover)".to_string(),
    }
}

const SETTINGS: &str = r#"
[catalog]
builtins = false
files = ["catalog/lab.toml"]
help_base_url = "https://docs.example.org/functions/"
"#;

const LAB_CATALOG: &str = r#"
[[function]]
name = "ExperimentFoo"
summary = "Runs foo on the samples."
category = "Custom"

[[function.signature]]
params = [{ name = "Samples", description = "Input samples." }]
returns = { name = "Protocol", description = "A protocol." }

[[function]]
name = "AnalyzeFoo"
help_url = "https://wiki.example.org/AnalyzeFoo"

[[function.signature]]
params = [{ name = "Data", description = "Foo data." }]
returns = { name = "Object", description = "An analysis." }
accepts_options = false

[[function]]
name = "ExperimentFoo"

[[function.signature]]
params = []
returns = { name = "Null", description = "Shadowed." }
"#;

/// Write a workspace with settings in a subdirectory, as an editor would
/// open it from the repository root.
fn lab_workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("lab");
    fs::create_dir_all(project.join("catalog")).unwrap();
    fs::write(project.join("settings.toml"), SETTINGS).unwrap();
    fs::write(project.join("catalog/lab.toml"), LAB_CATALOG).unwrap();
    dir
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[test]
fn valid_script() {
    let source = "\
samples = {s1, s2};
pcr = ExperimentPCR[samples, Cycles -> 30];
ExperimentTransfer[a, b, c, Volume -> 1];
PlotObject[data, Absorbance]";
    expect![[r#"OK (no diagnostics)"#]].assert_eq(&check_document(source, &BUILTINS));
}

#[test]
fn arity_mismatches() {
    let source = "\
samples = {s1, s2};
ExperimentPCR[samples, primers, extra];
PlotNMR[];
ExperimentTransfer[a, b, Volume -> 1]";
    expect![[r#"
        1:0-1:13 warning [arity-mismatch]: ExperimentPCR expects 1 or 2 positional arguments, found 3
        2:0-2:7 warning [arity-mismatch]: PlotNMR expects 1 positional argument, found 0
        3:0-3:18 warning [arity-mismatch]: ExperimentTransfer expects 3 positional arguments, found 2"#]]
    .assert_eq(&check_document(source, &BUILTINS));
}

#[test]
fn strings_and_comments_are_not_calls() {
    let source = r#"(* PlotNMR[a, b] *) label = "ExperimentPCR[]"; PlotNMR[data]"#;
    expect![[r#"OK (no diagnostics)"#]].assert_eq(&check_document(source, &BUILTINS));
}

#[test]
fn nested_calls_are_checked_independently() {
    let source = "PlotNMR[ExperimentNMR[a, b], extra]";
    expect![[r#"
        0:0-0:7 warning [arity-mismatch]: PlotNMR expects 1 positional argument, found 2
        0:8-0:21 warning [arity-mismatch]: ExperimentNMR expects 1 positional argument, found 2"#]]
    .assert_eq(&check_document(source, &BUILTINS));
}

// ---------------------------------------------------------------------------
// Hover
// ---------------------------------------------------------------------------

#[test]
fn hover_builtin() {
    expect![[r#"
        **PlotNMR**

        ```
        PlotNMR[Spectra, Options] -> Plot
        ```

        Plots nuclear magnetic resonance spectra.

        [Documentation](https://www.emeraldcloudlab.com/helpfiles/plotnmr)"#]]
    .assert_eq(&hover_markdown("PlotNMR[data]", Position::new(0, 2)));
}

#[test]
fn hover_skips_strings_and_comments() {
    let source = "(* see PlotNMR *) label = \"PlotNMR\"";
    expect![[r#"(no hover)"#]].assert_eq(&hover_markdown(source, Position::new(0, 10)));
    expect![[r#"(no hover)"#]].assert_eq(&hover_markdown(source, Position::new(0, 30)));
}

#[test]
fn hover_on_unregistered_identifier() {
    expect![[r#"(no hover)"#]].assert_eq(&hover_markdown("PlotNMR[data]", Position::new(0, 10)));
}

// ---------------------------------------------------------------------------
// Settings and catalogue files
// ---------------------------------------------------------------------------

#[test]
fn workspace_catalog_registry() {
    let workspace = lab_workspace();
    let registry = discover_registry(workspace.path());

    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, ["ExperimentFoo", "AnalyzeFoo"]);

    // The first definition wins over the later duplicate.
    let foo = registry.lookup("ExperimentFoo").unwrap();
    assert_eq!(foo.signatures[0].returns.name, "Protocol");
    assert_eq!(foo.help_url, "https://docs.example.org/functions/experimentfoo");

    assert!(matches!(
        registry.lookup("ExperimentPCR"),
        Err(RegistryError::NotFound { .. })
    ));
}

#[test]
fn workspace_catalog_diagnostics() {
    let workspace = lab_workspace();
    let registry = discover_registry(workspace.path());
    let source = "ExperimentFoo[s, Mode -> Fast];\nAnalyzeFoo[d, Method -> Fit];\nExperimentPCR[a, b, c]";
    expect![[r#"1:0-1:10 warning [options-not-accepted]: AnalyzeFoo does not accept options with 1 positional argument"#]]
        .assert_eq(&check_document(source, &registry));
}

#[test]
fn workspace_catalog_page() {
    let workspace = lab_workspace();
    let registry = discover_registry(workspace.path());
    expect![[r#"
        # ExperimentFoo

        Runs foo on the samples.

        ## Usage

        ### `ExperimentFoo[Samples, Options]` → `Protocol`

        | Parameter | Description |
        |---|---|
        | `Samples` | Input samples. |

        **Returns** `Protocol`: A protocol.

        Accepts options as trailing `OptionName -> value` rules.

        [Full documentation](https://docs.example.org/functions/experimentfoo)
    "#]]
    .assert_eq(&descriptor_markdown(registry.lookup("ExperimentFoo").unwrap()));
}

#[test]
fn workspace_index_page() {
    let workspace = lab_workspace();
    let registry = discover_registry(workspace.path());
    expect![[r#"
        # Function Index

        2 functions.

        ## Custom

        - [ExperimentFoo](ExperimentFoo.md): Runs foo on the samples.

        ## Other

        - [AnalyzeFoo](AnalyzeFoo.md)
    "#]]
    .assert_eq(&index_markdown(&registry));
}

#[test]
fn help_site_for_builtins() {
    let out = tempfile::tempdir().unwrap();
    let written = write_help_site(&BUILTINS, out.path()).unwrap();
    assert_eq!(written, BUILTINS.len());

    for name in BUILTINS.names() {
        assert!(out.path().join(format!("{}.md", name)).is_file(), "{name}");
    }
    let index = fs::read_to_string(out.path().join("index.md")).unwrap();
    assert!(index.contains("- [ExperimentPCR](ExperimentPCR.md)"));
}
