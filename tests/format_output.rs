//! Integration tests for SCN text output and formatting options.

use scn::options::{token_impact, CharEstimator, FormattingOptions, Preset};
use scn::project::{analyze_project, InputFile, ProjectOptions};
use scn::{format_scn, SourceFile};

fn analyze(sources: &[(&str, &str)]) -> Vec<SourceFile> {
    let inputs = sources
        .iter()
        .map(|(path, content)| InputFile {
            path: path.to_string(),
            content: content.to_string(),
        })
        .collect();
    analyze_project(inputs, &ProjectOptions::default())
        .expect("analysis should succeed")
        .files
}

fn two_file_project() -> Vec<SourceFile> {
    analyze(&[
        (
            "app.ts",
            "import { helper } from './util';\nexport function main() { helper(); }",
        ),
        ("util.ts", "export function helper(): number { return 1; }"),
    ])
}

#[test]
fn test_dependencies_print_before_dependents() {
    let files = two_file_project();
    let text = format_scn(&files, &FormattingOptions::default().resolve());

    let util_pos = text.find("util.ts").expect("util block");
    let app_pos = text.find("app.ts").expect("app block");
    assert!(util_pos < app_pos, "dependency file comes first:\n{text}");
}

#[test]
fn test_default_output_shape() {
    let files = two_file_project();
    let text = format_scn(&files, &FormattingOptions::default().resolve());

    assert!(text.contains("§ (2) util.ts"), "header line:\n{text}");
    assert!(
        text.contains("+ ~ (2.1) helper(): #number"),
        "symbol line with indicator, icon, id, and signature:\n{text}"
    );
    assert!(text.contains("-> (2.1)"), "outgoing edge from main:\n{text}");
    assert!(text.contains("<- (1.1)"), "incoming edge on helper:\n{text}");
    assert!(
        text.contains("\n\n"),
        "file blocks separated by a blank line"
    );
}

#[test]
fn test_minimal_preset_strips_decoration() {
    let files = two_file_project();
    let default_text = format_scn(&files, &FormattingOptions::default().resolve());
    let minimal_text = format_scn(&files, &FormattingOptions::preset(Preset::Minimal).resolve());

    assert!(minimal_text.len() < default_text.len());
    assert!(
        minimal_text.contains("§ (2) util.ts"),
        "headers survive:\n{minimal_text}"
    );
    assert!(
        !minimal_text.contains("helper"),
        "symbol lines collapse:\n{minimal_text}"
    );
    assert!(
        minimal_text.contains("->"),
        "cross-file structure survives:\n{minimal_text}"
    );
}

#[test]
fn test_compact_preset_hides_members() {
    let files = analyze(&[(
        "shape.ts",
        "export class Shape {\n  private area: number;\n  grow(): void {}\n}\nfunction local() {}",
    )]);
    let text = format_scn(&files, &FormattingOptions::preset(Preset::Compact).resolve());

    assert!(text.contains("Shape"), "exported class stays:\n{text}");
    assert!(!text.contains("area"), "properties filtered out:\n{text}");
    assert!(!text.contains("grow"), "methods filtered out:\n{text}");
    assert!(!text.contains("local"), "only exports shown:\n{text}");
}

#[test]
fn test_members_group_under_container() {
    let files = analyze(&[(
        "shape.ts",
        "export class Shape {\n  area: number;\n}",
    )]);
    let text = format_scn(&files, &FormattingOptions::default().resolve());

    let member_line = text
        .lines()
        .find(|l| l.contains("area"))
        .expect("member line");
    assert!(
        member_line.starts_with("    "),
        "members indent under their class: {member_line:?}"
    );
}

#[test]
fn test_parse_error_stub_block() {
    let files = analyze(&[("broken.css", "@media {{{{")]);
    let text = format_scn(&files, &FormattingOptions::default().resolve());
    if files[0].parse_error {
        assert!(text.contains("[error]"), "error tag on the header:\n{text}");
    }
}

#[test]
fn test_token_impact_deltas() {
    let files = two_file_project();
    let impact = token_impact(&files, &FormattingOptions::default(), &CharEstimator);

    assert!(impact.base_tokens > 0);
    let incoming = impact.options["show_incoming"];
    assert!(incoming <= 0, "turning incoming edges off saves tokens");
    assert!(
        impact.display_filters.contains_key("function"),
        "filters reported per kind present: {:?}",
        impact.display_filters
    );
}
