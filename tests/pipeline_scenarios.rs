//! End-to-end pipeline tests over realistic archive bodies.

use maildown_lib::config::ArchiveConfig;
use maildown_lib::pipeline::{MessageMeta, Normalizer};
use pretty_assertions::assert_eq;

fn normalize(raw: &str) -> String {
    let normalizer = Normalizer::new(ArchiveConfig::default());
    let meta = MessageMeta {
        list: "amber-dev",
        year_month: "2023-January",
        id: "007915",
    };
    normalizer.normalize_body(raw, &meta, false)
}

#[test]
fn lightly_indented_code_is_fenced() {
    let raw = "Just a question, are you proposing that\n  case Point(0, 0) -> ...\n\nis semantically equivalent to\n  case Point(var x, var y) when x == 0 -> ...";
    let expected = "\
Just a question, are you proposing that

```
case Point(0, 0) -> ...
```

is semantically equivalent to

```
case Point(var x, var y) when x == 0 -> ...
```
";
    assert_eq!(normalize(raw), expected);
}

#[test]
fn wrap_orphan_is_joined_but_signature_is_not() {
    let raw = "\
This decomposition gives us direct and convenient access to the `x` and `y`
components of
`Point3d` and friends, which we discussed earlier in the thread.

regards,
R\u{e9}mi
";
    let output = normalize(raw);
    assert!(output.contains(
        "This decomposition gives us direct and convenient access to the `x` and `y` components of\n"
    ));
    assert!(output.contains("regards,\nR\u{e9}mi\n"));
}

#[test]
fn nested_blockquote_code_is_fenced_with_prefix() {
    let raw = "\
> > > record ColorPoint(int x, int y, RGB color) {}
> > >
> > > void somethingImportant(ColorPoint cp) {
> > >     if (cp instanceof ColorPoint(var x, var y, var c)) {
> > >         // important code
> > >     }
> > > }
> > >
> > > The use of pattern matching is great.";
    let expected = "\
> > > ```
> > > record ColorPoint(int x, int y, RGB color) {}
> > >
> > > void somethingImportant(ColorPoint cp) {
> > >     if (cp instanceof ColorPoint(var x, var y, var c)) {
> > >         // important code
> > >     }
> > > }
> > > ```
> > >
> > > The use of pattern matching is great.
";
    assert_eq!(normalize(raw), expected);
}

#[test]
fn separator_inside_nested_quote_keeps_prefix_without_blank() {
    let raw = "> > before the separator\n> > ----- Original Message -----\n> > after it";
    let output = normalize(raw);
    assert!(output.contains("> > before the separator\n> > **\u{2500}\u{2500}\u{2500}\u{2500}\u{2500} Original Message \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}**\n> > after it"));
}

#[test]
fn separator_at_top_level_gets_a_blank_line() {
    let raw = "my reply text\n----- Forwarded Message -----\nFrom: someone";
    let output = normalize(raw);
    assert!(output.contains(
        "my reply text\n\n**\u{2500}\u{2500}\u{2500}\u{2500}\u{2500} Forwarded Message \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}**"
    ));
}

#[test]
fn entity_encoded_quote_markers_become_blockquotes() {
    let raw = "&gt; quoted line one\n&gt; quoted line two\nfresh reply text";
    let output = normalize(raw);
    assert_eq!(output, "> quoted line one\n> quoted line two\n\nfresh reply text\n");
}

#[test]
fn empty_body_produces_empty_output() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("\n\n"), "");
}

#[test]
fn attachment_notice_at_first_line_empties_body() {
    let raw = "-------------- next part --------------\nAn HTML attachment was scrubbed...\nURL: <...>";
    assert_eq!(normalize(raw), "");
}

#[test]
fn lone_quote_marker_is_harmless() {
    assert_eq!(normalize(">"), ">\n");
}

#[test]
fn unbalanced_anchor_is_preserved() {
    let raw = "see <a href=\"https://x.test/p\">the broken page";
    let output = normalize(raw);
    assert!(output.contains("the broken page"));
}

#[test]
fn big_o_notation_is_not_fenced() {
    let raw = "The lookup is O(n log n) in the worst case.\nThe insert is O(1) amortized though.";
    let output = normalize(raw);
    assert!(!output.contains("```"));
}

#[test]
fn forwarded_headers_are_renested() {
    let raw = "\
> Rémi wrote:
>     From: Joe Smith
>     Sent: Tuesday
>     Subject: records
>
>     the forwarded body text";
    let output = normalize(raw);
    assert!(output.contains("> > From: Joe Smith"));
    assert!(output.contains("> > the forwarded body text"));
}

#[test]
fn list_item_code_is_fenced_at_item_column() {
    let raw = "- consider this example:\n      var x = point.x();\n      var y = point.y();\nand then decide\nwhat you prefer";
    let output = normalize(raw);
    assert!(output.contains("- consider this example:\n  ```\n  var x = point.x();\n  var y = point.y();\n  ```"));
}

mod invariants {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODIES: &[&str] = &[
        "Just a question, are you proposing that\n  case Point(0, 0) -> ...\n\nis semantically equivalent to\n  case Point(var x, var y) when x == 0 -> ...",
        "> > > record ColorPoint(int x, int y, RGB color) {}\n> > > \n> > > void somethingImportant(ColorPoint cp) {\n> > >     if (cp instanceof ColorPoint(var x, var y, var c)) {\n> > >         // important code\n> > >     }\n> > > }\n> > > \n> > > The use of pattern matching is great.",
        "&gt; quoted\nreply\n\n    int x = 1;\n    int y = 2;\n\n- item\n      m.call(x);\n\nregards,\nJoe",
        "> R\u{e9}mi wrote:\n>     From: Joe\n>     Subject: records\n>\n>     forwarded body",
        "x = a;\ny = b;\nprose after the block",
        ">",
        "",
    ];

    fn fenced_regions(output: &str) -> (usize, Vec<String>) {
        let mut openings = 0;
        let mut inside: Vec<String> = Vec::new();
        let mut in_fence = false;
        for line in output.lines() {
            let content = line.trim_start_matches(['>', ' ']).trim_start();
            if content.starts_with("```") {
                if !in_fence {
                    openings += 1;
                }
                in_fence = !in_fence;
            } else if in_fence {
                inside.push(line.to_string());
            }
        }
        assert!(!in_fence, "unbalanced fences in output:\n{output}");
        (openings, inside)
    }

    #[test]
    fn pipeline_is_idempotent() {
        for body in BODIES {
            let once = normalize(body);
            let twice = normalize(&once);
            assert_eq!(twice, once, "not a fixed point for body:\n{body}");
        }
    }

    #[test]
    fn fences_are_balanced() {
        for body in BODIES {
            fenced_regions(&normalize(body));
        }
    }

    #[test]
    fn no_email_header_inside_fences() {
        for body in BODIES {
            let (_, inside) = fenced_regions(&normalize(body));
            for line in inside {
                let content = line.trim_start_matches(['>', ' ']);
                assert!(
                    !maildown_lib::utils::code_heuristic::is_email_header(content.trim()),
                    "header inside fence: {line}"
                );
            }
        }
    }
}
