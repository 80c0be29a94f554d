/// Round-trip tests: serializing a parsed tree and parsing it again must give
/// back the same tree
use crate::*;

fn assert_round_trip(source: &str) {
    let doc = parse(source);
    let serialized = serialize(&doc);
    let reparsed = parse(&serialized);
    assert_eq!(doc, reparsed, "Round trip changed tree for {:?}\nserialized: {}", source, serialized);
}

#[test]
fn test_roundtrip_paragraphs_and_marks() {
    let sources = vec![
        "<p>plain</p>",
        "<p>a <strong>b</strong> <em>c</em> <u>d</u></p>",
        "<p><b><i><u>all</u></i></b></p>",
        "<p style=\"text-align: center\">centered</p>",
        "<p></p>",
        "<p> </p>",
        "loose text",
        "<p>line<br>break</p>",
        "<br>",
    ];

    for source in sources {
        assert_round_trip(source);
    }
}

#[test]
fn test_roundtrip_headings() {
    for source in ["<h1>one</h1>", "<h2 style=\"text-align:right\">two</h2>", "<h3>three</h3>", "<h6>six</h6>"] {
        assert_round_trip(source);
    }
}

#[test]
fn test_roundtrip_escaping() {
    let sources = vec![
        "<p>A &amp; B &lt;tag&gt;</p>",
        "<p>A & B</p>",
        "<p>&amp;amp;</p>",
        "<p>a&nbsp;b</p>",
        "<p>1 < 2</p>",
    ];

    for source in sources {
        assert_round_trip(source);
    }
}

#[test]
fn test_roundtrip_placeholders() {
    assert_round_trip("<p>Hello <span class=\"be-variable\">{BE Variable}</span>, welcome</p>");
    assert_round_trip("<span class=\"be-variable\">stale label</span>");
    assert_round_trip("<ul><li><span class=\"be-variable\"></span></li></ul>");
}

#[test]
fn test_roundtrip_lists() {
    let sources = vec![
        "<ul><li>a</li><li>b</li></ul>",
        "<ol><li>a</li></ol>",
        "<ol start=\"3\" data-level=\"2\"><li>a</li></ol>",
        "<ol><li>a<ol data-level=\"2\"><li>b<ol data-level=\"3\"><li>c</li></ol></li></ol></li></ol>",
        "<ul><li>one<li>two</ul>",
        "<ol><li></li></ol>",
        "<ol><li><p>first</p><p>second</p></li></ol>",
        "<ol><li>a</li><ol><li>nested directly</li></ol></ol>",
        "<ol>stray<li>a</li></ol>",
    ];

    for source in sources {
        assert_round_trip(source);
    }
}

#[test]
fn test_roundtrip_tables() {
    let sources = vec![
        "<table><tr><th>H1</th><th>H2</th></tr><tr><td>a</td><td>b</td></tr></table>",
        "<table><colgroup><col style=\"width: 20%\"><col style=\"width: 30%\"><col style=\"width: 50%\"></colgroup><tr><td>a</td><td>b</td><td>c</td></tr></table>",
        "<table><tr><td colspan=\"2\">wide</td></tr><tr><td>a</td><td>b</td></tr></table>",
        "<table><tr><td>a</td><td>b</td><td>c</td></tr><tr><td>short</td></tr></table>",
        "<table><col style=\"width: 1%\"><col style=\"width: 2%\"><tr><td>x</td><td>y</td></tr></table>",
        "<table><tr><th>mixed</th><td>row</td></tr></table>",
        "<table><tr><td><ul><li>in cell</li></ul></td></tr></table>",
        "<table><tr><td>a</td><td>b</td><td>c</td></tr></table>",
    ];

    for source in sources {
        assert_round_trip(source);
    }
}

#[test]
fn test_roundtrip_pasted_document() {
    let source = r#"
        <!DOCTYPE html>
        <html>
          <head><meta charset="utf-8"><title>Offer</title></head>
          <body>
            <!-- header -->
            <div class="wrapper">
              <h1>Offer for %s</h1>
              <p>Dear <span class="be-variable">{BE Variable}</span>,</p>
              <div>We are happy to offer:</div>
              <ol>
                <li>Salary</li>
                <li>Benefits
                  <ol data-level="2"><li>Health</li><li>Dental</li></ol>
                </li>
              </ol>
              <table>
                <tbody>
                  <tr><th>Item</th><th>Value</th></tr>
                  <tr><td>Start</td><td><em>Monday</em></td></tr>
                </tbody>
              </table>
            </div>
          </body>
        </html>
    "#;

    assert_round_trip(source);
}

#[test]
fn test_serialize_is_stable() {
    let source = "<ol data-level=\"3\"><li>x</li></ol><table><tr><td>a</td></tr></table>";
    let once = serialize(&parse(source));
    let twice = serialize(&parse(&once));
    assert_eq!(once, twice);
}
