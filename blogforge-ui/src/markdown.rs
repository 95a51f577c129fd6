use regex_lite::Regex;
use std::sync::LazyLock;

struct Rules {
    headings: Vec<(Regex, &'static str)>,
    blockquote: Regex,
    bold: Regex,
    list_item: Regex,
    list: Regex,
    link: Regex,
}

static RULES: LazyLock<Rules> = LazyLock::new(|| {
    let re = |pattern: &str| Regex::new(pattern).expect("markdown pattern is valid");
    Rules {
        headings: vec![
            (re(r"(?m)^###### (.*)$"), "<h6>$1</h6>"),
            (re(r"(?m)^##### (.*)$"), "<h5>$1</h5>"),
            (re(r"(?m)^#### (.*)$"), "<h4>$1</h4>"),
            (re(r"(?m)^### (.*)$"), "<h3>$1</h3>"),
            (re(r"(?m)^## (.*)$"), "<h2>$1</h2>"),
            (re(r"(?m)^# (.*)$"), "<h1>$1</h1>"),
        ],
        blockquote: re(r"(?m)^(?:&gt;)+ ?(.*)$"),
        bold: re(r"\*\*(.+?)\*\*"),
        list_item: re(r"(?m)^[*-] (.*)$"),
        list: re(r"((?:<li>.*</li>\n?)+)"),
        link: re(r"\[([^\]]+)\]\((https?://[^)\s]+|/[^)\s]*)\)"),
    }
});

/// Small markdown subset for the preview pane. The input is escaped first,
/// so the output only contains tags produced here.
pub fn markdown_to_html(text: &str) -> String {
    let rules = &*RULES;
    let mut html = escape_html(text.trim());

    for (pattern, replacement) in &rules.headings {
        html = pattern.replace_all(&html, *replacement).into_owned();
    }
    html = rules
        .blockquote
        .replace_all(&html, "<blockquote>$1</blockquote>")
        .into_owned();
    html = rules.bold.replace_all(&html, "<strong>$1</strong>").into_owned();
    html = rules.list_item.replace_all(&html, "<li>$1</li>").into_owned();
    html = rules.list.replace_all(&html, "<ul>$1</ul>").into_owned();
    html = rules
        .link
        .replace_all(&html, r#"<a href="$2" target="_blank" rel="noopener">$1</a>"#)
        .into_owned();

    html.split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            if is_block_element(chunk) {
                chunk.to_string()
            } else {
                format!("<p>{chunk}</p>")
            }
        })
        .collect()
}

fn is_block_element(chunk: &str) -> bool {
    ["<h1>", "<h2>", "<h3>", "<h4>", "<h5>", "<h6>", "<ul>", "<blockquote>"]
        .iter()
        .any(|tag| chunk.starts_with(tag))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_paragraphs() {
        let html = markdown_to_html("## Why it matters\n\nShort answer.");
        assert_eq!(html, "<h2>Why it matters</h2><p>Short answer.</p>");
    }

    #[test]
    fn test_bold_and_lists() {
        let html = markdown_to_html("**Tip**: do this\n\n- one\n- two");
        assert_eq!(
            html,
            "<p><strong>Tip</strong>: do this</p><ul><li>one</li>\n<li>two</li></ul>"
        );
    }

    #[test]
    fn test_links_and_quotes() {
        let html = markdown_to_html("> Stay curious\n\nRead [the guide](https://example.com/g).");
        assert_eq!(
            html,
            "<blockquote>Stay curious</blockquote><p>Read <a href=\"https://example.com/g\" target=\"_blank\" rel=\"noopener\">the guide</a>.</p>"
        );
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = markdown_to_html("<script>alert(1)</script>");
        assert_eq!(html, "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>");
    }

    #[test]
    fn test_javascript_links_are_not_rendered() {
        let html = markdown_to_html("[x](javascript:alert(1))");
        assert!(!html.contains("<a "));
    }
}
