//! Minimal HTML-to-text extraction for fetched pages.
//!
//! No DOM parse; a single pass that drops tags, skips script/style bodies,
//! inserts line breaks at block boundaries, and decodes the common entities.
//! Good enough for feeding page prose to the extractor.

/// Extract readable text from an HTML document.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len() / 2);
    let mut skip_until: Option<&'static str> = None;
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];
        let Some(lt) = rest.find('<') else {
            if skip_until.is_none() {
                out.push_str(rest);
            }
            break;
        };

        if skip_until.is_none() {
            out.push_str(&rest[..lt]);
        }

        let after_lt = &rest[lt + 1..];
        let Some(gt) = after_lt.find('>') else {
            break; // truncated document
        };
        let tag_body = &after_lt[..gt];
        pos += lt + 1 + gt + 1;

        let closing = tag_body.starts_with('/');
        let name: String = tag_body
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if let Some(awaited) = skip_until {
            if closing && name == awaited {
                skip_until = None;
            }
            continue;
        }
        if !closing && (name == "script" || name == "style") {
            skip_until = Some(if name == "script" { "script" } else { "style" });
            continue;
        }

        if is_block_tag(&name) {
            out.push('\n');
        }
    }

    let decoded = decode_entities(&out);

    // Collapse whitespace: trim lines, drop empties
    decoded
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "p" | "br"
            | "div"
            | "li"
            | "tr"
            | "td"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "section"
            | "article"
            | "blockquote"
    )
}

fn decode_entities(text: &str) -> String {
    // &amp; goes last so "&amp;lt;" decodes to "&lt;" rather than "<"
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
