//! Discovery of CSV files from an HTML directory listing.
//!
//! Web servers that expose a folder index (nginx `autoindex`, Apache
//! `mod_autoindex`, `python -m http.server`) render it as a page of links.
//! Only the `href` values matter here.

use crate::catalog::has_csv_extension;

/// Extract the distinct CSV file names linked from a listing page, in the
/// order they first appear.
pub fn extract_csv_links(html: &str) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();

    for href in hrefs(html) {
        let decoded = match urlencoding::decode(href) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!("skipping link {href}: {e}");
                continue;
            }
        };
        if !has_csv_extension(&decoded) {
            continue;
        }
        let name = decoded.rsplit('/').next().unwrap_or_default().to_string();
        if !name.is_empty() && !files.contains(&name) {
            files.push(name);
        }
    }

    files
}

/// Raw attribute values of every `href` in the document.
fn hrefs(html: &str) -> Vec<&str> {
    let lower = html.to_ascii_lowercase();
    let bytes = html.as_bytes();
    let mut values = Vec::new();
    let mut from = 0;

    while let Some(found) = lower[from..].find("href") {
        let mut pos = from + found + 4;
        from = pos;

        pos = skip_whitespace(bytes, pos);
        if bytes.get(pos) != Some(&b'=') {
            continue;
        }
        pos = skip_whitespace(bytes, pos + 1);

        let (start, end) = match bytes.get(pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = pos + 1;
                match bytes[start..].iter().position(|&b| b == quote) {
                    Some(len) => (start, start + len),
                    None => break,
                }
            }
            Some(_) => {
                let len = bytes[pos..]
                    .iter()
                    .position(|&b| b.is_ascii_whitespace() || b == b'>')
                    .unwrap_or(bytes.len() - pos);
                (pos, pos + len)
            }
            None => break,
        };

        values.push(&html[start..end]);
        from = end;
    }

    values
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
        pos += 1;
    }
    pos
}
