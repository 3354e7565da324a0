// src/utils/html_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::StorageError;

// Header cells the weekly-row extractor keys on, so a reader can see at a glance
// which tables on a page would qualify.
static HEADER_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)<th[^>]*>[^<]*issue\s+date[^<]*", "issue"),
        (r"(?i)<th[^>]*>[^<]*song[^<]*", "song"),
        (r"(?i)<th[^>]*>[^<]*artist[^<]*", "artist"),
        (r#"(?i)<table[^>]*class="[^"]*wikitable[^"]*"[^>]*>"#, "table"),
    ]
    .iter()
    .filter_map(|(pat, kind)| Regex::new(pat).ok().map(|re| (re, *kind)))
    .collect()
});

/// Turns a page title into a file-system safe stem.
pub fn debug_file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Writes an HTML page to `path` with the given byte ranges wrapped in highlight spans.
pub fn save_debug_html(html: &str, path: &Path, highlights: &[(usize, usize, &str)]) -> Result<(), StorageError> {
    let mut file = File::create(path)?;

    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".highlight-issue { background-color: #FFFF00; }\n");
    debug_html.push_str(".highlight-song { background-color: #90EE90; }\n");
    debug_html.push_str(".highlight-artist { background-color: #ADD8E6; }\n");
    debug_html.push_str(".highlight-table { outline: 2px dashed #FFA500; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    let mut sorted_highlights = highlights.to_vec();
    sorted_highlights.sort_by_key(|h| h.0);

    let mut last_pos = 0;
    for (start, end, kind) in sorted_highlights {
        // Overlapping matches would split a tag in two
        if start < last_pos || end > html.len() {
            continue;
        }
        debug_html.push_str(&html[last_pos..start]);
        debug_html.push_str(&format!("<span class=\"highlight-{}\" title=\"{}-{}\">", kind, start, end));
        debug_html.push_str(&html[start..end]);
        debug_html.push_str("</span>");
        last_pos = end;
    }
    debug_html.push_str(&html[last_pos..]);
    debug_html.push_str("\n</body>\n</html>");

    file.write_all(debug_html.as_bytes())?;
    tracing::debug!("Saved debug HTML to {}", path.display());
    Ok(())
}

/// Saves a fetched page under `dir`, with the weekly-table header cells highlighted.
pub fn save_annotated_page(dir: &Path, title: &str, html: &str) -> Result<PathBuf, StorageError> {
    std::fs::create_dir_all(dir)?;

    let mut highlights = Vec::new();
    for (re, kind) in HEADER_PATTERNS.iter() {
        for mat in re.find_iter(html) {
            highlights.push((mat.start(), mat.end(), *kind));
        }
    }

    let path = dir.join(format!("{}.html", debug_file_stem(title)));
    save_debug_html(html, &path, &highlights)?;
    Ok(path)
}
