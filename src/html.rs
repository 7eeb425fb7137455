// ABOUTME: HTML generation module for the reveal-deck application
// ABOUTME: Builds the directory listing and error pages returned by the slide server

use std::fs;
use std::io;
use std::path::Path;

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read a directory into listing entries sorted case-insensitively by name
pub fn read_listing(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // Follow symlinks so a linked directory is listed as a directory
        let is_dir = entry.path().is_dir();
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir,
        });
    }
    entries.sort_by_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render a directory listing page for the given URL path
pub fn generate_listing(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(url_path));

    let mut html_doc = String::from("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"utf-8\">\n");
    html_doc.push_str(&format!("<title>{}</title>\n", title));
    html_doc.push_str("</head>\n<body>\n");
    html_doc.push_str(&format!("<h1>{}</h1>\n<hr>\n<ul>\n", title));

    for entry in entries {
        // Directories get a trailing slash in both the link and the label
        let suffix = if entry.is_dir { "/" } else { "" };
        html_doc.push_str(&format!(
            "<li><a href=\"{}{}\">{}{}</a></li>\n",
            urlencoding::encode(&entry.name),
            suffix,
            escape_html(&entry.name),
            suffix
        ));
    }

    html_doc.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html_doc
}

/// Render a minimal error page
pub fn generate_error_page(code: u16, message: &str) -> String {
    let message = escape_html(message);
    format!(
        "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Error response</title>\n</head>\n<body>\n<h1>Error response</h1>\n<p>Error code: {}</p>\n<p>Message: {}.</p>\n</body>\n</html>\n",
        code, message
    )
}

/// Escape text for use inside HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
