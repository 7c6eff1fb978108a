//! Self-contained HTML document sink
//!
//! Figures are embedded as base64 data URIs so the file opens on any
//! machine without the results directory next to it.

use crate::document::DocumentSink;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt::Write as _;
use std::path::Path;

const STYLE: &str = "body{font-family:sans-serif;max-width:60em;margin:2em auto;}\
table{border-collapse:collapse;margin:1em 0;}\
th,td{border:1px solid #999;padding:.25em .5em;}\
th{background:#eee;}";

pub struct HtmlDocument {
    body: String,
    title: String,
}

impl HtmlDocument {
    pub fn new(title: Option<&str>) -> Self {
        Self {
            body: String::new(),
            title: title.unwrap_or("Results").to_string(),
        }
    }

    /// Close the document and return the full page
    pub fn finish(self) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
            escape(&self.title),
            STYLE,
            self.body
        )
    }
}

impl DocumentSink for HtmlDocument {
    fn heading(&mut self, text: &str, level: usize) {
        let tag = (level + 1).min(6);
        let _ = writeln!(self.body, "<h{tag}>{}</h{tag}>", escape(text));
    }

    fn paragraph(&mut self, text: &str) {
        let _ = writeln!(self.body, "<p>{}</p>", escape(text));
    }

    fn picture(&mut self, image: &[u8], filename: &str, width_px: u32) {
        let _ = writeln!(
            self.body,
            "<p><img src=\"data:{};base64,{}\" alt=\"{}\" width=\"{}\"></p>",
            mime_type(filename),
            STANDARD.encode(image),
            escape(filename),
            width_px
        );
    }

    fn table(&mut self, headings: &[String], rows: &[Vec<String>]) {
        self.body.push_str("<table>\n<thead><tr>");
        for heading in headings {
            let _ = write!(self.body, "<th>{}</th>", escape(heading));
        }
        self.body.push_str("</tr></thead>\n<tbody>\n");
        for row in rows {
            self.body.push_str("<tr>");
            for cell in row {
                let _ = write!(self.body, "<td>{}</td>", escape(cell));
            }
            self.body.push_str("</tr>\n");
        }
        self.body.push_str("</tbody>\n</table>\n");
    }
}

pub(crate) fn mime_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
