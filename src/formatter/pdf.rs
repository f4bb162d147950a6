//! Plain-text PDF rendering of the pretty JSON dump
//!
//! Courier 10pt on US-Letter pages with 72pt margins. Lines longer than the
//! text column are hard-wrapped and text flows onto as many pages as needed.
//! The file carries no timestamps or ids, so the same value always renders to
//! the same bytes.

use crate::error::ConversionResult;
use crate::formatter::json;
use crate::model::Value;

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN: u32 = 72;
const FONT_SIZE: u32 = 10;
const LEADING: u32 = 12;

/// Courier glyphs are 0.6em wide: (612 - 2 * 72) / 6
const LINE_WIDTH: usize = 78;
/// (792 - 2 * 72) / 12
const LINES_PER_PAGE: usize = 54;

/// First object id used for pages; 1-3 are catalog, page tree and font
const FIRST_PAGE_ID: usize = 4;

/// Render the value's pretty JSON text into a PDF document
pub fn encode(value: &Value) -> ConversionResult<Vec<u8>> {
    let text = json::pretty(value)?;
    let lines = wrap_lines(&text, LINE_WIDTH);
    let pages: Vec<&[String]> = lines.chunks(LINES_PER_PAGE).collect();
    Ok(render(&pages).into_bytes())
}

/// Split into lines of at most `width` characters
fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for line in text.lines() {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Object bodies are collected first, then serialized with a matching xref table
struct PdfDocument {
    objects: Vec<String>,
}

impl PdfDocument {
    fn new() -> Self {
        Self { objects: Vec::new() }
    }

    /// Add an object and return its id
    fn add(&mut self, body: String) -> usize {
        self.objects.push(body);
        self.objects.len()
    }

    fn finish(self) -> String {
        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(self.objects.len());

        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", index + 1, body));
        }

        let xref_offset = out.len();
        out.push_str(&format!("xref\n0 {}\n", self.objects.len() + 1));
        out.push_str("0000000000 65535 f \n");
        for offset in offsets {
            out.push_str(&format!("{:010} 00000 n \n", offset));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            self.objects.len() + 1,
            xref_offset
        ));
        out
    }
}

fn render(pages: &[&[String]]) -> String {
    let mut doc = PdfDocument::new();

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE_ID + 2 * i))
        .collect();

    doc.add("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    doc.add(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    doc.add("<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>".to_string());

    for page in pages {
        let content_id = doc.objects.len() + 2;
        doc.add(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH, PAGE_HEIGHT, content_id
        ));
        let stream = page_content(page);
        doc.add(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            stream.len(),
            stream
        ));
    }

    doc.finish()
}

fn page_content(lines: &[String]) -> String {
    let mut content = format!(
        "BT\n/F1 {} Tf\n{} TL\n{} {} Td\n",
        FONT_SIZE,
        LEADING,
        MARGIN,
        PAGE_HEIGHT - MARGIN - FONT_SIZE
    );
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            content.push_str("T*\n");
        }
        content.push('(');
        content.push_str(&escape_text(line));
        content.push_str(") Tj\n");
    }
    content.push_str("ET");
    content
}

/// PDF string literal body in WinAnsi encoding; non-ASCII uses octal escapes
fn escape_text(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => match win_ansi_byte(c) {
                Some(byte) => out.push_str(&format!("\\{:03o}", byte)),
                None => out.push('?'),
            },
        }
    }
    out
}

fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        '€' => Some(0x80),
        '…' => Some(0x85),
        '‘' => Some(0x91),
        '’' => Some(0x92),
        '“' => Some(0x93),
        '”' => Some(0x94),
        '•' => Some(0x95),
        '–' => Some(0x96),
        '—' => Some(0x97),
        _ => None,
    }
}
