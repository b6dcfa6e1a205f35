//! Positioned text extraction from page content streams.
//!
//! Produces [`TextSpan`]s carrying the coordinates the stream detector
//! needs. Only the text-positioning subset of the content stream operator
//! set is interpreted; graphics operators are ignored.

use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// A text span with position information.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Approximate width of the rendered text
    pub width: f32,
    /// Font size in points
    pub font_size: f32,
}

impl TextSpan {
    /// Create a new text span. Width is estimated from the glyph count
    /// since precise metrics need font programs we do not load.
    pub fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }
}

/// Extract positioned text spans from a page.
pub(crate) fn page_spans(doc: &LopdfDocument, page_num: u32) -> Result<Vec<TextSpan>> {
    let pages = doc.get_pages();
    let page_id = pages
        .get(&page_num)
        .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

    let fonts = doc
        .get_page_fonts(*page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let content = page_content(doc, *page_id)?;
    let content = Content::decode(&content).map_err(|e| Error::PdfParse(e.to_string()))?;

    // TJ kerning adjustments beyond 200/1000 em read as word spaces.
    let space_threshold = 200.0;

    let mut spans = Vec::new();
    let mut current_font: Vec<u8> = Vec::new();
    let mut current_font_size: f32 = 12.0;
    let mut matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                matrix = TextMatrix::default();
            }
            "ET" => {
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(name) = &op.operands[0] {
                        current_font = name.clone();
                    }
                    current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    matrix.translate(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    matrix.set(
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => {
                matrix.next_line();
            }
            "Tj" | "TJ" | "'" | "\"" => {
                if op.operator == "'" || op.operator == "\"" {
                    matrix.next_line();
                }
                if !in_text_block {
                    continue;
                }

                let encoding = fonts
                    .get(&current_font)
                    .and_then(|f| f.get_font_encoding(doc).ok());

                let string_operand = match op.operator.as_str() {
                    "\"" => op.operands.get(2),
                    _ => op.operands.first(),
                };

                let text = match string_operand {
                    Some(Object::String(bytes, _)) => {
                        if let Some(ref enc) = encoding {
                            LopdfDocument::decode_text(enc, bytes)
                                .unwrap_or_else(|_| decode_text_simple(bytes))
                        } else {
                            decode_text_simple(bytes)
                        }
                    }
                    Some(Object::Array(arr)) => {
                        // TJ: strings interleaved with kerning adjustments
                        let mut combined = String::new();
                        for item in arr {
                            match item {
                                Object::String(bytes, _) => {
                                    let part = if let Some(ref enc) = encoding {
                                        LopdfDocument::decode_text(enc, bytes)
                                            .unwrap_or_else(|_| decode_text_simple(bytes))
                                    } else {
                                        decode_text_simple(bytes)
                                    };
                                    combined.push_str(&part);
                                }
                                Object::Integer(n) => {
                                    if -(*n as f32) > space_threshold
                                        && !combined.is_empty()
                                        && !combined.ends_with(' ')
                                    {
                                        combined.push(' ');
                                    }
                                }
                                Object::Real(n) => {
                                    if -n > space_threshold
                                        && !combined.is_empty()
                                        && !combined.ends_with(' ')
                                    {
                                        combined.push(' ');
                                    }
                                }
                                _ => {}
                            }
                        }
                        combined
                    }
                    _ => String::new(),
                };

                if !text.trim().is_empty() {
                    let (x, y) = matrix.position();
                    let effective_size = current_font_size * matrix.scale();
                    spans.push(TextSpan::new(text, x, y, effective_size));
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Fetch and concatenate a page's content stream data.
fn page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = page_dict
        .get(b"Contents")
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    match contents {
        Object::Reference(r) => {
            if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                return s
                    .decompressed_content()
                    .map_err(|e| Error::PdfParse(e.to_string()));
            }
            Err(Error::PdfParse("Invalid content stream".to_string()))
        }
        Object::Stream(s) => s
            .decompressed_content()
            .map_err(|e| Error::PdfParse(e.to_string())),
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        if let Ok(data) = s.decompressed_content() {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// Fallback decoding when no font encoding is available: UTF-8 if valid,
/// Latin-1 otherwise.
fn decode_text_simple(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Text matrix state for the positioning operators.
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(n) => Some(*n as f32),
        Object::Real(n) => Some(*n),
        _ => None,
    }
}
