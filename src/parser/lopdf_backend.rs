//! [`PageSource`] backed by `lopdf`.
//!
//! Walks each page's content stream and reports every text-show operator as
//! a run with an estimated top-down bounding box. One block is produced per
//! `BT … ET` section and one line per show operator.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{sniff_bytes, sniff_path};
use crate::error::{Error, Result};

use super::backend::{
    decode_text_simple, PageSource, RawBlock, RawLine, RawPage, RawSpan, FLAG_BOLD,
};

/// Ascender share of the font size, used to place the top of a run.
const ASCENT_RATIO: f32 = 0.8;
/// Descender share of the font size.
const DESCENT_RATIO: f32 = 0.2;
/// Average glyph advance as a share of the font size.
const AVG_CHAR_WIDTH_RATIO: f32 = 0.5;
/// FontDescriptor flag: ForceBold (bit 19).
const FORCE_BOLD: i64 = 1 << 18;
/// US Letter, when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Concrete [`PageSource`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfBackend {
    /// Open a PDF file. Any failure is reported as `DocumentUnreadable`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        sniff_path(path).map_err(|e| Error::unreadable(path, e))?;
        let doc = LopdfDocument::load(path).map_err(|e| Error::unreadable(path, e))?;
        Ok(Self::from_document(doc))
    }

    /// Open a PDF held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let label = PathBuf::from("<memory>");
        sniff_bytes(data).map_err(|e| Error::unreadable(&label, e))?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| Error::unreadable(&label, e))?;
        Ok(Self::from_document(doc))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// MediaBox of a page, following `/Parent` inheritance.
    fn media_box(&self, page_id: ObjectId) -> [f32; 4] {
        let mut current = Some(page_id);
        // Page trees deeper than this are malformed.
        for _ in 0..32 {
            let Some(id) = current else { break };
            let Ok(dict) = self.doc.get_dictionary(id) else {
                break;
            };
            if let Some(media_box) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|o| self.resolve(o).as_array().ok())
                .and_then(|arr| parse_rect(arr))
            {
                return media_box;
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        DEFAULT_MEDIA_BOX
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// Style flags for every font resource of a page.
    fn font_flags(&self, fonts: &BTreeMap<Vec<u8>, &Dictionary>) -> HashMap<Vec<u8>, u32> {
        fonts
            .iter()
            .map(|(name, dict)| (name.clone(), self.style_flags(dict)))
            .collect()
    }

    fn style_flags(&self, font: &Dictionary) -> u32 {
        let base_font = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_lowercase())
            .unwrap_or_default();
        let descriptor_flags = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve(o).as_dict().ok())
            .and_then(|d| d.get(b"Flags").ok())
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);

        let bold = ["bold", "black", "heavy", "semibold"]
            .iter()
            .any(|w| base_font.contains(w))
            || descriptor_flags & FORCE_BOLD != 0;
        if bold {
            FLAG_BOLD
        } else {
            0
        }
    }

    /// Decode a string operand with the font's encoding.
    fn decode(&self, fonts: &BTreeMap<Vec<u8>, &Dictionary>, font: &[u8], bytes: &[u8]) -> String {
        if let Some(font_dict) = fonts.get(font) {
            if let Ok(encoding) = font_dict.get_font_encoding(&self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&encoding, bytes) {
                    return text;
                }
            }
        }
        decode_text_simple(bytes)
    }

    /// Text of a `Tj`/`'`/`"` string or a `TJ` array.
    fn show_text(
        &self,
        fonts: &BTreeMap<Vec<u8>, &Dictionary>,
        font: &[u8],
        operand: Option<&Object>,
    ) -> String {
        match operand {
            Some(Object::String(bytes, _)) => self.decode(fonts, font, bytes),
            Some(Object::Array(items)) => {
                let mut combined = String::new();
                for item in items {
                    match item {
                        Object::String(bytes, _) => {
                            combined.push_str(&self.decode(fonts, font, bytes))
                        }
                        // Large negative kerning is a word gap.
                        other => {
                            if let Some(adjust) = number(other) {
                                if -adjust > 200.0
                                    && !combined.is_empty()
                                    && !combined.ends_with(' ')
                                {
                                    combined.push(' ');
                                }
                            }
                        }
                    }
                }
                combined
            }
            _ => String::new(),
        }
    }
}

impl PageSource for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, page_num: u32) -> Result<RawPage> {
        let page_id = *self
            .pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))?;

        let fonts = self.doc.get_page_fonts(page_id).unwrap_or_default();
        let font_flags = self.font_flags(&fonts);
        let media_box = self.media_box(page_id);
        let content = self.doc.get_page_content(page_id)?;
        let content = lopdf::content::Content::decode(&content)?;

        let mut walker = TextWalker::new(media_box);
        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => walker.save_state(),
                "Q" => walker.restore_state(),
                "cm" if operands.len() >= 6 => walker.concat_ctm(matrix(&operands[..6])),
                "BT" => walker.begin_text(),
                "ET" => walker.end_text(),
                "Tf" if operands.len() >= 2 => {
                    if let Object::Name(name) = &operands[0] {
                        walker.font = name.clone();
                    }
                    walker.font_size = number(&operands[1]).unwrap_or(12.0);
                }
                "TL" => walker.leading = operands.first().and_then(number).unwrap_or(0.0),
                "Td" if operands.len() >= 2 => walker.move_line(
                    number(&operands[0]).unwrap_or(0.0),
                    number(&operands[1]).unwrap_or(0.0),
                ),
                "TD" if operands.len() >= 2 => {
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    walker.leading = -ty;
                    walker.move_line(number(&operands[0]).unwrap_or(0.0), ty);
                }
                "Tm" if operands.len() >= 6 => walker.set_matrix(matrix(&operands[..6])),
                "T*" => walker.next_line(),
                "Tj" | "TJ" => {
                    let text = self.show_text(&fonts, &walker.font, operands.first());
                    let flags = font_flags.get(&walker.font).copied().unwrap_or(0);
                    walker.show(text, flags);
                }
                "'" => {
                    walker.next_line();
                    let text = self.show_text(&fonts, &walker.font, operands.first());
                    let flags = font_flags.get(&walker.font).copied().unwrap_or(0);
                    walker.show(text, flags);
                }
                "\"" => {
                    walker.next_line();
                    let text = self.show_text(&fonts, &walker.font, operands.get(2));
                    let flags = font_flags.get(&walker.font).copied().unwrap_or(0);
                    walker.show(text, flags);
                }
                _ => {}
            }
        }

        Ok(walker.finish())
    }
}

/// Graphics and text state while walking one content stream.
struct TextWalker {
    media_box: [f32; 4],
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    /// Current transformation matrix
    ctm: [f32; 6],
    /// CTMs saved by `q`
    saved: Vec<[f32; 6]>,
    /// Text matrix `[a b c d e f]`
    tm: [f32; 6],
    /// Text line matrix
    tlm: [f32; 6],
    block: Option<RawBlock>,
    blocks: Vec<RawBlock>,
}

impl TextWalker {
    const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

    fn new(media_box: [f32; 4]) -> Self {
        Self {
            media_box,
            font: Vec::new(),
            font_size: 12.0,
            leading: 0.0,
            ctm: Self::IDENTITY,
            saved: Vec::new(),
            tm: Self::IDENTITY,
            tlm: Self::IDENTITY,
            block: None,
            blocks: Vec::new(),
        }
    }

    fn save_state(&mut self) {
        self.saved.push(self.ctm);
    }

    fn restore_state(&mut self) {
        // Unbalanced `Q` keeps the current state.
        if let Some(ctm) = self.saved.pop() {
            self.ctm = ctm;
        }
    }

    fn concat_ctm(&mut self, m: [f32; 6]) {
        self.ctm = multiply(m, self.ctm);
    }

    fn begin_text(&mut self) {
        self.end_text();
        self.tm = Self::IDENTITY;
        self.tlm = Self::IDENTITY;
        self.block = Some(RawBlock::default());
    }

    fn end_text(&mut self) {
        if let Some(block) = self.block.take() {
            if !block.lines.is_empty() {
                self.blocks.push(block);
            }
        }
    }

    fn set_matrix(&mut self, m: [f32; 6]) {
        self.tm = m;
        self.tlm = m;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        let [a, b, c, d, e, f] = self.tlm;
        self.tlm = [a, b, c, d, tx * a + ty * c + e, tx * b + ty * d + f];
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Text space to page space: `Tm × CTM`.
    fn render_matrix(&self) -> [f32; 6] {
        multiply(self.tm, self.ctm)
    }

    /// Rendered font size after the vertical scale of `Tm × CTM`.
    fn effective_size(&self) -> f32 {
        let [_, b, _, d, _, _] = self.render_matrix();
        let scale = (b * b + d * d).sqrt();
        if scale > 0.0 {
            self.font_size.abs() * scale
        } else {
            self.font_size.abs()
        }
    }

    fn show(&mut self, text: String, flags: u32) {
        if self.block.is_none() {
            return;
        }

        let size = self.effective_size();
        let [a, b, _, _, x, baseline] = self.render_matrix();
        let page_top = self.media_box[3];
        let advance = text.chars().count() as f32 * self.font_size.abs() * AVG_CHAR_WIDTH_RATIO;
        let width = advance * (a * a + b * b).sqrt();
        let bbox = [
            x,
            page_top - (baseline + size * ASCENT_RATIO),
            x + width,
            page_top - (baseline - size * DESCENT_RATIO),
        ];

        if let Some(block) = self.block.as_mut() {
            block.lines.push(RawLine {
                spans: vec![RawSpan {
                    text,
                    size: Some(f64::from(size)),
                    bbox: Some(bbox.map(f64::from)),
                    flags: Some(flags),
                }],
            });
        }

        let [ta, tb, ..] = self.tm;
        self.tm[4] += advance * ta;
        self.tm[5] += advance * tb;
    }

    fn finish(mut self) -> RawPage {
        self.end_text();
        RawPage {
            blocks: self.blocks,
        }
    }
}

/// Matrix product `m1 × m2` for PDF `[a b c d e f]` matrices.
fn multiply(m1: [f32; 6], m2: [f32; 6]) -> [f32; 6] {
    let [a1, b1, c1, d1, e1, f1] = m1;
    let [a2, b2, c2, d2, e2, f2] = m2;
    [
        a1 * a2 + b1 * c2,
        a1 * b2 + b1 * d2,
        c1 * a2 + d1 * c2,
        c1 * b2 + d1 * d2,
        e1 * a2 + f1 * c2 + e2,
        e1 * b2 + f1 * d2 + f2,
    ]
}

/// Six numeric operands as a matrix; non-numbers read as 0.
fn matrix(operands: &[Object]) -> [f32; 6] {
    let mut m = [0.0; 6];
    for (slot, obj) in m.iter_mut().zip(operands) {
        *slot = number(obj).unwrap_or(0.0);
    }
    m
}

fn parse_rect(arr: &[Object]) -> Option<[f32; 4]> {
    if arr.len() < 4 {
        return None;
    }
    let mut rect = [0.0; 4];
    for (slot, obj) in rect.iter_mut().zip(arr) {
        *slot = number(obj)?;
    }
    Some(rect)
}

/// Helper to extract a number from a PDF object.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
