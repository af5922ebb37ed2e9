//! PDF rendering of a [`ReportDocument`].
//!
//! A4 pages with the standard Type1 Helvetica faces, so nothing has to be
//! embedded. Table cells wrap on word boundaries and rows move to a new page
//! (with the header row repeated) when they do not fit. No dates or random
//! ids are written, so the same document always renders to the same bytes.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use super::document::{ReportDocument, Section, SectionBody};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 24.0;
const SUBTITLE_SIZE: f32 = 18.0;
const SECTION_SIZE: f32 = 14.0;
const CELL_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 12.0;
const CELL_PADDING: f32 = 4.0;
const SECTION_GAP: f32 = 12.0;

type Rgb = (f32, f32, f32);

const HEADER_COLOR: Rgb = (41.0 / 255.0, 128.0 / 255.0, 185.0 / 255.0);
const SECTION_COLOR: Rgb = (52.0 / 255.0, 152.0 / 255.0, 219.0 / 255.0);
const TEXT_COLOR: Rgb = (0.0, 0.0, 0.0);
const HEADER_TEXT_COLOR: Rgb = (1.0, 1.0, 1.0);
const BORDER_COLOR: Rgb = (0.75, 0.75, 0.75);

// Advance widths (1/1000 em) for 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
    Oblique,
}

impl Font {
    const ALL: [Font; 3] = [Font::Regular, Font::Bold, Font::Oblique];

    fn resource_name(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
            Font::Oblique => Name(b"F3"),
        }
    }

    fn base_font(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"Helvetica"),
            Font::Bold => Name(b"Helvetica-Bold"),
            Font::Oblique => Name(b"Helvetica-Oblique"),
        }
    }

    fn glyph_width(self, byte: u8) -> u16 {
        let table = match self {
            Font::Bold => &HELVETICA_BOLD_WIDTHS,
            Font::Regular | Font::Oblique => &HELVETICA_WIDTHS,
        };
        match byte {
            0x20..=0x7E => table[(byte - 0x20) as usize],
            _ => FALLBACK_WIDTH,
        }
    }

    fn text_width(self, size: f32, text: &[u8]) -> f32 {
        let units: u32 = text.iter().map(|b| u32::from(self.glyph_width(*b))).sum();
        units as f32 * size / 1000.0
    }
}

/// WinAnsi bytes for `text`; anything outside printable Latin-1 becomes `?`.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ if c.is_whitespace() => b' ',
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap. Words wider than the line are split between characters.
fn wrap(font: Font, size: f32, text: &str, max_width: f32) -> Vec<Vec<u8>> {
    let encoded = encode(text);
    let mut lines = Vec::new();
    let mut line: Vec<u8> = Vec::new();

    for word in encoded.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
        let mut candidate = line.clone();
        if !candidate.is_empty() {
            candidate.push(b' ');
        }
        candidate.extend_from_slice(word);

        if font.text_width(size, &candidate) <= max_width {
            line = candidate;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for &byte in word {
            line.push(byte);
            if line.len() > 1 && font.text_width(size, &line) > max_width {
                line.pop();
                lines.push(std::mem::take(&mut line));
                line.push(byte);
            }
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

struct Cell {
    width: f32,
    font: Font,
    lines: Vec<Vec<u8>>,
}

struct Row {
    cells: Vec<Cell>,
    height: f32,
}

impl Row {
    fn height_for(lines: usize) -> f32 {
        lines.max(1) as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING
    }

    /// How many text lines fit in `available` points of height.
    fn lines_fitting(available: f32) -> usize {
        ((available - 2.0 * CELL_PADDING) / LINE_HEIGHT).max(0.0) as usize
    }

    fn layout(widths: &[f32], values: &[String], font_for: impl Fn(usize) -> Font) -> Self {
        let cells: Vec<Cell> = widths
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (width, value))| {
                let font = font_for(i);
                Cell {
                    width: *width,
                    font,
                    lines: wrap(font, CELL_SIZE, value, width - 2.0 * CELL_PADDING),
                }
            })
            .collect();
        Self::from_cells(cells)
    }

    fn from_cells(cells: Vec<Cell>) -> Self {
        let max_lines = cells.iter().map(|c| c.lines.len()).max().unwrap_or(1);
        Row {
            cells,
            height: Self::height_for(max_lines),
        }
    }

    /// Keep the first `lines` lines of every cell, return the remainder.
    fn split_off(&mut self, lines: usize) -> Row {
        let rest = self
            .cells
            .iter_mut()
            .map(|cell| Cell {
                width: cell.width,
                font: cell.font,
                lines: if cell.lines.len() > lines {
                    cell.lines.split_off(lines)
                } else {
                    Vec::new()
                },
            })
            .collect();

        let kept = self.cells.iter().map(|c| c.lines.len()).max().unwrap_or(1);
        self.height = Self::height_for(kept);
        Self::from_cells(rest)
    }
}

/// Lays content out top to bottom and starts new pages as needed.
struct PageWriter {
    pages: Vec<Vec<u8>>,
    content: Content,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            content: Content::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn break_page(&mut self) {
        let full = std::mem::replace(&mut self.content, Content::new());
        self.pages.push(full.finish());
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// True when a new page had to be started.
    fn reserve(&mut self, height: f32) -> bool {
        if self.y - height < MARGIN {
            self.break_page();
            true
        } else {
            false
        }
    }

    fn text(&mut self, font: Font, size: f32, x: f32, baseline: f32, color: Rgb, text: &[u8]) {
        self.content.set_fill_rgb(color.0, color.1, color.2);
        self.content.begin_text();
        self.content.set_font(font.resource_name(), size);
        self.content.next_line(x, baseline);
        self.content.show(Str(text));
        self.content.end_text();
    }

    fn centered(&mut self, font: Font, size: f32, color: Rgb, text: &str, space_after: f32) {
        let bytes = encode(text);
        self.reserve(size + space_after);

        let x = MARGIN + (CONTENT_WIDTH - font.text_width(size, &bytes)).max(0.0) / 2.0;
        let baseline = self.y - size;
        self.text(font, size, x, baseline, color, &bytes);
        self.y = baseline - space_after;
    }

    fn section_title(&mut self, title: &str) {
        // Keep the title with a header row and the first line below it.
        self.reserve(5.0 + SECTION_SIZE + 10.0 + 2.0 * Row::height_for(1));

        let baseline = self.y - 5.0 - SECTION_SIZE;
        self.text(Font::Bold, SECTION_SIZE, MARGIN, baseline, SECTION_COLOR, &encode(title));
        self.y = baseline - 10.0;
    }

    fn notice(&mut self, text: &str) {
        self.reserve(LINE_HEIGHT + CELL_PADDING);
        let baseline = self.y - CELL_SIZE;
        self.text(Font::Oblique, CELL_SIZE, MARGIN, baseline, TEXT_COLOR, &encode(text));
        self.y = baseline - CELL_PADDING;
    }

    fn draw_row(&mut self, row: &Row, fill: Option<Rgb>, text_color: Rgb) {
        let top = self.y;
        debug_assert!(top - row.height >= MARGIN - 0.01, "row drawn past the bottom margin");
        let mut x = MARGIN;

        for cell in &row.cells {
            self.content.save_state();
            if let Some((r, g, b)) = fill {
                self.content.set_fill_rgb(r, g, b);
                self.content.rect(x, top - row.height, cell.width, row.height);
                self.content.fill_nonzero();
            }
            self.content.set_stroke_rgb(BORDER_COLOR.0, BORDER_COLOR.1, BORDER_COLOR.2);
            self.content.set_line_width(0.5);
            self.content.rect(x, top - row.height, cell.width, row.height);
            self.content.stroke();
            self.content.restore_state();

            for (i, line) in cell.lines.iter().enumerate() {
                let baseline = top - CELL_PADDING - CELL_SIZE * 0.8 - i as f32 * LINE_HEIGHT;
                self.text(cell.font, CELL_SIZE, x + CELL_PADDING, baseline, text_color, line);
            }
            x += cell.width;
        }

        self.y = top - row.height;
    }

    fn draw_header(&mut self, header: Option<&Row>) {
        if let Some(header) = header {
            self.draw_row(header, Some(SECTION_COLOR), HEADER_TEXT_COLOR);
        }
    }

    fn table(
        &mut self,
        widths: &[f32],
        header: Option<&[String]>,
        rows: &[Vec<String>],
        bold_first: bool,
    ) {
        let header = header.map(|h| Row::layout(widths, h, |_| Font::Bold));
        let header_height = header.as_ref().map_or(0.0, |h| h.height);
        let page_room = PAGE_HEIGHT - 2.0 * MARGIN - header_height;

        let rows: Vec<Row> = rows
            .iter()
            .map(|values| {
                Row::layout(widths, values, |i| {
                    if bold_first && i == 0 {
                        Font::Bold
                    } else {
                        Font::Regular
                    }
                })
            })
            .collect();

        // The header stays with the first row, or its first line when the
        // row is taller than a page.
        let first = rows.first().map_or(0.0, |r| r.height);
        let first = if first > page_room { Row::height_for(1) } else { first };
        self.reserve(header_height + first);
        self.draw_header(header.as_ref());

        for mut row in rows {
            loop {
                let available = self.y - MARGIN;
                if row.height <= available {
                    self.draw_row(&row, None, TEXT_COLOR);
                    break;
                }

                // Rows taller than a page are split, the rest carried over.
                let fitting = Row::lines_fitting(available);
                if row.height > page_room && fitting > 0 {
                    let rest = row.split_off(fitting);
                    self.draw_row(&row, None, TEXT_COLOR);
                    row = rest;
                }

                self.break_page();
                self.draw_header(header.as_ref());
            }
        }
    }

    fn section(&mut self, section: &Section) {
        match &section.body {
            SectionBody::Heading { subtitle } => {
                self.centered(Font::Bold, TITLE_SIZE, HEADER_COLOR, &section.title, 10.0);
                self.centered(Font::Regular, SUBTITLE_SIZE, TEXT_COLOR, subtitle, 20.0);
                return;
            }
            SectionBody::KeyValue { rows } => {
                self.section_title(&section.title);
                let rows: Vec<Vec<String>> = rows
                    .iter()
                    .map(|(label, value)| vec![label.clone(), value.clone()])
                    .collect();
                let widths = [CONTENT_WIDTH * 0.3, CONTENT_WIDTH * 0.7];
                self.table(&widths, None, &rows, true);
            }
            SectionBody::Table { columns, rows } => {
                self.section_title(&section.title);
                let total: f32 = columns.iter().map(|c| f32::from(c.width)).sum();
                let widths: Vec<f32> = columns
                    .iter()
                    .map(|c| CONTENT_WIDTH * f32::from(c.width) / total)
                    .collect();
                let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
                self.table(&widths, Some(&headers), rows, false);
            }
            SectionBody::Empty { notice } => {
                self.section_title(&section.title);
                self.notice(notice);
            }
        }
        self.y -= SECTION_GAP;
    }

    fn finish(mut self) -> Vec<Vec<u8>> {
        self.pages.push(self.content.finish());
        self.pages
    }
}

fn layout(document: &ReportDocument) -> Vec<Vec<u8>> {
    let mut writer = PageWriter::new();
    for section in &document.sections {
        writer.section(section);
    }
    writer.finish()
}

/// Serialize the document to PDF bytes.
pub fn render_pdf(document: &ReportDocument) -> Vec<u8> {
    let pages = layout(document);

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let font_ids = [Ref::new(3), Ref::new(4), Ref::new(5)];
    let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
        .map(|i| (Ref::new(6 + 2 * i), Ref::new(7 + 2 * i)))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(pages.len() as i32);

    for (font, id) in Font::ALL.iter().zip(font_ids) {
        pdf.type1_font(id)
            .base_font(font.base_font())
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for ((page_id, content_id), stream) in page_ids.iter().zip(&pages) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(*content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        for (font, id) in Font::ALL.iter().zip(font_ids) {
            fonts.pair(font.resource_name(), id);
        }
        fonts.finish();
        resources.finish();
        page.finish();

        pdf.stream(*content_id, stream);
    }

    pdf.finish()
}
