//! Page layout for journal exports.
//!
//! Layout is computed up front as positioned text runs and rules, so the
//! total page count is known before any page is drawn. Positions are in
//! millimetres from the bottom-left corner of an A4 page; text widths come
//! from the advances of the embedded font.

use chrono::{DateTime, Local, NaiveDate};

use super::fonts::{FontMetrics, PT_PER_MM};
use crate::storage::JournalEntry;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 18.0;

const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
const CONTENT_BOTTOM_MM: f32 = MARGIN_MM + 6.0;
const FOOTER_Y_MM: f32 = 10.0;
const LINE_SPACING: f32 = 1.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BRAND: Rgb = Rgb(0x19, 0x76, 0xD2);
pub const TEXT: Rgb = Rgb(0x21, 0x21, 0x21);
pub const MUTED: Rgb = Rgb(0x66, 0x66, 0x66);
pub const META: Rgb = Rgb(0x99, 0x99, 0x99);
pub const TAGS: Rgb = Rgb(0xE6, 0x51, 0x00);
pub const RULE_STRONG: Rgb = Rgb(0xCC, 0xCC, 0xCC);
pub const RULE_LIGHT: Rgb = Rgb(0xEE, 0xEE, 0xEE);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: FontStyle,
    pub color: Rgb,
}

/// Horizontal line across the content width.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub y: f32,
    pub thickness: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
    pub rules: Vec<Rule>,
}

impl Page {
    pub fn text(&self) -> Vec<&str> {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

fn line_height_mm(size: f32) -> f32 {
    size * LINE_SPACING / PT_PER_MM
}

/// Greedy word wrap so that `measure` of every line stays within
/// `max_width`.
///
/// Words wider than a line are broken between characters. Blank input
/// yields no lines.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if measure(&candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if measure(word) <= max_width {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            let mut next = current.clone();
            next.push(c);
            if !current.is_empty() && measure(&next) > max_width {
                lines.push(std::mem::replace(&mut current, c.to_string()));
            } else {
                current = next;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Short date-time used for the created/updated footer of each entry.
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%m/%d/%Y %I:%M %p").to_string()
}

struct Composer<'a> {
    metrics: &'a FontMetrics,
    pages: Vec<Page>,
    current: Page,
    y: f32,
    has_body: bool,
    generated_label: String,
}

impl<'a> Composer<'a> {
    fn new(metrics: &'a FontMetrics, generated_label: String) -> Self {
        let mut composer = Self {
            metrics,
            pages: Vec::new(),
            current: Page::default(),
            y: 0.0,
            has_body: false,
            generated_label,
        };
        composer.start_page();
        composer
    }

    fn start_page(&mut self) {
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        self.has_body = false;

        self.y -= line_height_mm(20.0);
        self.push_run("Journal Export".to_string(), MARGIN_MM, 20.0, FontStyle::Bold, BRAND);
        self.y -= line_height_mm(9.0);
        let label = self.generated_label.clone();
        self.push_run(label, MARGIN_MM, 9.0, FontStyle::Regular, MUTED);
        self.y -= 6.0;
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.start_page();
    }

    /// Start a new page unless the current one has no body yet.
    fn page_break(&mut self) {
        if self.has_body {
            self.new_page();
        }
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < CONTENT_BOTTOM_MM {
            self.new_page();
        }
    }

    fn push_run(&mut self, text: String, x: f32, size: f32, style: FontStyle, color: Rgb) {
        self.current.runs.push(TextRun {
            text,
            x,
            y: self.y,
            size,
            style,
            color,
        });
    }

    fn line(&mut self, text: String, size: f32, style: FontStyle, color: Rgb) {
        let height = line_height_mm(size);
        self.ensure_space(height);
        self.y -= height;
        self.push_run(text, MARGIN_MM, size, style, color);
        self.has_body = true;
    }

    fn paragraph(&mut self, text: &str, size: f32, style: FontStyle, color: Rgb) {
        let metrics = self.metrics;
        let lines = wrap_text(text, CONTENT_WIDTH_MM, |line| {
            metrics.text_width_mm(line, size, style)
        });
        for line in lines {
            self.line(line, size, style, color);
        }
    }

    /// Bold label followed by a wrapped value on the same baseline.
    fn labeled(&mut self, label: &str, value: &str, size: f32, color: Rgb) {
        let metrics = self.metrics;
        let indent = metrics.text_width_mm(label, size, FontStyle::Bold);
        let lines = wrap_text(value, CONTENT_WIDTH_MM - indent, |line| {
            metrics.text_width_mm(line, size, FontStyle::Regular)
        });
        let height = line_height_mm(size);

        for (index, line) in lines.into_iter().enumerate() {
            self.ensure_space(height);
            self.y -= height;
            if index == 0 {
                self.push_run(label.to_string(), MARGIN_MM, size, FontStyle::Bold, TEXT);
            }
            self.push_run(line, MARGIN_MM + indent, size, FontStyle::Regular, color);
        }
        self.has_body = true;
    }

    fn rule(&mut self, thickness: f32, color: Rgb) {
        self.ensure_space(6.0);
        self.y -= 3.0;
        self.current.rules.push(Rule {
            y: self.y,
            thickness,
            color,
        });
        self.y -= 3.0;
        self.has_body = true;
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn finish(mut self) -> Vec<Page> {
        let last = std::mem::take(&mut self.current);
        self.pages.push(last);

        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            let text = format!("{} / {}", index + 1, total);
            let width = self.metrics.text_width_mm(&text, 9.0, FontStyle::Regular);
            page.runs.push(TextRun {
                text,
                x: (PAGE_WIDTH_MM - width) / 2.0,
                y: FOOTER_Y_MM,
                size: 9.0,
                style: FontStyle::Regular,
                color: MUTED,
            });
        }
        self.pages
    }
}

fn compose_entry(composer: &mut Composer, entry: &JournalEntry) {
    composer.paragraph(&entry.title, 18.0, FontStyle::Bold, TEXT);
    composer.line(
        entry.entry_date.format("%A, %B %d, %Y").to_string(),
        10.0,
        FontStyle::Italic,
        MUTED,
    );
    composer.gap(3.0);

    composer.labeled("Moods: ", &entry.moods().join(", "), 10.0, BRAND);
    if let Some(category) = entry.category.as_deref().filter(|c| !c.is_empty()) {
        composer.labeled("Category: ", category, 10.0, TEXT);
    }
    if !entry.tags.is_empty() {
        composer.labeled("Tags: ", &entry.tag_names().join(", "), 10.0, TAGS);
    }

    composer.rule(0.5, RULE_LIGHT);

    for line in entry.content.lines() {
        if line.trim().is_empty() {
            composer.gap(line_height_mm(10.0) * 0.6);
        } else {
            composer.paragraph(line, 10.0, FontStyle::Regular, TEXT);
        }
    }

    composer.gap(6.0);
    let created = entry.created_at.with_timezone(&Local);
    let mut meta = format!("Created: {}", format_timestamp(&created));
    if entry.updated_at != entry.created_at {
        let updated = entry.updated_at.with_timezone(&Local);
        meta.push_str(&format!("    Updated: {}", format_timestamp(&updated)));
    }
    composer.line(meta, 8.0, FontStyle::Regular, META);
}

/// Lay out a summary page followed by one page (or more, for long content)
/// per entry, in ascending date order.
pub fn layout_document(
    entries: &[JournalEntry],
    start: NaiveDate,
    end: NaiveDate,
    generated_at: DateTime<Local>,
    metrics: &FontMetrics,
) -> Vec<Page> {
    let generated_label = format!("Generated: {}", generated_at.format("%B %d, %Y"));
    let mut composer = Composer::new(metrics, generated_label);

    composer.line(
        format!(
            "Period: {} - {}",
            start.format("%B %d, %Y"),
            end.format("%B %d, %Y")
        ),
        12.0,
        FontStyle::Regular,
        TEXT,
    );
    composer.line(
        format!("Total Entries: {}", entries.len()),
        12.0,
        FontStyle::Regular,
        TEXT,
    );
    composer.rule(1.0, RULE_STRONG);

    let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.entry_date);
    for entry in ordered {
        composer.page_break();
        compose_entry(&mut composer, entry);
    }

    composer.finish()
}
