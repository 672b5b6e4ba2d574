//! Raster capture of a rendered receipt.
//!
//! The `Capture` trait is the seam between the PDF export and whatever turns a
//! `ReceiptView` into pixels. `BitmapCapture` lays the view out as a single
//! column of text blocks and draws them with an 8x8 bitmap font, upscaled by
//! the capture scale.

use super::render::{RECEIPT_TITLE, ReceiptView, Tone};
use crate::errors::{Error, Result};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLUE: Rgb<u8> = Rgb([30, 64, 175]);
const GREEN: Rgb<u8> = Rgb([5, 150, 105]);
const DARK: Rgb<u8> = Rgb([31, 41, 55]);
const GRAY: Rgb<u8> = Rgb([75, 85, 99]);
const LIGHT: Rgb<u8> = Rgb([107, 114, 128]);
const RULE: Rgb<u8> = Rgb([229, 231, 235]);

/// Glyph cell size of the bitmap font, in logical pixels
const GLYPH: u32 = 8;
/// Horizontal page margin, in logical pixels
const PADDING: u32 = 24;
/// Extra space between text lines, in logical pixels
const LEADING: u32 = 6;

/// Turns a rendered receipt into an RGB raster
pub trait Capture: Send + Sync + 'static {
    /// Captures `view` at `scale` times its logical size.
    fn capture(&self, view: &ReceiptView, scale: u32) -> Result<RgbImage>;
}

/// Horizontal alignment of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Flush left inside the margin
    Left,
    /// Centered on the page
    Center,
}

/// One element of the raster layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A line of text, wrapped at draw time
    Text {
        /// Content
        text: String,
        /// Glyph multiplier (1 = 8px glyphs)
        size: u32,
        /// Foreground color
        color: Rgb<u8>,
        /// Alignment
        align: Align,
        /// Optional background band behind the line
        background: Option<Rgb<u8>>,
    },
    /// A horizontal separator
    Rule(Rgb<u8>),
    /// Vertical space
    Gap(u32),
}

impl Block {
    fn text(text: impl Into<String>, size: u32, color: Rgb<u8>, align: Align) -> Self {
        Self::Text {
            text: text.into(),
            size,
            color,
            align,
            background: None,
        }
    }
}

const fn tone_rgb(tone: Tone) -> Rgb<u8> {
    match tone {
        Tone::Gray => Rgb([249, 250, 251]),
        Tone::Blue => Rgb([239, 246, 255]),
        Tone::Yellow => Rgb([254, 252, 232]),
        Tone::Purple => Rgb([250, 245, 255]),
    }
}

/// Lays a view out as a single column of blocks, top to bottom.
#[must_use]
pub fn layout(view: &ReceiptView) -> Vec<Block> {
    let mut blocks = vec![Block::Gap(PADDING), Block::text(&view.header, 2, BLUE, Align::Center)];
    blocks.extend(
        view.header_lines
            .iter()
            .map(|line| Block::text(line, 1, GRAY, Align::Center)),
    );
    blocks.push(Block::Rule(BLUE));
    blocks.push(Block::text(RECEIPT_TITLE, 2, GREEN, Align::Center));
    blocks.push(Block::Gap(LEADING));

    for card in view.cards() {
        let background = Some(tone_rgb(card.tone));
        blocks.push(Block::Text {
            text: card.title.to_string(),
            size: 1,
            color: DARK,
            align: Align::Left,
            background,
        });
        for row in &card.rows {
            blocks.push(Block::Text {
                text: format!("{} {}", row.label, row.value),
                size: 1,
                color: if row.emphasis { GREEN } else { GRAY },
                align: Align::Left,
                background,
            });
        }
        blocks.push(Block::Gap(LEADING));
    }

    if let Some(notes) = &view.notes {
        let background = Some(tone_rgb(Tone::Gray));
        blocks.push(Block::Text {
            text: "Additional Notes:".to_string(),
            size: 1,
            color: DARK,
            align: Align::Left,
            background,
        });
        blocks.push(Block::Text {
            text: notes.clone(),
            size: 1,
            color: GRAY,
            align: Align::Left,
            background,
        });
        blocks.push(Block::Gap(LEADING));
    }

    blocks.push(Block::Rule(RULE));
    blocks.push(Block::text(&view.thanks, 1, DARK, Align::Center));
    blocks.push(Block::text(&view.blessing, 1, GREEN, Align::Center));
    blocks.push(Block::text(&view.scripture, 1, GRAY, Align::Center));
    blocks.push(Block::Rule(RULE));
    blocks.extend(
        view.contact_lines
            .iter()
            .map(|line| Block::text(line, 1, LIGHT, Align::Center)),
    );
    blocks.push(Block::Gap(PADDING));
    blocks
}

/// Default capture: bitmap font on a white page of fixed logical width
#[derive(Debug, Clone, Copy)]
pub struct BitmapCapture {
    width: u32,
}

impl Default for BitmapCapture {
    fn default() -> Self {
        Self { width: 640 }
    }
}

impl BitmapCapture {
    /// Capture with a custom logical page width
    #[must_use]
    pub const fn with_width(width: u32) -> Self {
        Self { width }
    }

    fn columns(&self, size: u32) -> usize {
        ((self.width.saturating_sub(2 * PADDING)) / (GLYPH * size)).max(1) as usize
    }
}

impl Capture for BitmapCapture {
    fn capture(&self, view: &ReceiptView, scale: u32) -> Result<RgbImage> {
        if scale == 0 || self.width <= 2 * PADDING {
            return Err(Error::Capture {
                message: format!("cannot capture at scale {scale} and width {}", self.width),
            });
        }

        // Wrap first so the page height is known before allocating.
        let mut lines = Vec::new();
        for block in layout(view) {
            match block {
                Block::Text {
                    text,
                    size,
                    color,
                    align,
                    background,
                } => {
                    for line in wrap(&text, self.columns(size)) {
                        lines.push(Block::Text {
                            text: line,
                            size,
                            color,
                            align,
                            background,
                        });
                    }
                }
                other => lines.push(other),
            }
        }

        let height: u32 = lines.iter().map(block_height).sum();
        let mut image = RgbImage::from_pixel(self.width * scale, height * scale, WHITE);

        let mut y = 0;
        for block in &lines {
            draw_block(&mut image, block, y, self.width, scale);
            y += block_height(block);
        }

        Ok(image)
    }
}

const fn block_height(block: &Block) -> u32 {
    match block {
        Block::Text { size, .. } => GLYPH * *size + LEADING,
        Block::Rule(_) => 2 + 2 * LEADING,
        Block::Gap(gap) => *gap,
    }
}

/// Word-wraps `text` into lines of at most `columns` characters.
/// Words longer than a line are split.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(columns);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let used = current.chars().count();
        if used > 0 && used + 1 + word.len() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn fill(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(image.width());
    let y_end = (y + h).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, color);
        }
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

#[allow(clippy::cast_possible_truncation)] // wrapped lines are shorter than the page
fn draw_block(image: &mut RgbImage, block: &Block, y: u32, width: u32, scale: u32) {
    match block {
        Block::Gap(_) => {}
        Block::Rule(color) => {
            fill(
                image,
                PADDING * scale,
                (y + LEADING) * scale,
                (width - 2 * PADDING) * scale,
                2 * scale,
                *color,
            );
        }
        Block::Text {
            text,
            size,
            color,
            align,
            background,
        } => {
            if let Some(background) = background {
                fill(
                    image,
                    PADDING * scale,
                    y * scale,
                    (width - 2 * PADDING) * scale,
                    block_height(block) * scale,
                    *background,
                );
            }

            let cell = GLYPH * size;
            let text_width = text.chars().count() as u32 * cell;
            let x0 = match align {
                Align::Left => PADDING + if background.is_some() { GLYPH } else { 0 },
                Align::Center => width.saturating_sub(text_width) / 2,
            };
            let y0 = y + LEADING / 2;
            let dot = size * scale;

            for (column, c) in text.chars().enumerate() {
                let gx = x0 + column as u32 * cell;
                for (row, bits) in glyph(c).iter().enumerate() {
                    for bit in 0..8 {
                        if (bits >> bit) & 1 == 1 {
                            fill(
                                image,
                                (gx + bit * size) * scale,
                                (y0 + row as u32 * size) * scale,
                                dot,
                                dot,
                                *color,
                            );
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{render_default, sample_card_record};

    fn block_texts(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|block| match block {
                Block::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_layout_carries_exactly_the_view_text() {
        let view = render_default(&sample_card_record());
        assert_eq!(block_texts(&layout(&view)), view.text_lines());
    }

    #[test]
    fn test_capture_dimensions_follow_scale() {
        let view = render_default(&sample_card_record());
        let capture = BitmapCapture::default();

        let single = capture.capture(&view, 1).unwrap();
        let double = capture.capture(&view, 2).unwrap();

        assert_eq!(single.width(), 640);
        assert_eq!(double.width(), 1280);
        assert_eq!(double.height(), single.height() * 2);
    }

    #[test]
    fn test_capture_draws_something() {
        let view = render_default(&sample_card_record());
        let image = BitmapCapture::default().capture(&view, 1).unwrap();
        assert!(image.pixels().any(|pixel| *pixel == BLUE));
        assert!(image.pixels().any(|pixel| *pixel == GREEN));
    }

    #[test]
    fn test_capture_is_deterministic() {
        let view = render_default(&sample_card_record());
        let capture = BitmapCapture::default();
        assert_eq!(capture.capture(&view, 2).unwrap(), capture.capture(&view, 2).unwrap());
    }

    #[test]
    fn test_capture_rejects_zero_scale() {
        let view = render_default(&sample_card_record());
        assert!(matches!(
            BitmapCapture::default().capture(&view, 0),
            Err(Error::Capture { message: _ })
        ));
        assert!(BitmapCapture::with_width(10).capture(&view, 1).is_err());
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 10), vec![String::new()]);
        assert_eq!(wrap("fits", 10), vec!["fits"]);
    }

    #[test]
    fn test_notes_grow_the_capture() {
        let mut record = sample_card_record();
        let capture = BitmapCapture::default();
        let plain = capture.capture(&render_default(&record), 1).unwrap();

        record.notes = Some("In memory of a dear friend".to_string());
        let with_notes = capture.capture(&render_default(&record), 1).unwrap();
        assert!(with_notes.height() > plain.height());
    }
}
