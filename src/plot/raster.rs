//! Rendu PNG des graphiques avec le crate `image`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use image::{Rgb, RgbImage};
use log::info;

use super::font::{glyph, text_width, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH};
use super::{LinePlot, PlotRenderer};
use crate::config::PlotConfig;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const FRAME: Rgb<u8> = Rgb([0, 0, 0]);
const LINE: Rgb<u8> = Rgb([31, 119, 180]);
const TEXT: Rgb<u8> = Rgb([0, 0, 0]);

/// Nombre de divisions de la grille sur chaque axe
const GRID_DIVISIONS: u32 = 10;

const MARGIN_LEFT: u32 = 50;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 40;
const MARGIN_BOTTOM: u32 = 40;

pub const MIN_WIDTH: u32 = 200;
pub const MIN_HEIGHT: u32 = 150;

/// Zone de tracé en pixels
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
}

impl PlotArea {
    fn width(&self) -> u32 {
        self.right - self.left
    }

    fn height(&self) -> u32 {
        self.bottom - self.top
    }

    fn to_pixel(&self, nx: f64, ny: f64) -> (i64, i64) {
        let px = self.left as f64 + nx * self.width() as f64;
        let py = self.bottom as f64 - ny * self.height() as f64;
        (px.round() as i64, py.round() as i64)
    }
}

/// Exporte les graphiques dans un fichier PNG
#[derive(Debug, Clone)]
pub struct PngRenderer {
    path: PathBuf,
    width: u32,
    height: u32,
    grid: bool,
}

impl PngRenderer {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            grid: true,
        }
    }

    pub fn from_config(config: &PlotConfig) -> Self {
        Self {
            path: PathBuf::from(&config.output_path),
            width: config.width,
            height: config.height,
            grid: config.grid,
        }
    }

    /// Remplace le fichier de sortie
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dessine le graphique en mémoire
    pub fn draw(&self, plot: &LinePlot) -> Result<RgbImage> {
        if self.width < MIN_WIDTH || self.height < MIN_HEIGHT {
            bail!(
                "Taille d'image trop petite: {}x{} (minimum {}x{})",
                self.width,
                self.height,
                MIN_WIDTH,
                MIN_HEIGHT
            );
        }

        let bounds = plot.bounds()?;
        let mut image = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let area = PlotArea {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            right: self.width - MARGIN_RIGHT,
            bottom: self.height - MARGIN_BOTTOM,
        };

        if plot.grid && self.grid {
            for i in 1..GRID_DIVISIONS {
                let x = area.left + area.width() * i / GRID_DIVISIONS;
                let y = area.top + area.height() * i / GRID_DIVISIONS;
                draw_line(&mut image, (x as i64, area.top as i64), (x as i64, area.bottom as i64), GRID);
                draw_line(&mut image, (area.left as i64, y as i64), (area.right as i64, y as i64), GRID);
            }
        }

        draw_rect(&mut image, area, FRAME);

        // Segment entre chaque paire de points finis consécutifs
        let mut previous: Option<(i64, i64)> = None;
        for &(x, y) in &plot.points {
            if !(x.is_finite() && y.is_finite()) {
                previous = None;
                continue;
            }
            let (nx, ny) = bounds.normalize(x, y);
            let pixel = area.to_pixel(nx, ny);
            match previous {
                Some(start) => draw_line(&mut image, start, pixel, LINE),
                None => draw_line(&mut image, pixel, pixel, LINE),
            }
            previous = Some(pixel);
        }

        let title_width = text_width(&plot.title, 2);
        draw_text(
            &mut image,
            (self.width.saturating_sub(title_width) / 2) as i64,
            12,
            &plot.title,
            2,
            TEXT,
        );
        draw_text(
            &mut image,
            (area.left + area.width() / 2) as i64,
            (area.bottom + 16) as i64,
            &plot.x_label,
            2,
            TEXT,
        );
        draw_text(
            &mut image,
            16,
            (area.top + area.height() / 2) as i64,
            &plot.y_label,
            2,
            TEXT,
        );

        // Légende en haut à gauche de la zone de tracé
        let legend_x = (area.left + 8) as i64;
        let legend_y = (area.top + 8) as i64;
        let legend_width = 24 + text_width(&plot.legend, 1) as i64;
        let legend_box = PlotArea {
            left: legend_x as u32,
            top: legend_y as u32,
            right: (legend_x + legend_width + 8).min(area.right as i64 - 1) as u32,
            bottom: (legend_y + GLYPH_HEIGHT as i64 + 8) as u32,
        };
        fill_rect(&mut image, legend_box, BACKGROUND);
        draw_rect(&mut image, legend_box, GRID);
        let swatch_y = legend_y + 4 + GLYPH_HEIGHT as i64 / 2;
        draw_line(&mut image, (legend_x + 4, swatch_y), (legend_x + 20, swatch_y), LINE);
        draw_text(&mut image, legend_x + 24, legend_y + 4, &plot.legend, 1, TEXT);

        Ok(image)
    }
}

impl PlotRenderer for PngRenderer {
    fn render(&mut self, plot: &LinePlot) -> Result<()> {
        let image = self.draw(plot)?;
        image
            .save(&self.path)
            .with_context(|| format!("Impossible d'écrire {}", self.path.display()))?;
        info!("Graphique exporté vers {}", self.path.display());
        Ok(())
    }
}

fn put(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham
fn draw_line(image: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(image, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_rect(image: &mut RgbImage, area: PlotArea, color: Rgb<u8>) {
    let (l, t, r, b) = (area.left as i64, area.top as i64, area.right as i64, area.bottom as i64);
    draw_line(image, (l, t), (r, t), color);
    draw_line(image, (r, t), (r, b), color);
    draw_line(image, (r, b), (l, b), color);
    draw_line(image, (l, b), (l, t), color);
}

fn fill_rect(image: &mut RgbImage, area: PlotArea, color: Rgb<u8>) {
    for y in area.top..=area.bottom {
        for x in area.left..=area.right {
            put(image, x as i64, y as i64, color);
        }
    }
}

fn draw_text(image: &mut RgbImage, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
    let scale = scale.max(1) as i64;
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) as i64 * scale;
    for (index, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let origin_x = x + index as i64 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH as i64 {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        put(image, origin_x + col * scale + dx, y + row as i64 * scale + dy, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::convert_batch;
    use crate::decoder::Encoding;
    use crate::plot::project;

    #[test]
    fn test_draw_dimensions_and_line_color() {
        let plot = project(&[1.0, 2.0, 3.0], "2", "3").unwrap();
        let renderer = PngRenderer::new("unused.png", 400, 300);
        let image = renderer.draw(&plot).unwrap();

        assert_eq!(image.dimensions(), (400, 300));
        assert!(image.pixels().any(|p| *p == LINE));
        // Coin inférieur gauche de la zone = premier point
        assert_eq!(*image.get_pixel(MARGIN_LEFT, 300 - MARGIN_BOTTOM), LINE);
    }

    #[test]
    fn test_grid_can_be_disabled() {
        let mut plot = project(&[1.0, 2.0], "1", "0").unwrap();
        plot.grid = false;
        let image = PngRenderer::new("unused.png", 400, 300).draw(&plot).unwrap();
        // Milieu de la zone hors de la diagonale : fond, pas de grille
        let x = MARGIN_LEFT + (400 - MARGIN_LEFT - MARGIN_RIGHT) / 2;
        let y = MARGIN_TOP + 5 * (300 - MARGIN_TOP - MARGIN_BOTTOM) / 6;
        assert_ne!(*image.get_pixel(x, y), GRID);
    }

    #[test]
    fn test_too_small_is_rejected() {
        let plot = project(&[1.0], "1", "0").unwrap();
        assert!(PngRenderer::new("unused.png", 10, 10).draw(&plot).is_err());
    }

    /// Une valeur Float32 isolée d'environ 1,6e19 est tracée au centre, pas dans le coin
    #[test]
    fn test_single_huge_value_is_centered() {
        let result = convert_batch("5F5E1000", Encoding::Float32).unwrap();
        let plot = project(&result.x_values(), "1", "0").unwrap();
        let image = PngRenderer::new("unused.png", 400, 300).draw(&plot).unwrap();

        assert_ne!(*image.get_pixel(0, 0), LINE);
        let center_x = MARGIN_LEFT + (400 - MARGIN_LEFT - MARGIN_RIGHT) / 2;
        let center_y = 300 - MARGIN_BOTTOM - (300 - MARGIN_TOP - MARGIN_BOTTOM) / 2;
        assert_eq!(*image.get_pixel(center_x, center_y), LINE);
    }
}
