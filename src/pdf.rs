//! One-page PDF export of a rendered chart.

use crate::chart::{Chart, ChartRow};
use crate::models::DisplayInfo;
use chrono::{Local, NaiveDate};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const TABLE_TOP: f32 = 60.0;
const ROW_HEIGHT: f32 = 10.0;
const COLUMNS: [&str; 3] = ["Planetă", "Semn", "Casă"];
const PT_TO_MM: f32 = 0.3528;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to load font {path}: {reason}")]
    Font { path: String, reason: String },
    #[error("failed to render pdf: {0}")]
    Render(String),
    #[error("failed to write pdf: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

/// Colours for the exported table, as 0-255 RGB triples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfTheme {
    pub header_fill: (u8, u8, u8),
    pub header_text: (u8, u8, u8),
    pub body_text: (u8, u8, u8),
    pub grid: (u8, u8, u8),
    pub title: (u8, u8, u8),
}

impl PdfTheme {
    pub fn light() -> Self {
        Self {
            header_fill: (41, 128, 185),
            header_text: (255, 255, 255),
            body_text: (0, 0, 0),
            grid: (0, 0, 0),
            title: (0, 0, 0),
        }
    }

    pub fn dark() -> Self {
        Self {
            header_fill: (15, 23, 42),
            header_text: (253, 230, 138),
            body_text: (15, 23, 42),
            grid: (71, 85, 105),
            title: (120, 53, 15),
        }
    }

    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Light => Self::light(),
            ThemeName::Dark => Self::dark(),
        }
    }
}

impl Default for PdfTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// TrueType fonts to embed. Without both, built-in Helvetica is used and
/// astrological glyphs are left out since it cannot encode them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfFonts {
    pub regular_font: Option<PathBuf>,
    pub symbol_font: Option<PathBuf>,
}

struct LoadedFonts {
    regular: IndirectFontRef,
    body: IndirectFontRef,
    glyphs: bool,
}

pub struct PdfExporter {
    theme: PdfTheme,
    fonts: PdfFonts,
}

impl PdfExporter {
    pub fn new(theme: PdfTheme, fonts: PdfFonts) -> Self {
        Self { theme, fonts }
    }

    /// Render to bytes, footer dated `generated_on`
    pub fn render(
        &self,
        chart: &Chart,
        info: &DisplayInfo,
        generated_on: NaiveDate,
    ) -> Result<Vec<u8>, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new("Hartă Astrală", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let fonts = self.load_fonts(&doc)?;
        let layer = doc.get_page(page).get_layer(layer);
        let canvas = Canvas {
            layer: &layer,
            fonts: &fonts,
        };

        canvas.color(self.theme.title);
        canvas.centered(&fonts.regular, "Hartă Astrală", 20.0, PAGE_HEIGHT - 15.0);

        canvas.color(self.theme.body_text);
        let lines = [
            format!("Nume: {}", info.name),
            format!("Dată: {}", info.date),
            format!("Oră: {}", info.time),
            format!("Locație: {}", info.location),
        ];
        for (i, line) in lines.iter().enumerate() {
            canvas.text(&fonts.regular, line, 12.0, MARGIN, PAGE_HEIGHT - 30.0 - 7.0 * i as f32);
        }

        self.draw_table(&canvas, chart);

        canvas.color(self.theme.body_text);
        let footer = format!(
            "Generat la {} de AstroLumina",
            generated_on.format("%d.%m.%Y")
        );
        canvas.centered(&fonts.regular, &footer, 10.0, 10.0);

        debug!("Rendered PDF with {} table rows", chart.len());
        doc.save_to_bytes()
            .map_err(|e| ExportError::Render(e.to_string()))
    }

    /// Render with today's date and write to `path`
    pub fn export(
        &self,
        chart: &Chart,
        info: &DisplayInfo,
        path: &Path,
    ) -> Result<(), ExportError> {
        let bytes = self.render(chart, info, Local::now().date_naive())?;
        std::fs::write(path, bytes)?;
        info!("💾 Saved chart PDF to {}", path.display());
        Ok(())
    }

    fn load_fonts(&self, doc: &PdfDocumentReference) -> Result<LoadedFonts, ExportError> {
        match (&self.fonts.regular_font, &self.fonts.symbol_font) {
            (Some(regular), Some(symbols)) => Ok(LoadedFonts {
                regular: load_external(doc, regular)?,
                body: load_external(doc, symbols)?,
                glyphs: true,
            }),
            _ => {
                let builtin = doc
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(|e| ExportError::Render(e.to_string()))?;
                Ok(LoadedFonts {
                    regular: builtin.clone(),
                    body: builtin,
                    glyphs: false,
                })
            }
        }
    }

    fn draw_table(&self, canvas: &Canvas<'_>, chart: &Chart) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        let column = width / COLUMNS.len() as f32;
        let top = PAGE_HEIGHT - TABLE_TOP;
        let rows = chart.len() + 1;

        // header band: a stroke as thick as the row
        canvas.layer.set_outline_color(rgb(self.theme.header_fill));
        canvas.layer.set_outline_thickness(ROW_HEIGHT / PT_TO_MM);
        canvas.line((MARGIN, top - ROW_HEIGHT / 2.0), (MARGIN + width, top - ROW_HEIGHT / 2.0));

        canvas.color(self.theme.header_text);
        for (i, head) in COLUMNS.iter().enumerate() {
            let center = MARGIN + column * (i as f32 + 0.5);
            canvas.centered_at(&canvas.fonts.regular, head, 12.0, center, top - ROW_HEIGHT + 3.5);
        }

        canvas.color(self.theme.body_text);
        for (r, row) in chart.rows.iter().enumerate() {
            let baseline = top - ROW_HEIGHT * (r as f32 + 2.0) + 3.5;
            for (i, cell) in row_cells(row, canvas.fonts.glyphs).iter().enumerate() {
                let center = MARGIN + column * (i as f32 + 0.5);
                canvas.centered_at(&canvas.fonts.body, cell, 12.0, center, baseline);
            }
        }

        canvas.layer.set_outline_color(rgb(self.theme.grid));
        canvas.layer.set_outline_thickness(0.1 / PT_TO_MM);
        let bottom = top - ROW_HEIGHT * rows as f32;
        for r in 0..=rows {
            let y = top - ROW_HEIGHT * r as f32;
            canvas.line((MARGIN, y), (MARGIN + width, y));
        }
        for c in 0..=COLUMNS.len() {
            let x = MARGIN + column * c as f32;
            canvas.line((x, top), (x, bottom));
        }
    }
}

/// Planet, sign and house cell text
fn row_cells(row: &ChartRow, glyphs: bool) -> [String; 3] {
    if !glyphs {
        return [row.planet.clone(), row.sign.clone(), row.house.clone()];
    }
    // the Sun prints as a plain "O" in the exported table
    let planet = if row.planet == "Sun" {
        format!("O {}", row.planet)
    } else {
        row.planet_label()
    };
    let sign = match row.sign_symbol {
        Some(symbol) => format!("{} {}", symbol, row.sign),
        None => row.sign.clone(),
    };
    [planet, sign, row.house.clone()]
}

fn load_external(doc: &PdfDocumentReference, path: &Path) -> Result<IndirectFontRef, ExportError> {
    let file = File::open(path).map_err(|e| ExportError::Font {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    doc.add_external_font(BufReader::new(file))
        .map_err(|e| ExportError::Font {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Built-in fonts only cover WinAnsi
fn fold_diacritics(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ă' | 'â' => 'a',
            'Ă' | 'Â' => 'A',
            'î' => 'i',
            'Î' => 'I',
            'ș' | 'ş' => 's',
            'Ș' | 'Ş' => 'S',
            'ț' | 'ţ' => 't',
            'Ț' | 'Ţ' => 'T',
            other => other,
        })
        .collect()
}

struct Canvas<'a> {
    layer: &'a PdfLayerReference,
    fonts: &'a LoadedFonts,
}

impl Canvas<'_> {
    fn color(&self, color: (u8, u8, u8)) {
        self.layer.set_fill_color(rgb(color));
    }

    fn text(&self, font: &IndirectFontRef, text: &str, size: f32, x: f32, y: f32) {
        let text = if self.fonts.glyphs {
            text.to_string()
        } else {
            fold_diacritics(text)
        };
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn centered(&self, font: &IndirectFontRef, text: &str, size: f32, y: f32) {
        self.centered_at(font, text, size, PAGE_WIDTH / 2.0, y);
    }

    /// Approximate centring: half an em per character
    fn centered_at(&self, font: &IndirectFontRef, text: &str, size: f32, center: f32, y: f32) {
        let width = text.chars().count() as f32 * size * 0.5 * PT_TO_MM;
        self.text(font, text, size, center - width / 2.0, y);
    }

    fn line(&self, from: (f32, f32), to: (f32, f32)) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), Mm(from.1)), false),
                (Point::new(Mm(to.0), Mm(to.1)), false),
            ],
            is_closed: false,
        });
    }
}
