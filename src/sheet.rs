use std::path::{Path, PathBuf};

use genpdf::elements::{Break, Image, LinearLayout, PageBreak, Paragraph, TableLayout};
use genpdf::Element as _;
use genpdf::{fonts, Alignment, Document, Scale, SimplePageDecorator};
use tracing::info;

use crate::error::{GenerateError, Result};
use crate::verify::list_artifacts;

pub const COLUMNS: usize = 3;
pub const ROWS: usize = 5;
const IMAGE_SCALE: f64 = 2.0;

pub const DEFAULT_FONT_DIR: &str = "/usr/share/fonts/truetype/noto";
pub const DEFAULT_FONT: &str = "NotoSans";
pub const DEFAULT_SHEET_NAME: &str = "labels.pdf";

#[derive(Debug, Clone)]
pub struct SheetOptions {
    pub font_dir: PathBuf,
    pub font_name: String,
    pub title: String,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            font_dir: PathBuf::from(DEFAULT_FONT_DIR),
            font_name: DEFAULT_FONT.to_string(),
            title: "QR Codes".to_string(),
        }
    }
}

/// Groups artifacts into pages of `COLUMNS * ROWS`, then rows of `COLUMNS`.
pub fn paginate(images: &[PathBuf]) -> Vec<Vec<&[PathBuf]>> {
    images
        .chunks(COLUMNS * ROWS)
        .map(|page| page.chunks(COLUMNS).collect())
        .collect()
}

fn sheet_err(context: &str, e: impl std::fmt::Display) -> GenerateError {
    GenerateError::Sheet(format!("{context}: {e}"))
}

fn label(path: &Path) -> Result<LinearLayout> {
    let caption = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image = Image::from_path(path)
        .map_err(|e| sheet_err(&format!("loading image {}", path.display()), e))?
        .with_alignment(Alignment::Center)
        .with_scale(Scale::new(IMAGE_SCALE, IMAGE_SCALE));

    let mut cell = LinearLayout::vertical();
    cell.push(image);
    cell.push(Paragraph::new(caption).aligned(Alignment::Center));
    Ok(cell)
}

/// Lays every artifact in `dir` out on a printable PDF, one captioned code
/// per cell. Returns the number of codes placed.
pub fn render_sheet(dir: impl AsRef<Path>, output: impl AsRef<Path>, options: &SheetOptions) -> Result<usize> {
    let dir = dir.as_ref();
    let output = output.as_ref();

    let images = list_artifacts(dir)?;
    if images.is_empty() {
        return Err(GenerateError::Sheet(format!(
            "no PNG artifacts found in {}",
            dir.display()
        )));
    }

    let font_family = fonts::from_files(&options.font_dir, &options.font_name, None).map_err(|e| {
        sheet_err(
            &format!("loading font {} from {}", options.font_name, options.font_dir.display()),
            e,
        )
    })?;

    let mut doc = Document::new(font_family);
    doc.set_title(options.title.clone());

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    let pages = paginate(&images);
    let total_pages = pages.len();
    for (page_idx, rows) in pages.into_iter().enumerate() {
        let mut table = TableLayout::new(vec![1; COLUMNS]);
        for cells in rows {
            let mut row = table.row();
            for col in 0..COLUMNS {
                match cells.get(col) {
                    Some(path) => row.push_element(label(path)?.padded(1.0).framed()),
                    None => row.push_element(Break::new(0)),
                }
            }
            row.push().map_err(|e| sheet_err("laying out row", e))?;
        }
        doc.push(table);

        if page_idx + 1 < total_pages {
            doc.push(PageBreak::new());
        }
    }

    doc.render_to_file(output)
        .map_err(|e| sheet_err(&format!("writing {}", output.display()), e))?;

    info!(count = images.len(), pages = total_pages, output = %output.display(), "label sheet written");
    Ok(images.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BatchConfig, Generator, TracingSink};
    use tempfile::TempDir;

    const STYLES: [&str; 4] = ["Regular", "Bold", "Italic", "BoldItalic"];

    /// A font family laid out the way `fonts::from_files` wants it, taken from
    /// the system: Noto as installed, or DejaVu copied under the expected names.
    fn font_fixture(scratch: &Path) -> Option<SheetOptions> {
        let noto = Path::new(DEFAULT_FONT_DIR);
        if STYLES
            .iter()
            .all(|style| noto.join(format!("{DEFAULT_FONT}-{style}.ttf")).is_file())
        {
            return Some(SheetOptions::default());
        }

        let dejavu = Path::new("/usr/share/fonts/truetype/dejavu");
        let sources = ["DejaVuSans", "DejaVuSans-Bold", "DejaVuSans-Oblique", "DejaVuSans-BoldOblique"];
        let font_dir = scratch.join("fonts");
        std::fs::create_dir_all(&font_dir).ok()?;
        for (source, style) in sources.iter().zip(STYLES) {
            std::fs::copy(
                dejavu.join(format!("{source}.ttf")),
                font_dir.join(format!("DejaVuSans-{style}.ttf")),
            )
            .ok()?;
        }
        Some(SheetOptions {
            font_dir,
            font_name: "DejaVuSans".to_string(),
            ..SheetOptions::default()
        })
    }

    fn paths(n: usize) -> Vec<PathBuf> {
        (1..=n).map(|i| PathBuf::from(format!("H{i:03}.png"))).collect()
    }

    #[test]
    fn paginate_fills_rows_then_pages() {
        let images = paths(100);
        let pages = paginate(&images);

        assert_eq!(pages.len(), 7);
        assert_eq!(pages[0].len(), ROWS);
        assert!(pages[0].iter().all(|row| row.len() == COLUMNS));
        // 100 = 6 * 15 + 10: four rows, the last holding a single code
        let last = pages.last().unwrap();
        assert_eq!(last.len(), 4);
        assert_eq!(last[3], &[PathBuf::from("H100.png")][..]);
    }

    #[test]
    fn paginate_empty() {
        assert!(paginate(&[]).is_empty());
    }

    #[test]
    fn empty_directory_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = render_sheet(tmp.path(), tmp.path().join("out.pdf"), &SheetOptions::default()).unwrap_err();
        assert!(matches!(err, GenerateError::Sheet(_)));
        assert!(!tmp.path().join("out.pdf").exists());
    }

    #[test]
    fn missing_font_is_a_sheet_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("H001.png"), "").unwrap();
        let options = SheetOptions {
            font_dir: tmp.path().join("no-fonts-here"),
            ..SheetOptions::default()
        };

        let err = render_sheet(tmp.path(), tmp.path().join("out.pdf"), &options).unwrap_err();
        match err {
            GenerateError::Sheet(msg) => assert!(msg.contains("loading font")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn renders_two_page_pdf() {
        let tmp = TempDir::new().unwrap();
        let Some(options) = font_fixture(tmp.path()) else {
            eprintln!("skipping: no Noto or DejaVu fonts installed");
            return;
        };

        // 16 codes: a full first page, then one code and two blank cells
        let codes = tmp.path().join("qrcodes");
        let mut config = BatchConfig::with_output_dir(&codes);
        config.last = 16;
        Generator::new(config).run(&mut TracingSink).unwrap();

        let output = tmp.path().join("labels.pdf");
        let placed = render_sheet(&codes, &output, &options).unwrap();

        assert_eq!(placed, 16);
        let pdf = std::fs::read(&output).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }
}
