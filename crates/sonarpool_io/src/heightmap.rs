//! Terrain heightmap decoding.
//!
//! Rows map to `y` and columns to `x`. Supported inputs:
//! - `.json`: an array of rows of non-negative integers
//! - `.txt` / `.csv`: one row per line, values separated by commas or whitespace
//! - any raster format the `image` crate decodes: the red channel is the height

use crate::error::{IoError, Result};
use image::DynamicImage;
use sonarpool_data::HeightField;
use std::path::Path;

/// Loads a heightmap, dispatching on the file extension.
pub fn load_heightmap<P: AsRef<Path>>(path: P) -> Result<HeightField> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let field = match extension.as_str() {
        "json" => {
            let rows: Vec<Vec<u32>> = crate::serialization::read_json_file(path)?;
            field_from_rows(rows)
        }
        "txt" | "csv" => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                IoError::FileSystem(e).with_context(format!("reading heightmap {:?}", path))
            })?;
            parse_grid(&text)
        }
        _ => {
            let img = image::open(path)
                .map_err(|e| IoError::Image(e).with_context(format!("decoding heightmap {:?}", path)))?;
            from_image(&img)
        }
    }
    .map_err(|e| e.with_context(format!("loading heightmap {:?}", path)))?;

    tracing::info!(
        path = ?path,
        length = field.length(),
        width = field.width(),
        max_height = field.max_height(),
        "Loaded heightmap"
    );
    Ok(field)
}

/// Parses a plain-text grid.
pub fn parse_grid(text: &str) -> Result<HeightField> {
    let rows = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .enumerate()
        .map(|(row, line)| {
            line.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<u32>().map_err(|e| {
                        IoError::validation(format!("row {row}: invalid height {token:?}: {e}"))
                    })
                })
                .collect::<Result<Vec<u32>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    field_from_rows(rows)
}

/// Reads heights from the red channel of a decoded image.
pub fn from_image(img: &DynamicImage) -> Result<HeightField> {
    let rgb = img.to_rgb8();
    let (length, width) = rgb.dimensions();
    let heights = rgb.pixels().map(|p| u32::from(p[0])).collect();
    HeightField::new(length as usize, width as usize, heights)
        .map_err(|e| IoError::validation(e.to_string()))
}

fn field_from_rows(rows: Vec<Vec<u32>>) -> Result<HeightField> {
    HeightField::from_rows(rows).map_err(|e| IoError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::path::PathBuf;

    fn temp_path(extension: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sonarpool-{}.{extension}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_parse_grid_mixed_separators() {
        let field = parse_grid("0, 1, 2\n# ridge\n3 4 5\n\n").unwrap();
        assert_eq!(field.length(), 3);
        assert_eq!(field.width(), 2);
        assert_eq!(field.get(1, 1), 4);
        assert_eq!(field.max_height(), 5);
    }

    #[test]
    fn test_parse_grid_rejects_ragged_rows() {
        assert!(matches!(parse_grid("0 1 2\n3 4"), Err(IoError::Validation(_))));
    }

    #[test]
    fn test_parse_grid_rejects_negative() {
        assert!(parse_grid("0 -1").is_err());
    }

    #[test]
    fn test_red_channel_is_height() {
        let img = RgbImage::from_fn(3, 2, |x, y| Rgb([(x + 10 * y) as u8, 200, 200]));
        let field = from_image(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(field.length(), 3);
        assert_eq!(field.width(), 2);
        assert_eq!(field.get(2, 1), 12);
        assert_eq!(field.max_height(), 12);
    }

    #[test]
    fn test_load_png_and_json() {
        let png = temp_path("png");
        RgbImage::from_fn(2, 2, |x, _| Rgb([x as u8 * 3, 0, 0]))
            .save(&png)
            .unwrap();
        let from_png = load_heightmap(&png).unwrap();
        std::fs::remove_file(&png).unwrap();

        let json = temp_path("json");
        std::fs::write(&json, "[[0, 3], [0, 3]]").unwrap();
        let from_json = load_heightmap(&json).unwrap();
        std::fs::remove_file(&json).unwrap();

        assert_eq!(from_png, from_json);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_heightmap(temp_path("csv")).unwrap_err();
        assert!(err.to_string().contains("loading heightmap"));
    }
}
