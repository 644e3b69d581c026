//! Table images

use crate::table::*;
use sheen_core::image_io::*;
use sheen_core::pbrt::*;

/// Fixed value ranges of the heat map panels for `a`, `b` and `r`.
pub const HEATMAP_RANGES: [(Float, Float); PARAMS_PER_ENTRY] = [(0.0, 1.0), (-0.2, 0.0), (0.0, 0.8)];

/// Width in pixels of the white gap between heat map panels.
const PANEL_GAP: usize = 8;

/// Returns the table as an image with one pixel per entry: the roughness
/// varies along x, the incident angle cosine along y (from the top) and the
/// R, G, B channels hold `a`, `b` and `r`.
///
/// * `table` - The table.
pub fn table_to_image(table: &LtcTable) -> RGBImage {
    RGBImage::new(table.data().to_vec(), table.alpha_res(), table.mu_res())
}

/// Returns the table stored in an image laid out like `table_to_image()`.
///
/// * `image` - The image.
pub fn image_to_table(image: &RGBImage) -> Result<LtcTable, String> {
    LtcTable::from_data(image.height, image.width, image.pixels.clone())
}

/// Write the table as a 32-bit float OpenEXR image laid out like
/// `table_to_image()`.
///
/// * `path`  - Output file path.
/// * `table` - The table.
pub fn write_exr_table(path: &str, table: &LtcTable) -> Result<(), String> {
    if !path.ends_with(".exr") {
        return Err(format!("OpenEXR table path {path} must end in .exr"));
    }
    write_image(path, &table_to_image(table))
}

/// Read a table written by `write_exr_table()`.
///
/// * `path` - Input file path.
pub fn read_exr_table(path: &str) -> Result<LtcTable, String> {
    image_to_table(&read_exr(path)?)
}

/// Maps `t` in [0, 1] to the Turbo colour map using a polynomial fit.
///
/// * `t` - Normalized value.
pub fn turbo(t: Float) -> [Float; 3] {
    let t = clamp(t, 0.0, 1.0);
    let r = 0.13572138 + t * (4.61539260 + t * (-42.66032258 + t * (132.13108234 + t * (-152.94239396 + t * 59.28637943))));
    let g = 0.09140261 + t * (2.19418839 + t * (4.84296658 + t * (-14.18503333 + t * (4.27729857 + t * 2.82956604))));
    let b = 0.10667330 + t * (12.64194608 + t * (-60.58204836 + t * (110.36276771 + t * (-89.90310912 + t * 27.34824973))));
    [clamp(r, 0.0, 1.0), clamp(g, 0.0, 1.0), clamp(b, 0.0, 1.0)]
}

/// Returns heat maps of `a`, `b` and `r` side by side, each clamped to its
/// range in `HEATMAP_RANGES`. Within a panel the roughness varies along x and
/// the incident angle cosine along y (from the top); each entry covers
/// `scale` x `scale` pixels.
///
/// * `table` - The table.
/// * `scale` - Pixels per entry along each axis.
pub fn heatmap_image(table: &LtcTable, scale: usize) -> RGBImage {
    let scale = max(scale, 1);
    let panel_width = table.alpha_res() * scale;
    let width = PARAMS_PER_ENTRY * panel_width + (PARAMS_PER_ENTRY - 1) * PANEL_GAP;
    let height = table.mu_res() * scale;

    let mut pixels = vec![1.0; 3 * width * height];
    for (k, &(vmin, vmax)) in HEATMAP_RANGES.iter().enumerate() {
        let x0 = k * (panel_width + PANEL_GAP);
        for y in 0..height {
            for x in 0..panel_width {
                let p = table.get(y / scale, x / scale).to_array();
                let colour = turbo((p[k] - vmin) / (vmax - vmin));
                let offset = 3 * (y * width + x0 + x);
                pixels[offset..offset + 3].copy_from_slice(&colour);
            }
        }
    }

    RGBImage::new(pixels, width, height)
}

/// Write heat maps of the table in an 8-bit image format chosen by the file
/// extension.
///
/// * `path`  - Output file path.
/// * `table` - The table.
/// * `scale` - Pixels per entry along each axis.
pub fn write_heatmaps(path: &str, table: &LtcTable, scale: usize) -> Result<(), String> {
    write_image(path, &heatmap_image(table, scale))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::LtcParams;
    use float_cmp::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("sheen-ltc-export-{}-{name}", std::process::id()))
            .to_str()
            .unwrap()
            .to_string()
    }

    fn sample_table() -> LtcTable {
        let mut table = LtcTable::new(3, 2);
        table.set(0, 0, &LtcParams::new(0.25, -0.05, 0.5));
        table.set(2, 1, &LtcParams::new(1.0, -0.2, 0.8));
        table
    }

    #[test]
    fn image_layout_follows_table() {
        let image = table_to_image(&sample_table());
        assert_eq!((image.width, image.height), (2, 3));
        assert_eq!(image.get(0, 0), [0.25, -0.05, 0.5]);
        assert_eq!(image.get(1, 2), [1.0, -0.2, 0.8]);
        assert_eq!(image_to_table(&image).unwrap(), sample_table());
    }

    #[test]
    fn exr_round_trip() {
        let table = sample_table();
        let path = temp_path("table.exr");
        write_exr_table(&path, &table).unwrap();
        let read = read_exr_table(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(read.shape(), table.shape());
        for (a, b) in read.data().iter().zip(table.data().iter()) {
            assert!(approx_eq!(Float, *a, *b, epsilon = 1e-7));
        }
        assert!(write_exr_table("table.png", &table).is_err());
    }

    #[test]
    fn turbo_end_points() {
        // Blue at the low end, red at the high end.
        let lo = turbo(0.1);
        let hi = turbo(1.0);
        assert!(lo[2] > lo[0] && lo[2] > lo[1]);
        assert!(hi[0] > hi[1] && hi[0] > hi[2]);
        assert_eq!(turbo(-1.0), turbo(0.0));
        assert_eq!(turbo(2.0), hi);
    }

    #[test]
    fn heatmap_panels() {
        let table = sample_table();
        let image = heatmap_image(&table, 4);
        assert_eq!(image.width, 3 * 2 * 4 + 2 * PANEL_GAP);
        assert_eq!(image.height, 3 * 4);

        // Top left entry of the `a` panel and the gap after the panel.
        assert_eq!(image.get(3, 3), turbo(0.25));
        assert_eq!(image.get(2 * 4, 0), [1.0, 1.0, 1.0]);

        // Bottom right entry of the `r` panel sits at the top of its range.
        assert_eq!(image.get(image.width - 1, image.height - 1), turbo(1.0));
    }

    #[test]
    fn heatmap_png_dimensions() {
        let path = temp_path("heatmap.png");
        write_heatmaps(&path, &sample_table(), 2).unwrap();
        let png = ::image::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(png.width() as usize, 3 * 2 * 2 + 2 * PANEL_GAP);
        assert_eq!(png.height(), 6);
    }
}
