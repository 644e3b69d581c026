//! Image I/O

use crate::pbrt::*;
use exr::prelude as exrs;
use exr::prelude::*;
use image::*;
use regex::Regex;
use std::result::Result;
use std::sync::OnceLock;

/// Stores RGB image data as interleaved floating point triples, scanline by
/// scanline from the top.
#[derive(Clone, Debug, PartialEq)]
pub struct RGBImage {
    /// The pixels (3 values per pixel).
    pub pixels: Vec<Float>,

    /// Width in pixels.
    pub width: usize,

    /// Height in pixels.
    pub height: usize,
}

impl RGBImage {
    /// Creates a new `RGBImage` from pixel data.
    ///
    /// * `pixels` - Interleaved RGB pixel data.
    /// * `width`  - Width of image.
    /// * `height` - Height of image.
    pub fn new(pixels: Vec<Float>, width: usize, height: usize) -> Self {
        assert_eq!(3 * width * height, pixels.len());
        Self { pixels, width, height }
    }

    /// Returns the RGB triple at the given pixel.
    ///
    /// * `x` - Column.
    /// * `y` - Row from the top.
    pub fn get(&self, x: usize, y: usize) -> [Float; 3] {
        let offset = 3 * (y * self.width + x);
        [self.pixels[offset], self.pixels[offset + 1], self.pixels[offset + 2]]
    }
}

/// Read a single layer OpenEXR file.
///
/// * `path` - Input file path.
pub fn read_exr(path: &str) -> Result<RGBImage, String> {
    let reader = exrs::read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _channels| {
                let width = resolution.width();
                let height = resolution.height();
                RGBImage {
                    pixels: vec![0.0; 3 * width * height],
                    width,
                    height,
                }
            },
            |img, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                let offset = 3 * (position.y() * img.width + position.x());
                img.pixels[offset] = r as Float;
                img.pixels[offset + 1] = g as Float;
                img.pixels[offset + 2] = b as Float;
            },
        )
        .first_valid_layer()
        .all_attributes();

    match reader.from_file(path) {
        Ok(image) => {
            let pixels = image.layer_data.channel_data.pixels;
            info!("Read EXR image {path} ({} x {})", pixels.width, pixels.height);
            Ok(pixels)
        }
        Err(err) => Err(err.to_string()),
    }
}

/// Write an image to given path. The format is chosen by the file extension.
/// OpenEXR stores the values as 32-bit floats; 8-bit formats clamp the values
/// to [0, 1] without gamma correction, so they expect display ready colours.
///
/// * `path`  - Output file path.
/// * `image` - The image.
pub fn write_image(path: &str, image: &RGBImage) -> Result<(), String> {
    match get_extension_from_filename(path) {
        Some(".exr") => write_exr(path, image),
        Some(".png") => write_8_bit(path, image, ImageFormat::Png),
        Some(".tga") => write_8_bit(path, image, ImageFormat::Tga),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Returns regular expression for extracting the file extension. This will match the last occurrence of a period
/// followed by no periods or slashes.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").expect("valid file extension regex"))
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext()
        .captures(path)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
}

/// Writes the image in OpenEXR format with R, G, B channels of 32-bit floats.
///
/// * `path`  - Output file path.
/// * `image` - The image.
fn write_exr(path: &str, image: &RGBImage) -> Result<(), String> {
    info!("Writing image {} with resolution {}x{}", path, image.width, image.height);

    let size = Vec2(image.width, image.height);
    let rgb = &image.pixels;
    let width = image.width;

    let layer = Layer::new(
        size,
        LayerAttributes::named("ltc"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let offset = 3 * (pos.1 * width + pos.0);
            (rgb[offset] as f32, rgb[offset + 1] as f32, rgb[offset + 2] as f32)
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    match Image::empty(attributes).with_layer(layer).write().to_file(path) {
        Ok(()) => Ok(()),
        Err(err) => Err(format!("Error saving output image {path}: {err}")),
    }
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `image`        - The image.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, image: &RGBImage, image_format: ImageFormat) -> Result<(), String> {
    info!("Writing image {path} with resolution {}x{}", image.width, image.height);

    // Allocate an image buffer.
    let mut imgbuf = ImageBuffer::new(image.width as u32, image.height as u32);
    for y in 0..image.height {
        for x in 0..image.width {
            let [r, g, b] = image.get(x, y);
            imgbuf.put_pixel(x as u32, y as u32, Rgb([clamp_byte(r), clamp_byte(g), clamp_byte(b)]));
        }
    }

    // Write the output file.
    match imgbuf.save_with_format(String::from(path), image_format) {
        Ok(()) => Ok(()),
        Err(err) => Err(format!("Error saving output image {path}: {err}.")),
    }
}

/// Clamp floating point value to 8-bit range [0, 255].
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * v + 0.5, 0.0, 255.0) as u8
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("sheen-ltc-image-io-{}-{name}", std::process::id()))
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn extension_is_detected() {
        assert_eq!(get_extension_from_filename("a/b/table.exr"), Some(".exr"));
        assert_eq!(get_extension_from_filename("table.v2.png"), Some(".png"));
        assert_eq!(get_extension_from_filename("data/table"), None);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let image = RGBImage::new(vec![0.0; 3], 1, 1);
        assert!(write_image("table.bmpx", &image).is_err());
        assert!(write_image("table", &image).is_err());
    }

    #[test]
    fn clamp_byte_saturates() {
        assert_eq!(clamp_byte(-1.0), 0);
        assert_eq!(clamp_byte(0.0), 0);
        assert_eq!(clamp_byte(1.0), 255);
        assert_eq!(clamp_byte(2.0), 255);
    }

    #[test]
    fn exr_round_trip() {
        let (width, height) = (4, 3);
        let pixels: Vec<Float> = (0..3 * width * height).map(|i| i as Float * 0.125 - 1.0).collect();
        let image = RGBImage::new(pixels, width, height);

        let path = temp_path("round-trip.exr");
        write_image(&path, &image).unwrap();
        let read = read_exr(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(read.width, width);
        assert_eq!(read.height, height);
        for (a, b) in read.pixels.iter().zip(image.pixels.iter()) {
            assert!(approx_eq!(Float, *a, *b, epsilon = 1e-6));
        }
    }

    #[test]
    fn png_has_requested_dimensions() {
        let image = RGBImage::new(vec![0.5; 3 * 5 * 2], 5, 2);
        let path = temp_path("dims.png");
        write_image(&path, &image).unwrap();
        let png = image::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(png.width(), 5);
        assert_eq!(png.height(), 2);
        assert_eq!(png.into_rgb8().get_pixel(0, 0)[0], 128);
    }
}
