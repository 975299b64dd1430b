//! Page image loading and colour normalization
//!
//! PDF image XObjects carry no alpha channel, so every decoded page is
//! reduced to 8-bit gray or 8-bit RGB before assembly.

use std::path::PathBuf;
use image::{ColorType, DynamicImage};
use tracing::{info, warn};
use crate::collect::PageFile;
use crate::error::{Error, Result};

/// Sample layout of a loaded page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageColor {
    /// One 8-bit sample per pixel
    Gray,
    /// Three 8-bit samples per pixel
    Rgb,
}

impl PageColor {
    /// Samples per pixel
    pub fn components(self) -> usize {
        match self {
            PageColor::Gray => 1,
            PageColor::Rgb => 3,
        }
    }

    /// PDF colour space name
    pub fn color_space(self) -> &'static str {
        match self {
            PageColor::Gray => "DeviceGray",
            PageColor::Rgb => "DeviceRGB",
        }
    }
}

/// A decoded page ready to be embedded
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub page_number: u32,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub color: PageColor,
    /// Row-major samples, `width * height * color.components()` bytes
    pub pixels: Vec<u8>,
}

impl LoadedPage {
    /// Build a page from an already decoded image
    pub fn from_image(page_number: u32, path: PathBuf, image: DynamicImage) -> Self {
        let width = image.width();
        let height = image.height();

        let (color, pixels) = match image.color() {
            ColorType::L8 => (PageColor::Gray, image.into_luma8().into_raw()),
            // Alpha is dropped, not composited
            ColorType::La8 | ColorType::La16 | ColorType::L16 => {
                (PageColor::Gray, image.into_luma8().into_raw())
            }
            _ => (PageColor::Rgb, image.into_rgb8().into_raw()),
        };

        Self { page_number, path, width, height, color, pixels }
    }
}

/// Outcome of loading a batch of pages
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Successfully decoded pages, in input order
    pub pages: Vec<LoadedPage>,
    /// Pages that failed to decode, with the reason
    pub failures: Vec<(PathBuf, Error)>,
}

/// Open a single page image
pub fn load_page(page: &PageFile) -> Result<LoadedPage> {
    let image = image::open(&page.path).map_err(|source| Error::ImageLoad {
        path: page.path.clone(),
        source,
    })?;

    Ok(LoadedPage::from_image(page.page_number, page.path.clone(), image))
}

/// Load every page, skipping the ones that fail
///
/// Returns `NoUsableImages` only when nothing could be loaded.
pub fn load_pages(pages: &[PageFile]) -> Result<LoadOutcome> {
    let total = pages.len();
    let mut outcome = LoadOutcome::default();

    for (idx, page) in pages.iter().enumerate() {
        match load_page(page) {
            Ok(loaded) => {
                info!("[{}/{}] loaded {}", idx + 1, total, page.path.display());
                outcome.pages.push(loaded);
            }
            Err(e) => {
                warn!("{}", e);
                outcome.failures.push((page.path.clone(), e));
            }
        }
    }

    if outcome.pages.is_empty() {
        return Err(Error::NoUsableImages(total));
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, LumaA, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_rgba_drops_alpha() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([10, 20, 30, 0]));
        img.put_pixel(1, 0, Rgba([40, 50, 60, 255]));

        let page = LoadedPage::from_image(1, PathBuf::from("p"), DynamicImage::ImageRgba8(img));
        assert_eq!(page.color, PageColor::Rgb);
        assert_eq!(page.pixels, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_gray_alpha_becomes_gray() {
        let mut img = GrayAlphaImage::new(1, 2);
        img.put_pixel(0, 0, LumaA([7, 0]));
        img.put_pixel(0, 1, LumaA([9, 128]));

        let page = LoadedPage::from_image(1, PathBuf::from("p"), DynamicImage::ImageLumaA8(img));
        assert_eq!(page.color, PageColor::Gray);
        assert_eq!(page.pixels, vec![7, 9]);
        assert_eq!((page.width, page.height), (1, 2));
    }

    #[test]
    fn test_gray_and_rgb_pass_through() {
        let gray = GrayImage::from_pixel(3, 2, Luma([200]));
        let page = LoadedPage::from_image(1, PathBuf::from("g"), DynamicImage::ImageLuma8(gray));
        assert_eq!(page.color, PageColor::Gray);
        assert_eq!(page.pixels.len(), 6);

        let rgb = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
        let page = LoadedPage::from_image(1, PathBuf::from("c"), DynamicImage::ImageRgb8(rgb));
        assert_eq!(page.color, PageColor::Rgb);
        assert_eq!(page.pixels.len(), 18);
        assert_eq!(&page.pixels[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_load_pages_all_missing() {
        let pages = vec![
            PageFile { page_number: 1, path: PathBuf::from("missing_page1.webp") },
            PageFile { page_number: 2, path: PathBuf::from("missing_page2.webp") },
        ];

        let result = load_pages(&pages);
        assert!(matches!(result, Err(Error::NoUsableImages(2))));
    }
}
