//! Row-major RGBA pixel grids handed to the encoder.

use image::RgbaImage;

use crate::error::{HmicError, Result};
use crate::types::Colour;

/// One frame of pixels, row-major, `width * height` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Colour>,
}

impl PixelGrid {
    /// Build a grid, checking that `pixels` holds exactly `width * height`
    /// entries and that neither dimension is zero.
    pub fn new(width: u32, height: u32, pixels: Vec<Colour>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(HmicError::Encode {
                message: format!("Pixel grid {}x{} has no pixels", width, height),
                help: None,
            });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(HmicError::Encode {
                message: format!(
                    "Pixel grid {}x{} needs {} pixels, got {}",
                    width,
                    height,
                    expected,
                    pixels.len()
                ),
                help: None,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A grid filled with one colour.
    pub fn filled(width: u32, height: u32, colour: Colour) -> Result<Self> {
        Self::new(width, height, vec![colour; width as usize * height as usize])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Zero-based lookup.
    pub fn get(&self, x: u32, y: u32) -> Option<Colour> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Colour]> {
        self.pixels.chunks(self.width as usize)
    }
}

impl TryFrom<&RgbaImage> for PixelGrid {
    type Error = HmicError;

    fn try_from(img: &RgbaImage) -> Result<Self> {
        let pixels = img.pixels().map(|p| Colour::from(p.0)).collect();
        Self::new(img.width(), img.height(), pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_new_checks_length() {
        assert!(PixelGrid::new(2, 2, vec![Colour::BLACK; 4]).is_ok());
        assert!(matches!(
            PixelGrid::new(2, 2, vec![Colour::BLACK; 3]),
            Err(HmicError::Encode { .. })
        ));
        assert!(PixelGrid::new(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_get_and_rows() {
        let grid = PixelGrid::new(
            2,
            2,
            vec![Colour::BLACK, Colour::WHITE, Colour::MAGENTA, Colour::TRANSPARENT],
        )
        .unwrap();

        assert_eq!(grid.get(1, 0), Some(Colour::WHITE));
        assert_eq!(grid.get(0, 1), Some(Colour::MAGENTA));
        assert_eq!(grid.get(2, 0), None);
        let rows: Vec<&[Colour]> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[Colour::MAGENTA, Colour::TRANSPARENT]);
    }

    #[test]
    fn test_from_image() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(2, 0, Rgba([1, 2, 3, 4]));

        let grid = PixelGrid::try_from(&img).unwrap();
        assert_eq!(grid.size(), (3, 1));
        assert_eq!(grid.get(0, 0), Some(Colour::TRANSPARENT));
        assert_eq!(grid.get(2, 0), Some(Colour::new(1, 2, 3, 4)));
    }
}
