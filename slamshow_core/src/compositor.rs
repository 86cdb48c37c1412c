//! Grayscale map to color raster expansion.

use crate::error::ShowError;

/// A square 3-channel raster, bytes interleaved per pixel.
///
/// Produced from a grayscale map by replicating each cell into all three
/// channels. Overlays are drawn on top by the raster surface, never merged
/// into this buffer, so a composite always starts from a clean map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRaster {
    size: usize,
    bytes: Vec<u8>,
}

impl ColorRaster {
    /// An all-black raster of `size × size` pixels.
    pub fn blank(size: usize) -> Self {
        Self {
            size,
            bytes: vec![0; 3 * size * size],
        }
    }

    /// Builds a raster directly from grayscale map bytes.
    pub fn from_grayscale(size: usize, map_bytes: &[u8]) -> Result<Self, ShowError> {
        let mut raster = Self::blank(size);
        raster.composite(map_bytes)?;
        Ok(raster)
    }

    /// Replaces the raster contents with the expanded grayscale map.
    ///
    /// Fails without touching the raster if `map_bytes` is not `size²` long.
    pub fn composite(&mut self, map_bytes: &[u8]) -> Result<(), ShowError> {
        let expected = self.size * self.size;
        if map_bytes.len() != expected {
            return Err(ShowError::MapSizeMismatch {
                expected,
                actual: map_bytes.len(),
            });
        }

        for (pixel, &gray) in self.bytes.chunks_exact_mut(3).zip(map_bytes) {
            pixel.fill(gray);
        }
        Ok(())
    }

    /// Side length in pixels.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Bytes per row.
    pub fn row_stride(&self) -> usize {
        3 * self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The three channel values at `(x, y)`, if inside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let i = 3 * (y * self.size + x);
        Some([self.bytes[i], self.bytes[i + 1], self.bytes[i + 2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_interleaves() {
        let raster = ColorRaster::from_grayscale(2, &[10, 20, 30, 40]).unwrap();
        assert_eq!(
            raster.as_bytes(),
            &[10, 10, 10, 20, 20, 20, 30, 30, 30, 40, 40, 40]
        );
        assert_eq!(raster.row_stride(), 6);
        assert_eq!(raster.pixel(1, 1), Some([40, 40, 40]));
        assert_eq!(raster.pixel(2, 0), None);
    }

    #[test]
    fn test_composite_replaces_previous_contents() {
        let mut raster = ColorRaster::from_grayscale(2, &[255; 4]).unwrap();
        raster.composite(&[0, 1, 2, 3]).unwrap();
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(raster.pixel(1, 1), Some([3, 3, 3]));
    }

    #[test]
    fn test_wrong_length_fails_and_keeps_raster() {
        let mut raster = ColorRaster::from_grayscale(2, &[7; 4]).unwrap();
        let err = raster.composite(&[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            ShowError::MapSizeMismatch { expected: 4, actual: 3 }
        ));
        assert!(raster.as_bytes().iter().all(|&b| b == 7));

        assert!(raster.composite(&[0; 5]).is_err());
    }

    #[test]
    fn test_blank_raster() {
        let raster = ColorRaster::blank(3);
        assert_eq!(raster.as_bytes().len(), 27);
        assert!(raster.as_bytes().iter().all(|&b| b == 0));
    }
}
