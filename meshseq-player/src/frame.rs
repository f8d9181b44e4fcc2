//! Captured RGB frames

use meshseq_core::{Error, Result};

/// A tightly packed 8-bit RGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(Error::InvalidData(format!(
                "frame of {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                rgb.len()
            )));
        }
        Ok(Self { width, height, rgb })
    }

    /// Uniformly colored frame
    pub fn filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let rgb = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self { width, height, rgb }
    }

    /// Build a frame from four-channel rows, dropping alpha and any row padding.
    ///
    /// `bgra` selects BGRA input, otherwise RGBA is assumed.
    pub fn from_padded_rows(width: u32, height: u32, padded_row_bytes: usize, data: &[u8], bgra: bool) -> Result<Self> {
        let row_bytes = width as usize * 4;
        if padded_row_bytes < row_bytes || data.len() < padded_row_bytes * height as usize {
            return Err(Error::InvalidData(format!(
                "captured buffer of {} bytes is too small for {}x{}",
                data.len(),
                width,
                height
            )));
        }

        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for row in data.chunks_exact(padded_row_bytes).take(height as usize) {
            for px in row[..row_bytes].chunks_exact(4) {
                if bgra {
                    rgb.extend_from_slice(&[px[2], px[1], px[0]]);
                } else {
                    rgb.extend_from_slice(&px[..3]);
                }
            }
        }
        Ok(Self { width, height, rgb })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(Frame::new(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(Frame::new(2, 2, vec![0; 11]), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_bgra_rows_with_padding() {
        // 2x2 image, rows padded to 12 bytes
        let data = [
            1, 2, 3, 255, 4, 5, 6, 255, 0, 0, 0, 0, //
            7, 8, 9, 255, 10, 11, 12, 255, 0, 0, 0, 0,
        ];
        let frame = Frame::from_padded_rows(2, 2, 12, &data, true).unwrap();
        assert_eq!(frame.rgb, vec![3, 2, 1, 6, 5, 4, 9, 8, 7, 12, 11, 10]);

        let frame = Frame::from_padded_rows(2, 2, 12, &data, false).unwrap();
        assert_eq!(frame.pixel(1, 1), Some([10, 11, 12]));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        assert!(Frame::from_padded_rows(2, 2, 8, &[0; 12], false).is_err());
    }

    #[test]
    fn test_filled() {
        let frame = Frame::filled(3, 1, [9, 8, 7]);
        assert_eq!(frame.rgb, vec![9, 8, 7, 9, 8, 7, 9, 8, 7]);
    }
}
