/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Conversion of stored TGA samples to RGBA
use alloc::vec::Vec;

use zune_core::bytestream::{ZByteReaderTrait, ZReader};

use crate::errors::TgaDecodeErrors;

/// Layout of a single stored color sample
///
/// Resolved once per image, the pixel loop only matches on it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum PixelFormat {
    /// One gray byte
    Gray8,
    /// Gray byte followed by an alpha byte
    GrayAlpha16 { alpha: bool },
    /// Packed 5-5-5 with the top bit as alpha
    Rgb555 { alpha: bool },
    Bgr24,
    Bgra32 { alpha: bool },
    /// Stored in a number of bytes we can't interpret
    Unsupported(usize)
}

impl PixelFormat {
    pub fn new(bytes_per_pixel: usize, is_gray: bool, has_alpha: bool) -> PixelFormat {
        match bytes_per_pixel {
            1 => PixelFormat::Gray8,
            2 if is_gray => PixelFormat::GrayAlpha16 { alpha: has_alpha },
            2 => PixelFormat::Rgb555 { alpha: has_alpha },
            3 => PixelFormat::Bgr24,
            4 => PixelFormat::Bgra32 { alpha: has_alpha },
            width => PixelFormat::Unsupported(width)
        }
    }

    pub const fn sample_size(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::GrayAlpha16 { .. } | PixelFormat::Rgb555 { .. } => 2,
            PixelFormat::Bgr24 => 3,
            PixelFormat::Bgra32 { .. } => 4,
            PixelFormat::Unsupported(width) => width
        }
    }

    /// Convert a stored sample into RGBA
    ///
    /// `sample` must be `sample_size()` bytes long.
    /// Unsupported layouts produce a zeroed pixel.
    #[inline(always)]
    pub fn to_rgba(self, sample: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::Gray8 => [sample[0], sample[0], sample[0], 255],
            PixelFormat::GrayAlpha16 { alpha } => {
                let a = if alpha { sample[1] } else { 255 };
                [sample[0], sample[0], sample[0], a]
            }
            PixelFormat::Rgb555 { alpha } => {
                let (lo, hi) = (sample[0], sample[1]);

                let r = (hi & 0x7C) << 1;
                let g = ((hi & 0x03) << 6) | ((lo & 0xE0) >> 2);
                let b = (lo & 0x1F) << 3;
                // the alpha bit is kept in place, giving 0 or 128
                let a = if alpha { hi & 0x80 } else { 255 };

                [r, g, b, a]
            }
            PixelFormat::Bgr24 => [sample[2], sample[1], sample[0], 255],
            PixelFormat::Bgra32 { alpha } => {
                let a = if alpha { sample[3] } else { 255 };
                [sample[2], sample[1], sample[0], a]
            }
            PixelFormat::Unsupported(_) => [0; 4]
        }
    }
}

/// Where the color of a pixel comes from
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum PixelSource {
    /// The sample is the color
    Direct(PixelFormat),
    /// The sample is a little endian index into the color map
    ColorMapped { index_size: usize }
}

impl PixelSource {
    pub const fn sample_size(self) -> usize {
        match self {
            PixelSource::Direct(format) => format.sample_size(),
            PixelSource::ColorMapped { index_size } => index_size
        }
    }

    #[inline(always)]
    pub fn to_rgba(self, sample: &[u8], color_map: &ColorMap) -> Result<[u8; 4], TgaDecodeErrors> {
        match self {
            PixelSource::Direct(format) => Ok(format.to_rgba(sample)),
            PixelSource::ColorMapped { .. } => color_map.lookup(sample)
        }
    }
}

/// An expanded color map, one RGBA entry per palette index
#[derive(Clone, Debug, Default)]
pub(crate) struct ColorMap {
    entries: Vec<[u8; 4]>
}

impl ColorMap {
    /// Read `length` entries stored in `format` from the stream
    pub fn read<T: ZByteReaderTrait>(
        stream: &mut ZReader<T>, length: usize, format: PixelFormat
    ) -> Result<ColorMap, TgaDecodeErrors> {
        let mut entries = Vec::with_capacity(length);
        // color map depth is a byte, so entries never exceed 32 bytes
        let mut sample = [0_u8; 32];
        let size = format.sample_size();

        for i in 0..length {
            stream
                .read_exact_bytes(&mut sample[..size])
                .map_err(|_| TgaDecodeErrors::TruncatedData(length, i))?;
            entries.push(format.to_rgba(&sample[..size]));
        }
        Ok(ColorMap { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn lookup(&self, sample: &[u8]) -> Result<[u8; 4], TgaDecodeErrors> {
        let index = sample
            .iter()
            .rev()
            .fold(0_usize, |acc, byte| (acc << 8) | usize::from(*byte));

        self.entries
            .get(index)
            .copied()
            .ok_or(TgaDecodeErrors::IndexOutOfRange(index, self.entries.len()))
    }
}

#[cfg(test)]
mod tests {
    use zune_core::bytestream::{ZCursor, ZReader};

    use crate::color::{ColorMap, PixelFormat, PixelSource};
    use crate::TgaDecodeErrors;

    #[test]
    fn test_gray8() {
        let format = PixelFormat::new(1, true, true);
        assert_eq!(format.to_rgba(&[77]), [77, 77, 77, 255]);
    }

    #[test]
    fn test_gray_alpha16() {
        let format = PixelFormat::new(2, true, true);
        assert_eq!(format.to_rgba(&[10, 20]), [10, 10, 10, 20]);

        let format = PixelFormat::new(2, true, false);
        assert_eq!(format.to_rgba(&[10, 20]), [10, 10, 10, 255]);
    }

    #[test]
    fn test_rgb555_alpha_bit() {
        let format = PixelFormat::new(2, false, true);
        assert_eq!(format.to_rgba(&[0x00, 0x80]), [0, 0, 0, 128]);
        assert_eq!(format.to_rgba(&[0xFF, 0xFF]), [248, 248, 248, 128]);
    }

    #[test]
    fn test_rgb555_channels() {
        let format = PixelFormat::new(2, false, false);
        // red
        assert_eq!(format.to_rgba(&[0x00, 0x7C]), [248, 0, 0, 255]);
        // green
        assert_eq!(format.to_rgba(&[0xE0, 0x03]), [0, 248, 0, 255]);
        // blue
        assert_eq!(format.to_rgba(&[0x1F, 0x00]), [0, 0, 248, 255]);
    }

    #[test]
    fn test_bgr_order() {
        let format = PixelFormat::new(3, false, true);
        assert_eq!(format.to_rgba(&[1, 2, 3]), [3, 2, 1, 255]);

        let format = PixelFormat::new(4, false, true);
        assert_eq!(format.to_rgba(&[1, 2, 3, 4]), [3, 2, 1, 4]);

        let format = PixelFormat::new(4, false, false);
        assert_eq!(format.to_rgba(&[1, 2, 3, 4]), [3, 2, 1, 255]);
    }

    #[test]
    fn test_unsupported_width() {
        let format = PixelFormat::new(5, false, false);
        assert_eq!(format, PixelFormat::Unsupported(5));
        assert_eq!(format.sample_size(), 5);
    }

    #[test]
    fn test_color_map_lookup() {
        let data: [u8; 6] = [0, 0, 255, 0, 255, 0];
        let mut stream = ZReader::new(ZCursor::new(&data));
        let map = ColorMap::read(&mut stream, 2, PixelFormat::Bgr24).unwrap();
        assert_eq!(map.len(), 2);

        let source = PixelSource::ColorMapped { index_size: 1 };
        assert_eq!(source.to_rgba(&[1], &map).unwrap(), [0, 255, 0, 255]);
        assert_eq!(source.to_rgba(&[0], &map).unwrap(), [255, 0, 0, 255]);

        // 16 bit indices are little endian
        let source = PixelSource::ColorMapped { index_size: 2 };
        assert_eq!(source.to_rgba(&[1, 0], &map).unwrap(), [0, 255, 0, 255]);
        assert!(matches!(
            source.to_rgba(&[0, 1], &map),
            Err(TgaDecodeErrors::IndexOutOfRange(256, 2))
        ));
    }

    #[test]
    fn test_short_color_map() {
        let data: [u8; 4] = [0, 0, 255, 0];
        let mut stream = ZReader::new(ZCursor::new(&data));
        assert!(matches!(
            ColorMap::read(&mut stream, 2, PixelFormat::Bgr24),
            Err(TgaDecodeErrors::TruncatedData(2, 1))
        ));
    }
}
