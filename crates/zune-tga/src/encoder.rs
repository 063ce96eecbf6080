/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Uncompressed 32 bit TGA encoder
use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteWriterTrait, ZWriter};
use zune_core::colorspace::ColorSpace;
use zune_core::log::trace;
use zune_core::options::EncoderOptions;

use crate::constants::{TGA_FLAG_TOP_TO_BOTTOM, TGA_HEADER_SIZE};
use crate::errors::TgaEncodeErrors;

/// A TGA encoder
///
/// Writes uncompressed true-color images with 32 bits per pixel,
/// no image id and no color map.
///
/// Input is expected to be 8 bit RGBA with the first pixel at the
/// top left, `width*height*4` bytes long.
pub struct TgaEncoder<'a> {
    data:                 &'a [u8],
    options:              EncoderOptions,
    preserve_orientation: bool
}

impl<'a> TgaEncoder<'a> {
    /// Create a new TGA encoder
    ///
    /// # Arguments
    /// - `data`: RGBA pixels to encode
    /// - `options`: Image width, height, colorspace and depth
    pub fn new(data: &'a [u8], options: EncoderOptions) -> TgaEncoder<'a> {
        TgaEncoder {
            data,
            options,
            preserve_orientation: false
        }
    }

    /// Write rows top to bottom and mark the file as such
    ///
    /// By default rows are written bottom to top, the layout
    /// most TGA readers assume.
    pub fn set_preserve_orientation(&mut self, yes: bool) {
        self.preserve_orientation = yes;
    }

    /// Return the exact size of the encoded file
    ///
    /// Or `None` if the width is zero or the size overflows
    ///
    /// # Panics
    /// If the width is non-zero but the height is zero,
    /// `EncoderOptions::height` asserts on it.
    pub fn max_size(&self) -> Option<usize> {
        if self.options.width() == 0 {
            return None;
        }
        self.options
            .width()
            .checked_mul(self.options.height())?
            .checked_mul(4)?
            .checked_add(TGA_HEADER_SIZE)
    }

    fn header(&self) -> [u8; TGA_HEADER_SIZE] {
        let mut header = [0; TGA_HEADER_SIZE];

        // uncompressed true-color
        header[2] = 2;
        header[12..14].copy_from_slice(&(self.options.width() as u16).to_le_bytes());
        header[14..16].copy_from_slice(&(self.options.height() as u16).to_le_bytes());
        header[16] = 32;

        if self.preserve_orientation {
            header[17] = TGA_FLAG_TOP_TO_BOTTOM;
        }
        header
    }

    /// Encode into a sink
    ///
    /// # Returns
    /// - Ok(usize): Number of bytes written
    /// - Err: The reason the pixels couldn't be encoded
    ///
    /// # Panics
    /// A zero width is reported as [`TgaEncodeErrors::ZeroDimension`], but with
    /// a non-zero width and a zero height `EncoderOptions::height` asserts
    /// before the height can be checked.
    ///
    /// # Example
    /// ```
    /// use zune_core::bit_depth::BitDepth;
    /// use zune_core::colorspace::ColorSpace;
    /// use zune_core::options::EncoderOptions;
    /// use zune_tga::TgaEncoder;
    ///
    /// let pixels = vec![255_u8; 4 * 4 * 4];
    /// let options = EncoderOptions::new(4, 4, ColorSpace::RGBA, BitDepth::Eight);
    /// let encoder = TgaEncoder::new(&pixels, options);
    ///
    /// let mut output: Vec<u8> = vec![];
    /// let size = encoder.encode(&mut output).unwrap();
    /// assert_eq!(size, 18 + 4 * 4 * 4);
    /// ```
    pub fn encode<T: ZByteWriterTrait>(&self, sink: T) -> Result<usize, TgaEncodeErrors> {
        if self.options.colorspace() != ColorSpace::RGBA {
            return Err(TgaEncodeErrors::UnsupportedColorspace(
                self.options.colorspace()
            ));
        }
        if self.options.depth() != BitDepth::Eight {
            return Err(TgaEncodeErrors::UnsupportedBitDepth(self.options.depth()));
        }
        let width = self.options.width();

        // check before reading the height, its accessor asserts on zero
        if width == 0 {
            return Err(TgaEncodeErrors::ZeroDimension("width"));
        }
        let height = self.options.height();

        if height == 0 {
            return Err(TgaEncodeErrors::ZeroDimension("height"));
        }
        if width > usize::from(u16::MAX) {
            return Err(TgaEncodeErrors::TooLargeDimensions(width));
        }
        if height > usize::from(u16::MAX) {
            return Err(TgaEncodeErrors::TooLargeDimensions(height));
        }
        let row_size = width * 4;
        let expected = row_size * height;

        if self.data.len() != expected {
            return Err(TgaEncodeErrors::InvalidDimensions(
                expected,
                self.data.len()
            ));
        }
        let mut stream = ZWriter::new(sink);

        stream.reserve(expected + TGA_HEADER_SIZE)?;
        stream.write_const_bytes(&self.header())?;

        let mut rows = self.data.chunks_exact(row_size);

        if self.preserve_orientation {
            rows.try_for_each(|row| write_row(&mut stream, row))?;
        } else {
            rows.rev().try_for_each(|row| write_row(&mut stream, row))?;
        }
        trace!("Encoded {}x{} image", width, height);

        Ok(stream.bytes_written())
    }
}

fn write_row<T: ZByteWriterTrait>(
    stream: &mut ZWriter<T>, row: &[u8]
) -> Result<(), TgaEncodeErrors> {
    for pix in row.chunks_exact(4) {
        stream.write_const_bytes(&[pix[2], pix[1], pix[0], pix[3]])?;
    }
    Ok(())
}
