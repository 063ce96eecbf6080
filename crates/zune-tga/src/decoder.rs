/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec;
use alloc::vec::Vec;

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::{ZByteIoError, ZByteReaderTrait, ZReader, ZSeekFrom};
use zune_core::colorspace::ColorSpace;
use zune_core::log::{error, trace, warn};
use zune_core::options::DecoderOptions;

use crate::color::{ColorMap, PixelFormat, PixelSource};
use crate::constants::{
    TGA_EXTENSION_SIZE, TGA_FOOTER_SIZE, TGA_HEADER_SIZE, TGA_RLE_RUN_PACKET
};
use crate::errors::TgaDecodeErrors;
use crate::extension::{TgaExtension, TgaFooter};
use crate::header::TgaHeader;

/// Probe some bytes to see
/// if they consist of a TGA image
///
/// TGA has no magic bytes, so this accepts either a TGA 2.0
/// footer or a header whose fields are all in range.
pub fn probe_tga(bytes: &[u8]) -> bool {
    if let Some(start) = bytes.len().checked_sub(TGA_FOOTER_SIZE) {
        let mut footer = [0; TGA_FOOTER_SIZE];
        footer.copy_from_slice(&bytes[start..]);

        if TgaFooter::from_bytes(&footer).is_some() {
            return true;
        }
    }
    if let Some(header_bytes) = bytes.get(..TGA_HEADER_SIZE) {
        let mut fixed = [0; TGA_HEADER_SIZE];
        fixed.copy_from_slice(header_bytes);

        let header = TgaHeader::from_bytes(&fixed);

        return header.validate().is_ok()
            && header.width > 0
            && header.height > 0
            && (header.color_map_type == 1 || !header.is_color_mapped());
    }
    false
}

/// Maps the n-th decoded pixel to its position in the
/// top-left origin output
#[derive(Copy, Clone, Debug)]
struct PixelPlacement {
    width:  usize,
    height: usize,
    flip_x: bool,
    flip_y: bool
}

impl PixelPlacement {
    #[inline(always)]
    fn offset(&self, index: usize) -> usize {
        let mut x = index % self.width;
        let mut y = index / self.width;

        if self.flip_x {
            x = self.width - 1 - x;
        }
        if self.flip_y {
            y = self.height - 1 - y;
        }
        (y * self.width + x) * 4
    }

    #[inline(always)]
    fn put(&self, pixels: &mut [u8], index: usize, color: [u8; 4]) {
        let offset = self.offset(index);
        pixels[offset..offset + 4].copy_from_slice(&color);
    }
}

/// Set every alpha sample to 255 if all of them are zero
///
/// Some writers declare an alpha channel but never fill it in,
/// such images would otherwise be completely transparent.
///
/// Returns true if the buffer was modified
pub(crate) fn repair_alpha(pixels: &mut [u8]) -> bool {
    if pixels.is_empty() || pixels.chunks_exact(4).any(|pix| pix[3] != 0) {
        return false;
    }
    pixels
        .chunks_exact_mut(4)
        .for_each(|pix| pix[3] = 255);
    true
}

/// A TGA decoder
///
/// The decoder is initialized by calling `new`
/// and either of [`decode_headers`] to decode headers
/// or [`decode`] to return uncompressed pixels
///
/// Decoded pixels are always 8 bit RGBA with the first pixel
/// at the top left, whatever the layout of the file.
///
/// # Example
/// ```
/// use zune_core::bytestream::ZCursor;
/// use zune_tga::TgaDecoder;
///
/// // a 1x1 uncompressed 24 bit image holding one blue pixel
/// let mut data = vec![0_u8; 18];
/// data[2] = 2;
/// data[12] = 1;
/// data[14] = 1;
/// data[16] = 24;
/// data.extend_from_slice(&[255, 0, 0]);
///
/// let mut decoder = TgaDecoder::new(ZCursor::new(&data));
/// let pixels = decoder.decode().unwrap();
///
/// assert_eq!(decoder.dimensions(), Some((1, 1)));
/// assert_eq!(pixels, [0, 0, 255, 255]);
/// ```
///
/// [`decode_headers`]:TgaDecoder::decode_headers
/// [`decode`]:TgaDecoder::decode
pub struct TgaDecoder<T>
where
    T: ZByteReaderTrait
{
    stream:          ZReader<T>,
    options:         DecoderOptions,
    header:          TgaHeader,
    footer:          Option<TgaFooter>,
    extension:       Option<TgaExtension>,
    width:           usize,
    height:          usize,
    has_alpha:       bool,
    repair_alpha:    bool,
    read_header:     bool,
    decoded_headers: bool
}

impl<T> TgaDecoder<T>
where
    T: ZByteReaderTrait
{
    /// Create a new TGA decoder with the default options
    ///
    /// # Arguments
    /// - `data`: The encoded TGA file
    pub fn new(data: T) -> TgaDecoder<T> {
        TgaDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder that obeys specified restrictions
    ///
    /// The decoder respects `max_width`, `max_height` and `strict_mode`
    ///
    /// # Arguments
    /// - `data`: The encoded TGA file
    /// - `options`: Decoder options that the decoder should respect
    pub fn new_with_options(data: T, options: DecoderOptions) -> TgaDecoder<T> {
        TgaDecoder {
            stream: ZReader::new(data),
            options,
            header: TgaHeader::default(),
            footer: None,
            extension: None,
            width: 0,
            height: 0,
            has_alpha: false,
            repair_alpha: true,
            read_header: false,
            decoded_headers: false
        }
    }

    /// Set whether images with an all zero alpha channel
    /// are made fully opaque after decoding
    ///
    /// Default is true
    pub fn set_repair_alpha(&mut self, yes: bool) {
        self.repair_alpha = yes;
    }

    fn read_header(&mut self) -> Result<(), TgaDecodeErrors> {
        let fixed = self
            .stream
            .read_fixed_bytes_or_error::<TGA_HEADER_SIZE>()
            .map_err(|_| TgaDecodeErrors::MalformedHeader(TGA_HEADER_SIZE))?;

        let mut header = TgaHeader::from_bytes(&fixed);

        let header_size = TGA_HEADER_SIZE + usize::from(header.id_length);
        let mut image_id = vec![0; usize::from(header.id_length)];

        self.stream
            .read_exact_bytes(&mut image_id)
            .map_err(|_| TgaDecodeErrors::MalformedHeader(header_size))?;

        header.image_id = image_id;

        trace!("Image type: {}", header.image_type);
        trace!("Image width: {}", header.width);
        trace!("Image height: {}", header.height);
        trace!("Bits per pixel: {}", header.bits_per_pixel);
        trace!("Image descriptor: {:#04x}", header.flags);
        trace!("Image id: {:?}", header.image_id_string());

        self.header = header;
        self.read_header = true;

        Ok(())
    }

    /// Decode a TGA header storing needed information into
    /// the decoder instance
    ///
    /// This also consults the TGA 2.0 footer and extension area
    /// if the file has them.
    ///
    /// If the image can't be decoded, the header is still
    /// accessible via [`header`](Self::header)
    pub fn decode_headers(&mut self) -> Result<(), TgaDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        if !self.read_header {
            self.read_header()?;
        }
        let image_type = self.header.validate()?;

        let width = usize::from(self.header.width);
        let height = usize::from(self.header.height);

        if width > self.options.max_width() {
            return Err(TgaDecodeErrors::TooLargeDimensions(
                "width",
                self.options.max_width(),
                width
            ));
        }
        if height > self.options.max_height() {
            return Err(TgaDecodeErrors::TooLargeDimensions(
                "height",
                self.options.max_height(),
                height
            ));
        }
        self.width = width;
        self.height = height;
        self.has_alpha = self.header.has_alpha();

        trace!(
            "Image kind: {:?}, flip x: {}, flip y: {}",
            image_type,
            self.header.is_flip_x(),
            self.header.is_flip_y()
        );

        self.read_extension_area();

        // go back to the color map, it follows the image id
        let data_start = TGA_HEADER_SIZE + usize::from(self.header.id_length);
        self.stream.set_position(data_start)?;

        trace!("Image has alpha: {}", self.has_alpha);

        self.decoded_headers = true;

        Ok(())
    }

    fn read_footer(&mut self) -> Result<Option<TgaFooter>, ZByteIoError> {
        let length = self.stream.seek(ZSeekFrom::End(0))?;

        if length < TGA_FOOTER_SIZE as u64 {
            return Ok(None);
        }
        self.stream
            .set_position((length - TGA_FOOTER_SIZE as u64) as usize)?;

        let bytes = self.stream.read_fixed_bytes_or_error::<TGA_FOOTER_SIZE>()?;

        Ok(TgaFooter::from_bytes(&bytes))
    }

    fn read_extension(&mut self, offset: u32) -> Result<TgaExtension, ZByteIoError> {
        self.stream.set_position(offset as usize)?;

        let bytes = self
            .stream
            .read_fixed_bytes_or_error::<TGA_EXTENSION_SIZE>()?;

        Ok(TgaExtension::from_bytes(&bytes))
    }

    /// Read the optional footer and extension area
    ///
    /// These are optional, so failures here are logged and otherwise ignored
    fn read_extension_area(&mut self) {
        let footer = match self.read_footer() {
            Ok(Some(footer)) => footer,
            Ok(None) => {
                trace!("No TGA 2.0 footer present");
                return;
            }
            Err(err) => {
                warn!("Could not read TGA footer: {:?}", err);
                return;
            }
        };
        trace!("Footer: {:?}", footer);
        self.footer = Some(footer);

        if footer.extension_area_offset == 0 {
            return;
        }
        match self.read_extension(footer.extension_area_offset) {
            Ok(extension) => {
                trace!("Extension area: {:?}", extension);
                // the extension area is authoritative on alpha
                self.has_alpha = extension.has_alpha();
                self.extension = Some(extension);
            }
            Err(err) => {
                warn!(
                    "Could not read extension area at {}: {:?}",
                    footer.extension_area_offset, err
                );
            }
        }
    }

    fn check_format(&self, format: PixelFormat) -> Result<(), TgaDecodeErrors> {
        if let PixelFormat::Unsupported(width) = format {
            if self.options.strict_mode() {
                return Err(TgaDecodeErrors::UnsupportedPixelWidth(width));
            }
            error!("Can't read colors stored in {width} bytes, they will be zeroed");
        }
        Ok(())
    }

    fn output_size(&self) -> Result<usize, TgaDecodeErrors> {
        self.output_buffer_size().ok_or(TgaDecodeErrors::TooLargeDimensions(
            "output size",
            usize::MAX,
            self.width.saturating_mul(self.height)
        ))
    }

    /// Return the number of bytes required to hold a decoded image frame
    ///
    /// # Returns
    ///  - `Some(usize)`: Minimum size for a buffer needed to decode the image
    ///  - `None`: Indicates the headers were not decoded or the size overflows
    pub fn output_buffer_size(&self) -> Option<usize> {
        if self.decoded_headers {
            self.width
                .checked_mul(self.height)?
                .checked_mul(ColorSpace::RGBA.num_components())
        } else {
            None
        }
    }

    /// Decode a TGA image returning RGBA pixels
    ///
    /// # Returns
    /// - On success: `width*height*4` bytes
    /// - On error: The reason why the image couldn't be decoded
    pub fn decode(&mut self) -> Result<Vec<u8>, TgaDecodeErrors> {
        self.decode_headers()?;

        let mut output = vec![0; self.output_size()?];

        self.decode_into(&mut output)?;

        Ok(output)
    }

    /// Decode a TGA image into a pre-allocated buffer
    ///
    /// Only the first [`output_buffer_size`](Self::output_buffer_size)
    /// bytes are written to
    ///
    /// # Arguments
    /// * `pixels`: Output buffer for which we will write decoded pixels
    pub fn decode_into(&mut self, pixels: &mut [u8]) -> Result<(), TgaDecodeErrors> {
        self.decode_headers()?;

        let output_size = self.output_size()?;

        if pixels.len() < output_size {
            return Err(TgaDecodeErrors::TooSmallOutput(output_size, pixels.len()));
        }
        let pixels = &mut pixels[..output_size];

        let color_map = if self.header.color_map_type == 1 {
            let format = PixelFormat::new(
                self.header.color_map_entry_size(),
                self.header.is_gray(),
                self.has_alpha
            );
            self.check_format(format)?;

            ColorMap::read(
                &mut self.stream,
                usize::from(self.header.color_map_length),
                format
            )?
        } else {
            ColorMap::default()
        };
        trace!("Color map entries: {}", color_map.len());

        let source = if self.header.is_color_mapped() {
            PixelSource::ColorMapped {
                index_size: self.header.bytes_per_pixel()
            }
        } else {
            let format = PixelFormat::new(
                self.header.bytes_per_pixel(),
                self.header.is_gray(),
                self.has_alpha
            );
            self.check_format(format)?;

            PixelSource::Direct(format)
        };

        let placement = PixelPlacement {
            width:  self.width,
            height: self.height,
            flip_x: self.header.is_flip_x(),
            flip_y: self.header.is_flip_y()
        };

        if self.header.is_rle() {
            self.decode_rle(pixels, source, &color_map, placement)?;
        } else {
            self.decode_raw(pixels, source, &color_map, placement)?;
        }

        if self.repair_alpha && repair_alpha(pixels) {
            trace!("Alpha channel was fully transparent, made it opaque");
        }
        trace!("Finished decoding image");

        Ok(())
    }

    fn decode_raw(
        &mut self, pixels: &mut [u8], source: PixelSource, color_map: &ColorMap,
        placement: PixelPlacement
    ) -> Result<(), TgaDecodeErrors> {
        let total = placement.width * placement.height;

        let mut sample = [0_u8; 4];
        let sample = &mut sample[..source.sample_size()];

        for i in 0..total {
            self.stream
                .read_exact_bytes(sample)
                .map_err(|_| TgaDecodeErrors::TruncatedData(total, i))?;

            placement.put(pixels, i, source.to_rgba(sample, color_map)?);
        }
        Ok(())
    }

    fn decode_rle(
        &mut self, pixels: &mut [u8], source: PixelSource, color_map: &ColorMap,
        placement: PixelPlacement
    ) -> Result<(), TgaDecodeErrors> {
        let total = placement.width * placement.height;

        let mut sample = [0_u8; 4];
        let sample = &mut sample[..source.sample_size()];

        let mut position = 0;

        while position < total {
            let [packet] = self
                .stream
                .read_fixed_bytes_or_error::<1>()
                .map_err(|_| TgaDecodeErrors::TruncatedData(total, position))?;

            // packets cover one more pixel than their count
            let end = position + usize::from(packet & !TGA_RLE_RUN_PACKET) + 1;

            if end > total {
                return Err(TgaDecodeErrors::TruncatedData(total, end));
            }

            if packet & TGA_RLE_RUN_PACKET != 0 {
                self.stream
                    .read_exact_bytes(sample)
                    .map_err(|_| TgaDecodeErrors::TruncatedData(total, position))?;

                let color = source.to_rgba(sample, color_map)?;

                for i in position..end {
                    placement.put(pixels, i, color);
                }
            } else {
                for i in position..end {
                    self.stream
                        .read_exact_bytes(sample)
                        .map_err(|_| TgaDecodeErrors::TruncatedData(total, i))?;

                    placement.put(pixels, i, source.to_rgba(sample, color_map)?);
                }
            }
            position = end;
        }
        Ok(())
    }

    /// Return the width and height of the image
    ///
    /// Or none if the headers haven't been decoded
    pub const fn dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            return Some((self.width, self.height));
        }
        None
    }

    /// Return the colorspace of decoded pixels
    ///
    /// This is always RGBA once headers are decoded
    pub const fn colorspace(&self) -> Option<ColorSpace> {
        if self.decoded_headers {
            Some(ColorSpace::RGBA)
        } else {
            None
        }
    }

    /// Return the bit depth of decoded pixels
    ///
    /// This is always 8
    pub const fn bit_depth(&self) -> BitDepth {
        BitDepth::Eight
    }

    /// Whether alpha in decoded pixels comes from the file
    ///
    /// When false every pixel is opaque.
    /// Returns `None` if headers haven't been decoded
    pub const fn has_alpha(&self) -> Option<bool> {
        if self.decoded_headers {
            Some(self.has_alpha)
        } else {
            None
        }
    }

    /// Return the parsed header
    ///
    /// This is available once the header was read, even if
    /// the image itself is not supported
    pub const fn header(&self) -> Option<&TgaHeader> {
        if self.read_header {
            Some(&self.header)
        } else {
            None
        }
    }

    /// Return the TGA 2.0 footer if the file has one
    pub const fn footer(&self) -> Option<TgaFooter> {
        self.footer
    }

    /// Return the TGA 2.0 extension area if the file has one
    pub const fn extension(&self) -> Option<&TgaExtension> {
        self.extension.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use crate::decoder::{repair_alpha, PixelPlacement};

    fn placement(flip_x: bool, flip_y: bool) -> PixelPlacement {
        PixelPlacement {
            width: 3,
            height: 2,
            flip_x,
            flip_y
        }
    }

    #[test]
    fn test_placement_identity() {
        let p = placement(false, false);
        assert_eq!(p.offset(0), 0);
        assert_eq!(p.offset(4), 16);
    }

    #[test]
    fn test_placement_flips() {
        // first stored pixel is the bottom left one
        assert_eq!(placement(false, true).offset(0), 3 * 4);
        // first stored pixel is the top right one
        assert_eq!(placement(true, false).offset(0), 2 * 4);
        // first stored pixel is the bottom right one
        assert_eq!(placement(true, true).offset(0), 5 * 4);
        assert_eq!(placement(true, true).offset(5), 0);
    }

    #[test]
    fn test_repair_all_transparent() {
        let mut pixels = [1, 2, 3, 0, 4, 5, 6, 0];
        assert!(repair_alpha(&mut pixels));
        assert_eq!(pixels, [1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_repair_leaves_partial_alpha() {
        let mut pixels = [1, 2, 3, 0, 4, 5, 6, 1];
        assert!(!repair_alpha(&mut pixels));
        assert_eq!(pixels, [1, 2, 3, 0, 4, 5, 6, 1]);
    }
}
