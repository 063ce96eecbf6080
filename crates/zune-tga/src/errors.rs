/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::ZByteIoError;
use zune_core::colorspace::ColorSpace;

/// Possible errors that may occur during decoding
pub enum TgaDecodeErrors {
    /// The input is shorter than the fixed header plus the image id
    ///
    /// The argument is the number of bytes the header needs
    MalformedHeader(usize),
    /// A header field holds a value this decoder does not handle
    ///
    /// # Arguments
    /// - 1st argument is the name of the field
    /// - 2nd argument is the value found
    UnsupportedFormat(&'static str, u8),
    /// The pixel stream does not produce exactly `width*height` pixels
    ///
    /// # Arguments
    /// - 1st argument is the number of pixels the image should have
    /// - 2nd argument is the number of pixels the stream produced
    TruncatedData(usize, usize),
    /// A color mapped pixel referenced an entry outside the color map
    ///
    /// # Arguments
    /// - 1st argument is the index found
    /// - 2nd argument is the length of the color map
    IndexOutOfRange(usize, usize),
    /// A color sample is stored in a number of bytes we can't interpret
    UnsupportedPixelWidth(usize),
    /// Too large dimensions for a given width or height
    TooLargeDimensions(&'static str, usize, usize),
    /// The output buffer is too small, expected at least
    /// a size but got another size
    TooSmallOutput(usize, usize),
    IoErrors(ZByteIoError)
}

impl Debug for TgaDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TgaDecodeErrors::MalformedHeader(size) => {
                writeln!(f, "Malformed header, expected at least {size} bytes")
            }
            TgaDecodeErrors::UnsupportedFormat(field, value) => {
                writeln!(f, "Unsupported {field} {value}")
            }
            TgaDecodeErrors::TruncatedData(expected, found) => {
                writeln!(
                    f,
                    "Pixel data mismatch, expected {expected} pixels but the stream produced {found}"
                )
            }
            TgaDecodeErrors::IndexOutOfRange(index, length) => {
                writeln!(
                    f,
                    "Color map index {index} out of range for a color map of {length} entries"
                )
            }
            TgaDecodeErrors::UnsupportedPixelWidth(width) => {
                writeln!(f, "Can't read a color stored in {width} bytes")
            }
            TgaDecodeErrors::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension} , {found} exceeds {expected}"
                )
            }
            TgaDecodeErrors::TooSmallOutput(expected, found) => {
                writeln!(
                    f,
                    "Too small output size, expected {expected}, but found {found}"
                )
            }
            TgaDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {:?}", err)
            }
        }
    }
}

impl Display for TgaDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TgaDecodeErrors {}

impl From<ZByteIoError> for TgaDecodeErrors {
    fn from(value: ZByteIoError) -> Self {
        TgaDecodeErrors::IoErrors(value)
    }
}

/// Errors encountered during encoding
pub enum TgaEncodeErrors {
    /// The pixel buffer length does not match `width*height*4`
    ///
    /// # Arguments
    /// - 1st argument is the expected length
    /// - 2nd argument is the length found
    InvalidDimensions(usize, usize),
    /// The dimension cannot be stored in the 16 bit header field
    TooLargeDimensions(usize),
    /// Width or height is zero, the argument names which one
    ZeroDimension(&'static str),
    /// Only RGBA input can be encoded
    UnsupportedColorspace(ColorSpace),
    /// Only 8 bit input can be encoded
    UnsupportedBitDepth(BitDepth),
    IoErrors(ZByteIoError)
}

impl Debug for TgaEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            TgaEncodeErrors::InvalidDimensions(expected, found) => {
                writeln!(
                    f,
                    "Input array length {found} doesn't match expected length {expected}"
                )
            }
            TgaEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimensions {found}, TGA can only encode dimensions up to {}",
                    u16::MAX
                )
            }
            TgaEncodeErrors::ZeroDimension(dimension) => {
                writeln!(f, "Image {dimension} is zero, cannot encode an empty image")
            }
            TgaEncodeErrors::UnsupportedColorspace(colorspace) => {
                writeln!(
                    f,
                    "Cannot encode image with colorspace {colorspace:?} into TGA, only RGBA is supported"
                )
            }
            TgaEncodeErrors::UnsupportedBitDepth(depth) => {
                writeln!(f, "Unsupported bit depth {depth:?}, only 8 bit is supported")
            }
            TgaEncodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error {:?}", err)
            }
        }
    }
}

impl Display for TgaEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TgaEncodeErrors {}

impl From<ZByteIoError> for TgaEncodeErrors {
    fn from(value: ZByteIoError) -> Self {
        TgaEncodeErrors::IoErrors(value)
    }
}
