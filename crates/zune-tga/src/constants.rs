/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Size of the fixed part of the header, the image id follows it
pub(crate) const TGA_HEADER_SIZE: usize = 18;

/// Size of the TGA 2.0 footer found at the end of the file
pub(crate) const TGA_FOOTER_SIZE: usize = 26;

/// Size of the TGA 2.0 extension area
pub(crate) const TGA_EXTENSION_SIZE: usize = 495;

/// Footer signature without the trailing `.\0`
pub(crate) const TGA_SIGNATURE: &[u8] = b"TRUEVISION-XFILE";

/// Bit set in the image descriptor when pixels go right to left
pub(crate) const TGA_FLAG_RIGHT_TO_LEFT: u8 = 0x10;

/// Bit set in the image descriptor when the first row is the top row
pub(crate) const TGA_FLAG_TOP_TO_BOTTOM: u8 = 0x20;

/// Number of attribute (alpha) bits per pixel
pub(crate) const TGA_FLAG_ALPHA_BITS: u8 = 0x0F;

/// High bit of an RLE packet header, set for run packets
pub(crate) const TGA_RLE_RUN_PACKET: u8 = 0x80;
