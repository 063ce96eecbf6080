/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Decoding and encoding Truevision TGA images
//!
//! # Features
//! - Uncompressed and run length encoded images
//! - True-color, gray scale and color mapped images
//! - TGA 2.0 footer and extension area metadata
//! - Encoding 32 bit uncompressed images
//! -`no_std`
//!
//! Decoded pixels are always 8 bit RGBA, top left first.
//!
//! ## `no_std`
//! You can use `no_std` with alloc feature to compile for `no_std` endpoints
//!
//! # Example
//! ```
//! use zune_core::bit_depth::BitDepth;
//! use zune_core::bytestream::ZCursor;
//! use zune_core::colorspace::ColorSpace;
//! use zune_core::options::EncoderOptions;
//! use zune_tga::{TgaDecoder, TgaEncoder};
//!
//! let pixels = vec![0, 128, 255, 255, 10, 20, 30, 40];
//! let options = EncoderOptions::new(2, 1, ColorSpace::RGBA, BitDepth::Eight);
//!
//! let mut encoded: Vec<u8> = vec![];
//! TgaEncoder::new(&pixels, options).encode(&mut encoded).unwrap();
//!
//! let mut decoder = TgaDecoder::new(ZCursor::new(&encoded));
//! assert_eq!(decoder.decode().unwrap(), pixels);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;
extern crate core;

pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use extension::{TgaExtension, TgaFooter};
pub use header::{TgaHeader, TgaImageType};
pub use zune_core;

mod color;
mod constants;
mod decoder;
mod encoder;
mod errors;
mod extension;
mod header;
