/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::string::String;
use alloc::vec::Vec;

use crate::constants::{
    TGA_FLAG_ALPHA_BITS, TGA_FLAG_RIGHT_TO_LEFT, TGA_FLAG_TOP_TO_BOTTOM, TGA_HEADER_SIZE
};
use crate::errors::TgaDecodeErrors;

/// Image types a TGA file can declare
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TgaImageType {
    ColorMapped,
    TrueColor,
    Gray,
    RleColorMapped,
    RleTrueColor,
    RleGray
}

impl TgaImageType {
    pub fn from_u8(num: u8) -> Option<TgaImageType> {
        match num {
            1 => Some(TgaImageType::ColorMapped),
            2 => Some(TgaImageType::TrueColor),
            3 => Some(TgaImageType::Gray),
            9 => Some(TgaImageType::RleColorMapped),
            10 => Some(TgaImageType::RleTrueColor),
            11 => Some(TgaImageType::RleGray),
            _ => None
        }
    }
    pub const fn is_rle(self) -> bool {
        matches!(
            self,
            TgaImageType::RleColorMapped | TgaImageType::RleTrueColor | TgaImageType::RleGray
        )
    }
    pub const fn is_color_mapped(self) -> bool {
        matches!(self, TgaImageType::ColorMapped | TgaImageType::RleColorMapped)
    }
    pub const fn is_gray(self) -> bool {
        matches!(self, TgaImageType::Gray | TgaImageType::RleGray)
    }
}

/// The TGA file header
///
/// Fields are stored as read from the file, derived
/// properties are exposed as methods.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TgaHeader {
    pub id_length:        u8,
    pub color_map_type:   u8,
    pub image_type:       u8,
    pub color_map_origin: u16,
    pub color_map_length: u16,
    pub color_map_depth:  u8,
    pub x_origin:         u16,
    pub y_origin:         u16,
    pub width:            u16,
    pub height:           u16,
    pub bits_per_pixel:   u8,
    /// Image descriptor byte
    pub flags:            u8,
    /// Raw image id, `id_length` bytes long
    pub image_id:         Vec<u8>
}

impl TgaHeader {
    /// Parse the fixed part of the header
    ///
    /// The image id is not part of `bytes` and is left empty
    pub(crate) fn from_bytes(bytes: &[u8; TGA_HEADER_SIZE]) -> TgaHeader {
        let u16_at = |pos: usize| u16::from_le_bytes([bytes[pos], bytes[pos + 1]]);

        TgaHeader {
            id_length:        bytes[0],
            color_map_type:   bytes[1],
            image_type:       bytes[2],
            color_map_origin: u16_at(3),
            color_map_length: u16_at(5),
            color_map_depth:  bytes[7],
            x_origin:         u16_at(8),
            y_origin:         u16_at(10),
            width:            u16_at(12),
            height:           u16_at(14),
            bits_per_pixel:   bytes[16],
            flags:            bytes[17],
            image_id:         Vec::new()
        }
    }

    /// The image id interpreted as ASCII
    ///
    /// Invalid characters are replaced and trailing NUL bytes removed
    pub fn image_id_string(&self) -> String {
        let id = String::from_utf8_lossy(&self.image_id);
        String::from(id.trim_end_matches('\0'))
    }

    pub const fn is_color_mapped(&self) -> bool {
        matches!(self.image_type, 1 | 9)
    }

    pub const fn is_rle(&self) -> bool {
        matches!(self.image_type, 9 | 10 | 11)
    }

    pub const fn is_gray(&self) -> bool {
        matches!(self.image_type, 3 | 11)
    }

    /// Pixels of a row are stored right to left
    pub const fn is_flip_x(&self) -> bool {
        self.flags & TGA_FLAG_RIGHT_TO_LEFT != 0
    }

    /// Rows are stored bottom to top, the TGA default
    pub const fn is_flip_y(&self) -> bool {
        self.flags & TGA_FLAG_TOP_TO_BOTTOM == 0
    }

    pub const fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel / 8) as usize
    }

    /// Bytes used by a single color map entry
    ///
    /// 15 bit maps are stored in two bytes
    pub const fn color_map_entry_size(&self) -> usize {
        (self.color_map_depth as usize + 7) / 8
    }

    /// Whether pixels carry alpha according to the header alone
    ///
    /// The extension area may later override this.
    pub const fn has_alpha(&self) -> bool {
        (self.flags & TGA_FLAG_ALPHA_BITS) != 0
            || self.bits_per_pixel == 32
            || (self.is_color_mapped() && self.color_map_depth == 32)
            || (self.is_gray() && self.bits_per_pixel == 16)
    }

    /// Confirm this decoder can handle the image described
    pub fn validate(&self) -> Result<TgaImageType, TgaDecodeErrors> {
        let image_type = TgaImageType::from_u8(self.image_type)
            .ok_or(TgaDecodeErrors::UnsupportedFormat("image type", self.image_type))?;

        if !matches!(self.bits_per_pixel, 8 | 16 | 24 | 32) {
            return Err(TgaDecodeErrors::UnsupportedFormat(
                "bits per pixel",
                self.bits_per_pixel
            ));
        }
        if self.color_map_type > 1 {
            return Err(TgaDecodeErrors::UnsupportedFormat(
                "color map type",
                self.color_map_type
            ));
        }
        Ok(image_type)
    }
}

#[cfg(test)]
mod tests {
    use crate::header::{TgaHeader, TgaImageType};
    use crate::TgaDecodeErrors;

    fn header_bytes(image_type: u8, bits_per_pixel: u8, flags: u8) -> [u8; 18] {
        let mut bytes = [0; 18];
        bytes[2] = image_type;
        bytes[12] = 0x40;
        bytes[13] = 0x01;
        bytes[14] = 3;
        bytes[16] = bits_per_pixel;
        bytes[17] = flags;
        bytes
    }

    #[test]
    fn test_fields_are_little_endian() {
        let header = TgaHeader::from_bytes(&header_bytes(2, 24, 0));
        assert_eq!(header.width, 320);
        assert_eq!(header.height, 3);
        assert_eq!(header.bytes_per_pixel(), 3);
    }

    #[test]
    fn test_derived_flags() {
        let header = TgaHeader::from_bytes(&header_bytes(11, 16, 0x30));
        assert!(header.is_rle());
        assert!(header.is_gray());
        assert!(!header.is_color_mapped());
        assert!(header.is_flip_x());
        assert!(!header.is_flip_y());
        assert!(header.has_alpha());

        let header = TgaHeader::from_bytes(&header_bytes(2, 24, 0));
        assert!(header.is_flip_y());
        assert!(!header.has_alpha());
    }

    #[test]
    fn test_alpha_bits_imply_alpha() {
        let header = TgaHeader::from_bytes(&header_bytes(2, 16, 0x01));
        assert!(header.has_alpha());
    }

    #[test]
    fn test_color_map_depth_implies_alpha() {
        let mut bytes = header_bytes(1, 8, 0);
        bytes[1] = 1;
        bytes[7] = 32;
        let header = TgaHeader::from_bytes(&bytes);
        assert!(header.has_alpha());
        assert_eq!(header.color_map_entry_size(), 4);
    }

    #[test]
    fn test_validation() {
        let header = TgaHeader::from_bytes(&header_bytes(10, 32, 0));
        assert_eq!(header.validate().ok(), Some(TgaImageType::RleTrueColor));

        let header = TgaHeader::from_bytes(&header_bytes(4, 32, 0));
        assert!(matches!(
            header.validate(),
            Err(TgaDecodeErrors::UnsupportedFormat(_, 4))
        ));

        let header = TgaHeader::from_bytes(&header_bytes(2, 12, 0));
        assert!(matches!(
            header.validate(),
            Err(TgaDecodeErrors::UnsupportedFormat(_, 12))
        ));

        let mut bytes = header_bytes(2, 32, 0);
        bytes[1] = 2;
        let header = TgaHeader::from_bytes(&bytes);
        assert!(matches!(
            header.validate(),
            Err(TgaDecodeErrors::UnsupportedFormat(_, 2))
        ));
    }

    #[test]
    fn test_image_id_string() {
        let mut header = TgaHeader::from_bytes(&header_bytes(2, 32, 0));
        header.image_id = b"zune\0\0".to_vec();
        assert_eq!(header.image_id_string(), "zune");
    }
}
