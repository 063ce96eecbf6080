/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! TGA 2.0 footer and extension area
//!
//! Both are optional, files without them are plain TGA 1.0 files.
//! The extension area is located through the footer which sits
//! in the last 26 bytes of the file.
use alloc::string::String;

use crate::constants::{TGA_EXTENSION_SIZE, TGA_FOOTER_SIZE, TGA_SIGNATURE};

/// The TGA 2.0 file footer
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TgaFooter {
    /// Absolute offset of the extension area, zero if absent
    pub extension_area_offset:      u32,
    /// Absolute offset of the developer directory, zero if absent
    pub developer_directory_offset: u32
}

impl TgaFooter {
    /// Parse a footer, returning `None` if the signature doesn't match
    pub(crate) fn from_bytes(bytes: &[u8; TGA_FOOTER_SIZE]) -> Option<TgaFooter> {
        let signature = trim_padding(&bytes[8..]);

        if signature.strip_suffix(b".") != Some(TGA_SIGNATURE) {
            return None;
        }
        Some(TgaFooter {
            extension_area_offset:      u32_at(bytes, 0),
            developer_directory_offset: u32_at(bytes, 4)
        })
    }
}

/// The TGA 2.0 extension area
///
/// Only `attributes_type` influences decoding, the rest is
/// exposed as image metadata.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TgaExtension {
    pub extension_size:          u16,
    pub author_name:             String,
    pub author_comments:         String,
    /// month, day, year, hour, minute, second
    pub save_time:               [u16; 6],
    pub job_name:                String,
    /// hours, minutes, seconds
    pub job_time:                [u16; 3],
    pub software_id:             String,
    /// Version number times 100
    pub software_version:        u16,
    pub software_version_letter: u8,
    /// Background color stored as A,R,G,B
    pub key_color:               [u8; 4],
    /// numerator, denominator
    pub pixel_aspect_ratio:      [u16; 2],
    /// numerator, denominator
    pub gamma:                   [u16; 2],
    pub color_correction_offset: u32,
    pub postage_stamp_offset:    u32,
    pub scan_line_offset:        u32,
    /// Meaning of the alpha channel
    ///
    /// - 0: no alpha
    /// - 1: undefined, ignore
    /// - 2: undefined, retain
    /// - 3: alpha
    /// - 4: pre-multiplied alpha
    pub attributes_type:         u8
}

impl TgaExtension {
    pub(crate) fn from_bytes(bytes: &[u8; TGA_EXTENSION_SIZE]) -> TgaExtension {
        TgaExtension {
            extension_size:          u16_at(bytes, 0),
            author_name:             read_string(&bytes[2..43]),
            author_comments:         read_string(&bytes[43..367]),
            save_time:               u16_array(bytes, 367),
            job_name:                read_string(&bytes[379..420]),
            job_time:                u16_array(bytes, 420),
            software_id:             read_string(&bytes[426..467]),
            software_version:        u16_at(bytes, 467),
            software_version_letter: bytes[469],
            key_color:               [bytes[470], bytes[471], bytes[472], bytes[473]],
            pixel_aspect_ratio:      [u16_at(bytes, 474), u16_at(bytes, 476)],
            gamma:                   [u16_at(bytes, 478), u16_at(bytes, 480)],
            color_correction_offset: u32_at(bytes, 482),
            postage_stamp_offset:    u32_at(bytes, 486),
            scan_line_offset:        u32_at(bytes, 490),
            attributes_type:         bytes[494]
        }
    }

    /// Whether the pixel data carries a meaningful alpha channel
    pub const fn has_alpha(&self) -> bool {
        matches!(self.attributes_type, 3 | 4)
    }

    pub const fn is_premultiplied(&self) -> bool {
        self.attributes_type == 4
    }
}

fn u16_at(bytes: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([bytes[pos], bytes[pos + 1]])
}

fn u32_at(bytes: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
}

fn u16_array<const N: usize>(bytes: &[u8], start: usize) -> [u16; N] {
    let mut values = [0_u16; N];
    for (i, value) in values.iter_mut().enumerate() {
        *value = u16_at(bytes, start + i * 2);
    }
    values
}

fn trim_padding(mut bytes: &[u8]) -> &[u8] {
    while let [rest @ .., last] = bytes {
        if *last == 0 || last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}

fn read_string(bytes: &[u8]) -> String {
    // fields are NUL terminated, anything after the first NUL is padding
    let end = bytes.iter().position(|x| *x == 0).unwrap_or(bytes.len());
    let value = String::from_utf8_lossy(&bytes[..end]);
    String::from(value.trim_end())
}

#[cfg(test)]
mod tests {
    use crate::constants::{TGA_EXTENSION_SIZE, TGA_FOOTER_SIZE};
    use crate::extension::{TgaExtension, TgaFooter};

    fn footer(signature: &[u8]) -> [u8; TGA_FOOTER_SIZE] {
        let mut bytes = [0; TGA_FOOTER_SIZE];
        bytes[0..4].copy_from_slice(&1200_u32.to_le_bytes());
        bytes[8..8 + signature.len()].copy_from_slice(signature);
        bytes
    }

    #[test]
    fn test_footer_signature() {
        let parsed = TgaFooter::from_bytes(&footer(b"TRUEVISION-XFILE.\0")).unwrap();
        assert_eq!(parsed.extension_area_offset, 1200);
        assert_eq!(parsed.developer_directory_offset, 0);
    }

    #[test]
    fn test_footer_wrong_signature() {
        assert!(TgaFooter::from_bytes(&footer(b"TRUEVISION-YFILE.\0")).is_none());
        assert!(TgaFooter::from_bytes(&footer(b"TRUEVISION-XFILE\0\0")).is_none());
        assert!(TgaFooter::from_bytes(&[0; TGA_FOOTER_SIZE]).is_none());
    }

    #[test]
    fn test_extension_layout() {
        let mut bytes = [0; TGA_EXTENSION_SIZE];
        bytes[0..2].copy_from_slice(&495_u16.to_le_bytes());
        bytes[2..6].copy_from_slice(b"zune");
        bytes[367..369].copy_from_slice(&12_u16.to_le_bytes());
        bytes[426..430].copy_from_slice(b"gimp");
        bytes[467..469].copy_from_slice(&210_u16.to_le_bytes());
        bytes[478..480].copy_from_slice(&22_u16.to_le_bytes());
        bytes[480..482].copy_from_slice(&10_u16.to_le_bytes());
        bytes[494] = 4;

        let extension = TgaExtension::from_bytes(&bytes);
        assert_eq!(extension.extension_size, 495);
        assert_eq!(extension.author_name, "zune");
        assert_eq!(extension.save_time[0], 12);
        assert_eq!(extension.software_id, "gimp");
        assert_eq!(extension.software_version, 210);
        assert_eq!(extension.gamma, [22, 10]);
        assert!(extension.has_alpha());
        assert!(extension.is_premultiplied());
    }

    #[test]
    fn test_extension_without_alpha() {
        let mut bytes = [0; TGA_EXTENSION_SIZE];
        bytes[494] = 2;
        assert!(!TgaExtension::from_bytes(&bytes).has_alpha());
    }
}
