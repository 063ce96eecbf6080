#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    use zune_tga::zune_core::bytestream::ZCursor;
    use zune_tga::zune_core::options::DecoderOptions;

    let options = DecoderOptions::default().set_strict_mode(false);
    let mut decoder = zune_tga::TgaDecoder::new_with_options(ZCursor::new(data), options);
    let _ = decoder.decode();
});
