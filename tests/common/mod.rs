#![allow(dead_code)]

/// Minimal JPEG with an EXIF APP1 segment: `Make = "Abc"` plus a GPS IFD at
/// 34°36'54"S 58°22'12"W.
pub fn jpeg_with_gps() -> Vec<u8> {
    let mut tiff: Vec<u8> = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    // IFD0 @ 8: Make + GPS pointer
    let gps_ifd_offset: u32 = 38;
    tiff.extend_from_slice(&2u16.to_le_bytes());
    push_entry(&mut tiff, 0x010F, 2, 4, *b"Abc\0");
    push_entry(&mut tiff, 0x8825, 4, 1, gps_ifd_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(tiff.len(), gps_ifd_offset as usize);

    // GPS IFD @ 38, rational data @ 92 and 116
    let latitude_offset: u32 = 92;
    let longitude_offset: u32 = 116;
    tiff.extend_from_slice(&4u16.to_le_bytes());
    push_entry(&mut tiff, 0x0001, 2, 2, *b"S\0\0\0");
    push_entry(&mut tiff, 0x0002, 5, 3, latitude_offset.to_le_bytes());
    push_entry(&mut tiff, 0x0003, 2, 2, *b"W\0\0\0");
    push_entry(&mut tiff, 0x0004, 5, 3, longitude_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(tiff.len(), latitude_offset as usize);

    for value in [34u32, 1, 36, 1, 54, 1, 58, 1, 22, 1, 12, 1] {
        tiff.extend_from_slice(&value.to_le_bytes());
    }

    wrap_jpeg(&tiff)
}

/// Minimal JPEG whose GPS IFD only holds `GPSAltitudeRef` and `GPSAltitude`.
pub fn jpeg_with_altitude(reference: u8, meters: u32) -> Vec<u8> {
    let mut tiff: Vec<u8> = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    // IFD0 @ 8: GPS pointer only
    let gps_ifd_offset: u32 = 26;
    tiff.extend_from_slice(&1u16.to_le_bytes());
    push_entry(&mut tiff, 0x8825, 4, 1, gps_ifd_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(tiff.len(), gps_ifd_offset as usize);

    // GPS IFD @ 26, altitude rational @ 56
    let altitude_offset: u32 = 56;
    tiff.extend_from_slice(&2u16.to_le_bytes());
    push_entry(&mut tiff, 0x0005, 1, 1, [reference, 0, 0, 0]);
    push_entry(&mut tiff, 0x0006, 5, 1, altitude_offset.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    assert_eq!(tiff.len(), altitude_offset as usize);

    tiff.extend_from_slice(&meters.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());

    wrap_jpeg(&tiff)
}

fn wrap_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    let segment_len = (2 + 6 + tiff.len()) as u16;
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

fn push_entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value);
}
