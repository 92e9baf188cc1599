//! Synthetic audio streams for tests.

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, mono, no padding.
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC4];

/// 144 * 128000 / 44100, header included.
pub const MP3_FRAME_LEN: usize = 417;

pub const MP3_FRAME_SECS: f64 = 1152.0 / 44100.0;

/// `count` back to back CBR frames with silent (zeroed) payloads.
pub fn mp3_frames(count: usize) -> Vec<u8> {
    let mut frame = vec![0u8; MP3_FRAME_LEN];
    frame[..4].copy_from_slice(&MP3_FRAME_HEADER);
    frame.repeat(count)
}

/// A valid frame header followed by a fraction of the frame body.
pub fn truncated_mp3() -> Vec<u8> {
    let mut bytes = MP3_FRAME_HEADER.to_vec();
    bytes.extend_from_slice(&[0u8; 40]);
    bytes
}

/// 20 ms per packet at the 48 kHz Opus granule rate.
pub const OPUS_PACKET_SAMPLES: u64 = 960;

/// Ogg Opus stream with `packets` 20 ms CELT silence packets, one per page.
pub fn ogg_opus(packets: usize) -> Vec<u8> {
    const SERIAL: u32 = 0x5eed_0001;

    let mut head = b"OpusHead".to_vec();
    head.push(1); // version
    head.push(1); // channels
    head.extend_from_slice(&0u16.to_le_bytes()); // pre-skip
    head.extend_from_slice(&48_000u32.to_le_bytes());
    head.extend_from_slice(&0i16.to_le_bytes()); // output gain
    head.push(0); // channel mapping family

    let vendor = b"announce-fixtures";
    let mut tags = b"OpusTags".to_vec();
    tags.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    tags.extend_from_slice(vendor);
    tags.extend_from_slice(&0u32.to_le_bytes());

    let mut stream = ogg_page(0x02, 0, SERIAL, 0, &head);
    stream.extend(ogg_page(0x00, 0, SERIAL, 1, &tags));
    for i in 0..packets {
        let granule = (i as u64 + 1) * OPUS_PACKET_SAMPLES;
        let header_type = if i + 1 == packets { 0x04 } else { 0x00 };
        // TOC: config 31 (CELT FB 20 ms), mono, one frame.
        let packet = [0xF8, 0xFF, 0xFE];
        stream.extend(ogg_page(header_type, granule, SERIAL, i as u32 + 2, &packet));
    }
    stream
}

fn ogg_page(header_type: u8, granule: u64, serial: u32, sequence: u32, packet: &[u8]) -> Vec<u8> {
    assert!(packet.len() < 255, "single segment pages only");

    let mut page = Vec::with_capacity(28 + packet.len());
    page.extend_from_slice(b"OggS");
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&serial.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&[0u8; 4]);
    page.push(1);
    page.push(packet.len() as u8);
    page.extend_from_slice(packet);

    let crc = ogg_crc(&page);
    page[22..26].copy_from_slice(&crc.to_le_bytes());
    page
}

/// CRC-32 as used by Ogg: polynomial 0x04c11db7, no reflection, zero init.
fn ogg_crc(data: &[u8]) -> u32 {
    let mut crc = 0u32;
    for &byte in data {
        crc ^= (byte as u32) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ 0x04c1_1db7
            } else {
                crc << 1
            };
        }
    }
    crc
}
