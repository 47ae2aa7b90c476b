use base64::Engine;

/// Both the browser client and the vendor API speak 16kHz mono PCM16, so
/// audio passes through unresampled.
pub const PCM16_SAMPLE_RATE: u32 = 16_000;

/// Encodes raw PCM16 bytes as base64 for a JSON frame.
pub fn encode_pcm(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decodes a base64 fragment back to raw PCM16 bytes. Bad input decodes
/// to silence rather than failing the stream.
pub fn decode_pcm(base64_fragment: &str) -> Vec<u8> {
    match base64::engine::general_purpose::STANDARD.decode(base64_fragment) {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::error!("Failed to decode base64 audio fragment");
            Vec::new()
        }
    }
}

/// Encodes i16 samples as base64 little-endian PCM16.
pub fn encode_i16(pcm16: &[i16]) -> String {
    let bytes: Vec<u8> = pcm16.iter().flat_map(|s| s.to_le_bytes()).collect();
    base64::engine::general_purpose::STANDARD.encode(&bytes)
}

/// A buffer of silent samples covering `millis` of playback.
pub fn silence(millis: u32) -> Vec<i16> {
    vec![0i16; (PCM16_SAMPLE_RATE / 1000 * millis) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_round_trip() {
        let bytes = vec![0x00u8, 0x40, 0xff, 0x7f];
        let encoded = encode_pcm(&bytes);
        assert_eq!(decode_pcm(&encoded), bytes);
    }

    #[test]
    fn test_decode_bad_base64_is_silent() {
        assert!(decode_pcm("not base64!").is_empty());
    }

    #[test]
    fn test_encode_i16_is_little_endian() {
        // 0x4000 → [0x00, 0x40]
        let encoded = encode_i16(&[0x4000]);
        assert_eq!(decode_pcm(&encoded), vec![0x00, 0x40]);
    }

    #[test]
    fn test_silence_length_tracks_duration() {
        assert_eq!(silence(1000).len(), PCM16_SAMPLE_RATE as usize);
        assert!(silence(50).iter().all(|&s| s == 0));
    }
}
