/// 批改音频的魔术字节校验
///
/// `extension` 包含点号，如 ".mp3"。未知扩展名一律拒绝。
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        // ID3 标签或 MPEG 帧同步
        ".mp3" => {
            data.starts_with(b"ID3") || (data.len() >= 2 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0)
        }
        ".wav" => data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WAVE",
        ".ogg" | ".oga" => data.starts_with(b"OggS"),
        // MP4 容器：偏移 4 处为 ftyp
        ".m4a" | ".aac" if data.len() >= 8 && &data[4..8] == b"ftyp" => true,
        ".aac" => data.len() >= 2 && data[0] == 0xFF && data[1] & 0xF6 == 0xF0,
        ".webm" => data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]),
        _ => false,
    }
}

/// 取文件名的扩展名（小写，含点号）
pub fn extension_of(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp3_magic() {
        assert!(validate_magic_bytes(b"ID3\x04\x00", ".mp3"));
        assert!(validate_magic_bytes(&[0xFF, 0xFB, 0x90, 0x00], ".MP3"));
        assert!(!validate_magic_bytes(b"OggS", ".mp3"));
    }

    #[test]
    fn test_wav_and_ogg_magic() {
        assert!(validate_magic_bytes(b"RIFF\x24\x08\x00\x00WAVEfmt ", ".wav"));
        assert!(!validate_magic_bytes(b"RIFF\x24\x08\x00\x00WEBPVP8 ", ".wav"));
        assert!(validate_magic_bytes(b"OggS\x00\x02", ".ogg"));
    }

    #[test]
    fn test_m4a_magic() {
        let header = [0x00, 0x00, 0x00, 0x20, b'f', b't', b'y', b'p', b'M', b'4', b'A', b' '];
        assert!(validate_magic_bytes(&header, ".m4a"));
        assert!(!validate_magic_bytes(&header[..6], ".m4a"));
    }

    #[test]
    fn test_empty_and_unknown() {
        assert!(!validate_magic_bytes(&[], ".mp3"));
        assert!(!validate_magic_bytes(b"MZ\x90\x00", ".exe"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("voice.MP3"), ".mp3");
        assert_eq!(extension_of("noext"), "");
    }
}
