//! Media classification by magic bytes and file extension.
//!
//! The sniffers return the extension used for the part name inside
//! `ppt/media/`, or an empty string when the buffer is too short to carry a
//! header. Audio and video sniffers fall back to `mp3` / `mp4` for unknown
//! containers; the image sniffer has no fallback.

/// Minimum bytes needed to classify an image
const IMAGE_HEADER_LEN: usize = 8;

/// Minimum bytes needed to classify audio or video
const AV_HEADER_LEN: usize = 12;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "wma", "m4a", "aac", "ogg", "flac"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "avi", "wmv", "mpg", "mpeg", "webm"];

fn riff_form(data: &[u8], form: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..8 + form.len()] == form
}

fn has_ftyp(data: &[u8]) -> bool {
    data.len() >= 8 && &data[4..8] == b"ftyp"
}

/// Classify image data: png, jpeg, gif, bmp or webp
pub fn image_type(data: &[u8]) -> &'static str {
    if data.len() < IMAGE_HEADER_LEN {
        return "";
    }
    match data {
        [0x89, 0x50, 0x4E, 0x47, ..] => "png",
        [0xFF, 0xD8, 0xFF, ..] => "jpeg",
        [0x47, 0x49, 0x46, ..] => "gif",
        [0x42, 0x4D, ..] => "bmp",
        _ if riff_form(data, b"WEBP") => "webp",
        _ => "",
    }
}

/// Classify audio data: mp3, wav, ogg, flac or m4a (mp3 when unknown)
pub fn audio_type(data: &[u8]) -> &'static str {
    if data.len() < AV_HEADER_LEN {
        return "";
    }
    match data {
        [0x49, 0x44, 0x33, ..] => "mp3",
        [0xFF, b, ..] if b & 0xE0 == 0xE0 => "mp3",
        _ if riff_form(data, b"WAVE") => "wav",
        [b'O', b'g', b'g', b'S', ..] => "ogg",
        [b'f', b'L', b'a', b'C', ..] => "flac",
        _ if has_ftyp(data) => "m4a",
        _ => "mp3",
    }
}

/// Classify video data: mp4, webm or avi (mp4 when unknown)
pub fn video_type(data: &[u8]) -> &'static str {
    if data.len() < AV_HEADER_LEN {
        return "";
    }
    match data {
        _ if has_ftyp(data) => "mp4",
        [0x1A, 0x45, 0xDF, 0xA3, ..] => "webm",
        _ if riff_form(data, b"AVI ") => "avi",
        _ => "mp4",
    }
}

/// Lowercase extension after the last dot, empty when there is none
pub fn ext_from_path(path: &str) -> String {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(idx) => name[idx + 1..].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Audio extension from a path, restricted to supported containers
pub fn audio_ext_from_path(path: &str) -> String {
    whitelisted(ext_from_path(path), AUDIO_EXTENSIONS, "mp3")
}

/// Video extension from a path, restricted to supported containers
pub fn video_ext_from_path(path: &str) -> String {
    whitelisted(ext_from_path(path), VIDEO_EXTENSIONS, "mp4")
}

fn whitelisted(ext: String, allowed: &[&str], fallback: &str) -> String {
    if allowed.contains(&ext.as_str()) {
        ext
    } else {
        fallback.to_string()
    }
}

/// MIME type for a media extension, `image/png` when unknown
pub fn mime_type(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "wmv" => "video/x-ms-wmv",
        "mpg" | "mpeg" => "video/mpeg",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "wma" => "audio/x-ms-wma",
        "m4a" | "aac" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(prefix: &[u8]) -> Vec<u8> {
        let mut data = prefix.to_vec();
        data.resize(16, 0);
        data
    }

    #[test]
    fn test_image_type() {
        assert_eq!(image_type(&padded(&[0x89, 0x50, 0x4E, 0x47])), "png");
        assert_eq!(image_type(&padded(&[0xFF, 0xD8, 0xFF, 0xE0])), "jpeg");
        assert_eq!(image_type(&padded(b"GIF89a")), "gif");
        assert_eq!(image_type(&padded(b"BM")), "bmp");
        assert_eq!(image_type(&padded(b"RIFF\0\0\0\0WEBP")), "webp");
        assert_eq!(image_type(&padded(b"hello")), "");
    }

    #[test]
    fn test_short_data_is_empty() {
        assert_eq!(image_type(&[0x89, 0x50, 0x4E, 0x47]), "");
        assert_eq!(audio_type(b"ID3"), "");
        assert_eq!(video_type(&[0x1A, 0x45, 0xDF, 0xA3]), "");
    }

    #[test]
    fn test_audio_type() {
        assert_eq!(audio_type(&padded(b"ID3")), "mp3");
        assert_eq!(audio_type(&padded(&[0xFF, 0xFB, 0x90])), "mp3");
        assert_eq!(audio_type(&padded(b"RIFF\0\0\0\0WAVE")), "wav");
        assert_eq!(audio_type(&padded(b"OggS")), "ogg");
        assert_eq!(audio_type(&padded(b"fLaC")), "flac");
        assert_eq!(audio_type(&padded(b"\0\0\0\x20ftypM4A ")), "m4a");
        assert_eq!(audio_type(&padded(b"unknown")), "mp3");
    }

    #[test]
    fn test_video_type() {
        assert_eq!(video_type(&padded(b"\0\0\0\x18ftypmp42")), "mp4");
        assert_eq!(video_type(&padded(&[0x1A, 0x45, 0xDF, 0xA3])), "webm");
        assert_eq!(video_type(&padded(b"RIFF\0\0\0\0AVI ")), "avi");
        assert_eq!(video_type(&padded(b"whatever")), "mp4");
    }

    #[test]
    fn test_ext_from_path() {
        assert_eq!(ext_from_path("photos/Cat.PNG"), "png");
        assert_eq!(ext_from_path("archive.tar.gz"), "gz");
        assert_eq!(ext_from_path("README"), "");
        assert_eq!(ext_from_path("dir.v2/file"), "");
    }

    #[test]
    fn test_whitelists() {
        assert_eq!(audio_ext_from_path("song.FLAC"), "flac");
        assert_eq!(audio_ext_from_path("song.xyz"), "mp3");
        assert_eq!(video_ext_from_path("clip.mov"), "mov");
        assert_eq!(video_ext_from_path("clip"), "mp4");
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type("jpg"), "image/jpeg");
        assert_eq!(mime_type("JPEG"), "image/jpeg");
        assert_eq!(mime_type("svg"), "image/svg+xml");
        assert_eq!(mime_type("m4v"), "video/mp4");
        assert_eq!(mime_type("aac"), "audio/mp4");
        assert_eq!(mime_type("mp3"), "audio/mpeg");
        assert_eq!(mime_type("unknown"), "image/png");
    }
}
