//! MIME detection from file signatures and URL extensions

/// Detect a media MIME type from the leading bytes of a file.
pub fn sniff_mimetype(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" {
        match &bytes[8..12] {
            b"WEBP" => return Some("image/webp"),
            b"AVI " => return Some("video/x-msvideo"),
            _ => {}
        }
    }
    if bytes.starts_with(b"BM") && bytes.len() >= 14 {
        return Some("image/bmp");
    }
    if bytes.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return Some("video/webm");
    }
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        return ftyp_brand(&bytes[8..12]);
    }
    None
}

/// ISO base media files: the major brand decides the kind of content.
fn ftyp_brand(brand: &[u8]) -> Option<&'static str> {
    match brand {
        b"qt  " => Some("video/quicktime"),
        b"heic" | b"heix" | b"mif1" => Some("image/heic"),
        b"avif" | b"avis" => Some("image/avif"),
        b"3gp4" | b"3gp5" | b"3gp6" | b"3g2a" => Some("video/3gpp"),
        b"isom" | b"iso2" | b"iso4" | b"iso5" | b"iso6" | b"mp41" | b"mp42" | b"avc1"
        | b"M4V " | b"M4VH" | b"M4VP" | b"dash" | b"mmp4" | b"msnv" | b"f4v " => {
            Some("video/mp4")
        }
        b"M4A " | b"M4B " | b"M4P " | b"F4A " => Some("audio/mp4"),
        _ => None,
    }
}

/// Guess a media MIME type from the path extension of a URL.
pub fn guess_from_extension(url: &str) -> Option<&'static str> {
    let parsed = url::Url::parse(url).ok()?;
    let file_name = parsed.path_segments()?.last()?;
    let (_, extension) = file_name.rsplit_once('.')?;

    let mimetype = match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "3gp" => "video/3gpp",
        "m4a" => "audio/mp4",
        _ => return None,
    };
    Some(mimetype)
}
