//! Base64 image payload normalization.

use base64::{engine::general_purpose, Engine as _};

/// Strip an optional `data:image/...;base64,` prefix and any whitespace,
/// then confirm the remainder decodes as standard base64.
///
/// Returns the bare base64 string to send upstream.
pub fn normalize_base64_image(input: &str) -> Result<String, String> {
    let trimmed = input.trim();
    let payload = if trimmed.starts_with("data:") {
        match trimmed.split_once(',') {
            Some((header, rest)) if header.ends_with(";base64") => rest,
            _ => return Err("Image data URL must be base64 encoded".to_string()),
        }
    } else {
        trimmed
    };

    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err("No image data provided".to_string());
    }

    general_purpose::STANDARD
        .decode(&compact)
        .map_err(|e| format!("Image is not valid base64: {e}"))?;

    Ok(compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_base64_passes_through() {
        assert_eq!(normalize_base64_image("aGVsbG8=").unwrap(), "aGVsbG8=");
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let out = normalize_base64_image("data:image/png;base64,aGVs\nbG8=").unwrap();
        assert_eq!(out, "aGVsbG8=");
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(normalize_base64_image("   ").is_err());
        assert!(normalize_base64_image("data:image/png;base64,").is_err());
        assert!(normalize_base64_image("not base64!!").is_err());
        assert!(normalize_base64_image("data:image/png,rawbytes").is_err());
    }
}
