use crate::error::AppError;
use std::path::Path;

/// Sanitizes a client-supplied filename so the result can never resolve
/// outside the storage root. Returns the sanitized name or an error if
/// nothing usable remains.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    // Get only the filename component (remove any path)
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.is_empty() {
        return Err(AppError::BadRequest("filename cannot be empty".to_string()));
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("path traversal attempt detected: {}", filename);
    }

    // Replace path separators and reserved characters; most Unicode is kept
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == '/'
                || c == '\\'
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // "." and ".." would resolve to directories, not files
    if sanitized.chars().all(|c| c == '.') {
        return Err(AppError::BadRequest(format!(
            "invalid filename '{filename}'"
        )));
    }

    // Limit length safely for UTF-8
    let sanitized = if sanitized.len() > 255 {
        let mut end = 255;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    };

    Ok(sanitized)
}

/// Validates content size against the configured maximum
pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), AppError> {
    if size > max_size {
        return Err(AppError::PayloadTooLarge);
    }
    Ok(())
}
