//! GLSL version sniffing.
//!
//! The version is read from the first line of the fragment shader by plain
//! substring search over a fixed, ordered list of known numbers. The first
//! number found wins, so a line such as `#version 4000` reports `400`. That
//! ordering is the compatibility contract and must not be turned into token
//! matching.

use crate::error::RenderError;

/// Version numbers recognized on the `#version` line, in search order.
pub const SUPPORTED_VERSIONS: [u32; 14] = [
    100, 110, 120, 130, 140, 150, 300, 330, 400, 410, 420, 430, 440, 450,
];

/// Longest slice of the first line quoted back in diagnostics.
const MAX_QUOTED_CHARS: usize = 80;

/// Detects the GLSL version declared on the first line of `source`.
///
/// # Errors
///
/// - `MalformedShader` if `source` has no line terminator, or its first line
///   lacks `#version` (a `#version` further down does not count).
/// - `UnsupportedVersion` if the first line contains none of
///   [`SUPPORTED_VERSIONS`].
pub fn detect_version(source: &str) -> Result<u32, RenderError> {
    let end = source
        .find('\n')
        .ok_or_else(|| RenderError::MalformedShader("no end-of-line in shader".into()))?;
    let first_line = &source[..end];

    if !first_line.contains("#version") {
        return Err(RenderError::MalformedShader(
            "missing #version directive in first line of fragment shader".into(),
        ));
    }

    SUPPORTED_VERSIONS
        .iter()
        .copied()
        .find(|v| first_line.contains(&v.to_string()))
        .ok_or_else(|| RenderError::UnsupportedVersion {
            line: first_line.chars().take(MAX_QUOTED_CHARS).collect(),
        })
}
