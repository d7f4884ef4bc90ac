//! URL validation and filename derivation

use crate::error::RelayError;
use url::Url;

/// Linux NAME_MAX
const NAME_MAX: usize = 255;

/// A URL that passed validation, with the filename the attachment will use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: Url,
    pub filename: String,
}

impl Target {
    /// Parse and validate raw user input
    ///
    /// Only `http` and `https` URLs with a host are accepted. The filename
    /// is the sanitized last path segment and must not be empty.
    pub fn parse(raw: &str) -> Result<Self, RelayError> {
        let url = Url::parse(raw.trim()).map_err(|_| RelayError::InvalidUrl)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RelayError::InvalidUrl);
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(RelayError::InvalidUrl);
        }

        let last = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("");
        let filename = sanitize_filename(last);
        if filename.is_empty() {
            return Err(RelayError::InvalidFilename);
        }

        Ok(Self { url, filename })
    }

    /// True when a query parameter name matches one of `params` exactly
    ///
    /// Pre-signed cloud storage links carry such a parameter and tend to be
    /// expired by the time they reach the bot.
    pub fn has_expiry_marker(&self, params: &[String]) -> bool {
        if params.is_empty() {
            return false;
        }
        self.url
            .query_pairs()
            .any(|(name, _)| params.iter().any(|p| p.as_str() == name))
    }
}

/// Reduce a path segment to a filename that is safe on any platform
///
/// - Whitespace becomes `_`
/// - Keeps only ASCII alphanumerics, `.`, `-` and `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to 255 bytes
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c.is_whitespace() {
            '_'
        } else if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            c
        } else {
            continue;
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    // ASCII only, so any byte index is a char boundary
    trimmed[..trimmed.len().min(NAME_MAX)].to_string()
}
