//! Audio encoding format value object

use std::fmt;

/// Encoding formats a capture backend may produce, in no particular order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Webm,
    Ogg,
    Flac,
    Wav,
}

/// Negotiation preference order: the first format the backend supports
/// wins. Backends that cannot report support at all get the default.
pub const PREFERRED_FORMATS: &[AudioFormat] = &[
    AudioFormat::Webm,
    AudioFormat::Ogg,
    AudioFormat::Flac,
    AudioFormat::Wav,
];

impl AudioFormat {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::Wav => "audio/wav",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }

    /// Pick the first preference the given predicate accepts, falling
    /// back to the default when nothing is supported.
    pub fn negotiate(supports: impl Fn(AudioFormat) -> bool) -> AudioFormat {
        PREFERRED_FORMATS
            .iter()
            .copied()
            .find(|&f| supports(f))
            .unwrap_or_default()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::Webm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_as_str() {
        assert_eq!(AudioFormat::Webm.as_str(), "audio/webm");
        assert_eq!(AudioFormat::Ogg.as_str(), "audio/ogg");
        assert_eq!(AudioFormat::Flac.as_str(), "audio/flac");
        assert_eq!(AudioFormat::Wav.as_str(), "audio/wav");
    }

    #[test]
    fn extension() {
        assert_eq!(AudioFormat::Webm.extension(), "webm");
        assert_eq!(AudioFormat::Flac.extension(), "flac");
    }

    #[test]
    fn negotiate_picks_first_supported() {
        let format = AudioFormat::negotiate(|f| f == AudioFormat::Flac || f == AudioFormat::Wav);
        assert_eq!(format, AudioFormat::Flac);
    }

    #[test]
    fn negotiate_respects_preference_order() {
        let format = AudioFormat::negotiate(|_| true);
        assert_eq!(format, AudioFormat::Webm);
    }

    #[test]
    fn negotiate_falls_back_to_default() {
        let format = AudioFormat::negotiate(|_| false);
        assert_eq!(format, AudioFormat::default());
    }

    #[test]
    fn default_is_webm() {
        assert_eq!(AudioFormat::default(), AudioFormat::Webm);
    }
}
