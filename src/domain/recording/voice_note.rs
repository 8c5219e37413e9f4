//! Voice note value object

use super::format::AudioFormat;

/// Value object representing a finalized voice message.
/// Contains the encoded audio bytes and their format. An empty payload
/// is valid: a capture that produced no fragments still finalizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceNote {
    data: Vec<u8>,
    format: AudioFormat,
}

impl VoiceNote {
    /// Create a VoiceNote from encoded bytes
    pub fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Create a VoiceNote by concatenating ordered fragments.
    /// This is the default finalization: one payload, tagged with the
    /// negotiated format.
    pub fn from_fragments(fragments: Vec<Vec<u8>>, format: AudioFormat) -> Self {
        let data = fragments.concat();
        Self { data, format }
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the encoding format
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Encode the audio data as base64
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fragments_concatenates_in_order() {
        let note = VoiceNote::from_fragments(
            vec![vec![1, 2], vec![3], vec![4, 5, 6]],
            AudioFormat::Webm,
        );
        assert_eq!(note.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(note.format(), AudioFormat::Webm);
    }

    #[test]
    fn empty_capture_is_valid() {
        let note = VoiceNote::from_fragments(vec![], AudioFormat::Ogg);
        assert_eq!(note.size_bytes(), 0);
        assert_eq!(note.format(), AudioFormat::Ogg);
    }

    #[test]
    fn size_bytes() {
        let note = VoiceNote::new(vec![0u8; 1024], AudioFormat::Flac);
        assert_eq!(note.size_bytes(), 1024);
    }

    #[test]
    fn human_readable_size_bytes() {
        let note = VoiceNote::new(vec![0u8; 500], AudioFormat::Flac);
        assert_eq!(note.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let note = VoiceNote::new(vec![0u8; 2048], AudioFormat::Flac);
        assert_eq!(note.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let note = VoiceNote::new(vec![0u8; 2 * 1024 * 1024], AudioFormat::Flac);
        assert_eq!(note.human_readable_size(), "2.0 MB");
    }

    #[test]
    fn to_base64_round_trips() {
        let note = VoiceNote::new(vec![1, 2, 3, 4], AudioFormat::Wav);
        let b64 = note.to_base64();
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&b64)
            .unwrap();
        assert_eq!(decoded, vec![1, 2, 3, 4]);
    }

    #[test]
    fn into_data_consumes() {
        let note = VoiceNote::new(vec![9, 9], AudioFormat::Webm);
        assert_eq!(note.into_data(), vec![9, 9]);
    }
}
