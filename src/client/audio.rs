use std::fmt;

use bytes::Bytes;

const FILE_STEM: &str = "recording";

/// Container format of a recording, derived from its media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Webm,
    Ogg,
    Mp3,
    Wav,
}

impl AudioFormat {
    /// Maps a media type such as `audio/ogg;codecs=opus` to a format.
    /// Unknown or empty types fall back to WebM.
    pub fn from_media_type(media_type: &str) -> Self {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let subtype = essence.rsplit('/').next().unwrap_or_default();
        match subtype {
            "ogg" | "opus" => AudioFormat::Ogg,
            "mpeg" | "mp3" => AudioFormat::Mp3,
            "wav" | "wave" | "x-wav" | "vnd.wave" => AudioFormat::Wav,
            _ => AudioFormat::Webm,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Webm => "webm",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Webm => "audio/webm",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A captured voice recording ready to upload.
#[derive(Debug, Clone)]
pub struct AudioClip {
    data: Bytes,
    media_type: String,
}

impl AudioClip {
    pub fn new(data: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn format(&self) -> AudioFormat {
        AudioFormat::from_media_type(&self.media_type)
    }

    /// Media type sent with the upload; the format's canonical type when the
    /// recorder reported none or something without a `type/subtype` pair.
    pub fn media_type(&self) -> &str {
        let essence = self.media_type.split(';').next().unwrap_or_default();
        match essence.trim().split_once('/') {
            Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => &self.media_type,
            _ => self.format().mime_type(),
        }
    }

    /// Upload file name, e.g. `recording.ogg`.
    pub fn file_name(&self) -> String {
        format!("{FILE_STEM}.{}", self.format().extension())
    }
}
