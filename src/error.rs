use std::fmt;

#[derive(Debug)]
pub enum MorseError {
    /// `start` was called while a session is still playing.
    AlreadyPlaying,
    Audio(AudioError),
    Preference(PreferenceError),
}

#[derive(Debug)]
pub enum AudioError {
    NoOutputDevice,
    UnsupportedFormat { format: String },
    Stream { message: String },
}

#[derive(Debug)]
pub enum PreferenceError {
    Io { path: String, message: String },
    Malformed { path: String, message: String },
    NoConfigDir,
}

impl fmt::Display for MorseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MorseError::AlreadyPlaying => write!(f, "Playback already in progress"),
            MorseError::Audio(e) => write!(f, "Audio error: {e}"),
            MorseError::Preference(e) => write!(f, "Preference error: {e}"),
        }
    }
}

impl std::error::Error for MorseError {}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "No audio output device available"),
            AudioError::UnsupportedFormat { format } => {
                write!(f, "Unsupported output sample format '{format}'")
            }
            AudioError::Stream { message } => write!(f, "Output stream failed: {message}"),
        }
    }
}

impl std::error::Error for AudioError {}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceError::Io { path, message } => write!(f, "Cannot access '{path}': {message}"),
            PreferenceError::Malformed { path, message } => {
                write!(f, "Malformed preference file '{path}': {message}")
            }
            PreferenceError::NoConfigDir => write!(f, "No per-user config directory"),
        }
    }
}

impl std::error::Error for PreferenceError {}

impl From<AudioError> for MorseError {
    fn from(e: AudioError) -> Self {
        MorseError::Audio(e)
    }
}

impl From<PreferenceError> for MorseError {
    fn from(e: PreferenceError) -> Self {
        MorseError::Preference(e)
    }
}
