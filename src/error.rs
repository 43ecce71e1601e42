/// Detail for a rejected command argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgumentError {
    /// The command line was too short to carry an argument. Holds the line length.
    Length(usize),
    /// The argument did not start with a number in the expected radix.
    Format,
    /// The argument parsed but lies outside the accepted range. Holds the parsed value.
    Range(u32),
}

impl core::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ArgumentError::Length(len) => write!(f, "illegal cmd length ({len})."),
            ArgumentError::Format => write!(f, "illegal value."),
            ArgumentError::Range(value) => write!(f, "illegal prbs load value ({value:x})."),
        }
    }
}

/// Errors reported by the exerciser's foreground operations.
///
/// None of these are fatal: the command loop prints them and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExerciserError {
    /// A command argument had the wrong length, format or range.
    InvalidArgument(ArgumentError),
    /// A capture test was requested while the periodic sampler is stopped.
    SamplerNotRunning,
    /// The sampler was asked to start while already running.
    AlreadyRunning,
    /// The command token is not recognised.
    UnknownCommand,
}

impl From<ArgumentError> for ExerciserError {
    fn from(err: ArgumentError) -> Self {
        ExerciserError::InvalidArgument(err)
    }
}

impl core::fmt::Display for ExerciserError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExerciserError::InvalidArgument(err) => write!(f, "{err}"),
            ExerciserError::SamplerNotRunning => write!(f, "Interrupts must be enabled."),
            ExerciserError::AlreadyRunning => write!(f, "sampler already running"),
            ExerciserError::UnknownCommand => write!(f, "unknown command"),
        }
    }
}
