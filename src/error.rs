//! # Error Types
//!
//! All fallible operations in the drill return [`TrombaError`].
//!
//! Note resolution itself never fails: any integer pitch yields a [`Note`](crate::Note),
//! with an unplayable fingering when the pitch is outside the trumpet's table.
//! Errors only come from the edges of the system:
//!
//! - `PitchOutOfRange` - a pitch cannot be served by the loaded sample bank
//! - `InvalidRange` - a random range with `low > high`
//! - `SampleBankMismatch` / `SampleLoad` - startup failures while loading samples
//! - `AudioDevice` / `Resume` - audio output problems
//! - `Config` - unreadable or invalid drill configuration
//! - `Io` - terminal input/output failures in the CLI
//!
//! ## Usage
//! ```rust
//! use tromba::{SampleLayout, TrombaError};
//!
//! match SampleLayout::default().resolve(20) {
//!     Ok(selection) => println!("sample {}", selection.index),
//!     Err(TrombaError::PitchOutOfRange { pitch, lowest, highest }) => {
//!         eprintln!("{} is outside {}..={}", pitch, lowest, highest);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrombaError {
    /// The requested pitch maps to a sample index outside the bank.
    ///
    /// # Example
    /// ```
    /// # use tromba::TrombaError;
    /// let err = TrombaError::PitchOutOfRange { pitch: 30, lowest: 47, highest: 85 };
    /// assert_eq!(err.to_string(), "Pitch 30 is outside the sample range 47..=85");
    /// ```
    #[error("Pitch {pitch} is outside the sample range {lowest}..={highest}")]
    PitchOutOfRange { pitch: i32, lowest: i32, highest: i32 },

    /// A random selection range whose lower bound exceeds its upper bound.
    #[error("Invalid pitch range: lowest {low} is above highest {high}")]
    InvalidRange { low: i32, high: i32 },

    /// The number of loaded buffers does not match the sample layout.
    #[error("Sample bank expects {expected} buffers, got {actual}")]
    SampleBankMismatch { expected: usize, actual: usize },

    /// A sample file could not be read or decoded.
    #[error("Failed to load sample '{path}': {message}")]
    SampleLoad { path: String, message: String },

    /// The audio output device could not be opened or driven.
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Resuming a suspended audio output failed. Callers may retry on the next trigger.
    #[error("Failed to resume audio output: {0}")]
    Resume(String),

    /// Invalid drill configuration.
    ///
    /// # Example
    /// ```
    /// # use tromba::TrombaError;
    /// let err = TrombaError::Config("interval must be positive".to_string());
    /// assert_eq!(err.to_string(), "Invalid configuration: interval must be positive");
    /// ```
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for TrombaError {
    fn from(e: serde_yaml::Error) -> Self {
        TrombaError::Config(e.to_string())
    }
}

pub type Result<T, E = TrombaError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_not_config_errors() {
        let err: TrombaError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed").into();
        assert!(matches!(err, TrombaError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: stdout closed");
    }

    #[test]
    fn test_yaml_errors_are_config_errors() {
        let err: TrombaError = serde_yaml::from_str::<u32>("not a number").unwrap_err().into();
        assert!(matches!(err, TrombaError::Config(_)));
    }
}
