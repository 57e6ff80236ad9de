//! Frame model for the glove telegram protocol
//!
//! A frame (telegram) is one complete set of the three labeled lines
//! `Flex:`, `Accel:`, `Gyro:` — a single snapshot of the glove's sensors.
//! The device interleaves the lines freely and pads them with boot noise,
//! so a frame is accumulated rather than read in one shot.

pub mod accumulator;
pub mod parser;

pub use accumulator::read_frame;
pub use parser::parse_channel_payload;

use serde::Serialize;
use std::fmt;

/// Default bound on classified lines consulted per frame attempt
pub const DEFAULT_LINE_BOUND: usize = 20;

/// One of the three named sensor groups within a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Flex sensors (finger bend)
    Flex,
    /// Accelerometer axes
    Accel,
    /// Gyroscope axes
    Gyro,
}

impl Channel {
    /// Line prefix identifying this channel on the wire, colon included
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Flex => "Flex:",
            Self::Accel => "Accel:",
            Self::Gyro => "Gyro:",
        }
    }

    /// Classify a line by exact prefix match, returning the channel and the
    /// payload after the colon. Lines with any other prefix are not frame
    /// lines and return `None`.
    pub fn classify(line: &str) -> Option<(Channel, &str)> {
        for channel in [Self::Flex, Self::Accel, Self::Gyro] {
            if let Some(payload) = line.strip_prefix(channel.prefix()) {
                return Some((channel, payload));
            }
        }
        None
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flex => write!(f, "flex"),
            Self::Accel => write!(f, "accel"),
            Self::Gyro => write!(f, "gyro"),
        }
    }
}

/// One multi-sensor snapshot assembled from labeled telegram lines
///
/// Each slot is absent until its line has been seen and parsed. Sequence
/// lengths are whatever the source lines carried; arity is validated at the
/// persistence boundary, not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reading {
    /// Flex sensor values, absent until a `Flex:` line parses
    pub flex: Option<Vec<f64>>,
    /// Accelerometer values, absent until an `Accel:` line parses
    pub accel: Option<Vec<f64>>,
    /// Gyroscope values, absent until a `Gyro:` line parses
    pub gyro: Option<Vec<f64>>,
}

impl Reading {
    /// A reading is complete iff all three slots are populated
    pub fn is_complete(&self) -> bool {
        self.flex.is_some() && self.accel.is_some() && self.gyro.is_some()
    }

    /// Channels still absent from this reading
    pub fn missing(&self) -> Vec<Channel> {
        let mut out = Vec::new();
        if self.flex.is_none() {
            out.push(Channel::Flex);
        }
        if self.accel.is_none() {
            out.push(Channel::Accel);
        }
        if self.gyro.is_none() {
            out.push(Channel::Gyro);
        }
        out
    }

    /// Store a parse result into the slot for `channel`, overwriting any
    /// prior value from this attempt
    pub fn set(&mut self, channel: Channel, values: Option<Vec<f64>>) {
        match channel {
            Channel::Flex => self.flex = values,
            Channel::Accel => self.accel = values,
            Channel::Gyro => self.gyro = values,
        }
    }
}

/// How a frame attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadStatus {
    /// All three channels populated
    Complete,
    /// Line bound exhausted with at least one channel absent
    Incomplete,
}

/// A reading tagged with how the attempt ended
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadOutcome {
    /// The assembled (possibly partial) reading
    pub reading: Reading,
    /// Completion status
    pub status: ReadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_recognized_prefixes() {
        assert_eq!(
            Channel::classify("Flex:1,2,3,4,5"),
            Some((Channel::Flex, "1,2,3,4,5"))
        );
        assert_eq!(
            Channel::classify("Accel:9.8,0.0,0.0"),
            Some((Channel::Accel, "9.8,0.0,0.0"))
        );
        assert_eq!(
            Channel::classify("Gyro:0.1,0.2,0.3"),
            Some((Channel::Gyro, "0.1,0.2,0.3"))
        );
    }

    #[test]
    fn test_classify_is_exact_and_case_sensitive() {
        assert_eq!(Channel::classify("flex:1,2"), None);
        assert_eq!(Channel::classify("Temp:21.5"), None);
        assert_eq!(Channel::classify("Flex=1,2"), None);
        assert_eq!(Channel::classify(""), None);
    }

    #[test]
    fn test_classify_keeps_payload_untouched() {
        // Payload whitespace is the parser's business, not the classifier's.
        assert_eq!(Channel::classify("Flex: 1, 2"), Some((Channel::Flex, " 1, 2")));
    }

    #[test]
    fn test_reading_completeness() {
        let mut reading = Reading::default();
        assert!(!reading.is_complete());
        assert_eq!(
            reading.missing(),
            vec![Channel::Flex, Channel::Accel, Channel::Gyro]
        );

        reading.set(Channel::Flex, Some(vec![1.0]));
        reading.set(Channel::Gyro, Some(vec![2.0]));
        assert!(!reading.is_complete());
        assert_eq!(reading.missing(), vec![Channel::Accel]);

        reading.set(Channel::Accel, Some(vec![3.0]));
        assert!(reading.is_complete());
        assert!(reading.missing().is_empty());
    }

    #[test]
    fn test_set_overwrites_slot() {
        let mut reading = Reading::default();
        reading.set(Channel::Flex, Some(vec![1.0, 2.0]));
        reading.set(Channel::Flex, None);
        assert_eq!(reading.flex, None);
        reading.set(Channel::Flex, Some(vec![3.0]));
        assert_eq!(reading.flex, Some(vec![3.0]));
    }
}
