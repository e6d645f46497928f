//! Channel identity

use serde::{Deserialize, Serialize};

use crate::{PrepError, PrepResult};

/// One of the two paired acquisitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Water-suppressed (primary) acquisition
    Suppressed,
    /// Unsuppressed reference acquisition
    Unsuppressed,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Suppressed, Channel::Unsuppressed];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Suppressed => 0,
            Self::Unsuppressed => 1,
        }
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Suppressed),
            1 => Some(Self::Unsuppressed),
            _ => None,
        }
    }
}

/// Number of channels taking part in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelCount {
    /// Suppressed acquisition only; two-channel corrections are skipped
    Single,
    /// Suppressed plus unsuppressed reference
    Pair,
}

impl ChannelCount {
    /// Decode the legacy "highest channel index" indicator (0 or 1)
    pub fn from_fid_index(fid: u32) -> PrepResult<Self> {
        match fid {
            0 => Ok(Self::Single),
            1 => Ok(Self::Pair),
            other => Err(PrepError::InvalidChannelIndicator(other)),
        }
    }

    pub fn from_len(len: usize) -> PrepResult<Self> {
        match len {
            1 => Ok(Self::Single),
            2 => Ok(Self::Pair),
            other => Err(PrepError::ChannelMismatch {
                expected: 2,
                actual: other,
            }),
        }
    }

    #[inline]
    pub fn count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Pair => 2,
        }
    }

    #[inline]
    pub fn is_pair(self) -> bool {
        self == Self::Pair
    }

    /// Channels in processing order
    pub fn channels(self) -> &'static [Channel] {
        &Channel::ALL[..self.count()]
    }
}
