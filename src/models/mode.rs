//! Cloud provider address reservation modes.

use crate::error::ParseModeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Usable address convention applied by the subnet accountant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudMode {
    /// Classic RFC 950 accounting: network and broadcast reserved.
    Standard,
    #[serde(rename = "AWS")]
    Aws,
    Azure,
    #[serde(rename = "OCI")]
    Oci,
}

impl CloudMode {
    pub const ALL: [CloudMode; 4] = [
        CloudMode::Standard,
        CloudMode::Aws,
        CloudMode::Azure,
        CloudMode::Oci,
    ];

    /// Wire name of the mode (`Standard`, `AWS`, `Azure`, `OCI`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudMode::Standard => "Standard",
            CloudMode::Aws => "AWS",
            CloudMode::Azure => "Azure",
            CloudMode::Oci => "OCI",
        }
    }
}

impl fmt::Display for CloudMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive, matching the wire names.
impl FromStr for CloudMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CloudMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}
