//! Submission wizard steps

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven wizard steps in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Type,
    Upload,
    Details,
    Metadata,
    Artwork,
    Stores,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Type,
        WizardStep::Upload,
        WizardStep::Details,
        WizardStep::Metadata,
        WizardStep::Artwork,
        WizardStep::Stores,
        WizardStep::Review,
    ];

    /// 1-based step number shown in the wizard header
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Type => 1,
            WizardStep::Upload => 2,
            WizardStep::Details => 3,
            WizardStep::Metadata => 4,
            WizardStep::Artwork => 5,
            WizardStep::Stores => 6,
            WizardStep::Review => 7,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    /// Following step, `None` from Review
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WizardStep::Type => "type",
            WizardStep::Upload => "upload",
            WizardStep::Details => "details",
            WizardStep::Metadata => "metadata",
            WizardStep::Artwork => "artwork",
            WizardStep::Stores => "stores",
            WizardStep::Review => "review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts a step name (`details`) or number (`3`)
impl FromStr for WizardStep {
    type Err = mdist_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::from_number(n).ok_or_else(|| {
                mdist_common::Error::InvalidInput(format!("Step number out of range: {}", n))
            });
        }
        Self::ALL
            .iter()
            .copied()
            .find(|step| step.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| mdist_common::Error::InvalidInput(format!("Unknown wizard step: {}", s)))
    }
}
