//! The fixed catalogue of page sections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::PortfolioError;

/// Identifier of one named content region of the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Profile,
    SkillSet,
    Timeline,
    Project,
    Contact,
}

impl SectionId {
    /// Every section, in page order. The first entry is the initial active section.
    pub const ALL: [SectionId; 5] = [
        SectionId::Profile,
        SectionId::SkillSet,
        SectionId::Timeline,
        SectionId::Project,
        SectionId::Contact,
    ];

    pub const fn first() -> SectionId {
        Self::ALL[0]
    }

    /// Text shown in the headline and the nav.
    pub const fn label(self) -> &'static str {
        match self {
            SectionId::Profile => "PROFILE",
            SectionId::SkillSet => "SKILL SET",
            SectionId::Timeline => "TIMELINE",
            SectionId::Project => "PROJECT",
            SectionId::Contact => "CONTACT",
        }
    }

    /// DOM-safe identifier, used as element id and anchor fragment.
    pub const fn slug(self) -> &'static str {
        match self {
            SectionId::Profile => "profile",
            SectionId::SkillSet => "skill-set",
            SectionId::Timeline => "timeline",
            SectionId::Project => "project",
            SectionId::Contact => "contact",
        }
    }

    pub fn anchor(self) -> String {
        format!("#{}", self.slug())
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SectionId {
    type Err = PortfolioError;

    /// Accepts the label (`SKILL SET`), the slug (`skill-set`) or the
    /// snake name (`SKILL_SET`), ignoring case and a leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .trim_start_matches('#')
            .chars()
            .map(|c| match c {
                ' ' | '_' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        SectionId::ALL
            .into_iter()
            .find(|section| section.slug() == key)
            .ok_or_else(|| PortfolioError::UnknownSection(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for SectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
