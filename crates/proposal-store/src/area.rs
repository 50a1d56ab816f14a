//! Store areas

use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// One of the three directories documents live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Area {
    Modules,
    Covers,
    Exports,
}

impl Area {
    pub const ALL: [Area; 3] = [Area::Modules, Area::Covers, Area::Exports];

    pub fn as_str(self) -> &'static str {
        match self {
            Area::Modules => "modules",
            Area::Covers => "covers",
            Area::Exports => "exports",
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modules" => Ok(Area::Modules),
            "covers" => Ok(Area::Covers),
            "exports" => Ok(Area::Exports),
            other => Err(StoreError::UnknownArea(other.to_string())),
        }
    }
}
