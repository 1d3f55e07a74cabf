//! # Gemini observing sites
//!
//! The two Gemini telescopes and the rule that maps a program id onto one of them:
//! every program id starts with `GS` (Gemini South, Cerro Pachón) or `GN`
//! (Gemini North, Maunakea).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::Degree;
use crate::gem_errors::GemError;

/// Geodetic description of an observatory.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservingSite {
    /// Observatory name, e.g. `Cerro Pachon`.
    pub name: &'static str,
    /// Short code used by the TOM, e.g. `cpo`.
    pub sitecode: &'static str,
    /// Geodetic latitude in **degrees**.
    pub latitude: Degree,
    /// Geodetic longitude in **degrees**, east positive.
    pub longitude: Degree,
    /// Elevation above sea level in **meters**.
    pub elevation: f64,
}

const CERRO_PACHON: ObservingSite = ObservingSite {
    name: "Cerro Pachon",
    sitecode: "cpo",
    latitude: -30.24075,
    longitude: -70.736694,
    elevation: 2722.,
};

const MAUNAKEA: ObservingSite = ObservingSite {
    name: "Maunakea",
    sitecode: "mko",
    latitude: 19.8238,
    longitude: -155.46905,
    elevation: 4213.,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Site {
    #[serde(rename = "GS")]
    GeminiSouth,
    #[serde(rename = "GN")]
    GeminiNorth,
}

impl Site {
    /// Resolve the site from the prefix of a program id (or observation id).
    ///
    /// Arguments
    /// ---------
    /// * `program_id`: e.g. `GS-2021A-Q-1`; the prefix is matched case-insensitively
    ///
    /// Return
    /// ------
    /// * the site, or [`GemError::UnknownSite`] for any other prefix
    pub fn from_program_id(program_id: &str) -> Result<Self, GemError> {
        let prefix = program_id.split('-').next().unwrap_or_default();
        match prefix.trim().to_uppercase().as_str() {
            "GS" => Ok(Site::GeminiSouth),
            "GN" => Ok(Site::GeminiNorth),
            _ => Err(GemError::UnknownSite(program_id.to_string())),
        }
    }

    /// Two-letter code used as key in the settings tables.
    pub fn code(&self) -> &'static str {
        match self {
            Site::GeminiSouth => "GS",
            Site::GeminiNorth => "GN",
        }
    }

    /// Telescope name understood by the astrometry routines.
    pub fn location(&self) -> &'static str {
        match self {
            Site::GeminiSouth => "Gemini South",
            Site::GeminiNorth => "Gemini North",
        }
    }

    pub fn observing_site(&self) -> &'static ObservingSite {
        match self {
            Site::GeminiSouth => &CERRO_PACHON,
            Site::GeminiNorth => &MAUNAKEA,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.location())
    }
}

/// All observing sites of the facility.
pub fn observing_sites() -> [&'static ObservingSite; 2] {
    [&CERRO_PACHON, &MAUNAKEA]
}
