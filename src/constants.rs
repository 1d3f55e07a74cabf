//! # Constants and type definitions for gem-too
//!
//! This module centralizes the **unit conversions**, **type aliases** and the fixed
//! **guide-star search parameters** used throughout the crate.
//!
//! ## Overview
//!
//! - Angle conversions (degrees ↔ radians ↔ hours)
//! - Core type aliases used across the crate
//! - Parameters handed to every guide-star search
//! - Observation states the portal considers terminal

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours → radians
pub const RADH: f64 = DPI / 24.0;

/// Degrees of right ascension per hour
pub const DEG_PER_HOUR: f64 = 15.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;

/// Right ascension in hours
pub type Hour = f64;

/// Angle in arcseconds
pub type ArcSec = f64;

/// Angle in arcminutes
pub type ArcMin = f64;

/// Angle in radians
pub type Radian = f64;

// -------------------------------------------------------------------------------------------------
// Guide-star search parameters
// -------------------------------------------------------------------------------------------------

/// Padding applied to the wavefront sensor field of view, to absorb uncertainties in its shape
pub const GS_PAD: ArcSec = 7.0;

/// Minimum radius of the guide-star search, -1 selects the instrument default
pub const GS_MIN_RADIUS: ArcMin = -1.0;

/// Catalog queried by the guide-star search
pub const GS_CATALOG: &str = "UCAC4";

/// Chopping is no longer offered by any instrument
pub const GS_CHOPPING: bool = false;

/// Band and system attached to magnitudes returned by the guide-star search
pub const GS_MAG_SUFFIX: &str = "UC/Vega";

/// The search runs unattended: no interactive display of the field
pub const GS_DISPLAY: bool = false;

/// Silence the search's own progress output
pub const GS_VERBOSE: bool = false;

/// Write a finding chart of the selected field
pub const GS_FIGURE_OUT: bool = true;

/// Finding chart name, `default` lets the search derive it from the target
pub const GS_FIGURE_FILE: &str = "default";

// -------------------------------------------------------------------------------------------------
// Portal
// -------------------------------------------------------------------------------------------------

/// Name of the facility in the TOM
pub const FACILITY_NAME: &str = "GEM";

/// Fallback portal used when no settings are provided
pub const DEFAULT_PORTAL_URL: &str = "https://gsodbtest.gemini.edu:8443";

/// Observation states after which the portal no longer changes a request
pub const TERMINAL_OBSERVING_STATES: [&str; 2] = ["TRIGGERED", "ON_HOLD"];

/// Convert a right ascension from degrees to hours.
pub fn deg_to_hours(ra: Degree) -> Hour {
    ra / DEG_PER_HOUR
}
