//! # Astronomical targets
//!
//! A [`Target`] is either **sidereal** (fixed equatorial coordinates, optional proper motion,
//! galactic coordinates and distance) or **non-sidereal** (orbital elements). The kind is a
//! tagged variant, so a target only carries the field subset that applies to it.
//!
//! Targets are created and updated from a flat [`TargetForm`](crate::targets::target_form::TargetForm)
//! whose `type` column selects the variant, and can be bulk-loaded from CSV with
//! [`import_targets`](crate::targets::import::import_targets).
//!
//! The payload builder only reads targets; nothing in the submission pipeline mutates them.
//!
//! ## Units
//!
//! - `ra`, `dec`, galactic coordinates and all orbital angles: **degrees**.
//! - `epoch`: Julian years.
//! - `pm_ra`, `pm_dec`: milliarcseconds per year.
//! - `distance`, `distance_err`: parsecs.
//! - `mean_daily_motion`: degrees per day; `semimajor_axis`: AU; ephemeris period/epoch: days.

pub mod import;
pub mod target_form;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::Degree;

/// Fields shared by every target type, in display order.
pub const GLOBAL_TARGET_FIELDS: [&str; 4] = ["identifier", "name", "designation", "type"];

/// Fields specific to sidereal targets.
pub const SIDEREAL_FIELDS: [&str; 9] = [
    "ra",
    "dec",
    "epoch",
    "pm_ra",
    "pm_dec",
    "galactic_lng",
    "galactic_lat",
    "distance",
    "distance_err",
];

/// Fields specific to non-sidereal targets.
pub const NON_SIDEREAL_FIELDS: [&str; 10] = [
    "mean_anomaly",
    "arg_of_perihelion",
    "lng_asc_node",
    "inclination",
    "mean_daily_motion",
    "semimajor_axis",
    "ephemeris_period",
    "ephemeris_period_err",
    "ephemeris_epoch",
    "ephemeris_epoch_err",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    #[default]
    #[serde(rename = "SIDEREAL")]
    Sidereal,
    #[serde(rename = "NON_SIDEREAL")]
    NonSidereal,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Sidereal => "SIDEREAL",
            TargetType::NonSidereal => "NON_SIDEREAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiderealCoordinates {
    pub ra: Degree,
    pub dec: Degree,
    pub epoch: Option<f64>,
    pub pm_ra: Option<f64>,
    pub pm_dec: Option<f64>,
    pub galactic_lng: Option<Degree>,
    pub galactic_lat: Option<Degree>,
    pub distance: Option<f64>,
    pub distance_err: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrbitalElements {
    pub mean_anomaly: Option<Degree>,
    pub arg_of_perihelion: Option<Degree>,
    pub lng_asc_node: Option<Degree>,
    pub inclination: Option<Degree>,
    pub mean_daily_motion: Option<f64>,
    pub semimajor_axis: Option<f64>,
    pub ephemeris_period: Option<f64>,
    pub ephemeris_period_err: Option<f64>,
    pub ephemeris_epoch: Option<f64>,
    pub ephemeris_epoch_err: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetKind {
    Sidereal(SiderealCoordinates),
    NonSidereal(OrbitalElements),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: u64,
    /// Identifier of the object, e.g. `Kelt-16b`.
    pub identifier: String,
    /// Common name, e.g. `Barnard's star`.
    pub name: String,
    pub designation: String,
    pub kind: TargetKind,
}

fn opt_to_string(value: Option<f64>) -> Option<String> {
    value.map(|v| v.to_string())
}

impl Target {
    pub fn target_type(&self) -> TargetType {
        match self.kind {
            TargetKind::Sidereal(_) => TargetType::Sidereal,
            TargetKind::NonSidereal(_) => TargetType::NonSidereal,
        }
    }

    /// Equatorial coordinates `(ra, dec)` in degrees, `None` for non-sidereal targets.
    pub fn coordinates(&self) -> Option<(Degree, Degree)> {
        match &self.kind {
            TargetKind::Sidereal(coords) => Some((coords.ra, coords.dec)),
            TargetKind::NonSidereal(_) => None,
        }
    }

    /// Field name → value listing of the target, restricted to the fields of its type.
    ///
    /// Return
    /// ------
    /// * The global fields followed by the type-specific ones, unset values as `None`
    pub fn as_dict(&self) -> Vec<(&'static str, Option<String>)> {
        let mut fields = vec![
            ("identifier", Some(self.identifier.clone())),
            ("name", Some(self.name.clone())),
            ("designation", Some(self.designation.clone())),
            ("type", Some(self.target_type().as_str().to_string())),
        ];

        let specific = match &self.kind {
            TargetKind::Sidereal(c) => vec![
                Some(c.ra.to_string()),
                Some(c.dec.to_string()),
                opt_to_string(c.epoch),
                opt_to_string(c.pm_ra),
                opt_to_string(c.pm_dec),
                opt_to_string(c.galactic_lng),
                opt_to_string(c.galactic_lat),
                opt_to_string(c.distance),
                opt_to_string(c.distance_err),
            ]
            .into_iter()
            .zip(SIDEREAL_FIELDS)
            .map(|(value, field)| (field, value))
            .collect::<Vec<_>>(),
            TargetKind::NonSidereal(e) => [
                e.mean_anomaly,
                e.arg_of_perihelion,
                e.lng_asc_node,
                e.inclination,
                e.mean_daily_motion,
                e.semimajor_axis,
                e.ephemeris_period,
                e.ephemeris_period_err,
                e.ephemeris_epoch,
                e.ephemeris_epoch_err,
            ]
            .into_iter()
            .zip(NON_SIDEREAL_FIELDS)
            .map(|(value, field)| (field, opt_to_string(value)))
            .collect(),
        };

        fields.extend(specific);
        fields
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier)
    }
}

/// Named collection of targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetList {
    pub name: String,
    pub targets: Vec<Target>,
}

impl TargetList {
    pub fn new(name: impl Into<String>) -> Self {
        TargetList {
            name: name.into(),
            targets: Vec::new(),
        }
    }

    pub fn get(&self, id: u64) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Target> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Next free id, one past the largest id in the list.
    pub fn next_id(&self) -> u64 {
        self.targets.iter().map(|t| t.id).max().map_or(1, |id| id + 1)
    }

    pub fn push(&mut self, target: Target) {
        self.targets.push(target);
    }
}
