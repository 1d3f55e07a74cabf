use serde::Deserialize;

use super::{OrbitalElements, SiderealCoordinates, Target, TargetKind, TargetType};
use crate::constants::Degree;
use crate::conversion::{parse_dec, parse_ra};
use crate::gem_errors::GemError;

/// Flat target form as submitted by the create/update views or a CSV row.
///
/// Every field is optional at this level; [`TargetForm::target_type`] decides which
/// subset is read, the other subset is ignored. Coordinates are strings so that both
/// decimal degrees and sexagesimal notation are accepted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TargetForm {
    pub identifier: String,
    pub name: String,
    pub designation: String,
    #[serde(rename = "type")]
    pub target_type: Option<TargetType>,

    pub ra: Option<String>,
    pub dec: Option<String>,
    pub epoch: Option<f64>,
    pub pm_ra: Option<f64>,
    pub pm_dec: Option<f64>,
    pub galactic_lng: Option<f64>,
    pub galactic_lat: Option<f64>,
    pub distance: Option<f64>,
    pub distance_err: Option<f64>,

    pub mean_anomaly: Option<f64>,
    pub arg_of_perihelion: Option<f64>,
    pub lng_asc_node: Option<f64>,
    pub inclination: Option<f64>,
    pub mean_daily_motion: Option<f64>,
    pub semimajor_axis: Option<f64>,
    pub ephemeris_period: Option<f64>,
    pub ephemeris_period_err: Option<f64>,
    pub ephemeris_epoch: Option<f64>,
    pub ephemeris_epoch_err: Option<f64>,
}

fn invalid(field: &str, reason: impl Into<String>) -> GemError {
    GemError::InvalidTargetField {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Read a required coordinate field and check its range.
fn coordinate(
    field: &str,
    value: Option<&str>,
    parse: fn(&str) -> Option<Degree>,
    range: std::ops::RangeInclusive<Degree>,
) -> Result<Degree, GemError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| invalid(field, "required for sidereal targets"))?;
    let degrees = parse(raw).ok_or_else(|| invalid(field, format!("cannot parse '{raw}'")))?;
    if !range.contains(&degrees) {
        return Err(invalid(
            field,
            format!(
                "{degrees} outside [{}, {}]",
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(degrees)
}

impl TargetForm {
    /// Type selected by the form, sidereal when left blank.
    pub fn target_type(&self) -> TargetType {
        self.target_type.unwrap_or_default()
    }

    fn kind(&self) -> Result<TargetKind, GemError> {
        match self.target_type() {
            TargetType::Sidereal => Ok(TargetKind::Sidereal(SiderealCoordinates {
                ra: coordinate("ra", self.ra.as_deref(), parse_ra, 0.0..=360.0)?,
                dec: coordinate("dec", self.dec.as_deref(), parse_dec, -90.0..=90.0)?,
                epoch: self.epoch,
                pm_ra: self.pm_ra,
                pm_dec: self.pm_dec,
                galactic_lng: self.galactic_lng,
                galactic_lat: self.galactic_lat,
                distance: self.distance,
                distance_err: self.distance_err,
            })),
            TargetType::NonSidereal => Ok(TargetKind::NonSidereal(OrbitalElements {
                mean_anomaly: self.mean_anomaly,
                arg_of_perihelion: self.arg_of_perihelion,
                lng_asc_node: self.lng_asc_node,
                inclination: self.inclination,
                mean_daily_motion: self.mean_daily_motion,
                semimajor_axis: self.semimajor_axis,
                ephemeris_period: self.ephemeris_period,
                ephemeris_period_err: self.ephemeris_period_err,
                ephemeris_epoch: self.ephemeris_epoch,
                ephemeris_epoch_err: self.ephemeris_epoch_err,
            })),
        }
    }

    /// Build a new target with the given id from the form.
    ///
    /// Arguments
    /// ---------
    /// * `id`: the id assigned to the new target
    ///
    /// Return
    /// ------
    /// * The target, or [`GemError::InvalidTargetField`] when the identifier is blank or a
    ///   sidereal target lacks valid coordinates
    pub fn create(&self, id: u64) -> Result<Target, GemError> {
        let identifier = self.identifier.trim();
        if identifier.is_empty() {
            return Err(invalid("identifier", "this field is required"));
        }

        Ok(Target {
            id,
            identifier: identifier.to_string(),
            name: self.name.trim().to_string(),
            designation: self.designation.trim().to_string(),
            kind: self.kind()?,
        })
    }
}

impl Target {
    /// Replace every field of the target with the form content, keeping its id.
    ///
    /// The target is left untouched when the form is invalid.
    pub fn update(&mut self, form: &TargetForm) -> Result<(), GemError> {
        *self = form.create(self.id)?;
        Ok(())
    }
}
