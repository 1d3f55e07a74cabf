//! # Astrometry capability
//!
//! The payload builder needs two astrometric computations it does not own:
//!
//! 1. **Guide-star selection**: pick a guide star (and the position angle that makes it
//!    reachable) for a target, instrument and guide probe from a star catalog.
//! 2. **Parallactic angle** of a target at a given UT date and time from a given site.
//!
//! Both are behind the [`Astrometry`] trait so the builder can be driven by the real
//! routines, by [`BuiltinAstrometry`] or by a fake in tests.
//!
//! [`BuiltinAstrometry`] computes the parallactic angle itself (GMST, local hour angle and
//! the site latitude) but has no catalog access: its guide-star search never finds a star and
//! keeps the requested position angle.

use std::path::PathBuf;

use crate::constants::{Degree, Hour, RADEG, RADH};
use crate::form::{
    CloudCover, GuideProbe, IfuMode, ImageQuality, Instrument, IssPort, PaMode, SkyBackground,
};
use crate::gem_errors::GemError;
use crate::sites::Site;
use crate::time::{gmst, parse_epoch};

/// Everything a guide-star search is told about the observation.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideStarQuery {
    pub target_name: String,
    pub ra: Hour,
    pub dec: Degree,
    /// Candidate position angle in degrees.
    pub position_angle: Degree,
    pub site: Site,
    /// Padding of the wavefront-sensor field of view, arcsec.
    pub pad: f64,
    pub catalog: &'static str,
    pub instrument: Instrument,
    pub ifu: IfuMode,
    pub port: IssPort,
    pub probe: GuideProbe,
    pub chopping: bool,
    pub pa_mode: PaMode,
    /// Minimum search radius in arcmin, negative for the instrument default.
    pub min_radius: f64,
    pub iq: ImageQuality,
    pub cc: CloudCover,
    pub sb: SkyBackground,
    pub overwrite: bool,
    /// Directory receiving the finding chart.
    pub image_dir: PathBuf,
    pub display: bool,
    pub verbose: bool,
    pub figure_out: bool,
    pub figure_file: &'static str,
}

/// A guide star returned by the search.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideStar {
    pub name: String,
    /// Right ascension as returned by the catalog (sexagesimal string).
    pub ra: String,
    /// Declination as returned by the catalog (sexagesimal string).
    pub dec: String,
    /// UCAC magnitude (Vega).
    pub magnitude: f64,
}

/// Outcome of a guide-star search: the star, if one was found, and the position angle
/// the search settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideStarSelection {
    pub star: Option<GuideStar>,
    pub position_angle: Degree,
}

impl GuideStarSelection {
    /// A selection without star that keeps `position_angle`.
    pub fn empty(position_angle: Degree) -> Self {
        GuideStarSelection {
            star: None,
            position_angle,
        }
    }
}

pub trait Astrometry {
    /// Search a guide star for the observation described by `query`.
    fn select_guide_star(&self, query: &GuideStarQuery) -> Result<GuideStarSelection, GemError>;

    /// Parallactic angle in degrees
    ///
    /// Arguments
    /// ---------
    /// * `ra`: right ascension of the target in hours
    /// * `dec`: declination of the target in degrees
    /// * `date`: UT date `YYYY-MM-DD`
    /// * `time`: UT time `HH:MM:SS`
    /// * `site`: observing site
    fn parallactic_angle(
        &self,
        ra: Hour,
        dec: Degree,
        date: &str,
        time: &str,
        site: Site,
    ) -> Result<Degree, GemError>;
}

/// Astrometry without catalog access.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAstrometry;

impl Astrometry for BuiltinAstrometry {
    fn select_guide_star(&self, query: &GuideStarQuery) -> Result<GuideStarSelection, GemError> {
        tracing::warn!(
            target_name = %query.target_name,
            catalog = query.catalog,
            "no guide-star catalog available, submitting without guide star"
        );
        Ok(GuideStarSelection::empty(query.position_angle))
    }

    fn parallactic_angle(
        &self,
        ra: Hour,
        dec: Degree,
        date: &str,
        time: &str,
        site: Site,
    ) -> Result<Degree, GemError> {
        let epoch = parse_epoch(&format!("{date}T{time}"))?;
        let observatory = site.observing_site();

        let lst = gmst(epoch.to_mjd_utc_days()) + observatory.longitude * RADEG;
        let hour_angle = lst - ra * RADH;
        let latitude = observatory.latitude * RADEG;
        let dec = dec * RADEG;

        let angle = hour_angle
            .sin()
            .atan2(latitude.tan() * dec.cos() - dec.sin() * hour_angle.cos());
        if !angle.is_finite() {
            return Err(GemError::Astrometry(format!(
                "parallactic angle undefined at {date} {time}"
            )));
        }

        Ok((angle / RADEG).rem_euclid(360.0))
    }
}
