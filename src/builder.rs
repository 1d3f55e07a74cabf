//! # Payload builder
//!
//! Turns a cleaned [`ObservationForm`] and the referenced [`Target`] into the parameters of a
//! ToO trigger request ([`ObservationPayload`]).
//!
//! ## Pipeline
//!
//! 1. Split the observation id into program id and observation number; the program id prefix
//!    selects the site, which selects the credential.
//! 2. Copy target name and coordinates, note, readiness, and the optional brightness, group,
//!    timing window and elevation constraint.
//! 3. Resolve the guide star:
//!    - explicit guide-star fields in the form win, together with the form position angle;
//!    - otherwise the [`Astrometry`] guide-star search runs. With the parallactic PA mode the
//!      parallactic angle at the observation date is computed first and the search runs in
//!      `flip` mode with that angle. Without an observation date the search is skipped with a
//!      warning and the request goes out without guide star.
//! 4. Always add the position angle.
//!
//! The builder has no side effects besides logging; the target is only read.

use crate::astrometry::{Astrometry, GuideStarQuery};
use crate::constants::{
    deg_to_hours, Degree, GS_CATALOG, GS_CHOPPING, GS_DISPLAY, GS_FIGURE_FILE, GS_FIGURE_OUT,
    GS_MAG_SUFFIX, GS_MIN_RADIUS, GS_PAD, GS_VERBOSE,
};
use crate::form::{ObservationForm, PaMode};
use crate::gem_errors::GemError;
use crate::payload::{format_number, ObservationPayload};
use crate::settings::GemSettings;
use crate::sites::Site;
use crate::targets::Target;
use crate::time::iso_date_time;

/// Split an observation id on its last `-` into program id and observation number.
///
/// Arguments
/// ---------
/// * `obsid`: e.g. `GS-2021A-Q-1-5`
///
/// Return
/// ------
/// * `("GS-2021A-Q-1", "5")`, or [`GemError::InvalidObservationId`] when either part is empty
pub fn split_observation_id(obsid: &str) -> Result<(&str, &str), GemError> {
    let obsid = obsid.trim();
    match obsid.rsplit_once('-') {
        Some((program, number)) if !program.is_empty() && !number.is_empty() => {
            Ok((program, number))
        }
        _ => Err(GemError::InvalidObservationId(obsid.to_string())),
    }
}

/// Guide-star parameters of the request, empty name when there is no guide star.
#[derive(Debug, Clone, PartialEq)]
struct GuideStarFields {
    name: String,
    ra: String,
    dec: String,
    mags: String,
    position_angle: Degree,
}

impl GuideStarFields {
    fn none(position_angle: Degree) -> Self {
        GuideStarFields {
            name: String::new(),
            ra: String::new(),
            dec: String::new(),
            mags: String::new(),
            position_angle,
        }
    }
}

pub struct PayloadBuilder<'a> {
    settings: &'a GemSettings,
    astrometry: &'a dyn Astrometry,
}

impl<'a> PayloadBuilder<'a> {
    pub fn new(settings: &'a GemSettings, astrometry: &'a dyn Astrometry) -> Self {
        PayloadBuilder {
            settings,
            astrometry,
        }
    }

    /// Build the request parameters for `form` observing `target`
    ///
    /// Arguments
    /// ---------
    /// * `form`: the cleaned observation form
    /// * `target`: the target referenced by the form, must be sidereal
    ///
    /// Return
    /// ------
    /// * The payload, or an error when the observation id, site, credential, dates or
    ///   target cannot be used
    pub fn build(
        &self,
        form: &ObservationForm,
        target: &Target,
    ) -> Result<ObservationPayload, GemError> {
        let (program_id, obsnum) = split_observation_id(&form.obsid)?;
        let site = Site::from_program_id(program_id)?;
        let (ra, dec) = target
            .coordinates()
            .ok_or_else(|| GemError::NoSiderealCoordinates(target.identifier.clone()))?;

        let mut payload = ObservationPayload::new();
        payload.insert("prog", program_id);
        payload.insert("password", self.settings.api_key(site)?);
        payload.insert("email", self.settings.user_email.as_str());
        payload.insert("obsnum", obsnum);
        payload.insert("target", target_name(target));
        payload.insert("ra", ra);
        payload.insert("dec", dec);
        payload.insert("note", form.note.as_str());
        payload.insert("ready", form.ready.as_str());

        if let Some(brightness) = form.brightness {
            payload.insert(
                "mags",
                format!(
                    "{}/{}/{}",
                    format_number(brightness),
                    form.brightness_band,
                    form.brightness_system
                ),
            );
        }

        let group = form.group.trim();
        if !group.is_empty() {
            payload.insert("group", group);
        }

        if !form.window_start.trim().is_empty() {
            let (date, time) = iso_date_time(&form.window_start)?;
            let duration = form
                .window_duration
                .ok_or(GemError::MissingWindowDuration)?;
            payload.insert("windowDate", date);
            payload.insert("windowTime", time);
            payload.insert("windowDuration", duration.to_string());
        }

        if let Some(eltype) = form.eltype {
            payload.insert("elevationType", eltype.as_str());
            payload.insert("elevationMin", format_number(form.elmin));
            payload.insert("elevationMax", format_number(form.elmax));
        }

        let guide = if form.gstarg.trim().is_empty() {
            self.find_guide_star(form, target, site, ra, dec)?
        } else {
            explicit_guide_star(form)
        };

        if !guide.name.is_empty() {
            payload.insert("gstarget", guide.name);
            payload.insert("gsra", guide.ra);
            payload.insert("gsdec", guide.dec);
            payload.insert("gsmags", guide.mags);
            payload.insert("gsprobe", form.gsprobe.as_str());
        }

        payload.insert("posangle", format_number(guide.position_angle));

        tracing::debug!(?payload, "built observation payload");
        Ok(payload)
    }

    fn find_guide_star(
        &self,
        form: &ObservationForm,
        target: &Target,
        site: Site,
        ra: Degree,
        dec: Degree,
    ) -> Result<GuideStarFields, GemError> {
        let ra = deg_to_hours(ra);
        let mut position_angle = form.posangle;
        let mut pa_mode = form.pamode;

        if pa_mode == PaMode::Parallactic {
            if form.obsdate.trim().is_empty() {
                tracing::warn!(
                    obsid = %form.obsid,
                    "observation date must be set in order to calculate the parallactic angle"
                );
                return Ok(GuideStarFields::none(form.posangle));
            }
            let (date, time) = iso_date_time(&form.obsdate)?;
            position_angle = self
                .astrometry
                .parallactic_angle(ra, dec, &date, &time, site)?;
            // flip keeps the parallactic angle or its opposite, whichever reaches a guide star
            pa_mode = PaMode::Flip;
        }

        let query = GuideStarQuery {
            target_name: target_name(target).to_string(),
            ra,
            dec,
            position_angle,
            site,
            pad: GS_PAD,
            catalog: GS_CATALOG,
            instrument: form.inst,
            ifu: form.ifu,
            port: form.port,
            probe: form.gsprobe,
            chopping: GS_CHOPPING,
            pa_mode,
            min_radius: GS_MIN_RADIUS,
            iq: form.iq,
            cc: form.cc,
            sb: form.sb,
            overwrite: form.overwrite,
            image_dir: self.settings.image_dir.clone(),
            display: GS_DISPLAY,
            verbose: GS_VERBOSE,
            figure_out: GS_FIGURE_OUT,
            figure_file: GS_FIGURE_FILE,
        };
        let selection = self.astrometry.select_guide_star(&query)?;
        tracing::info!(?selection, "guide-star search finished");

        Ok(match selection.star {
            Some(star) if !star.name.trim().is_empty() => GuideStarFields {
                name: star.name,
                ra: star.ra,
                dec: star.dec,
                mags: format!("{}/{GS_MAG_SUFFIX}", format_number(star.magnitude)),
                position_angle: selection.position_angle,
            },
            _ => GuideStarFields::none(selection.position_angle),
        })
    }
}

/// Name sent to the portal: the target name, or its identifier when the name is blank.
fn target_name(target: &Target) -> &str {
    if target.name.trim().is_empty() {
        &target.identifier
    } else {
        &target.name
    }
}

fn explicit_guide_star(form: &ObservationForm) -> GuideStarFields {
    let mags = form
        .gsbrightness
        .map(|b| {
            format!(
                "{}/{}/{}",
                format_number(b),
                form.gsbrightness_band,
                form.gsbrightness_system
            )
        })
        .unwrap_or_default();

    GuideStarFields {
        name: form.gstarg.trim().to_string(),
        ra: form.gsra.trim().to_string(),
        dec: form.gsdec.trim().to_string(),
        mags,
        position_angle: form.posangle,
    }
}
