//! # Gemini ToO facility
//!
//! The observation-facility surface the TOM talks to. [`GemFacility`] wires together:
//!
//! 1. **Settings** ([`GemSettings`]) — portals, credentials, programs.
//! 2. **Astrometry** ([`Astrometry`]) — guide-star search and parallactic angle.
//! 3. **Payload builder** ([`PayloadBuilder`]) — form + target → request parameters.
//! 4. **Validator** ([`validate_observation`]) — airmass range.
//! 5. **Portal client** ([`GemPortal`]) — the ToO trigger request.
//!
//! ## Typical usage
//!
//! ```rust,no_run
//! use gem_too::astrometry::BuiltinAstrometry;
//! use gem_too::facility::{GemFacility, ObservationFacility};
//! use gem_too::form::ObservationForm;
//! use gem_too::settings::GemSettings;
//! use gem_too::targets::target_form::TargetForm;
//!
//! # async fn run() -> Result<(), gem_too::gem_errors::GemError> {
//! let settings = GemSettings::load("gem.toml")?;
//! let facility = GemFacility::new(settings, Box::new(BuiltinAstrometry))?;
//!
//! let target = TargetForm {
//!     identifier: "AT2021abc".into(),
//!     ra: Some("150.25".into()),
//!     dec: Some("-45.5".into()),
//!     ..Default::default()
//! }
//! .create(1)?;
//! let form = ObservationForm {
//!     obsid: "GS-2021A-Q-1-5".into(),
//!     ..Default::default()
//! };
//!
//! let errors = facility.is_valid(&form, &target);
//! if errors.is_empty() {
//!     let payload = facility.observation_payload(&form, &target)?;
//!     let ids = facility.submit_observation(&payload).await?;
//!     println!("triggered observation {}", ids[0]);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Status polling, observation URLs and archive products are not offered by the portal:
//! those methods return empty values.

use crate::astrometry::Astrometry;
use crate::builder::PayloadBuilder;
use crate::constants::{FACILITY_NAME, TERMINAL_OBSERVING_STATES};
use crate::form::{observation_choices, proposal_choices, ObservationForm};
use crate::gem_errors::GemError;
use crate::payload::ObservationPayload;
use crate::portal::GemPortal;
use crate::settings::GemSettings;
use crate::sites::{observing_sites, ObservingSite};
use crate::targets::Target;
use crate::validate::{
    error_tree, flatten_errors, validate_observation, FormErrors, ValidationErrors,
};

/// A data product of an observation.
#[derive(Debug, Clone, PartialEq)]
pub struct DataProduct {
    pub id: String,
    pub filename: String,
    pub created: String,
    pub url: String,
}

/// What the TOM expects from an observation facility.
#[allow(async_fn_in_trait)]
pub trait ObservationFacility {
    fn name(&self) -> &'static str;

    fn validate_observation(&self, payload: &ObservationPayload) -> ValidationErrors;

    /// Submit the request and return the ids of the created observations.
    async fn submit_observation(&self, payload: &ObservationPayload)
        -> Result<Vec<String>, GemError>;

    fn get_observation_url(&self, observation_id: &str) -> String;

    fn get_observation_status(&self, observation_id: &str) -> String;

    fn get_terminal_observing_states(&self) -> Vec<&'static str>;

    fn get_observing_sites(&self) -> Vec<&'static ObservingSite>;

    fn data_products(&self, observation_id: &str, product_id: Option<&str>) -> Vec<DataProduct>;
}

pub struct GemFacility {
    portal: GemPortal,
    astrometry: Box<dyn Astrometry>,
}

impl GemFacility {
    pub fn new(settings: GemSettings, astrometry: Box<dyn Astrometry>) -> Result<Self, GemError> {
        Ok(GemFacility {
            portal: GemPortal::new(settings)?,
            astrometry,
        })
    }

    pub fn settings(&self) -> &GemSettings {
        self.portal.settings()
    }

    /// Request parameters for `form` observing `target`.
    pub fn observation_payload(
        &self,
        form: &ObservationForm,
        target: &Target,
    ) -> Result<ObservationPayload, GemError> {
        PayloadBuilder::new(self.settings(), self.astrometry.as_ref()).build(form, target)
    }

    /// Validate the form the way the observation form does before submission
    ///
    /// Field constraints are checked first, then the payload is built and the business
    /// rules run on it. A payload that cannot be built is reported as a non-field error.
    ///
    /// Return
    /// ------
    /// * The errors to show on the form, empty when the form can be submitted
    pub fn is_valid(&self, form: &ObservationForm, target: &Target) -> FormErrors {
        let mut errors = FormErrors::default();
        for (field, messages) in form.field_errors() {
            for message in messages {
                errors.add_field_error(&field, message);
            }
        }

        match self.observation_payload(form, target) {
            Ok(payload) => {
                let validation = self.validate_observation(&payload);
                errors.extend(flatten_errors(
                    ObservationForm::has_field,
                    &error_tree(&validation),
                ));
            }
            Err(err) => errors.non_field_errors.push(err.to_string()),
        }

        errors
    }

    /// Programs offered in the observation form.
    pub fn proposal_choices(&self) -> Vec<(String, String)> {
        proposal_choices(self.settings())
    }

    /// Observations offered in the observation form.
    pub fn observation_choices(&self) -> Vec<(String, String)> {
        observation_choices(self.settings())
    }
}

impl ObservationFacility for GemFacility {
    fn name(&self) -> &'static str {
        FACILITY_NAME
    }

    fn validate_observation(&self, payload: &ObservationPayload) -> ValidationErrors {
        validate_observation(payload)
    }

    async fn submit_observation(
        &self,
        payload: &ObservationPayload,
    ) -> Result<Vec<String>, GemError> {
        self.portal.submit(payload).await
    }

    fn get_observation_url(&self, _observation_id: &str) -> String {
        String::new()
    }

    fn get_observation_status(&self, _observation_id: &str) -> String {
        String::new()
    }

    fn get_terminal_observing_states(&self) -> Vec<&'static str> {
        TERMINAL_OBSERVING_STATES.to_vec()
    }

    fn get_observing_sites(&self) -> Vec<&'static ObservingSite> {
        observing_sites().to_vec()
    }

    fn data_products(&self, _observation_id: &str, _product_id: Option<&str>) -> Vec<DataProduct> {
        Vec::new()
    }
}
