//! # Facility settings
//!
//! This module defines [`GemSettings`], the **configuration object** handed to the payload
//! builder, the portal client and the facility. It provides:
//!
//! - The portal base URL of each site (the ToO endpoint is `<url>/too`).
//! - The ToO credential ("user key") of each site.
//! - The e-mail address of the submitting user.
//! - The table of programs and their observations offered in the observation form.
//! - Whether TLS certificates of the portal are verified.
//! - The directory where guide-star searches write their finding charts.
//!
//! Settings are read once, usually from a TOML file, and never mutated afterwards.
//!
//! ## Format
//!
//! ```toml
//! user_email = "someone@example.org"
//! verify_tls = false
//! image_dir = "/var/lib/tom/media"
//!
//! [portal_url]
//! GS = "https://gsodbtest.gemini.edu:8443"
//! GN = "https://gnodbtest.gemini.edu:8443"
//!
//! [api_key]
//! GS = "south-user-key"
//! GN = "north-user-key"
//!
//! [programs."GS-2021A-Q-1"]
//! "5" = "GMOS long-slit ToO"
//! ```
//!
//! Keys of `portal_url` and `api_key` are the site codes of [`Site`](crate::sites::Site).
//! Missing tables fall back to [`GemSettings::default`].
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::DEFAULT_PORTAL_URL;
use crate::gem_errors::GemError;
use crate::sites::Site;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GemSettings {
    /// Portal base URL keyed by site code.
    pub portal_url: BTreeMap<String, String>,
    /// ToO credential keyed by site code.
    pub api_key: BTreeMap<String, String>,
    /// E-mail address sent along with every request.
    pub user_email: String,
    /// Program id → (observation number → label).
    pub programs: BTreeMap<String, BTreeMap<String, String>>,
    /// Verify the portal TLS certificate. The test portals use self-signed certificates.
    pub verify_tls: bool,
    /// Directory receiving the finding charts of guide-star searches.
    pub image_dir: PathBuf,
}

impl Default for GemSettings {
    fn default() -> Self {
        let portal_url = [Site::GeminiSouth, Site::GeminiNorth]
            .iter()
            .map(|site| (site.code().to_string(), DEFAULT_PORTAL_URL.to_string()))
            .collect();

        GemSettings {
            portal_url,
            api_key: BTreeMap::new(),
            user_email: String::new(),
            programs: BTreeMap::new(),
            verify_tls: true,
            image_dir: PathBuf::from("."),
        }
    }
}

impl GemSettings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, GemError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load settings from a TOML file
    ///
    /// Arguments
    /// ---------
    /// * `path`: the settings file
    ///
    /// Return
    /// ------
    /// * The settings, or an error if the file cannot be read or is not valid TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GemError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Base URL of the portal serving `site`.
    pub fn portal_url(&self, site: Site) -> Result<&str, GemError> {
        self.portal_url
            .get(site.code())
            .map(|url| url.trim_end_matches('/'))
            .ok_or_else(|| GemError::MissingPortalUrl(site.code().to_string()))
    }

    /// Credential used for ToO triggers at `site`. An empty key counts as missing.
    pub fn api_key(&self, site: Site) -> Result<&str, GemError> {
        self.api_key
            .get(site.code())
            .map(String::as_str)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GemError::MissingCredential(site.code().to_string()))
    }
}
