use reqwest::{Client, StatusCode};

use crate::constants::FACILITY_NAME;
use crate::gem_errors::GemError;
use crate::payload::ObservationPayload;
use crate::settings::GemSettings;
use crate::sites::Site;

/// Client of the ToO trigger endpoint of the Gemini portals.
///
/// One POST per submission, no retry. The site, and therefore the portal, is chosen from the
/// `prog` parameter of the payload.
#[derive(Debug, Clone)]
pub struct GemPortal {
    http_client: Client,
    settings: GemSettings,
}

/// Map the portal answer to the assigned observation numbers
///
/// Arguments
/// ---------
/// * `status`: HTTP status of the answer
/// * `body`: body of the answer, `<program id>-<observation number>` on success
///
/// Return
/// ------
/// * the observation number as a one-element list, [`GemError::ImproperCredentials`] for a
///   4xx status, [`GemError::HttpStatus`] for any other failure status
pub fn read_trigger_response(status: StatusCode, body: &str) -> Result<Vec<String>, GemError> {
    if status.is_client_error() {
        tracing::error!(%status, body, "ToO trigger refused");
        return Err(GemError::ImproperCredentials {
            facility: FACILITY_NAME.to_string(),
            body: body.to_string(),
        });
    }
    if !status.is_success() {
        return Err(GemError::HttpStatus {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let obsnum = body.split('-').next_back().unwrap_or_default().trim();
    Ok(vec![obsnum.to_string()])
}

impl GemPortal {
    /// Build a client for the portals described by `settings`.
    ///
    /// Return
    /// ------
    /// * The client, or an error if the TLS backend cannot be initialized
    pub fn new(settings: GemSettings) -> Result<Self, GemError> {
        let http_client = Client::builder()
            .danger_accept_invalid_certs(!settings.verify_tls)
            .build()?;
        Ok(GemPortal {
            http_client,
            settings,
        })
    }

    pub fn settings(&self) -> &GemSettings {
        &self.settings
    }

    /// ToO endpoint of the portal serving the program of `payload`.
    pub fn trigger_url(&self, payload: &ObservationPayload) -> Result<String, GemError> {
        let program_id = payload
            .get_string("prog")
            .ok_or_else(|| GemError::InvalidObservationId(String::new()))?;
        let site = Site::from_program_id(&program_id)?;
        Ok(format!("{}/too", self.settings.portal_url(site)?))
    }

    /// Send a ToO trigger
    ///
    /// Arguments
    /// ---------
    /// * `payload`: the request parameters built by the payload builder
    ///
    /// Return
    /// ------
    /// * the observation number assigned by the portal, as a one-element list
    pub async fn submit(&self, payload: &ObservationPayload) -> Result<Vec<String>, GemError> {
        let url = self.trigger_url(payload)?;
        tracing::info!(%url, "sending ToO trigger");

        let response = self.http_client.post(&url).query(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        read_trigger_response(status, &body)
    }
}
