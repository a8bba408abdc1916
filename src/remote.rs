//! EPS conversion through an external service.
//!
//! There is no local EPS writer. The captured PNG is posted as a `data:` URI
//! and the service answers with the EPS bytes.

use core::fmt;
use std::io::Read;
use std::time::Duration;

use serde::Serialize;

use crate::datauri;
use crate::error::ExportError;

/// Turns a PNG into EPS bytes.
pub trait EpsConverter: fmt::Debug + Send + Sync {
    fn convert(&self, png: &[u8]) -> Result<Vec<u8>, ExportError>;
}

#[derive(Serialize)]
struct ConvertRequest<'a> {
    image: &'a str,
}

/// Converter backed by an HTTP endpoint.
///
/// Sends `POST {"image": "data:image/png;base64,..."}` and expects HTTP 200
/// with the EPS document as the body. Any other status fails the export.
pub struct HttpEpsConverter {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpEpsConverter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            endpoint: endpoint.into(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for HttpEpsConverter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HttpEpsConverter")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl EpsConverter for HttpEpsConverter {
    fn convert(&self, png: &[u8]) -> Result<Vec<u8>, ExportError> {
        let uri = datauri::encode("image/png", png);
        log::debug!("posting {} bytes of PNG to {}", png.len(), self.endpoint);
        let response = self
            .agent
            .post(&self.endpoint)
            .send_json(&ConvertRequest { image: &uri })?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(ExportError::RemoteStatus(status));
        }
        // EPS from the service is hex encoded and easily passes ureq's
        // default read_to_vec limit at download sizes.
        let mut eps = Vec::new();
        response.into_body().into_reader().read_to_end(&mut eps)?;
        log::debug!("conversion service returned {} bytes", eps.len());
        Ok(eps)
    }
}
