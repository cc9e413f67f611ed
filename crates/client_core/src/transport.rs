//! Remote hospital collection: the API seam used by the controllers and its
//! HTTP implementation.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{HospitalId, HospitalOperation, HospitalRecord},
    error::TransportFailure,
    protocol::{HospitalFields, HospitalList},
};
use tracing::{debug, warn};
use url::Url;

use crate::config::{parse_base_url, Settings, SettingsError};

#[async_trait]
pub trait HospitalApi: Send + Sync {
    async fn list(&self) -> Result<Vec<HospitalRecord>, TransportFailure>;
    /// Creates a record whose id is assigned by the server.
    async fn create(&self, fields: &HospitalFields) -> Result<HospitalRecord, TransportFailure>;
    /// Creates a record under a caller-chosen id. The response body is ignored.
    async fn create_with_id(&self, record: &HospitalRecord) -> Result<(), TransportFailure>;
    async fn update(&self, id: &HospitalId, fields: &HospitalFields)
        -> Result<(), TransportFailure>;
    async fn delete(&self, id: &HospitalId) -> Result<(), TransportFailure>;
}

pub struct HttpHospitalApi {
    http: Client,
    base_url: Url,
}

impl HttpHospitalApi {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Client for the list controller: `api_url` plus the configured timeout.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        Self::build(&settings.api_url, settings)
    }

    /// Client for the standalone create form, bound to `create_api_url`.
    pub fn for_create_form(settings: &Settings) -> Result<Self, SettingsError> {
        Self::build(&settings.create_api_url, settings)
    }

    fn build(raw_url: &str, settings: &Settings) -> Result<Self, SettingsError> {
        let base_url = parse_base_url(raw_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn hospitals_url(&self, id: Option<&HospitalId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("hospitals");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    async fn send(
        &self,
        operation: HospitalOperation,
        request: RequestBuilder,
    ) -> Result<Response, TransportFailure> {
        let response = request
            .send()
            .await
            .map_err(|err| transport_failure(operation, err))?;
        response
            .error_for_status()
            .map_err(|err| transport_failure(operation, err))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: HospitalOperation,
        request: RequestBuilder,
    ) -> Result<T, TransportFailure> {
        self.send(operation, request)
            .await?
            .json()
            .await
            .map_err(|err| transport_failure(operation, err))
    }
}

fn transport_failure(operation: HospitalOperation, err: reqwest::Error) -> TransportFailure {
    let failure = TransportFailure::new(operation, err.to_string());
    warn!(
        operation = %operation,
        status = err.status().map(|s| s.as_u16()),
        error = %failure.detail,
        "hospitals: request failed"
    );
    failure
}

#[async_trait]
impl HospitalApi for HttpHospitalApi {
    async fn list(&self) -> Result<Vec<HospitalRecord>, TransportFailure> {
        let url = self.hospitals_url(None);
        debug!(%url, "hospitals: GET collection");
        let hospitals: HospitalList = self
            .send_json(HospitalOperation::List, self.http.get(url))
            .await?;
        Ok(hospitals)
    }

    async fn create(&self, fields: &HospitalFields) -> Result<HospitalRecord, TransportFailure> {
        let url = self.hospitals_url(None);
        debug!(%url, "hospitals: POST new record");
        self.send_json(HospitalOperation::Create, self.http.post(url).json(fields))
            .await
    }

    async fn create_with_id(&self, record: &HospitalRecord) -> Result<(), TransportFailure> {
        let url = self.hospitals_url(None);
        debug!(%url, hospital_id = %record.id, "hospitals: POST record with client id");
        self.send(
            HospitalOperation::CreateWithId,
            self.http.post(url).json(record),
        )
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        id: &HospitalId,
        fields: &HospitalFields,
    ) -> Result<(), TransportFailure> {
        let url = self.hospitals_url(Some(id));
        debug!(%url, hospital_id = %id, "hospitals: PUT record");
        self.send(HospitalOperation::Update, self.http.put(url).json(fields))
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &HospitalId) -> Result<(), TransportFailure> {
        let url = self.hospitals_url(Some(id));
        debug!(%url, hospital_id = %id, "hospitals: DELETE record");
        self.send(HospitalOperation::Delete, self.http.delete(url))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
