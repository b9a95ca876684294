mod api;
pub mod decode;
pub mod graphite;
pub mod model;
pub mod points;
pub mod poll;

use std::collections::HashMap;

use serde::Serialize;

use api::response::SectionList;
use model::{ConnectedDevice, Device, Section};

pub use api::response::{PropertyValue, SectionValues};

#[derive(Debug, Clone)]
pub enum Error {
    ApiError(String),
    InvalidResponse(String, String),
    UnexpectedApiResponse,
    SinkError(String),
    InternalError,
}

pub fn device(host: &str) -> Device {
    Device {
        api_url: format!("https://{}{}", host, api::endpoint::READ_VALUES),
    }
}

/// Build the HTTP client for `device`. SENEC units serve a self-signed
/// certificate, so verification is switched off for this client only.
pub fn connect(device: &Device) -> Result<ConnectedDevice, Error> {
    let client = reqwest::ClientBuilder::new()
        .danger_accept_invalid_certs(true)
        .build()
        .or(Err(Error::InternalError))?;

    Ok(ConnectedDevice {
        api_url: device.api_url.to_owned(),
        client,
    })
}

async fn post<T: Serialize>(device: &ConnectedDevice, body: &T) -> Result<String, Error> {
    device
        .client
        .post(&device.api_url)
        .json(body)
        .send()
        .await
        .map_err(|e| Error::ApiError(e.to_string()))?
        .error_for_status()
        .map_err(|e| Error::ApiError(e.to_string()))?
        .text()
        .await
        .map_err(|e| {
            Error::InvalidResponse(
                e.to_string(),
                String::from("Error reading text from API response"),
            )
        })
}

/// Ask the device which sections it has. Done once at startup; the set
/// cannot change while the device is running.
pub async fn sections(device: &ConnectedDevice) -> Result<Vec<Section>, Error> {
    let request_body = HashMap::from([
        ("DEBUG", serde_json::json!({ "SECTIONS": "" })),
        ("PLAIN", serde_json::json!({ "SECTIONS": "" })),
    ]);

    let response_text = post(device, &request_body).await?;
    let names: SectionList = serde_json::from_str(&response_text)
        .map_err(|e| Error::InvalidResponse(e.to_string(), response_text))?;

    /* section names share the tagging habit of status values */
    Ok(names
        .0
        .into_iter()
        .map(|name| Section {
            name: name.strip_prefix("st_").unwrap_or(&name).to_owned(),
        })
        .collect())
}

/// Read the current values of one section.
pub async fn read_section(
    device: &ConnectedDevice,
    section: &Section,
) -> Result<SectionValues, Error> {
    let request_body = HashMap::from([(section.name.as_str(), serde_json::json!({}))]);

    let response_text = post(device, &request_body).await?;
    let mut response: HashMap<String, SectionValues> = serde_json::from_str(&response_text)
        .map_err(|e| Error::InvalidResponse(e.to_string(), response_text))?;

    response
        .remove(&section.name)
        .ok_or(Error::UnexpectedApiResponse)
}
