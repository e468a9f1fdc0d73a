use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    SignableBody, SignableRequest, SigningSettings, sign,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;

use crate::error::GenerateError;

/// Service name SigV4 signatures are scoped to.
pub(crate) const SIGNING_SERVICE: &str = "sagemaker";

/// Builds a SigV4-signed POST request for a SageMaker runtime endpoint.
/// The signature covers the JSON body and the content-type header.
pub(crate) fn signed_request(
    url: &str,
    region: &str,
    access_key: &str,
    secret_key: &str,
    session_token: Option<&str>,
    body: String,
) -> Result<reqwest::Request, GenerateError> {
    let identity: Identity = Credentials::new(
        access_key,
        secret_key,
        session_token.map(str::to_owned),
        None,
        "endpoint-config",
    )
    .into();

    let params = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(SIGNING_SERVICE)
        .time(SystemTime::now())
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| GenerateError::Signing(e.to_string()))?;

    let signable = SignableRequest::new(
        "POST",
        url,
        [("content-type", "application/json")].into_iter(),
        SignableBody::Bytes(body.as_bytes()),
    )
    .map_err(|e| GenerateError::Signing(e.to_string()))?;

    let (instructions, _signature) = sign(signable, &params.into())
        .map_err(|e| GenerateError::Signing(e.to_string()))?
        .into_parts();

    let mut request = http::Request::builder()
        .method(http::Method::POST)
        .uri(url)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body)
        .map_err(|e| GenerateError::Signing(e.to_string()))?;
    instructions.apply_to_request_http1x(&mut request);

    Ok(reqwest::Request::try_from(request)?)
}
