//! Request construction and response validation shared by all endpoints.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::Scope;

use super::{ApiError, E2eClient};

impl E2eClient {
    /// Starts a request carrying the API key, bearer token and JSON content
    /// type. Scoped requests also carry `project_id` and `location`.
    pub(super) fn request(
        &self,
        method: Method,
        path: &str,
        scope: Option<&Scope>,
    ) -> RequestBuilder {
        let url = format!("{}{path}", self.endpoint);
        let mut query = vec![("apikey", self.api_key.clone())];
        if let Some(scoped) = scope {
            query.push(("project_id", scoped.project_id.to_string()));
            query.push(("location", scoped.location.as_str().to_owned()));
        }

        self.http
            .request(method, url)
            .query(&query)
            .bearer_auth(&self.auth_token)
            .header(CONTENT_TYPE, "application/json")
    }

    /// Sends the request and returns the body when the status matches
    /// `expected`.
    pub(super) async fn execute(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
        context: &str,
    ) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::transport(&err))?;
        let status = response.status();
        debug!(%context, status = status.as_u16(), "received API response");

        let body = response
            .text()
            .await
            .map_err(|err| ApiError::transport(&err))?;

        if status != expected {
            return Err(ApiError::Status {
                expected: expected.as_u16(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Sends the request and decodes a JSON body.
    pub(super) async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
        context: &str,
    ) -> Result<T, ApiError> {
        let body = self.execute(request, expected, context).await?;
        decode(context, &body)
    }
}

pub(super) fn decode<T: DeserializeOwned>(context: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::decode(context, &err))
}
