use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::Endpoint;
use crate::error::SubmitError;
use crate::model::SavePayload;

pub const SAVE_URL_MUTATION: &str = r#"
    mutation SaveUrl($input: SaveUrlInput!) {
      saveUrl(input: $input) {
        ... on SaveSuccess {
          url
          clientRequestId
        }
        ... on SaveError {
          errorCodes
          message
        }
      }
    }
"#;

pub const SET_LINK_ARCHIVED_MUTATION: &str = r#"
    mutation SetLinkArchived($input: ArchiveLinkInput!) {
      setLinkArchived(input: $input) {
        ... on ArchiveLinkSuccess {
          linkId
          message
        }
        ... on ArchiveLinkError {
          errorCodes
          message
        }
      }
    }
"#;

#[derive(Debug, Serialize)]
struct GraphQLRequest<V: Serialize> {
    query: &'static str,
    variables: V,
}

#[derive(Debug, Serialize)]
struct InputVariables<T: Serialize> {
    input: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArchiveLinkInput<'a> {
    link_id: &'a str,
    archived: bool,
}

/// Shared shape of the success/error unions Omnivore returns. Only the error
/// arm carries `errorCodes`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationResult {
    error_codes: Option<Vec<String>>,
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub url: String,
}

pub struct OmnivoreClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    strict: bool,
}

impl OmnivoreClient {
    pub fn new(endpoint: &Endpoint, strict: bool) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            api_url: format!("{}/api/graphql", endpoint.get_url()),
            api_key: endpoint.get_api_key().to_string(),
            strict,
        })
    }

    /// Submits one bookmark. Success is decided by the HTTP status unless the
    /// client is strict, in which case a `SaveError` result fails the item too.
    pub async fn save_url(&self, payload: &SavePayload) -> Result<Saved, SubmitError> {
        tracing::debug!(
            client_request_id = %payload.client_request_id,
            "saving {} to omnivore",
            payload.url
        );
        let data = self
            .execute(SAVE_URL_MUTATION, InputVariables { input: payload })
            .await?;
        self.check_result(data.as_ref(), "saveUrl", &payload.url)?;
        Ok(Saved {
            url: payload.url.clone(),
        })
    }

    /// Marks an Omnivore link as archived. The sync flow never calls this.
    pub async fn archive_article(&self, link_id: &str) -> Result<(), SubmitError> {
        let input = ArchiveLinkInput {
            link_id,
            archived: true,
        };
        let data = self
            .execute(SET_LINK_ARCHIVED_MUTATION, InputVariables { input })
            .await?;
        self.check_result(data.as_ref(), "setLinkArchived", link_id)
    }

    async fn execute<V: Serialize>(
        &self,
        query: &'static str,
        variables: V,
    ) -> Result<Option<JsonValue>, SubmitError> {
        let request = GraphQLRequest { query, variables };

        let response = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SubmitError::Status { status, body });
        }

        Ok(serde_json::from_str::<JsonValue>(&body)
            .ok()
            .and_then(|mut v| v.get_mut("data").map(JsonValue::take)))
    }

    fn check_result(
        &self,
        data: Option<&JsonValue>,
        field: &str,
        subject: &str,
    ) -> Result<(), SubmitError> {
        let result = data
            .and_then(|d| d.get(field))
            .and_then(|r| MutationResult::deserialize(r).ok())
            .unwrap_or_default();

        let Some(error_codes) = result.error_codes else {
            return Ok(());
        };

        if self.strict {
            return Err(SubmitError::Rejected {
                error_codes,
                message: result.message,
            });
        }

        // HTTP 200 with an error union still counts as saved unless strict.
        tracing::warn!(
            error_codes = ?error_codes,
            reason = result.message.as_deref().unwrap_or(""),
            "omnivore reported {} error for {}",
            field,
            subject
        );
        Ok(())
    }
}
