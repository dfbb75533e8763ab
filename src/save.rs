//! Final save: where completed submissions go.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::SaveError;
use crate::wizard::Submission;

/// Acknowledgement returned by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub reference: String,
}

/// Receives completed submissions.
#[async_trait]
pub trait SaveSink: Send + Sync {
    async fn save(&self, wizard_id: Uuid, submission: &Submission) -> Result<SaveReceipt, SaveError>;
}

#[derive(Serialize)]
struct Envelope<'a> {
    wizard_id: Uuid,
    #[serde(flatten)]
    submission: &'a Submission,
}

/// Writes each submission as a pretty JSON file under `dir`.
pub struct FileSaveSink {
    dir: PathBuf,
}

impl FileSaveSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, wizard_id: Uuid, submission: &Submission) -> PathBuf {
        self.dir
            .join(format!("{}-{wizard_id}.json", submission.form_type))
    }
}

#[async_trait]
impl SaveSink for FileSaveSink {
    async fn save(&self, wizard_id: Uuid, submission: &Submission) -> Result<SaveReceipt, SaveError> {
        let path = self.path_for(wizard_id, submission);
        let body = serde_json::to_vec_pretty(&Envelope {
            wizard_id,
            submission,
        })?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SaveError::Io {
                path: self.dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| SaveError::Io {
                path: path.clone(),
                source,
            })?;
        info!(wizard_id = %wizard_id, path = %path.display(), "Submission written");
        Ok(SaveReceipt {
            reference: path.display().to_string(),
        })
    }
}

/// Posts submissions as JSON to a backend endpoint.
pub struct HttpSaveSink {
    url: String,
    client: reqwest::Client,
}

/// Backends answer with either key of each pair, sometimes both.
#[derive(Deserialize)]
struct BackendReply {
    id: Option<String>,
    reference: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

impl BackendReply {
    fn reference(self) -> Option<String> {
        self.reference.or(self.id)
    }

    fn message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

impl HttpSaveSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SaveSink for HttpSaveSink {
    async fn save(&self, wizard_id: Uuid, submission: &Submission) -> Result<SaveReceipt, SaveError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&Envelope {
                wizard_id,
                submission,
            })
            .send()
            .await?;

        let status = resp.status();
        // Bodies are optional on both paths.
        let reply: Option<BackendReply> = resp.json().await.ok();

        if !status.is_success() {
            let message = reply
                .and_then(BackendReply::message)
                .unwrap_or_else(|| status.to_string());
            warn!(wizard_id = %wizard_id, status = status.as_u16(), error = %message, "Submission rejected");
            return Err(SaveError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let reference = reply
            .and_then(BackendReply::reference)
            .unwrap_or_else(|| wizard_id.to_string());
        info!(wizard_id = %wizard_id, %reference, "Submission posted");
        Ok(SaveReceipt { reference })
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Json;
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::wizard::{AccumulatedResult, FormType, StepPayload};

    fn submission() -> Submission {
        let mut steps = AccumulatedResult::new();
        steps.merge(1, StepPayload::new(json!({"first_name": "Ana"})));
        Submission {
            form_type: FormType::Individual,
            steps,
            submitted_at: Utc::now(),
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/submissions")
    }

    #[tokio::test]
    async fn file_sink_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSaveSink::new(dir.path().join("out"));
        let id = Uuid::new_v4();

        let receipt = sink.save(id, &submission()).await.unwrap();
        let written = std::fs::read_to_string(&receipt.reference).unwrap();
        let json: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["wizard_id"], id.to_string());
        assert_eq!(json["form_type"], "individual");
        assert_eq!(json["steps"]["1"]["first_name"], "Ana");
        assert!(receipt.reference.ends_with(&format!("individual-{id}.json")));
    }

    #[tokio::test]
    async fn http_sink_returns_backend_reference() {
        let app = Router::new().route(
            "/submissions",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["form_type"], "individual");
                Json(json!({"id": "KYC-42"}))
            }),
        );
        let sink = HttpSaveSink::new(serve(app).await);
        let receipt = sink.save(Uuid::new_v4(), &submission()).await.unwrap();
        assert_eq!(receipt.reference, "KYC-42");
    }

    #[tokio::test]
    async fn http_sink_surfaces_rejection() {
        let app = Router::new().route(
            "/submissions",
            post(|| async {
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"error": "duplicate applicant"})),
                )
            }),
        );
        let sink = HttpSaveSink::new(serve(app).await);
        let err = sink.save(Uuid::new_v4(), &submission()).await.unwrap_err();
        assert!(matches!(
            err,
            SaveError::Rejected { status: 422, ref message } if message == "duplicate applicant"
        ));
    }

    #[tokio::test]
    async fn http_sink_reads_replies_carrying_both_keys() {
        let app = Router::new().route(
            "/submissions",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({"error": "duplicate applicant", "message": "Conflict"})),
                )
            }),
        );
        let sink = HttpSaveSink::new(serve(app).await);
        let err = sink.save(Uuid::new_v4(), &submission()).await.unwrap_err();
        assert!(matches!(
            err,
            SaveError::Rejected { status: 409, ref message } if message == "duplicate applicant"
        ));

        let app = Router::new().route(
            "/submissions",
            post(|| async { Json(json!({"id": "row-7", "reference": "KYC-7"})) }),
        );
        let sink = HttpSaveSink::new(serve(app).await);
        let receipt = sink.save(Uuid::new_v4(), &submission()).await.unwrap();
        assert_eq!(receipt.reference, "KYC-7");
    }
}
