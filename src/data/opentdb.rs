//! Open Trivia Database client.

use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use rand::Rng;
use reqwest::Url;
use serde::Deserialize;

use crate::QuizError;
use crate::data::html::decode_html;
use crate::models::{Question, Settings};

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";

/// Something that can supply questions for a set of quiz settings.
pub trait QuestionSource {
    fn fetch_questions(
        &self,
        settings: &Settings,
    ) -> impl Future<Output = Result<Vec<Question>, QuizError>> + Send;
}

/// Raw response body of `api.php`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

/// Meaning of the API's own `response_code` field.
pub fn response_code_message(code: u8) -> &'static str {
    match code {
        0 => "success",
        1 => "not enough questions for this query",
        2 => "invalid parameter",
        3 => "session token not found",
        4 => "session token exhausted",
        5 => "rate limited, wait a few seconds",
        _ => "unknown response code",
    }
}

#[derive(Debug, Clone)]
pub struct OpenTdbClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OpenTdbClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, QuizError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| QuizError::Validation(format!("invalid API URL {base_url}: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(QuizError::Network)?;
        Ok(Self { http, base_url })
    }

    pub fn request_url(&self, settings: &Settings) -> Url {
        build_request_url(&self.base_url, settings)
    }
}

impl QuestionSource for OpenTdbClient {
    async fn fetch_questions(&self, settings: &Settings) -> Result<Vec<Question>, QuizError> {
        let url = self.request_url(settings);
        info!("Fetching questions from: {url}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(QuizError::Network)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Question API returned HTTP {status}");
            return Err(QuizError::QuestionFetch(format!("HTTP status {status}")));
        }

        let body = response.text().await.map_err(QuizError::Network)?;
        let parsed: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| QuizError::QuestionFetch(format!("malformed response: {e}")))?;

        let questions = into_questions(parsed, &mut rand::thread_rng())?;
        info!("Questions loaded: {}", questions.len());
        Ok(questions)
    }
}

pub fn build_request_url(base: &Url, settings: &Settings) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("amount", &settings.num_questions.to_string())
        .append_pair("category", &settings.category)
        .append_pair("difficulty", settings.difficulty.as_str())
        .append_pair("type", "multiple");
    url
}

/// Checks the API status and turns raw results into shuffled, decoded questions.
pub fn into_questions<R: Rng + ?Sized>(
    response: ApiResponse,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    if response.response_code != 0 {
        return Err(QuizError::QuestionFetch(format!(
            "API response code {}: {}",
            response.response_code,
            response_code_message(response.response_code)
        )));
    }
    if response.results.is_empty() {
        return Err(QuizError::QuestionFetch("no questions returned".to_string()));
    }

    let questions: Vec<Question> = response
        .results
        .into_iter()
        .map(|raw| {
            Question::new(
                decode_html(&raw.question),
                decode_html(&raw.correct_answer),
                raw.incorrect_answers.iter().map(|a| decode_html(a)).collect(),
                &mut *rng,
            )
        })
        .collect();
    debug!("Normalized {} questions", questions.len());
    Ok(questions)
}
