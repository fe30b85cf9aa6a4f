use async_trait::async_trait;
use friday_rs_protocol::ToolError;
use friday_rs_tools::{EmailMessage, Mailer, WebProvider, WebSearchResult};
use parking_lot::Mutex;

/// Web provider returning canned weather and search results.
#[derive(Debug, Clone, Default)]
pub struct StubWebProvider {
    weather: Option<String>,
    results: Vec<WebSearchResult>,
}

impl StubWebProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weather(mut self, report: impl Into<String>) -> Self {
        self.weather = Some(report.into());
        self
    }

    pub fn with_result(
        mut self,
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        self.results.push(WebSearchResult {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        });
        self
    }
}

#[async_trait]
impl WebProvider for StubWebProvider {
    async fn weather(&self, city: &str) -> Result<String, ToolError> {
        self.weather
            .clone()
            .ok_or_else(|| ToolError::ExecutionFailed(format!("no weather for {city}")))
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<WebSearchResult>, ToolError> {
        Ok(self.results.iter().take(limit).cloned().collect())
    }
}

/// Mailer that keeps sent messages, or fails every send when built with
/// [`RecordingMailer::failing`].
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    failure: Option<ToolError>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ToolError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<(), ToolError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.sent.lock().push(message);
        Ok(())
    }
}
