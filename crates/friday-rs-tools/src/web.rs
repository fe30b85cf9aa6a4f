//! Web provider interfaces and the HTTP implementation for weather and search.

use async_trait::async_trait;
use friday_rs_config::WebConfig;
use friday_rs_protocol::ToolError;
use log::{debug, warn};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Search result returned by a web provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResult {
    /// Result title.
    pub title: String,
    /// Result URL, empty for direct answers.
    pub url: String,
    /// Result snippet.
    pub snippet: String,
}

/// Web provider interface for weather and search lookups.
#[async_trait]
pub trait WebProvider: Send + Sync {
    /// One-line weather report for a city.
    async fn weather(&self, city: &str) -> Result<String, ToolError>;
    /// Perform a web search query.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<WebSearchResult>, ToolError>;
}

/// Provider backed by wttr.in and the DuckDuckGo Instant Answer API.
#[derive(Debug, Clone)]
pub struct HttpWebProvider {
    client: Client,
    weather_url: Url,
    search_url: Url,
}

impl HttpWebProvider {
    /// Build a provider from the web config section.
    pub fn new(config: &WebConfig) -> Result<Self, ToolError> {
        let client = Client::builder()
            .user_agent(concat!("friday-rs/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ToolError::Unavailable(format!("http client unavailable: {err}")))?;
        Ok(Self {
            client,
            weather_url: parse_url(&config.weather_url)?,
            search_url: parse_url(&config.search_url)?,
        })
    }

    fn weather_request_url(&self, city: &str) -> Result<Url, ToolError> {
        let mut url = self.weather_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ToolError::Unavailable(format!("invalid weather url: {}", self.weather_url))
            })?
            .pop_if_empty()
            .push(city);
        url.query_pairs_mut().append_pair("format", "3");
        Ok(url)
    }

    fn search_request_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("no_html", "1")
            .append_pair("skip_disambig", "1");
        url
    }
}

fn parse_url(raw: &str) -> Result<Url, ToolError> {
    Url::parse(raw).map_err(|err| ToolError::Unavailable(format!("invalid url '{raw}': {err}")))
}

fn http_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        ToolError::ExecutionFailed("request timed out".to_string())
    } else {
        ToolError::ExecutionFailed(err.to_string())
    }
}

#[async_trait]
impl WebProvider for HttpWebProvider {
    async fn weather(&self, city: &str) -> Result<String, ToolError> {
        let url = self.weather_request_url(city)?;
        debug!("requesting weather (city_len={})", city.len());
        let response = self.client.get(url).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            warn!("weather service failed (status={})", status.as_u16());
            return Err(ToolError::ExecutionFailed(format!(
                "service returned status {} for {city}",
                status.as_u16()
            )));
        }
        let body = response.text().await.map_err(http_error)?;
        Ok(body.trim().to_string())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<WebSearchResult>, ToolError> {
        let url = self.search_request_url(query);
        debug!("searching web (query_len={}, limit={})", query.len(), limit);
        let response = self.client.get(url).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            warn!("search service failed (status={})", status.as_u16());
            return Err(ToolError::ExecutionFailed(format!(
                "search service returned status {}",
                status.as_u16()
            )));
        }
        let answer = response
            .json::<InstantAnswer>()
            .await
            .map_err(http_error)?;
        Ok(answer.into_results(limit))
    }
}

/// Subset of the DuckDuckGo Instant Answer response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct InstantAnswer {
    heading: String,
    abstract_text: String,
    #[serde(rename = "AbstractURL")]
    abstract_url: String,
    answer: Value,
    definition: String,
    #[serde(rename = "DefinitionURL")]
    definition_url: String,
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Entry {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics", default)]
        topics: Vec<RelatedTopic>,
    },
}

impl InstantAnswer {
    fn into_results(self, limit: usize) -> Vec<WebSearchResult> {
        let mut results = Vec::new();
        if let Some(answer) = self.answer.as_str()
            && !answer.trim().is_empty()
        {
            results.push(WebSearchResult {
                title: "Answer".to_string(),
                url: String::new(),
                snippet: answer.trim().to_string(),
            });
        }
        if !self.abstract_text.trim().is_empty() {
            let title = if self.heading.is_empty() {
                "Summary".to_string()
            } else {
                self.heading.clone()
            };
            results.push(WebSearchResult {
                title,
                url: self.abstract_url.clone(),
                snippet: self.abstract_text.trim().to_string(),
            });
        }
        if !self.definition.trim().is_empty() {
            results.push(WebSearchResult {
                title: "Definition".to_string(),
                url: self.definition_url.clone(),
                snippet: self.definition.trim().to_string(),
            });
        }
        let mut topics = Vec::new();
        flatten_topics(self.related_topics, &mut topics);
        for (text, url) in topics {
            let title = text.split(" - ").next().unwrap_or(text.as_str()).to_string();
            results.push(WebSearchResult {
                title,
                url,
                snippet: text,
            });
        }
        results.truncate(limit);
        results
    }
}

fn flatten_topics(topics: Vec<RelatedTopic>, out: &mut Vec<(String, String)>) {
    for topic in topics {
        match topic {
            RelatedTopic::Entry { text, first_url } => {
                if !text.trim().is_empty() {
                    out.push((text, first_url));
                }
            }
            RelatedTopic::Group { topics } => flatten_topics(topics, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpWebProvider, InstantAnswer, WebSearchResult};
    use friday_rs_config::WebConfig;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn provider(weather_url: &str) -> HttpWebProvider {
        HttpWebProvider::new(&WebConfig {
            weather_url: weather_url.to_string(),
            ..WebConfig::default()
        })
        .expect("provider")
    }

    #[test]
    fn weather_url_encodes_city_as_path_segment() {
        let url = provider("https://wttr.in")
            .weather_request_url("New York")
            .expect("url");
        assert_eq!(url.as_str(), "https://wttr.in/New%20York?format=3");

        let url = provider("https://wttr.in/")
            .weather_request_url("Paris")
            .expect("url");
        assert_eq!(url.as_str(), "https://wttr.in/Paris?format=3");
    }

    #[test]
    fn search_url_carries_instant_answer_flags() {
        let url = provider("https://wttr.in").search_request_url("rust lang");
        assert_eq!(
            url.as_str(),
            "https://api.duckduckgo.com/?q=rust+lang&format=json&no_html=1&skip_disambig=1"
        );
    }

    #[test]
    fn instant_answer_flattens_groups_and_respects_limit() {
        let answer: InstantAnswer = serde_json::from_value(json!({
            "Heading": "Rust",
            "AbstractText": "Rust is a systems language.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Rust",
            "Answer": "",
            "RelatedTopics": [
                {"Text": "Cargo - package manager", "FirstURL": "https://duckduckgo.com/Cargo"},
                {"Name": "Games", "Topics": [
                    {"Text": "Rust (video game) - survival game", "FirstURL": "https://duckduckgo.com/Rust_game"}
                ]},
                {"Text": "Ferris - mascot", "FirstURL": "https://duckduckgo.com/Ferris"}
            ]
        }))
        .expect("decode");

        let results = answer.into_results(3);
        assert_eq!(
            results,
            vec![
                WebSearchResult {
                    title: "Rust".to_string(),
                    url: "https://en.wikipedia.org/wiki/Rust".to_string(),
                    snippet: "Rust is a systems language.".to_string(),
                },
                WebSearchResult {
                    title: "Cargo".to_string(),
                    url: "https://duckduckgo.com/Cargo".to_string(),
                    snippet: "Cargo - package manager".to_string(),
                },
                WebSearchResult {
                    title: "Rust (video game)".to_string(),
                    url: "https://duckduckgo.com/Rust_game".to_string(),
                    snippet: "Rust (video game) - survival game".to_string(),
                },
            ]
        );
    }

    #[test]
    fn empty_instant_answer_yields_nothing() {
        let answer: InstantAnswer = serde_json::from_value(json!({})).expect("decode");
        assert!(answer.into_results(5).is_empty());
    }
}
