//! Built-in tools that reach out over the network: weather, search, and email.

use crate::builtins::utils::{parse_args, schema_of};
use crate::mail::{EmailMessage, parse_mailbox};
use crate::web::WebProvider;
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct WeatherArgs {
    #[input(description = "City to get the weather for")]
    city: String,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct SearchArgs {
    #[input(description = "Search query")]
    query: String,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct EmailArgs {
    #[input(description = "Recipient email address")]
    to_email: String,
    #[input(description = "Email subject line")]
    subject: String,
    #[input(description = "Email body content")]
    message: String,
    #[input(description = "Optional CC email address")]
    #[serde(default)]
    cc_email: Option<String>,
}

fn web_provider(ctx: &ToolContext) -> Result<Arc<dyn WebProvider>, ToolError> {
    ctx.services
        .web
        .clone()
        .ok_or_else(|| ToolError::Unavailable("web access is not configured".to_string()))
}

fn require_text(value: &str, field: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidArguments(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Tool that reports the current weather for a city.
#[derive(Debug, Default)]
pub struct GetWeatherTool;

#[async_trait]
impl Tool for GetWeatherTool {
    fn capability(&self) -> Capability {
        Capability::GetWeather
    }

    fn args_schema(&self) -> Value {
        schema_of(WeatherArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: WeatherArgs = parse_args(args)?;
        require_text(&input.city, "city")?;
        let report = web_provider(ctx)?.weather(input.city.trim()).await?;
        info!("weather retrieved (report_len={})", report.len());
        Ok(report)
    }
}

/// Tool that searches the web.
#[derive(Debug, Default)]
pub struct SearchWebTool;

#[async_trait]
impl Tool for SearchWebTool {
    fn capability(&self) -> Capability {
        Capability::SearchWeb
    }

    fn args_schema(&self) -> Value {
        schema_of(SearchArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: SearchArgs = parse_args(args)?;
        require_text(&input.query, "query")?;
        let results = web_provider(ctx)?
            .search(&input.query, ctx.services.search_limit)
            .await?;
        info!("web search finished (results={})", results.len());
        if results.is_empty() {
            return Ok(format!("No results found for '{}'", input.query));
        }
        let mut output = format!("Search results for '{}':", input.query);
        for result in results {
            output.push_str(&format!("\n- {}: {}", result.title, result.snippet));
            if !result.url.is_empty() {
                output.push_str(&format!(" ({})", result.url));
            }
        }
        Ok(output)
    }
}

/// Tool that sends an email through the configured mailer.
#[derive(Debug, Default)]
pub struct SendEmailTool;

#[async_trait]
impl Tool for SendEmailTool {
    fn capability(&self) -> Capability {
        Capability::SendEmail
    }

    fn args_schema(&self) -> Value {
        schema_of(EmailArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: EmailArgs = parse_args(args)?;
        parse_mailbox(&input.to_email)?;
        let cc = input
            .cc_email
            .filter(|cc| !cc.trim().is_empty());
        if let Some(cc) = cc.as_deref() {
            parse_mailbox(cc)?;
        }
        let mailer = ctx
            .services
            .mailer
            .clone()
            .ok_or_else(|| ToolError::Unavailable("mail transport is not configured".to_string()))?;
        mailer
            .send(EmailMessage {
                to: input.to_email.clone(),
                cc,
                subject: input.subject,
                body: input.message,
            })
            .await?;
        Ok(format!("Email sent successfully to {}", input.to_email))
    }
}
