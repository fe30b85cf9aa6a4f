//! Built-in tools for screenshots, screen geometry, and template matching.

use crate::builtins::utils::{lenient_float, no_args_schema, parse_args, schema_of};
use crate::desktop::Region;
use crate::{Tool, ToolContext};
use async_trait::async_trait;
use autoagents_core::tool::ToolInputT;
use autoagents_derive::ToolInput;
use friday_rs_protocol::{Capability, ToolError};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const INVALID_REGION: &str =
    "Invalid region format. Use 'x,y,width,height' (e.g., '100,100,800,600')";

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct CaptureArgs {
    #[input(description = "Optional path to save the screenshot (e.g., 'screenshot.png')")]
    #[serde(default)]
    save_path: Option<String>,
    #[input(
        description = "Optional region to capture in format 'x,y,width,height' (e.g., '100,100,800,600')"
    )]
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToolInput)]
struct FindArgs {
    #[input(description = "Path to the template image to find")]
    image_path: String,
    #[input(description = "Confidence threshold (0.0 to 1.0)")]
    #[serde(default = "default_confidence", deserialize_with = "lenient_float")]
    confidence: f64,
}

fn default_confidence() -> f64 {
    0.8
}

/// Parse `x,y,width,height` into a region with a positive size.
fn parse_region(raw: &str) -> Result<Region, ToolError> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ToolError::InvalidArguments(INVALID_REGION.to_string()))?;
    let [x, y, width, height] = parts.as_slice() else {
        return Err(ToolError::InvalidArguments(INVALID_REGION.to_string()));
    };
    let (Ok(width), Ok(height)) = (u32::try_from(*width), u32::try_from(*height)) else {
        return Err(ToolError::InvalidArguments(INVALID_REGION.to_string()));
    };
    if width == 0 || height == 0 {
        return Err(ToolError::InvalidArguments(INVALID_REGION.to_string()));
    }
    Ok(Region {
        x: *x,
        y: *y,
        width,
        height,
    })
}

/// Tool that captures the screen or a region of it.
#[derive(Debug, Default)]
pub struct CaptureScreenTool;

#[async_trait]
impl Tool for CaptureScreenTool {
    fn capability(&self) -> Capability {
        Capability::CaptureScreen
    }

    fn args_schema(&self) -> Value {
        schema_of(CaptureArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: CaptureArgs = parse_args(args)?;
        let region = match input.region.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_region(raw)?),
            _ => None,
        };
        let desktop = &ctx.services.desktop;

        if let Some(save_path) = input.save_path.filter(|path| !path.trim().is_empty()) {
            let dest = ctx.resolve_path(&save_path);
            desktop.capture(&dest, region).await?;
            info!("screenshot saved (has_region={})", region.is_some());
            return Ok(format!("Screenshot captured and saved to {save_path}"));
        }

        let scratch = tempfile::Builder::new()
            .prefix("friday-capture-")
            .suffix(".png")
            .tempfile()
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        desktop.capture(scratch.path(), region).await?;
        let bytes = std::fs::metadata(scratch.path())
            .map(|meta| meta.len())
            .map_err(|err| ToolError::ExecutionFailed(err.to_string()))?;
        info!("screenshot captured (bytes={bytes})");
        Ok(format!(
            "Screenshot captured successfully. Image data available ({bytes} bytes of PNG data)."
        ))
    }
}

/// Tool that reports screen resolution and pointer position.
#[derive(Debug, Default)]
pub struct GetScreenInfoTool;

#[async_trait]
impl Tool for GetScreenInfoTool {
    fn capability(&self) -> Capability {
        Capability::GetScreenInfo
    }

    fn args_schema(&self) -> Value {
        no_args_schema()
    }

    async fn call(&self, ctx: &ToolContext, _args: Value) -> Result<String, ToolError> {
        let desktop = &ctx.services.desktop;
        let size = desktop.screen_size().await?;
        let position = desktop.mouse_position().await?;
        Ok(format!(
            "Screen Information:\n- Resolution: {} x {}\n- Current mouse position: ({}, {})\n- Screen area: {} pixels",
            size.width,
            size.height,
            position.x,
            position.y,
            u64::from(size.width) * u64::from(size.height)
        ))
    }
}

/// Tool that locates a template image on screen.
#[derive(Debug, Default)]
pub struct FindOnScreenTool;

#[async_trait]
impl Tool for FindOnScreenTool {
    fn capability(&self) -> Capability {
        Capability::FindOnScreen
    }

    fn args_schema(&self) -> Value {
        schema_of(FindArgs::io_schema())
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<String, ToolError> {
        let input: FindArgs = parse_args(args)?;
        if !(0.0..=1.0).contains(&input.confidence) {
            return Err(ToolError::InvalidArguments(format!(
                "Invalid confidence: {}. Use a value between 0.0 and 1.0",
                input.confidence
            )));
        }
        let template = ctx.resolve_path(&input.image_path);
        if !template.is_file() {
            return Ok(format!("Template image not found: {}", input.image_path));
        }
        match ctx
            .services
            .desktop
            .locate(&template, input.confidence)
            .await?
        {
            Some(region) => {
                let center = region.center();
                Ok(format!(
                    "Image found at position: {}, {} (region: {})",
                    center.x, center.y, region
                ))
            }
            None => Ok(format!(
                "Image not found on screen with confidence {}",
                input.confidence
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_region;
    use crate::desktop::Region;
    use friday_rs_protocol::ToolError;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_well_formed_regions() {
        assert_eq!(
            parse_region(" 100, 100,800,600").expect("region"),
            Region {
                x: 100,
                y: 100,
                width: 800,
                height: 600,
            }
        );
    }

    #[test]
    fn rejects_malformed_regions() {
        for raw in ["100,100,800", "a,b,c,d", "1,2,3,4,5", "0,0,0,10", "0,0,-5,10"] {
            assert!(
                matches!(parse_region(raw), Err(ToolError::InvalidArguments(_))),
                "{raw}"
            );
        }
    }
}
