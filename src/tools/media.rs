use super::schema::InputSchema;
use super::{add_tool, ToolContext};
use crate::error::Result;
use crate::mcp::ToolSink;
use crate::security::validate_path;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const MEDIA_TYPE_HELP: &str =
    "MIME type of the media (e.g. \"image/jpeg\", \"image/png\", \"image/gif\", \"video/mp4\")";

#[derive(Debug, Deserialize)]
struct UploadFileArgs {
    file_path: String,
    media_type: String,
    alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadUrlArgs {
    url: String,
    media_type: String,
    alt_text: Option<String>,
}

async fn finish_upload(
    ctx: &ToolContext,
    bytes: &[u8],
    media_type: &str,
    alt_text: Option<String>,
) -> Result<Value> {
    let media_id = ctx.client().upload_media(bytes, media_type).await?;
    if let Some(alt_text) = alt_text.filter(|t| !t.is_empty()) {
        ctx.client()
            .create_media_metadata(&media_id, &alt_text)
            .await?;
    }
    Ok(json!({ "media_id": media_id }))
}

async fn upload_media(ctx: ToolContext, args: UploadFileArgs) -> Result<Value> {
    validate_path(&args.file_path)?;
    let bytes = tokio::fs::read(&args.file_path).await?;
    debug!(path = %args.file_path, size = bytes.len(), "Read media file");
    finish_upload(&ctx, &bytes, &args.media_type, args.alt_text).await
}

async fn upload_media_from_url(ctx: ToolContext, args: UploadUrlArgs) -> Result<Value> {
    let bytes = ctx.fetcher().fetch(&args.url).await?;
    debug!(url = %args.url, size = bytes.len(), "Fetched remote media");
    finish_upload(&ctx, &bytes, &args.media_type, args.alt_text).await
}

pub(super) fn register_post(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "upload_media",
        "Upload media (image, gif, video) from a file path",
        InputSchema::new()
            .string("file_path", "Absolute path to the media file")
            .string("media_type", MEDIA_TYPE_HELP)
            .optional_string("alt_text", "Optional alt text for accessibility"),
        upload_media,
    )?;
    add_tool(
        sink,
        ctx,
        "upload_media_from_url",
        "Upload media from a URL",
        InputSchema::new()
            .string("url", "URL of the media to upload")
            .string("media_type", MEDIA_TYPE_HELP)
            .optional_string("alt_text", "Optional alt text for accessibility"),
        upload_media_from_url,
    )
}
