//! Print the OpenAPI document of the scoreboard API to stdout.

use anyhow::Context;
use live_scoreboard::services::documentation::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let doc = ApiDoc::openapi()
        .to_pretty_json()
        .context("serialising OpenAPI document")?;
    println!("{doc}");
    Ok(())
}
