use std::path::Path;

use quickplan_core::PlanClient;

use crate::export_cmd::{PlanFormat, write_plan};

/// Request one plan from the endpoint and print or save it.
pub async fn run_generate(
    endpoint_url: &str,
    mission: &str,
    vision: &str,
    format: PlanFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let client = PlanClient::new(endpoint_url);
    let plan = match client.generate(mission, vision).await {
        Ok(plan) => plan,
        Err(e) => {
            tracing::debug!(error = %e, "generation failed");
            anyhow::bail!("{}", e.user_message());
        }
    };
    write_plan(&plan, format, output).await
}
