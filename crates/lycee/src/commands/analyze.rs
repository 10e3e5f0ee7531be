//! Run the narrative analysis once.

use anyhow::Result;
use colored::Colorize;
use lycee_core::AnalysisService;
use lycee_core::analysis::{DEFAULT_TTL_SECS, DIAGNOSTIC_UNAVAILABLE};
use lycee_core::completion::{CompletionClient, CompletionOverrides, HttpCompletionClient};
use lycee_core::scenario;
use lycee_core::types::AnalysisResult;
use std::sync::Arc;
use tracing::debug;

use super::{Context, fmt_delta, print_json};
use crate::cli::AnalyzeArgs;

pub async fn execute(args: AnalyzeArgs, ctx: &Context) -> Result<()> {
    let client = HttpCompletionClient::new(ctx.config.completion_timeout(args.timeout)?)?;
    let result = run(&args, ctx, Arc::new(client)).await?;

    if ctx.json {
        return print_json(&result);
    }

    if result.diagnostic == DIAGNOSTIC_UNAVAILABLE {
        eprintln!(
            "{} completion service unavailable, see logs (RUST_LOG=lycee_core=warn)",
            "⚠".yellow()
        );
    }

    println!("{}", format!("Diagnostic - {}", args.id).cyan().bold());
    println!("{}", "─".repeat(50));
    println!("{}", result.diagnostic);

    if let Some(scenario) = &result.scenario {
        println!();
        println!("{}", scenario_heading(args.delta).cyan().bold());
        println!("{}", "─".repeat(50));
        println!("{}", scenario);
    }

    Ok(())
}

/// Heading of the scenario section, showing the delta actually applied.
fn scenario_heading(delta: f64) -> String {
    format!("Scenario ({})", fmt_delta(scenario::clamp_delta(delta)))
}

/// Analyze with the given client; flags override the config file values.
async fn run(
    args: &AnalyzeArgs,
    ctx: &Context,
    client: Arc<dyn CompletionClient>,
) -> Result<AnalysisResult> {
    let service = AnalysisService::new(
        Arc::clone(&ctx.store),
        client,
        ctx.config.completion_settings(),
        chrono::Duration::seconds(DEFAULT_TTL_SECS as i64),
    );
    let overrides = CompletionOverrides {
        api_key: args.api_key.clone(),
        api_endpoint: args.endpoint.clone(),
        model: args.model.clone(),
    };
    debug!(id = %args.id, delta = args.delta, "Running analysis");

    Ok(service.analyze(&args.id, args.delta, &overrides).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_store;
    use lycee_core::analysis::SCENARIO_UNAVAILABLE;
    use lycee_core::completion::{CompletionRequest, CompletionSettings};
    use std::sync::Mutex;

    struct RecordingClient {
        reply: Option<String>,
        seen: Mutex<Vec<(CompletionSettings, CompletionRequest)>>,
    }

    #[async_trait::async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(
            &self,
            settings: &CompletionSettings,
            request: &CompletionRequest,
        ) -> lycee_core::Result<String> {
            self.seen
                .lock()
                .unwrap()
                .push((settings.clone(), request.clone()));
            self.reply
                .clone()
                .ok_or_else(|| lycee_core::Error::Transport("connection refused".into()))
        }
    }

    fn ctx() -> Context {
        Context {
            store: Arc::new(test_store()),
            config: crate::config::Config::default(),
            json: true,
        }
    }

    fn args(id: &str, delta: f64) -> AnalyzeArgs {
        AnalyzeArgs {
            id: id.to_string(),
            delta,
            endpoint: None,
            model: Some("gpt-4o-mini".into()),
            api_key: None,
            timeout: None,
        }
    }

    #[test]
    fn test_scenario_heading_shows_clamped_delta() {
        assert_eq!(scenario_heading(0.9), "Scenario (+40%)");
        assert_eq!(scenario_heading(-0.5), "Scenario (-20%)");
        assert_eq!(scenario_heading(0.15), "Scenario (+15%)");
    }

    #[tokio::test]
    async fn test_run_splits_reply_and_applies_flags() {
        let client = Arc::new(RecordingClient {
            reply: Some("Constats. SCENARIO +20 % de gain".into()),
            seen: Mutex::new(Vec::new()),
        });

        let result = run(&args("x", 0.2), &ctx(), client.clone()).await.unwrap();
        assert_eq!(result.diagnostic, "Constats.");
        assert_eq!(result.scenario.as_deref(), Some("SCENARIO +20 % de gain"));

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.model, "gpt-4o-mini");
        assert_eq!(seen[0].1.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_run_degrades_when_unreachable() {
        let client = Arc::new(RecordingClient {
            reply: None,
            seen: Mutex::new(Vec::new()),
        });

        let result = run(&args("x", -0.1), &ctx(), client).await.unwrap();
        assert_eq!(result.diagnostic, DIAGNOSTIC_UNAVAILABLE);
        assert_eq!(result.scenario.as_deref(), Some(SCENARIO_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_run_unknown_institution() {
        let client = Arc::new(RecordingClient {
            reply: Some("unused".into()),
            seen: Mutex::new(Vec::new()),
        });

        let err = run(&args("unknown-id", 0.0), &ctx(), client.clone()).await.unwrap_err();
        assert!(err.to_string().contains("unknown-id"));
        assert!(client.seen.lock().unwrap().is_empty());
    }
}
