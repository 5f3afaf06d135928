//! Ask command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::services::Services;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    top_k: Option<usize>,
    show_prompt: bool,
    mut settings: Settings,
) -> Result<()> {
    if let Some(k) = top_k {
        settings.rag.top_k = k;
    }

    let services = match Services::connect(&settings).await {
        Ok(services) => services,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'talkrag doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };
    let service = services.query_service(&settings)?;

    let spinner = Output::spinner("Searching talk index...");

    match service.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.context.is_empty() {
                Output::header("Sources");
                for source in &response.context {
                    Output::source(&source.title, &source.talk_id, source.score, &source.chunk);
                }
            }

            if show_prompt {
                Output::header("System prompt");
                println!("{}", response.prompt.system);
                Output::header("User prompt");
                println!("{}", response.prompt.user);
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
