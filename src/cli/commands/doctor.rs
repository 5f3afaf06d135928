//! Doctor command - verify configuration and credentials.

use crate::chunking::CharChunker;
use crate::cli::Output;
use crate::config::{
    Settings, OPENAI_API_KEY, OPENAI_BASE_URL, PINECONE_API_KEY, PINECONE_INDEX_HOST,
    PINECONE_INDEX_NAME,
};
use crate::vector_store::{PineconeVectorStore, CONTROL_PLANE_URL};
use console::style;
use std::time::Duration;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    Output::header("talkrag doctor");
    println!();
    println!("Checking configuration and credentials...\n");

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let section = vec![check_config_file(), check_chunking(settings)];
    print_all(&section);
    checks.extend(section);

    println!();

    println!("{}", style("Credentials").bold());
    let lookup = |name: &str| std::env::var(name).ok();
    let section = check_env(&lookup);
    print_all(&section);
    checks.extend(section);

    println!();

    println!("{}", style("Pinecone").bold());
    let index_check = check_index(settings, &lookup).await;
    index_check.print();
    checks.push(index_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using talkrag.",
            errors
        ));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! talkrag is ready to use.");
    }

    Ok(())
}

fn print_all(checks: &[CheckResult]) {
    for check in checks {
        check.print();
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override settings", config_path.display()),
        )
    }
}

fn check_chunking(settings: &Settings) -> CheckResult {
    match CharChunker::from_settings(&settings.chunking) {
        Ok(chunker) => CheckResult::ok(
            "Chunking",
            &format!(
                "{} chars, {} overlap (stride {})",
                chunker.chunk_chars(),
                chunker.overlap_chars(),
                chunker.stride()
            ),
        ),
        Err(e) => CheckResult::error(
            "Chunking",
            &e.to_string(),
            "overlap_chars must be smaller than chunk_chars",
        ),
    }
}

/// Check required and optional environment variables.
fn check_env<F>(lookup: &F) -> Vec<CheckResult>
where
    F: Fn(&str) -> Option<String>,
{
    let mut results = Vec::new();

    for name in [OPENAI_API_KEY, PINECONE_API_KEY] {
        results.push(match lookup(name) {
            Some(key) if key.trim().is_empty() => {
                CheckResult::error(name, "empty", &format!("Set with: export {}='...'", name))
            }
            Some(key) => CheckResult::ok(name, &format!("configured ({})", mask(&key))),
            None => CheckResult::error(
                name,
                "not set",
                &format!("Set with: export {}='...' or add it to .env", name),
            ),
        });
    }

    results.push(match lookup(PINECONE_INDEX_NAME) {
        Some(index) if !index.trim().is_empty() => CheckResult::ok(PINECONE_INDEX_NAME, &index),
        _ => CheckResult::error(
            PINECONE_INDEX_NAME,
            "not set",
            "Name of the Pinecone index holding the talk vectors",
        ),
    });

    for name in [OPENAI_BASE_URL, PINECONE_INDEX_HOST] {
        if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
            results.push(CheckResult::ok(name, &value));
        }
    }

    results
}

/// Resolve the index host, proving the Pinecone key and index name work.
async fn check_index<F>(settings: &Settings, lookup: &F) -> CheckResult
where
    F: Fn(&str) -> Option<String>,
{
    let configured = settings
        .vector_store
        .index_host
        .clone()
        .or_else(|| lookup(PINECONE_INDEX_HOST).filter(|v| !v.trim().is_empty()));
    if let Some(host) = configured {
        return CheckResult::ok("Index host", &format!("{} (configured)", host));
    }

    let (Some(api_key), Some(index)) = (lookup(PINECONE_API_KEY), lookup(PINECONE_INDEX_NAME))
    else {
        return CheckResult::warning(
            "Index host",
            "skipped",
            "Set the Pinecone credentials to verify the index",
        );
    };

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => return CheckResult::error("Index host", &e.to_string(), "Check TLS setup"),
    };

    match PineconeVectorStore::resolve_host(&client, CONTROL_PLANE_URL, &api_key, &index).await {
        Ok(host) => CheckResult::ok("Index host", &host),
        Err(e) => CheckResult::error(
            "Index host",
            &e.to_string(),
            "Check PINECONE_API_KEY and that the index exists",
        ),
    }
}

/// Mask a secret down to its first and last few characters.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
