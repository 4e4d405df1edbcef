//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::{Settings, ENV_OPENAI_API_KEY};
use crate::llm::{api_key_for, check_health, Health, ModelRef};
use console::style;
use std::process::Command;

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

/// Run all diagnostic checks. Exits non-zero if any check is an error.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Reduct Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    section(
        "External Tools",
        vec![
            check_tool("yt-dlp", &["--version"], install_hint_ytdlp()),
            check_tool("ffmpeg", &["-version"], install_hint_ffmpeg()),
            check_tool("ffprobe", &["-version"], install_hint_ffmpeg()),
        ],
        &mut checks,
    );

    section("LLM Configuration", check_llm(settings), &mut checks);
    section("Directories", vec![check_sources_dir(settings)], &mut checks);
    section("Configuration", vec![check_config_file()], &mut checks);

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Reduct.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Reduct is ready to use.");
    }

    Ok(())
}

fn section(title: &str, results: Vec<CheckResult>, all: &mut Vec<CheckResult>) {
    println!("{}", style(title).bold());
    for result in &results {
        result.print();
    }
    println!();
    all.extend(results);
}

/// Check if an external tool is available.
fn check_tool(name: &str, args: &[&str], hint: &str) -> CheckResult {
    match Command::new(name).args(args).output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();
            CheckResult::ok(name, &truncate(&version, 50))
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Model, completion key and the OpenAI key used for transcription.
fn check_llm(settings: &Settings) -> Vec<CheckResult> {
    let llm = &settings.llm;
    let mut results = Vec::new();

    match check_health(llm) {
        Health::Healthy { model } => {
            let provider = ModelRef::parse(&model).provider;
            match api_key_for(llm, provider) {
                Some(key) => results.push(CheckResult::ok(
                    "Model",
                    &format!("{} (key {})", model, mask_key(key)),
                )),
                None => results.push(CheckResult::warning(
                    "Model",
                    &format!("{} has no API key", model),
                    &format!("Set LLM_KEY or {}", provider.key_hint()),
                )),
            }
        }
        Health::Unhealthy { error } => results.push(CheckResult::error(
            "Model",
            &error,
            "Example: export LLM_MODEL=anthropic/claude-3-haiku-20240307",
        )),
    }

    if llm.openai_api_key.is_some() || llm.api_key.is_some() {
        results.push(CheckResult::ok("Transcription", "OpenAI key available"));
    } else {
        results.push(CheckResult::warning(
            "Transcription",
            &format!("{} not set", ENV_OPENAI_API_KEY),
            "Video transcription needs an OpenAI key",
        ));
    }

    results
}

fn check_sources_dir(settings: &Settings) -> CheckResult {
    let dir = settings.sources_dir();
    if dir.is_dir() {
        CheckResult::ok("Sources directory", &dir.display().to_string())
    } else {
        CheckResult::warning(
            "Sources directory",
            &format!("{} (will be created)", dir.display()),
            "Directory will be created when the first source is added",
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &config_path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: reduct config init",
        )
    }
}

/// Show only the first and last few characters of a key.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}
