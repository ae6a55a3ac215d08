use clap::Parser;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use pawmatch::{cli, client, config, error, photo, render};
use cli::{Cli, Commands};
use client::WebhookClient;
use config::{Config, BACKEND_ENV};
use error::{PawMatchError, Result};
use pawmatch_common::form::format_current_location;
use pawmatch_common::{parse_response, Coordinates, Notice, ReportDraft};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "pawmatch=debug,pawmatch_common=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Report {
            status,
            description,
            phone,
            photo: photo_arg,
            lat,
            lon,
            media_url,
            backend,
            interactive,
            json,
        } => {
            if !json {
                println!("🐾 pawmatch - {} dog report\n", status.label());
            }

            let mut draft = ReportDraft::new();
            draft.status = status;
            draft.description = description.unwrap_or_default();
            draft.phone = phone.unwrap_or_default();

            let photo_path = match photo_arg {
                Some(path) => Some(path),
                None if interactive => prompt_optional("Photo path")?.map(PathBuf::from),
                None => None,
            };
            if interactive {
                fill_interactively(&mut draft)?;
            }

            // 写真のEXIF位置を「現在地」として扱う
            let mut live_fix = None;
            if let Some(path) = &photo_path {
                draft.stage_photo(photo::load_photo(path)?, None)?;
                live_fix = photo::gps_fix(path);
            }

            if let (Some(lat), Some(lon)) = (lat, lon) {
                let at = Coordinates::new(lat, lon);
                if !at.is_valid() {
                    return Err(PawMatchError::Input(format!("座標が範囲外です: {}, {}", lat, lon)));
                }
                draft.set_location_manually(at);
            } else if let Some(fix) = live_fix {
                draft.apply_geolocation_fix(fix);
            }

            let mut report = None;
            if let Err(e) = draft.submit(live_fix, |r| report = Some(r)) {
                println!("{}", render::render_notice(&e.notice()));
                return Err(e.into());
            }
            let Some(report) = report else {
                return Ok(());
            };

            let origin = backend.or_else(|| std::env::var(BACKEND_ENV).ok().filter(|v| !v.trim().is_empty()));
            let backend = config.backend_with_origin(origin, media_url)?;
            let asset_base = backend.asset_base.clone();
            let client = WebhookClient::new(backend, config.timeout_seconds)?;

            if !json {
                println!("{}", format_current_location(report.location));
                println!("送信先: {}\n", client.backend().endpoint());
            }

            let spinner = spinner(json);
            let outcome = client.submit(&report).await;
            spinner.finish_and_clear();

            match outcome {
                Ok(result) if json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                Ok(result) => {
                    println!("{}", render::render_result(&result, &asset_base));
                    println!("\n✅ 完了");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "通報の送信に失敗しました");
                    if !json {
                        println!("{}", render::render_notice(&Notice::submission_failed()));
                    }
                    return Err(e);
                }
            }
        }

        Commands::Parse { input, json } => {
            let body = match input {
                Some(path) => {
                    if !path.is_file() {
                        return Err(PawMatchError::FileNotFound(path.display().to_string()));
                    }
                    std::fs::read_to_string(&path)?
                }
                None => {
                    let mut body = String::new();
                    std::io::stdin().read_to_string(&mut body)?;
                    body
                }
            };

            let result = parse_response(&body)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", render::render_result(&result, &config.asset_base));
            }
        }

        Commands::Config { set_backend, set_asset_base, show } => {
            let mut config = config;

            if let Some(origin) = set_backend {
                config.set_backend(origin)?;
                println!("✔ 接続先を設定しました");
            }

            if let Some(base) = set_asset_base {
                config.set_asset_base(base)?;
                println!("✔ 画像の配信元を設定しました");
            }

            if show {
                let backend = config.backend(None)?;
                println!("設定:");
                println!("  接続先: {}", backend.endpoint());
                println!("  画像の配信元: {}", backend.asset_base);
                println!("  送信者: {}", backend.sender);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn spinner(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("送信中...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// 空欄の項目だけ尋ねる
fn fill_interactively(draft: &mut ReportDraft) -> Result<()> {
    if draft.description.trim().is_empty() {
        draft.description = prompt("Description of the dog")?;
    }
    if draft.phone.trim().is_empty() {
        draft.phone = prompt("Contact phone number")?;
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .map_err(|e| PawMatchError::Input(e.to_string()))
}

fn prompt_optional(label: &str) -> Result<Option<String>> {
    let input: String = Input::new()
        .with_prompt(label)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PawMatchError::Input(e.to_string()))?;
    let trimmed = input.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
