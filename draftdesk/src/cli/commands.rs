//! CLI command execution.
//!
//! Each invocation restores the cached draft session, applies one command
//! through the [`Drafter`], and writes the session back.

use std::io::Read;

use anyhow::{anyhow, bail, Context, Result};

use crate::api::{ApiClient, ModelInfo};
use crate::cache::SessionCache;
use crate::clipboard::{NoClipboard, SystemClipboard};
use crate::config::Config;
use crate::drafting::{
    ClipboardWriter, CopyReport, DraftCommand, DraftError, DraftEvent, DraftSession, DraftView,
    Drafter, GenerateInput, GenerationParams, MAX_DRAFTS,
};
use crate::models::Draft;

use super::args::{Cli, Commands};

/// Execute the CLI command.
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    if let Some(token) = cli.token {
        config.token = Some(token);
    }
    if cli.no_clipboard {
        config.clipboard = false;
    }

    let api = ApiClient::new(&config.backend_url, config.token.clone(), config.timeout())
        .context("Failed to build HTTP client")?;
    tracing::debug!(backend = api.base_url(), "using backend");

    let cache = if cli.no_cache {
        None
    } else {
        Some(SessionCache::default_location()?)
    };
    let session = cache
        .as_ref()
        .and_then(SessionCache::load)
        .unwrap_or_default();

    let command = match cli.command {
        Commands::Models => return list_models(&api, cli.json).await,
        Commands::Status => return print_view(&DraftView::from(&session), cli.json),
        Commands::Generate {
            request,
            draft,
            model,
            citizen_name,
            temperature,
            top_p,
            repetition_penalty,
        } => {
            let model = model
                .or_else(|| config.model.clone())
                .context("No model given; pass --model or set `model` in the config file")?;
            let (request_text, reply_draft) = read_texts(request, draft)?;
            let params = merge_params(config.generation, temperature, top_p, repetition_penalty);
            DraftCommand::Generate(GenerateInput {
                request_text,
                reply_draft,
                model,
                citizen_name,
                params,
            })
        }
        Commands::Copy { selector } => DraftCommand::Finalize {
            draft_id: resolve_selector(&session, selector.as_deref()),
        },
        Commands::New => DraftCommand::NewRequest,
    };

    let clipboard: Box<dyn ClipboardWriter> = if config.clipboard {
        Box::new(SystemClipboard::new(config.clipboard_hold()))
    } else {
        Box::new(NoClipboard)
    };
    let mut drafter = Drafter::new(api.clone(), api, clipboard).with_session(session);

    let result = drafter.dispatch(command).await;

    // Failed commands leave the session as it was (apart from a newly
    // registered request id), so it is always safe to write back.
    if let Some(cache) = &cache {
        let written = if matches!(result, Ok(DraftEvent::Reset)) {
            cache.clear()
        } else {
            cache.save(drafter.session())
        };
        if let Err(e) = written {
            tracing::warn!(path = %cache.path().display(), error = %e, "could not update session cache");
        }
    }

    let event = result.map_err(with_hint)?;
    let view = drafter.view();
    if cli.json {
        return print_view(&view, true);
    }

    match event {
        DraftEvent::Generated(draft) => {
            println!(
                "Generated draft {} ({} of {MAX_DRAFTS}).",
                draft.short_id(),
                view.draft_count
            );
            println!();
            print_view(&view, false)?;
        }
        DraftEvent::Finalized(report) => print_copy_report(&report),
        DraftEvent::Reset => println!("Started a new request."),
    }

    Ok(())
}

/// Attach the next step to state-machine rejections.
fn with_hint(err: DraftError) -> anyhow::Error {
    let hint = if err.is_invalid_state() {
        "Run `draftdesk new` to start a new request."
    } else if err.is_not_found() {
        "Run `draftdesk status` to list the drafts of this request."
    } else {
        return err.into();
    };
    anyhow!("{err}\n{hint}")
}

/// Turn a user selector into a draft id for the state machine.
///
/// Unresolvable selectors are passed through unchanged so the session
/// reports them (as not found, or as rejected when already finalized).
fn resolve_selector(session: &DraftSession, selector: Option<&str>) -> String {
    let selector = selector.unwrap_or("1");
    session
        .resolve(selector)
        .map_or_else(|| selector.to_string(), |draft| draft.id.clone())
}

/// Apply per-invocation overrides to the configured sampling parameters.
fn merge_params(
    base: GenerationParams,
    temperature: Option<f64>,
    top_p: Option<f64>,
    repetition_penalty: Option<f64>,
) -> GenerationParams {
    GenerationParams {
        temperature: temperature.unwrap_or(base.temperature),
        top_p: top_p.unwrap_or(base.top_p),
        repetition_penalty: repetition_penalty.unwrap_or(base.repetition_penalty),
    }
}

/// Read the request and reply texts, taking at most one of them from stdin.
fn read_texts(request: String, draft: String) -> Result<(String, String)> {
    if request == "-" && draft == "-" {
        bail!("Only one of --request and --draft can be read from stdin");
    }

    let read_stdin = || -> Result<String> {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    };

    let request = if request == "-" { read_stdin()? } else { request };
    let draft = if draft == "-" { read_stdin()? } else { draft };
    Ok((request, draft))
}

async fn list_models(api: &ApiClient, json: bool) -> Result<()> {
    let models = api.list_models().await.context("Failed to list models")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    if models.is_empty() {
        println!("The backend offers no models.");
        return Ok(());
    }

    println!("{:<32} NAME", "MODEL");
    for model in &models {
        println!("{:<32} {}", model.name, ModelInfo::label(model));
    }
    Ok(())
}

fn print_view(view: &DraftView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    let request = view
        .request_id
        .map_or_else(|| "no request yet".to_string(), |id| format!("request #{id}"));
    println!(
        "Session: {request}, {}, {}/{MAX_DRAFTS} drafts used ({} remaining)",
        view.phase, view.draft_count, view.remaining_drafts
    );

    let Some(primary) = &view.primary else {
        println!("No drafts yet. Run `draftdesk generate` to create one.");
        return Ok(());
    };

    println!();
    print_draft(1, primary);

    if !view.previous.is_empty() {
        println!();
        println!("Previous drafts:");
        for (i, draft) in view.previous.iter().enumerate() {
            println!();
            print_draft(i + 2, draft);
        }
    }

    println!();
    if view.can_finalize {
        println!("Run `draftdesk copy [N]` to select and copy a draft.");
    }
    if view.can_generate {
        println!("Run `draftdesk generate` for another draft.");
    }
    if view.show_new_request {
        println!("Run `draftdesk new` to start a new request.");
    }
    Ok(())
}

fn print_draft(position: usize, draft: &Draft) {
    let latency = draft
        .latency_ms
        .map(|ms| format!(", {ms:.0} ms"))
        .unwrap_or_default();
    let copied = if draft.copied { ", copied" } else { "" };
    println!(
        "[{position}] {} ({}{latency}{copied}, {})",
        draft.short_id(),
        draft.model_name,
        draft.created_at.format("%Y-%m-%d %H:%M")
    );
    println!("{}", draft.text);
}

fn print_copy_report(report: &CopyReport) {
    if !report.is_clean() {
        for warning in report.warnings() {
            eprintln!("Warning: {warning}");
        }
    }

    if report.clipboard.is_none() {
        println!("Copied draft {}. This request is now closed.", report.draft.short_id());
    } else {
        println!(
            "Selected draft {}, but it could not be copied. Text follows:",
            report.draft.short_id()
        );
        println!();
        println!("{}", report.draft.text);
    }
    println!("Run `draftdesk new` to start a new request.");
}
