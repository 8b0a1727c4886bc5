//! `configurator`: answer a configuration service's questions from a terminal

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tokio::io::{AsyncBufReadExt, BufReader};
use wizard_core::prelude::*;
use wizard_core::ConfigurationStatus;
use wizard_http::{HttpConfigurationService, ServiceConfig, DEFAULT_BASE_URL};

mod render;

use render::{parse_line, render_entry, render_widget, HELP};

fn cli() -> Command {
    Command::new("configurator")
        .version(wizard_core::VERSION)
        .about("Interactive configuration wizard")
        .subcommand_required(true)
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .env("CONFIGURATOR_URL")
                .default_value(DEFAULT_BASE_URL)
                .global(true)
                .help("Base URL of the configuration service"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .env("CONFIGURATOR_TIMEOUT")
                .default_value("30")
                .value_parser(value_parser!(u64))
                .global(true)
                .help("Request timeout in seconds"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("run")
                .about("Create a configuration and answer its questions")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .default_value("cfg1")
                        .help("Configuration name (1 to 100 characters)"),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .default_value("")
                        .help("Optional description (at most 500 characters)"),
                )
                .arg(
                    Arg::new("config-version")
                        .long("config-version")
                        .default_value("1.0.0")
                        .help("Configuration version, MAJOR.MINOR.PATCH"),
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .default_value("draft")
                        .value_parser(["draft", "active", "inactive", "archived"])
                        .help("Initial status"),
                )
                .arg(
                    Arg::new("tags")
                        .long("tags")
                        .default_value("")
                        .help("Comma-separated tags"),
                ),
        )
        .subcommand(Command::new("health").about("Check that the service is reachable"))
}

fn string_arg(args: &ArgMatches, id: &str) -> String {
    args.get_one::<String>(id).cloned().unwrap_or_default()
}

fn service_config(matches: &ArgMatches) -> ServiceConfig {
    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(30);
    ServiceConfig::new()
        .with_base_url(string_arg(matches, "base-url"))
        .with_timeout(Duration::from_secs(timeout))
}

fn fields_from(args: &ArgMatches) -> Result<BasicFields> {
    let status: ConfigurationStatus = string_arg(args, "status").parse()?;
    Ok(BasicFields::new(string_arg(args, "name"))
        .with_description(string_arg(args, "description"))
        .with_version(string_arg(args, "config-version"))
        .with_status(status)
        .with_tags(string_arg(args, "tags")))
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let config = service_config(&matches);
    tracing::info!("Using configuration service at {}", config.base_url);
    let service = HttpConfigurationService::new(config)?;

    match matches.subcommand() {
        Some(("health", _)) => health(&service).await,
        Some(("run", args)) => run(service, fields_from(args)?).await,
        _ => Ok(()),
    }
}

async fn health(service: &HttpConfigurationService) -> Result<()> {
    let status = service
        .health_check()
        .await
        .with_context(|| format!("service at {} is unreachable", service.config().base_url))?;
    println!("{} ({})", status.status, status.service);
    if !status.is_healthy() {
        bail!("service reports status '{}'", status.status);
    }
    Ok(())
}

/// Print transcript entries after `shown`; returns the new high-water mark
fn print_new<S: ConfigurationService>(session: &DialogueSession<S>, shown: u64) -> u64 {
    for entry in session.transcript().since(shown) {
        println!("{}", render_entry(entry));
    }
    session.transcript().len() as u64
}

fn prompt<S: ConfigurationService>(session: &DialogueSession<S>) -> Result<()> {
    match session.state() {
        DialogueState::Failed => println!("  (:retry to resend, :discard to delete, :quit to leave)"),
        DialogueState::AwaitingAnswer => match session.pending().and_then(|p| p.widget.as_ref()) {
            Some(widget) => println!("{}", render_widget(widget)),
            None => println!("  (:discard to delete, :quit to leave)"),
        },
        _ => {}
    }
    print!("> ");
    std::io::stdout().flush().context("failed to write prompt")
}

async fn run(service: HttpConfigurationService, fields: BasicFields) -> Result<()> {
    let mut session = DialogueSession::new(service);
    let mut shown = print_new(&session, 0);

    session
        .start(fields)
        .await
        .context("cannot start configuration")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        shown = print_new(&session, shown);
        if let Some(error) = session.widget_error() {
            println!("  ! {}", error.message);
        }
        if session.state() == DialogueState::Complete {
            println!("\nFinal payload:\n{}", session.payload_pretty());
            return Ok(());
        }

        prompt(&session)?;
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            return Ok(());
        };

        let widget = session.pending().and_then(|p| p.widget.clone());
        let step = match parse_line(widget.as_ref(), &line) {
            render::Command::Quit => return Ok(()),
            render::Command::Help => {
                println!("{HELP}");
                continue;
            }
            render::Command::Payload => {
                println!("{}", session.payload_pretty());
                continue;
            }
            render::Command::Discard => {
                match session.discard().await {
                    Ok(()) => {
                        print_new(&session, shown);
                        return Ok(());
                    }
                    Err(e) => {
                        println!("  ! {e}");
                        continue;
                    }
                }
            }
            render::Command::Retry => session.retry().await,
            render::Command::Answer(input) => session.commit_input(input).await,
        };

        match step {
            Ok(outcome) => tracing::debug!("Step outcome: {:?}", outcome),
            Err(e) => println!("  ! {e}"),
        }
    }
}
