// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! DRUS command-line client
//!
//! Signs in, links coding-platform accounts and syncs their stats against
//! the DRUS API, falling back to local fixtures when the API is down.

use anyhow::{bail, Context};
use drus_client::error::OperationOutcome;
use drus_client::{catalog, config::Config, services::Variant, DrusClient};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
usage: drus <command> [args]

commands:
  whoami                              show the signed-in user
  login <email> <password>            sign in
  register <name> <email> <password>  create an account
  google <credential>                 sign in with a Google ID token
  verify-email <token>                confirm an email address
  logout                              sign out
  platforms                           list linked platforms and stats
  connect <platform> <username>       link a platform account
  disconnect <platform>               unlink a platform account
  sync [platform]                     sync one or all linked platforms
  stats <platform> <username>         look up public platform stats
  analytics                           show dashboard analytics
  catalog                             list supported platforms";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(
        api_base = %config.api_base,
        mock_fallback = config.mock_fallback,
        "Configuration loaded"
    );

    let client = DrusClient::initialize(config).await;
    let result = run(&client, command, rest).await;

    for notice in client.notifications.active() {
        eprintln!("[{:?}] {}", notice.variant, notice.message);
    }
    result
}

async fn run(client: &DrusClient, command: &str, args: &[String]) -> anyhow::Result<()> {
    let notify = &client.notifications;

    match (command, args) {
        ("whoami", []) => print_json(&client.session.current_user().await),
        ("login", [email, password]) => {
            let auth = client.session.login(email, password).await?;
            notify.success(format!("Welcome back, {}", auth.user.name));
            print_json(&auth.user)
        }
        ("register", [name, email, password]) => {
            let auth = client.session.register(name, email, password).await?;
            notify.success("Account created. Check your email to verify it.");
            print_json(&auth.user)
        }
        ("google", [credential]) => {
            let auth = client.session.login_with_google(credential).await?;
            notify.success(format!("Signed in as {}", auth.user.email));
            print_json(&auth.user)
        }
        ("verify-email", [token]) => {
            let message = client.session.verify_email(token).await?;
            notify.success(message);
            Ok(())
        }
        ("logout", []) => {
            client.session.logout().await;
            notify.info("Signed out");
            Ok(())
        }
        ("platforms", []) => print_json(&client.platforms.snapshot().await),
        ("connect", [platform, username]) => {
            let outcome = client.platforms.connect_platform(platform, username).await;
            report(client, platform, "connected", &outcome);
            print_json(&outcome)
        }
        ("disconnect", [platform]) => {
            let outcome = client.platforms.disconnect_platform(platform).await;
            report(client, platform, "disconnected", &outcome);
            print_json(&outcome)
        }
        ("sync", [platform]) => {
            notify.info(format!("Syncing {platform} data..."));
            let outcome = client.platforms.sync_platform(platform).await;
            report(client, platform, "synced", &outcome);
            print_json(&outcome)
        }
        ("sync", []) => {
            let outcomes = client.platforms.sync_all_platforms().await;
            let failed = outcomes.iter().filter(|o| !o.outcome.success).count();
            if failed > 0 {
                notify.warning(format!("{failed} of {} platforms failed to sync", outcomes.len()));
            } else {
                notify.success(format!("Synced {} platforms", outcomes.len()));
            }
            print_json(&outcomes)
        }
        ("stats", [platform, username]) => {
            let stats = client.platforms.lookup_platform_stats(platform, username).await?;
            print_json(&stats)
        }
        ("analytics", []) => print_json(&client.platforms.fetch_analytics().await?),
        ("catalog", []) => print_json(&catalog::CODING_PLATFORMS),
        _ => bail!("unrecognized command `{command}`\n\n{USAGE}"),
    }
}

fn report(client: &DrusClient, platform: &str, verb: &str, outcome: &OperationOutcome) {
    let name = catalog::find(platform).map_or(platform, |p| p.name);
    match &outcome.error {
        None => client.notifications.push(Variant::Success, format!("Successfully {verb} {name}")),
        Some(error) => client.notifications.push(Variant::Error, format!("{name}: {error}")),
    };
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("drus_client=info,warn"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
