use std::env;

use anyhow::{Context, Result};
use ostkit_rs::{OstClient, Params, ParamValue, endpoints, types::Method};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <operation> [key=value ...]", program);
    eprintln!("       {} monitor <transaction_uuid> [<transaction_uuid> ...]", program);
    eprintln!();
    eprintln!("Operations:");
    for endpoint in endpoints::CATALOG.iter() {
        eprintln!(
            "  {:<24} {:<4} {:<28} {}",
            endpoint.name,
            endpoint.method.to_string(),
            endpoint.path,
            endpoint.fields.join(", ")
        );
    }
    eprintln!();
    eprintln!("Repeat a key to send a list (e.g. transaction_uuids=a transaction_uuids=b).");
    eprintln!("Credentials: OSTKIT_API_KEY, OSTKIT_API_SECRET; endpoint: OSTKIT_API_ENDPOINT");
}

/// argv[0], which the OS may leave out.
fn program_name(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("ostkit-rs")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ostkit_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = program_name(&args);
    if args.len() < 2 {
        print_usage(program);
        std::process::exit(1);
    }

    let client = OstClient::from_env().context("Failed to configure OST KIT client")?;

    if args[1] == "monitor" {
        return monitor(&client, &args[2..]).await;
    }

    let Some(endpoint) = endpoints::find(&args[1]) else {
        eprintln!("Unknown operation: {}", args[1]);
        print_usage(program);
        std::process::exit(1);
    };

    let params = parse_params(&args[2..], endpoint.fields)?;
    let data = match endpoint.method {
        Method::Get => client.do_get(endpoint.path, params).await,
        Method::Post => client.do_post(endpoint.path, params).await,
    }
    .with_context(|| format!("{} failed", endpoint.name))?;

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

/// Parse `key=value` pairs; a key given more than once becomes a list.
fn parse_params(pairs: &[String], fields: &[&str]) -> Result<Params> {
    let mut params = Params::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Expected key=value, got `{}`", pair))?;
        if !fields.contains(&key) {
            anyhow::bail!("Unknown field `{}` (accepted: {})", key, fields.join(", "));
        }

        let value = match params.get(key) {
            Some(ParamValue::Single(first)) => {
                ParamValue::List(vec![first.clone(), value.to_string()])
            }
            Some(ParamValue::List(items)) => {
                let mut items = items.clone();
                items.push(value.to_string());
                ParamValue::List(items)
            }
            None if key == "transaction_uuids" => ParamValue::List(vec![value.to_string()]),
            None => ParamValue::from(value),
        };
        params.insert(key, value);
    }
    Ok(params)
}

async fn monitor(client: &OstClient, transaction_uuids: &[String]) -> Result<()> {
    if transaction_uuids.is_empty() {
        anyhow::bail!("monitor needs at least one transaction uuid");
    }

    client.on_monitor_error(|err| eprintln!("Status poll failed: {}", err));

    let (tx, mut rx) = mpsc::unbounded_channel();
    for uuid in transaction_uuids {
        let tx = tx.clone();
        client.monitor_transaction(uuid.clone(), move |record| {
            let _ = tx.send(record.clone());
        })?;
    }
    drop(tx);

    println!("Monitoring {} transaction(s)...", transaction_uuids.len());
    let mut remaining = transaction_uuids.len();
    while remaining > 0 {
        let Some(record) = rx.recv().await else {
            break;
        };
        println!(
            "{}: {}{}",
            record.transaction_uuid,
            record.status,
            record
                .transaction_hash()
                .map(|h| format!(" ({})", h))
                .unwrap_or_default()
        );
        if record.state().is_terminal() {
            remaining -= 1;
        }
    }

    Ok(())
}
