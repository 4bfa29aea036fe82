use anyhow::{bail, Context, Result};
use std::env;
use tracing_subscriber::EnvFilter;

use wallet_api_suite::{Fixtures, ScenarioId, SuiteConfig, SuiteContext, VERSION};

#[derive(Debug, Default)]
struct Args {
    list: bool,
    json: bool,
    only: Vec<ScenarioId>,
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let mut args = Args::default();
    let mut iter = raw.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "run" => {}
            "list" => args.list = true,
            "--json" => args.json = true,
            "--only" => {
                let Some(value) = iter.next() else {
                    bail!("--only needs a scenario id such as TC04");
                };
                for part in value.split(',') {
                    match ScenarioId::parse(part) {
                        Some(id) => args.only.push(id),
                        None => bail!("Unknown scenario: {}", part),
                    }
                }
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("Unknown argument: {} (try --help)", other),
        }
    }

    args.only.sort();
    args.only.dedup();
    Ok(args)
}

fn print_usage() {
    println!("wallet-suite {}", VERSION);
    println!();
    println!("USAGE:");
    println!("    wallet-suite [run] [--only TC01,TC04] [--json]");
    println!("    wallet-suite list");
    println!();
    println!("ENVIRONMENT:");
    println!("    WALLET_ENV, WALLET_API_BASE_URL, WALLET_TEST_USERNAME, WALLET_TEST_PASSWORD,");
    println!("    WALLET_FIXTURES, WALLET_API_TIMEOUT_MS, WALLET_TRANSPORT_RETRIES,");
    println!("    WALLET_POLL_DELAY_MS, WALLET_POLL_MAX_ATTEMPTS, WALLET_POLL_DEADLINE_MS,");
    println!("    WALLET_SCENARIO_TIMEOUT_MS, RUST_LOG");
}

#[tokio::main]
async fn main() -> Result<()> {
    let raw: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&raw)?;

    if args.list {
        for id in ScenarioId::ALL {
            println!("{}", id);
        }
        return Ok(());
    }

    // Logs go to stderr so `--json` output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = SuiteConfig::from_env().context("Failed to load configuration")?;
    let fixtures = match &config.fixtures_path {
        Some(path) => Fixtures::load(path)
            .with_context(|| format!("Failed to load fixtures from {}", path.display()))?,
        None => Fixtures::builtin().context("Built-in fixtures are invalid")?,
    };
    let config = config.with_fixture_settings(&fixtures.configuration);
    config.validate()?;

    if !args.json {
        println!("💳 Wallet API Suite v{}", VERSION);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("🌐 Target: {} ({:?})", config.base_url, config.environment);
        println!(
            "⏳ Polling: every {}ms, at most {} attempts / {}ms",
            config.poll.delay.as_millis(),
            config.poll.max_attempts,
            config.poll.deadline.as_millis()
        );
    }

    let context = SuiteContext::establish(config, fixtures)
        .await
        .context("Failed to establish a session with the wallet service")?;

    let ids: Vec<ScenarioId> = if args.only.is_empty() {
        ScenarioId::ALL.to_vec()
    } else {
        args.only
    };
    let report = context.run(&ids).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{}", report);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        if report.all_passed() {
            println!("🎉 All scenarios passed");
        } else {
            println!("❌ {} scenario(s) failed", report.failed_count());
        }
    }

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let args = parse_args(&strings(&["run", "--only", "TC04,tc1", "--json"])).unwrap();
        assert!(args.json);
        assert_eq!(args.only, vec![ScenarioId::Credit, ScenarioId::MultiCurrency]);

        assert!(parse_args(&strings(&["list"])).unwrap().list);
        assert!(parse_args(&strings(&["--only"])).is_err());
        assert!(parse_args(&strings(&["--only", "TC42"])).is_err());
        assert!(parse_args(&strings(&["import"])).is_err());
    }
}
