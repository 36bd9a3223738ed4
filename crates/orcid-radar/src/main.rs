//! orcid-radar - Entry point
//!
//! Batch driver: each ORCID gets an independent engine run; a failed run is
//! reported and the batch moves on.

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use orcid_radar::{Config, EuropePmcClient, engine};

#[derive(Parser, Debug)]
#[command(name = "orcid-radar")]
#[command(about = "Find publications missing from a researcher's ORCID record via Europe PMC")]
#[command(version)]
struct Cli {
    /// ORCIDs to process. Comma- or space-separated; read from stdin when
    /// omitted.
    orcids: Vec<String>,

    /// Print the per-round attribution trace for each run
    #[arg(short, long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

/// Split CLI or stdin input into individual ORCIDs.
fn parse_orcids(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|chunk| chunk.split([',', ' ']))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Prompt for ORCIDs on stdin when none were given on the command line.
fn read_orcids_from_stdin() -> anyhow::Result<Vec<String>> {
    println!(
        "Please enter the ORCIDs to retrieve papers for. \
         You may enter more than one, separated by commas."
    );
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(parse_orcids(&[line]))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let orcids = if cli.orcids.is_empty() {
        read_orcids_from_stdin()?
    } else {
        parse_orcids(&cli.orcids)
    };

    if orcids.is_empty() {
        anyhow::bail!("no ORCIDs given");
    }

    let client = EuropePmcClient::new(Config::from_env()?)?;

    let mut failures = 0_usize;
    for orcid in &orcids {
        match engine::run(&client, orcid).await {
            Ok(report) => {
                if cli.verbose {
                    print!("{}", report.render_trace());
                }
                println!("{}", report.summary());
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}", err.to_user_message());
            }
        }
    }

    if failures == orcids.len() {
        anyhow::bail!("all {} runs failed", failures);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orcids_commas_and_spaces() {
        let raw = vec!["0000-0001, 0000-0002".to_string(), "0000-0003".to_string()];
        assert_eq!(parse_orcids(&raw), vec!["0000-0001", "0000-0002", "0000-0003"]);
    }

    #[test]
    fn test_parse_orcids_empty_chunks_dropped() {
        let raw = vec![", ,".to_string()];
        assert!(parse_orcids(&raw).is_empty());
    }
}
