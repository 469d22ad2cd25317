//! copilot-runner: headless driver for the RM co-pilot engine.
//!
//! Usage:
//!   copilot-runner --seed 42 --clients 20
//!   copilot-runner --portfolio clients.json --config copilot.json
//!   copilot-runner --seed 42 --ipc-mode      (JSON lines on stdin/stdout)

mod drafting;
mod generator;
mod session;

use anyhow::Result;
use rm_copilot_core::{
    aggregator::{DashboardView, PortfolioFilter},
    config::CopilotConfig,
    pipeline::PipelineStatus,
    portfolio::Portfolio,
};
use session::Session;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetFilter {
        filter: PortfolioFilter,
    },
    ClearFilter,
    SelectClient {
        name: String,
    },
    SavePipeline {
        #[serde(default)]
        client: Option<String>,
        status: PipelineStatus,
        #[serde(default)]
        notes: String,
        #[serde(default)]
        next_action: String,
    },
    Draft {
        #[serde(default)]
        client: Option<String>,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let clients = parse_arg(&args, "--clients", 20usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config_path = string_arg(&args, "--config");
    let portfolio_path = string_arg(&args, "--portfolio");

    let config = match config_path {
        Some(path) => CopilotConfig::load(path)?,
        None => CopilotConfig::default(),
    };

    let portfolio = match portfolio_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
            Portfolio::from_json(&content, &config.thresholds)?
        }
        None => Portfolio::ingest(generator::demo_portfolio(seed, clients), &config.thresholds)?,
    };

    if !ipc_mode {
        println!("RM Co-Pilot: copilot-runner");
        println!("  seed:      {seed}");
        println!("  clients:   {}", portfolio.len());
        println!("  operator:  {} ({})", config.operator.name, config.operator.branch);
        println!();
    }

    let mut session = Session::new(config, portfolio);

    if ipc_mode {
        run_ipc_loop(&mut session, io::stdin().lock(), io::stdout().lock())?;
    } else {
        print_summary(&session);
    }
    Ok(())
}

/// One JSON command per input line, one JSON reply per output line.
/// Malformed or failing commands reply `{"error": ...}` and the loop goes on.
fn run_ipc_loop(
    session: &mut Session,
    mut input: impl BufRead,
    mut stdout: impl Write,
) -> Result<()> {
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = input.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(()),
            IpcCommand::SetFilter { filter } => {
                session.set_filter(filter);
                Ok(())
            }
            IpcCommand::ClearFilter => {
                session.clear_filter();
                Ok(())
            }
            IpcCommand::SelectClient { name } => session.select(&name),
            IpcCommand::SavePipeline { client, status, notes, next_action } => {
                session.save_pipeline(client, status, notes, next_action, chrono::Utc::now())
            }
            IpcCommand::Draft { client } => {
                match session.draft(client) {
                    Ok(draft) => writeln!(stdout, "{}", serde_json::to_string(&draft)?)?,
                    Err(e) => write_error(&mut stdout, &e.to_string())?,
                }
                stdout.flush()?;
                continue;
            }
        };

        match outcome {
            Ok(()) => writeln!(stdout, "{}", serde_json::to_string(&session.state())?)?,
            Err(e) => {
                log::warn!("ipc: {e}");
                write_error(&mut stdout, &e.to_string())?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn print_summary(session: &Session) {
    let view = DashboardView::build(
        &session.portfolio,
        &session.filter,
        &session.config,
        &session.tracker,
    );
    let s = &view.summary;

    println!("=== PORTFOLIO SUMMARY ===");
    println!("  clients:          {}", s.client_count);
    println!("  total giro:       {:.1}M (avg {:.1}M)", s.total_balance, s.mean_balance);
    println!("  total potential:  {:.1}M", s.total_potential);
    println!("  target clients:   {} ({:.1}%)", s.target_count, s.target_share * 100.0);
    println!("  without SME loan: {} ({:.1}%)", s.sme_none_count, s.sme_gap_share * 100.0);
    println!("  SME penetration:  {:.1}%", s.sme_penetration * 100.0);
    println!("  payroll pen.:     {:.1}%", s.payroll_penetration * 100.0);
    println!("  full package:     {:.1}%", s.full_package_penetration * 100.0);
    println!("  avg tenure:       {:.1} years", s.mean_tenure);
    println!("  engagement:       {:.1}%", view.activity.engagement_score * 100.0);

    println!();
    println!("=== PRIORITY LEADS ===");
    if view.priority_leads.is_empty() {
        println!("  (No target clients)");
    }
    for c in &view.priority_leads {
        println!(
            "  {:<26} {:<16} giro {:>8.1}M  potential {:>8.1}M",
            c.name(),
            c.tag().label(),
            c.record.giro_balance,
            c.potential_value()
        );
    }
    println!(
        "  contact coverage: {:.0} days avg ({:?})",
        view.lead_summary.mean_days_since_contact, view.lead_summary.contact_status
    );

    println!();
    println!("=== RELATIONSHIP ALERTS ===");
    println!("  loyal clients:    {}", view.retention.loyal_count);
    println!("  neglected loyal:  {}", view.retention.neglected_loyal_count);
    println!("  platinum:         {}", view.retention.platinum_count);
    println!("  at-risk (value):  {}", view.retention.at_risk_count);
    for lead in &view.segments.reengagement {
        println!(
            "  {:?} {:<26} {} days since contact",
            lead.urgency,
            lead.client.name(),
            lead.client.record.days_since_contact
        );
    }

    println!();
    println!("=== MILESTONES ===");
    for c in &view.segments.milestones {
        println!("  {:<26} {} years ({})", c.name(), c.record.tenure_years, c.loyalty());
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
