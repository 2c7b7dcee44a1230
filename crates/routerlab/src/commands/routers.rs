//! Router command handlers.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tabled::Tabled;
use tokio::sync::broadcast;

use routerlab_config::Lab;
use routerlab_core::{LogLine, Router, Simulator, Topology};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RouterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Indicator")]
    indicator: String,
    #[tabled(rename = "Up")]
    up: String,
}

impl RouterRow {
    fn new(r: &Router, color: bool) -> Self {
        let indicator = r.status.indicator();
        let up = r
            .interfaces
            .values()
            .filter(|s| **s == routerlab_core::LinkState::Up)
            .count();
        Self {
            id: r.id.clone(),
            address: r.address(),
            status: output::paint_status(r.status.as_str(), indicator, color),
            indicator: indicator.to_string(),
            up: format!("{up}/{}", r.interfaces.len()),
        }
    }
}

fn detail(r: &Router) -> String {
    let interfaces = r
        .interfaces
        .iter()
        .map(|(name, state)| format!("{name} {state}"))
        .collect::<Vec<_>>()
        .join(", ");
    [
        format!("ID:         {}", r.id),
        format!("Address:    {}", r.address()),
        format!("Status:     {}", r.status),
        format!("Interfaces: {interfaces}"),
        format!(
            "BGP:        {}",
            r.bgp.map_or_else(|| "-".into(), |n| n.to_string())
        ),
    ]
    .join("\n")
}

fn topology_detail(t: &Topology) -> String {
    let mut lines = vec!["Nodes:".to_owned()];
    lines.extend(
        t.nodes
            .iter()
            .map(|n| format!("  {:<8} {}", n.id, n.status)),
    );
    lines.push("Links:".to_owned());
    lines.extend(t.edges.iter().map(|e| format!("  {} -- {}", e.from, e.to)));
    lines.join("\n")
}

// ── Action reports ──────────────────────────────────────────────────

/// Outcome of a simulated action together with the activity it logged.
#[derive(Serialize)]
struct ActionReport<T: Serialize> {
    result: T,
    log: Vec<String>,
}

#[derive(Serialize)]
struct PingResult<'a> {
    from: &'a str,
    to: &'a str,
    reachable: bool,
}

/// Print the activity log lines (table/plain) or the structured report.
fn report<T: Serialize>(lab: &Lab, global: &GlobalOpts, result: T) -> Result<(), CliError> {
    let report = ActionReport {
        result,
        log: lab.log.messages(),
    };
    let rendered = output::render_single(
        global.output,
        &report,
        |r| r.log.join("\n"),
        |r| r.log.join("\n"),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn router(lab: &Lab, id: &str) -> Result<Arc<Router>, CliError> {
    lab.simulator
        .store()
        .get(id)
        .ok_or_else(|| CliError::RouterNotFound { id: id.to_owned() })
}

/// Block until the activity log reports the restart of `id` as complete.
async fn wait_for_restart(
    sim: &Simulator,
    id: &str,
    mut lines: broadcast::Receiver<LogLine>,
) -> Result<(), CliError> {
    let done = format!("{id}: Restart complete");
    let limit = sim.config().restart_delay * 2 + Duration::from_secs(1);

    let finished = tokio::time::timeout(limit, async {
        loop {
            match lines.recv().await {
                Ok(line) if line.message == done => return Ok(()),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(CliError::RestartInterrupted { id: id.to_owned() });
                }
            }
        }
    })
    .await;

    finished.map_err(|_| CliError::RestartTimeout {
        id: id.to_owned(),
        waited_ms: limit.as_millis(),
    })?
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(cmd: Command, lab: &Lab, global: &GlobalOpts) -> Result<(), CliError> {
    let sim = &lab.simulator;
    let color = output::should_color(global.color);

    match cmd {
        Command::List => {
            let snapshot = sim.store().snapshot();
            let rendered = output::render_list(
                global.output,
                snapshot.as_slice(),
                |r| RouterRow::new(r, color),
                |r| r.id.clone(),
            )?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        Command::Show { id } => {
            let r = router(lab, &id)?;
            let rendered =
                output::render_single(global.output, &r, |r| detail(r), |r| r.id.clone())?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        Command::Connect { id } => {
            let r = sim.connect(&id)?;
            report(lab, global, r)
        }

        Command::View { id } => {
            let r = sim.view(&id)?;
            report(lab, global, r)
        }

        Command::Restart { id, no_wait } => {
            let lines = lab.log.subscribe();
            sim.restart(&id)?;
            if !no_wait {
                wait_for_restart(sim, &id, lines).await?;
            }
            report(lab, global, router(lab, &id)?)
        }

        Command::Interfaces { id, toggle } => {
            if let Some(name) = toggle {
                sim.toggle_interface(&id, &name)?;
            } else {
                sim.show_interfaces(&id)?;
            }
            report(lab, global, router(lab, &id)?.interfaces.clone())
        }

        Command::Bgp {
            id,
            neighbor_ip,
            neighbor_as,
        } => {
            let neighbor = sim.configure_bgp(&id, &neighbor_ip, &neighbor_as)?;
            report(lab, global, neighbor)
        }

        Command::Ping { from, to } => {
            let reachable = sim.ping(&from, &to)?;
            report(
                lab,
                global,
                PingResult {
                    from: &from,
                    to: &to,
                    reachable,
                },
            )?;
            if reachable {
                Ok(())
            } else {
                Err(CliError::PingFailed { from, to })
            }
        }

        Command::ConnectAll => {
            sim.connect_all();
            report(lab, global, sim.store().snapshot())
        }

        Command::SimulateFailure => {
            sim.simulate_controller_failure();
            report(lab, global, sim.store().snapshot())
        }

        Command::Topology => {
            let topology = sim.topology();
            let rendered = output::render_single(
                global.output,
                &topology,
                topology_detail,
                |t| {
                    t.nodes
                        .iter()
                        .map(|n| n.id.clone())
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        // Handled before a lab is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detail_lists_interfaces_and_bgp() {
        let mut r = Router::new("R1", "10.0.0.1", 22, "connected");
        r.bgp = Some(routerlab_core::BgpNeighbor {
            neighbor_ip: "10.1.1.1".parse().unwrap(),
            neighbor_as: 65001,
        });
        let text = detail(&r);
        assert!(text.contains("Address:    10.0.0.1:22"));
        assert!(text.contains("Gig0/0 down, Gig0/1 down, Gig0/2 down"));
        assert!(text.contains("BGP:        10.1.1.1 AS65001"));
    }

    #[test]
    fn row_counts_up_interfaces() {
        let mut r = Router::new("R2", "10.0.0.2", 22, "unauthorized");
        if let Some(state) = r.interfaces.get_mut("Gig0/1") {
            *state = routerlab_core::LinkState::Up;
        }
        let row = RouterRow::new(&r, false);
        assert_eq!(row.up, "1/3");
        assert_eq!(row.indicator, "red");
        assert_eq!(row.status, "unauthorized");
    }

    #[tokio::test]
    async fn closed_log_is_not_a_completed_restart() {
        let lab = routerlab_config::build_lab(&routerlab_config::Config::default()).unwrap();
        let (tx, rx) = broadcast::channel::<LogLine>(4);
        drop(tx);

        let err = wait_for_restart(&lab.simulator, "R1", rx).await.unwrap_err();
        assert!(matches!(err, CliError::RestartInterrupted { ref id } if id == "R1"));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_wait_returns_on_completion_line() {
        let lab = routerlab_config::build_lab(&routerlab_config::Config::default()).unwrap();
        let lines = lab.log.subscribe();
        lab.simulator.restart("R2").unwrap();

        wait_for_restart(&lab.simulator, "R2", lines).await.unwrap();
        assert_eq!(
            lab.log.messages(),
            ["R2: Restart command simulated", "R2: Restart complete"]
        );
    }

    #[test]
    fn topology_text_shows_controller_link() {
        let routers: Vec<Arc<Router>> = ["R1", "R2", "R3"]
            .iter()
            .map(|id| Arc::new(Router::new(*id, "10.0.0.1", 22, "connected")))
            .collect();
        let text = topology_detail(&Topology::from_routers(&routers));
        assert!(text.contains("R3 -- R1"));
        assert!(text.contains("ODL -- R1"));
    }
}
