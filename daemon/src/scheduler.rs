use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Local, TimeZone};
use croner::Cron;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::dispatch::{DispatchOutcome, QuoteDispatcher};

struct ScheduleEntry {
    label: String,
    expression: String,
    cron: Cron,
}

/// Times of day at which a quote goes out.
///
/// Entries are either `H:MM` / `HH:MM` or a five-field cron expression.
pub struct DailySchedule {
    entries: Vec<ScheduleEntry>,
}

impl DailySchedule {
    pub fn from_times(times: &[String]) -> Result<Self> {
        let mut entries = Vec::new();
        for raw in times {
            match parse_entry(raw) {
                Ok(entry) => {
                    info!(time = %entry.label, cron = %entry.expression, "setting up schedule");
                    entries.push(entry);
                }
                Err(error) => warn!("skipping schedule entry {raw:?}: {error:#}"),
            }
        }
        if entries.is_empty() {
            bail!("no valid schedule times configured; expected HH:MM or a cron expression");
        }
        Ok(Self { entries })
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.label.as_str()).collect()
    }

    /// Earliest occurrence strictly after `after`, with the entry that owns it.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<(DateTime<Tz>, &str)> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .cron
                    .find_next_occurrence(after, false)
                    .ok()
                    .map(|at| (at, entry.label.as_str()))
            })
            .min_by(|left, right| left.0.cmp(&right.0))
    }
}

fn parse_entry(raw: &str) -> Result<ScheduleEntry> {
    let expression = cron_expression(raw)?;
    let cron = Cron::new(&expression)
        .parse()
        .map_err(|error| anyhow!("invalid cron expression {expression:?}: {error}"))?;
    Ok(ScheduleEntry {
        label: raw.trim().to_string(),
        expression,
        cron,
    })
}

fn cron_expression(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if let Some((hour, minute)) = trimmed.split_once(':') {
        let hour: u32 = hour
            .trim()
            .parse()
            .with_context(|| format!("invalid hour in {trimmed:?}"))?;
        let minute: u32 = minute
            .trim()
            .parse()
            .with_context(|| format!("invalid minute in {trimmed:?}"))?;
        if hour > 23 || minute > 59 {
            bail!("time {trimmed:?} is out of range");
        }
        return Ok(format!("{minute} {hour} * * *"));
    }
    if trimmed.split_whitespace().count() == 5 {
        return Ok(trimmed.to_string());
    }
    bail!("expected HH:MM or a five-field cron expression")
}

pub struct QuoteScheduler {
    schedule: DailySchedule,
    dispatcher: Arc<QuoteDispatcher>,
}

impl QuoteScheduler {
    pub fn new(schedule: DailySchedule, dispatcher: Arc<QuoteDispatcher>) -> Self {
        Self {
            schedule,
            dispatcher,
        }
    }

    /// Fires one dispatch per occurrence until Ctrl-C. A dispatch finishes
    /// before the next occurrence is computed.
    pub async fn run(&self) -> Result<()> {
        info!(times = ?self.schedule.labels(), "quote emailer started");
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let now = Local::now();
            let (next, label) = self
                .schedule
                .next_after(&now)
                .ok_or_else(|| anyhow!("schedule has no upcoming occurrence"))?;
            let wait = (next - now).to_std().unwrap_or_default();
            info!(
                next = %next.format("%Y-%m-%d %H:%M"),
                entry = label,
                "waiting for next trigger"
            );

            tokio::select! {
                _ = sleep(wait) => {}
                result = &mut shutdown => {
                    result.context("failed to listen for shutdown signal")?;
                    info!("shutdown requested, stopping scheduler");
                    return Ok(());
                }
            }

            info!(entry = label, "scheduled task: sending quote");
            if let DispatchOutcome::DeliveryFailed = self.dispatcher.send_now().await {
                warn!(entry = label, "quote will be retried at the next trigger");
            }
        }
    }
}
