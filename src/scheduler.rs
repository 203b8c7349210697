//! Scheduled reminders and the nightly retention prune.
//!
//! Each job runs in its own background task that sleeps until the next local
//! occurrence of its time of day in the ledger's timezone.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

use crate::bot::ui_builder::format_reminder;
use crate::bot::BotState;
use crate::config::ScheduleConfig;
use crate::errors::error_logging;

/// The three daily check-ins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    Midday,
    Evening,
    Recap,
}

impl ReminderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderKind::Midday => "midday",
            ReminderKind::Evening => "evening",
            ReminderKind::Recap => "recap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledJob {
    Reminder(ReminderKind),
    Prune,
}

impl ScheduledJob {
    pub fn name(self) -> &'static str {
        match self {
            ScheduledJob::Reminder(kind) => kind.as_str(),
            ScheduledJob::Prune => "prune",
        }
    }
}

/// A job and its local time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSchedule {
    pub job: ScheduledJob,
    pub hour: u32,
    pub minute: u32,
}

/// Every job with its configured time, in firing order over a day
pub fn job_schedule(config: &ScheduleConfig) -> Vec<JobSchedule> {
    let mut jobs = vec![
        JobSchedule {
            job: ScheduledJob::Reminder(ReminderKind::Midday),
            hour: config.midday_hour,
            minute: 0,
        },
        JobSchedule {
            job: ScheduledJob::Reminder(ReminderKind::Evening),
            hour: config.evening_hour,
            minute: 0,
        },
        JobSchedule {
            job: ScheduledJob::Reminder(ReminderKind::Recap),
            hour: config.recap_hour,
            minute: 0,
        },
        JobSchedule {
            job: ScheduledJob::Prune,
            hour: config.prune_hour,
            minute: config.prune_minute,
        },
    ];
    jobs.sort_by_key(|schedule| (schedule.hour, schedule.minute));
    jobs
}

/// Next occurrence of `hour:minute` strictly after `now`, in `now`'s timezone.
///
/// A local time skipped by a DST transition moves to the following day.
pub fn next_run_after(now: DateTime<Tz>, hour: u32, minute: u32) -> Option<DateTime<Tz>> {
    let timezone = now.timezone();
    let mut date = now.date_naive();

    for _ in 0..3 {
        let local = date.and_hms_opt(hour, minute, 0)?;
        if let Some(candidate) = timezone.from_local_datetime(&local).earliest() {
            if candidate > now {
                return Some(candidate);
            }
        }
        date = date.succ_opt()?;
    }

    None
}

/// Spawn one background task per scheduled job
pub fn start_scheduler(
    bot: Bot,
    state: BotState,
    config: ScheduleConfig,
    chat_id: Option<i64>,
    language_code: Option<String>,
) -> Vec<tokio::task::JoinHandle<()>> {
    let timezone = state.tracker.lock().ledger().timezone();
    let language_code: Option<Arc<str>> = language_code.map(Arc::from);

    if chat_id.is_none() {
        warn!("CHAT_ID not configured, reminders will be skipped");
    }

    let handles = job_schedule(&config)
        .into_iter()
        .map(|schedule| {
            let bot = bot.clone();
            let state = state.clone();
            let language_code = language_code.clone();
            tokio::spawn(async move {
                run_job_loop(bot, state, schedule, timezone, chat_id, language_code).await
            })
        })
        .collect();

    info!(
        midday = config.midday_hour,
        evening = config.evening_hour,
        recap = config.recap_hour,
        prune = %format!("{:02}:{:02}", config.prune_hour, config.prune_minute),
        timezone = %timezone,
        "Scheduler started"
    );
    handles
}

async fn run_job_loop(
    bot: Bot,
    state: BotState,
    schedule: JobSchedule,
    timezone: Tz,
    chat_id: Option<i64>,
    language_code: Option<Arc<str>>,
) {
    loop {
        let now = Utc::now().with_timezone(&timezone);
        let Some(next) = next_run_after(now, schedule.hour, schedule.minute) else {
            error!(job = schedule.job.name(), "Could not compute next run time, stopping job");
            return;
        };

        let wait = (next - now).to_std().unwrap_or_default();
        debug!(job = schedule.job.name(), next_run = %next, "Job sleeping until next run");
        tokio::time::sleep(wait).await;

        crate::observability::record_scheduled_job(schedule.job.name());
        match schedule.job {
            ScheduledJob::Reminder(kind) => {
                send_reminder(&bot, &state, kind, chat_id, language_code.as_deref()).await
            }
            ScheduledJob::Prune => run_prune(&state),
        }
    }
}

/// Drop the days that fell out of the retention window
pub fn run_prune(state: &BotState) {
    let mut tracker = state.tracker.lock();
    let today = tracker.today();
    let removed = tracker.prune(today);
    info!(removed = ?removed, "Nightly prune completed");
}

/// Render the reminder text for today
pub fn build_reminder(
    state: &BotState,
    kind: ReminderKind,
    language_code: Option<&str>,
) -> String {
    let mut tracker = state.tracker.lock();
    let today = tracker.today();
    let snapshot = tracker.status(today);
    let goals = *tracker.goals();
    drop(tracker);

    format_reminder(kind, &snapshot, &goals, &state.localization, language_code)
}

async fn send_reminder(
    bot: &Bot,
    state: &BotState,
    kind: ReminderKind,
    chat_id: Option<i64>,
    language_code: Option<&str>,
) {
    let Some(chat_id) = chat_id else {
        warn!(reminder = kind.as_str(), "CHAT_ID not configured, reminder skipped");
        return;
    };

    let text = build_reminder(state, kind, language_code);
    match bot.send_message(ChatId(chat_id), text).await {
        Ok(_) => info!(reminder = kind.as_str(), chat_id, "Reminder sent"),
        Err(e) => error_logging::log_telegram_error(&e, "send_reminder", Some(chat_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Europe::Paris;

    #[test]
    fn test_next_run_later_today() {
        let now = Paris.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap();
        let next = next_run_after(now, 12, 0).unwrap();
        assert_eq!(next, Paris.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_next_run_rolls_to_tomorrow() {
        let now = Paris.with_ymd_and_hms(2024, 5, 10, 23, 0, 0).unwrap();
        let next = next_run_after(now, 23, 0).unwrap();
        assert_eq!(next, Paris.with_ymd_and_hms(2024, 5, 11, 23, 0, 0).unwrap());
    }

    #[test]
    fn test_skipped_local_time_moves_a_day() {
        // 2024-03-31 02:30 does not exist in Paris
        let now = Paris.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        let next = next_run_after(now, 2, 30).unwrap();
        assert_eq!(next.date_naive().to_string(), "2024-04-01");
        assert_eq!(next.hour(), 2);
    }

    #[test]
    fn test_default_schedule_order() {
        let jobs = job_schedule(&ScheduleConfig::default());
        let names: Vec<&str> = jobs.iter().map(|s| s.job.name()).collect();
        assert_eq!(names, vec!["prune", "midday", "evening", "recap"]);
        assert_eq!((jobs[0].hour, jobs[0].minute), (0, 1));
    }
}
