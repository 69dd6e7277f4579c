//! The interactive command loop.
//!
//! One foreground task reads commands from stdin and is the only place the
//! log store is mutated. A Ctrl-C at any point, including inside focus
//! mode, flushes the active session to disk before exit.
//!
//! Persistence is deliberately uneven: goal changes and session ends save
//! immediately, while solved counts only reach disk when a focus block
//! ends.

pub mod display;

use std::io::Write as _;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Days;
use owo_colors::OwoColorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::chart::{self, format_hms, Metric, Period};
use crate::config::Config;
use crate::milestone::{self, Celebration};
use crate::session::SessionClock;
use crate::store::{self, LogStore};

type InputLines = Lines<BufReader<Stdin>>;

/// User-facing command errors. Reported inline; the loop continues and no
/// state is mutated.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the command list.")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown subject '{0}'.")]
    UnknownSubject(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Invalid goal '{0}'. Expected a non-negative integer.")]
    InvalidGoal(String),

    #[error("Invalid chart period '{0}'. Use t, w, or m.")]
    InvalidPeriod(String),

    #[error("No study session is active.")]
    NoActiveSession,
}

/// Whether the loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// One read from the terminal, with interrupts folded in.
enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

/// Wait for the next input line or a Ctrl-C, whichever comes first.
async fn next_input(lines: &mut InputLines) -> Result<InputEvent> {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => Ok(InputEvent::Interrupted),
        line = lines.next_line() => {
            Ok(match line.context("Failed to read input")? {
                Some(line) => InputEvent::Line(line),
                None => InputEvent::Eof,
            })
        }
    }
}

pub struct Repl {
    config: Config,
    store: LogStore,
    clock: SessionClock,
    rng: StdRng,
    /// Today's store key, fixed at startup. A session crossing midnight
    /// keeps logging to the day it started on.
    today: String,
}

impl Repl {
    pub fn new(config: Config, store: LogStore) -> Self {
        Self {
            config,
            store,
            clock: SessionClock::default(),
            rng: StdRng::from_entropy(),
            today: store::today_key(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("{}", display::banner().bold());
        self.store.ensure_day(&self.today, &self.config);
        self.print_today_status();
        println!("{}", display::help_text(&self.config.subjects));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            prompt(display::PROMPT);
            match next_input(&mut lines).await? {
                InputEvent::Interrupted => {
                    println!();
                    self.autosave_on_exit()?;
                    break;
                }
                InputEvent::Eof => {
                    self.autosave_on_exit()?;
                    break;
                }
                InputEvent::Line(line) => match self.handle_line(&line, &mut lines).await? {
                    Flow::Continue => {}
                    Flow::Quit => {
                        self.autosave_on_exit()?;
                        break;
                    }
                },
            }
        }
        println!("Bye!");
        Ok(())
    }

    // ============================================================
    // Command dispatch
    // ============================================================

    async fn handle_line(&mut self, line: &str, lines: &mut InputLines) -> Result<Flow> {
        let lowered = line.trim().to_lowercase();
        let parts: Vec<&str> = lowered.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return Ok(Flow::Continue);
        };

        let result = match command {
            "start" => return self.cmd_start(&parts, lines).await,
            "stop" => self.cmd_stop(),
            "status" => self.cmd_status(&parts),
            "chart" => self.cmd_chart(&parts),
            "goal" => self.cmd_goal(&parts),
            "help" => {
                println!("{}", display::help_text(&self.config.subjects));
                Ok(())
            }
            "quit" => return Ok(Flow::Quit),
            other => Err(CommandError::UnknownCommand(other.to_string()).into()),
        };

        if let Err(e) = result {
            report(&e);
        }
        Ok(Flow::Continue)
    }

    async fn cmd_start(&mut self, parts: &[&str], lines: &mut InputLines) -> Result<Flow> {
        let subject = match parts {
            [_, subject] if self.config.subjects.contains_key(*subject) => subject.to_string(),
            [_, unknown] => {
                report(&CommandError::UnknownSubject(unknown.to_string()).into());
                return Ok(Flow::Continue);
            }
            _ => {
                report(&CommandError::Usage("start <subject>").into());
                return Ok(Flow::Continue);
            }
        };

        if self.clock.start(display::PROMPT) {
            println!(
                "{}",
                "Study session started, total clock running!".green()
            );
        }
        let flow = self.focus_mode(&subject, lines).await?;
        self.print_today_status();
        Ok(flow)
    }

    fn cmd_stop(&mut self) -> Result<()> {
        let elapsed = self.clock.stop().ok_or(CommandError::NoActiveSession)?;
        self.store
            .ensure_day(&self.today, &self.config)
            .total_study_seconds += elapsed;
        self.store.save()?;
        println!(
            "{}",
            format!("Session ended, this round: {}", format_hms(elapsed)).green()
        );
        self.print_today_status();
        Ok(())
    }

    fn cmd_status(&mut self, parts: &[&str]) -> Result<()> {
        let (date_key, title) = match parts {
            [_] => (self.today.clone(), "today".to_string()),
            [_, arg] if matches!(*arg, "y" | "yes" | "yesterday") => {
                let yesterday = store::parse_date_key(&self.today)
                    .and_then(|d| d.checked_sub_days(Days::new(1)))
                    .map(|d| d.to_string())
                    .ok_or_else(|| CommandError::InvalidDate(self.today.clone()))?;
                let title = format!("{} (yesterday)", yesterday);
                (yesterday, title)
            }
            [_, arg] => {
                if store::parse_date_key(arg).is_none() {
                    return Err(CommandError::InvalidDate(arg.to_string()).into());
                }
                (arg.to_string(), arg.to_string())
            }
            _ => return Err(CommandError::Usage("status [y|YYYY-MM-DD]").into()),
        };

        let Some(day) = self.store.day(&date_key) else {
            println!(
                "{}",
                format!("No record for {}.", date_key).yellow()
            );
            return Ok(());
        };
        let session_elapsed = if date_key == self.today {
            self.clock.elapsed().unwrap_or(0.0)
        } else {
            0.0
        };
        println!(
            "{}",
            display::render_status(&title, day, &self.config.subjects, session_elapsed)
        );
        Ok(())
    }

    fn cmd_chart(&mut self, parts: &[&str]) -> Result<()> {
        // Both arguments are optional: `chart`, `chart time`, `chart w`,
        // and `chart count m` are all accepted.
        let (metric, period_arg) = match parts {
            [_] => (Metric::Count, "t"),
            [_, arg, rest @ ..] => match Metric::from_arg(arg) {
                // first arg may be a metric or a bare period selector
                Some(metric) => (metric, rest.first().copied().unwrap_or("t")),
                None => (Metric::Count, *arg),
            },
            _ => (Metric::Count, "t"),
        };
        let period = Period::from_arg(period_arg)
            .ok_or_else(|| CommandError::InvalidPeriod(period_arg.to_string()))?;

        let today = store::parse_date_key(&self.today)
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let agg = chart::aggregate(self.store.data(), &self.config.subjects, period, today);
        let title = format!("{}, {}", metric.label(), period.label());
        match chart::render_bars(&agg, metric, &title) {
            Some(rendered) => println!("\n{}", rendered),
            None => println!("{}", "No data to chart in that range.".yellow()),
        }
        Ok(())
    }

    fn cmd_goal(&mut self, parts: &[&str]) -> Result<()> {
        let [_, subject, value] = parts else {
            return Err(CommandError::Usage("goal <subject> <n>").into());
        };
        if !self.config.subjects.contains_key(*subject) {
            return Err(CommandError::UnknownSubject(subject.to_string()).into());
        }
        let goal: u32 = value
            .parse()
            .map_err(|_| CommandError::InvalidGoal(value.to_string()))?;

        let day = self.store.ensure_day(&self.today, &self.config);
        let record = day
            .subjects
            .get_mut(*subject)
            .expect("subject backfilled by ensure_day");
        record.set_goal(goal);
        self.store.save()?;
        println!(
            "{}",
            format!(
                "Goal for [{}] set to {}; milestones reset.",
                subject, goal
            )
            .green()
        );
        Ok(())
    }

    // ============================================================
    // Focus mode
    // ============================================================

    /// A subject's focus sub-session: each empty line logs one solved
    /// problem, `back`/`b` leaves. Focus time reaches the subject's record
    /// (and disk) when the block ends, however it ends.
    async fn focus_mode(&mut self, subject: &str, lines: &mut InputLines) -> Result<Flow> {
        let label = self
            .config
            .subjects
            .get(subject)
            .cloned()
            .unwrap_or_else(|| subject.to_string());
        println!(
            "{}",
            format!(
                "Focus mode for [{}]. Press Enter to log a problem, 'back' or 'b' to leave.",
                label
            )
            .magenta()
        );

        let focus_start = Instant::now();
        let mut last_problem = Instant::now();
        let mut solved_this_block = 0u32;
        let mut flow = Flow::Continue;

        loop {
            prompt(&display::focus_prompt(&label));
            let line = match next_input(lines).await? {
                InputEvent::Interrupted => {
                    println!();
                    flow = Flow::Quit;
                    break;
                }
                InputEvent::Eof => break,
                InputEvent::Line(line) => line,
            };
            let input = line.trim().to_lowercase();
            if input == "back" || input == "b" {
                break;
            }
            if !input.is_empty() {
                println!("  Invalid input. Press Enter to log a problem, 'b' to go back.");
                continue;
            }

            let now = Instant::now();
            let problem_seconds = now.duration_since(last_problem).as_secs_f64();
            last_problem = now;
            solved_this_block += 1;

            let day = self.store.ensure_day(&self.today, &self.config);
            let record = day
                .subjects
                .get_mut(subject)
                .expect("subject backfilled by ensure_day");
            record.record_solved();
            let progress = if record.goal > 0 {
                format!(" Progress: {}/{}", record.solved, record.goal)
            } else {
                String::new()
            };
            println!(
                "  -> Problem {} done in {}.{}",
                record.solved,
                format_hms(problem_seconds),
                progress
            );
            if let Some(celebration) = milestone::evaluate(record, &mut self.rng) {
                print_celebration(&celebration);
            }
        }

        let elapsed = focus_start.elapsed().as_secs_f64();
        let day = self.store.ensure_day(&self.today, &self.config);
        let record = day
            .subjects
            .get_mut(subject)
            .expect("subject backfilled by ensure_day");
        record.accumulate_time(elapsed);
        self.store.save()?;
        println!(
            "Left focus mode for [{}]: {} focused, {} problems.",
            label,
            format_hms(elapsed),
            solved_this_block
        );
        Ok(flow)
    }

    // ============================================================
    // Shared helpers
    // ============================================================

    fn print_today_status(&mut self) {
        let session_elapsed = self.clock.elapsed().unwrap_or(0.0);
        let day: &crate::models::DailyLog = self.store.ensure_day(&self.today, &self.config);
        println!(
            "{}",
            display::render_status("today", day, &self.config.subjects, session_elapsed)
        );
    }

    /// Fold an active session into today's total and persist. A no-op when
    /// the clock is idle, so every exit path can call it.
    fn autosave_on_exit(&mut self) -> Result<()> {
        let Some(elapsed) = self.clock.stop() else {
            return Ok(());
        };
        self.store
            .ensure_day(&self.today, &self.config)
            .total_study_seconds += elapsed;
        self.store.save()?;
        println!(
            "Saved this round's study time before exiting: {}",
            format_hms(elapsed)
        );
        Ok(())
    }
}

fn prompt(text: &str) {
    print!("\n{} ", text.bold());
    let _ = std::io::stdout().flush();
}

fn report(error: &anyhow::Error) {
    println!("{}", error.to_string().red());
}

fn print_celebration(celebration: &Celebration) {
    match celebration {
        Celebration::Milestone {
            percent,
            message,
            color,
        } => {
            println!(
                "\n{}",
                format!("✨ Milestone reached ({}%)! {}", percent, message)
                    .color(*color)
                    .bold()
            );
        }
        Celebration::GoalCompleted { message, color } => {
            println!(
                "\n{}",
                format!("🏆 Goal complete! {}", message).color(*color).bold()
            );
        }
    }
}
