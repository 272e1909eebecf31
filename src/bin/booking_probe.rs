//! Fires a burst of concurrent bookings at one event of a running server and
//! reports how many were accepted. With more requests than remaining tickets,
//! accepted quantities above the remaining count show the event was oversold.
//!
//! Configuration comes from the environment, the first CLI argument
//! overriding `PROBE_EVENT_ID`:
//! `PROBE_BASE_URL`, `PROBE_USER`, `PROBE_PASSWORD`, `PROBE_EVENT_ID`,
//! `PROBE_CONCURRENCY`, `PROBE_TICKETS`.
//!
//! The default login is `admin`/`admin`, the account the server creates at
//! startup when run with `ADMIN_USERNAME=admin ADMIN_PASSWORD=admin`. Any
//! registered user works too.

use colored::*;
use hdrhistogram::Histogram;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::env;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Barrier};

struct ProbeConfig {
    base_url: String,
    user: String,
    password: String,
    event_id: String,
    concurrency: usize,
    tickets: u32,
}

impl ProbeConfig {
    fn from_env() -> Option<Self> {
        let event_id = env::args().nth(1).or_else(|| env::var("PROBE_EVENT_ID").ok())?;
        Some(Self {
            base_url: env::var("PROBE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            user: env::var("PROBE_USER").unwrap_or_else(|_| "admin".to_string()),
            password: env::var("PROBE_PASSWORD").unwrap_or_else(|_| "admin".to_string()),
            event_id,
            concurrency: env::var("PROBE_CONCURRENCY").ok().and_then(|v| v.parse().ok()).unwrap_or(20),
            tickets: env::var("PROBE_TICKETS").ok().and_then(|v| v.parse().ok()).unwrap_or(1),
        })
    }
}

enum Outcome {
    Accepted,
    Rejected,
    Failed,
}

#[tokio::main]
async fn main() {
    let Some(config) = ProbeConfig::from_env() else {
        eprintln!("{}", "Usage: booking-probe <event-id> (or set PROBE_EVENT_ID)".red().bold());
        return;
    };

    println!("{}", "Booking probe".bold().green());
    println!("Target: {}/attendees/event/{}", config.base_url, config.event_id);
    println!("Requests: {} x {} general ticket(s)", config.concurrency, config.tickets);

    let client = match Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {e}");
            return;
        }
    };

    if client.get(format!("{}/health", config.base_url)).send().await.is_err() {
        eprintln!("{}", format!("Server is NOT reachable at {}. Please start it first.", config.base_url).red().bold());
        return;
    }

    let login = client.post(format!("{}/auth/login", config.base_url))
        .form(&[("user_name", config.user.as_str()), ("password", config.password.as_str())])
        .send()
        .await;
    match login {
        Ok(res) if res.status() == StatusCode::SEE_OTHER || res.status().is_success() => {
            println!("{}", format!("Logged in as {}", config.user).green());
        }
        Ok(res) => {
            eprintln!("{}", format!("Login failed with status {}", res.status()).red().bold());
            return;
        }
        Err(e) => {
            eprintln!("Login request failed: {e}");
            return;
        }
    }

    let url = format!("{}/attendees/event/{}/book", config.base_url, config.event_id);
    let barrier = Arc::new(Barrier::new(config.concurrency));
    let (tx, mut rx) = mpsc::channel(config.concurrency.max(1));

    for i in 0..config.concurrency {
        let client = client.clone();
        let url = url.clone();
        let barrier = barrier.clone();
        let tx = tx.clone();
        let tickets = config.tickets.to_string();

        tokio::spawn(async move {
            let name = format!("Probe attendee {}", i + 1);
            let form = [
                ("attendee_name", name.as_str()),
                ("general_tickets", tickets.as_str()),
                ("vip_tickets", "0"),
                ("notes", "booking-probe"),
            ];

            barrier.wait().await;
            let started = Instant::now();
            let outcome = match client.post(&url).form(&form).send().await {
                Ok(res) if res.status().is_success() => Outcome::Accepted,
                Ok(res) if res.status().is_client_error() => Outcome::Rejected,
                _ => Outcome::Failed,
            };
            let _ = tx.send((started.elapsed(), outcome)).await;
        });
    }
    drop(tx);

    let mut histogram = match Histogram::<u64>::new(3) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Failed to create histogram: {e}");
            return;
        }
    };
    let (mut accepted, mut rejected, mut failed) = (0u64, 0u64, 0u64);

    while let Some((latency, outcome)) = rx.recv().await {
        let _ = histogram.record(latency.as_micros() as u64);
        match outcome {
            Outcome::Accepted => accepted += 1,
            Outcome::Rejected => rejected += 1,
            Outcome::Failed => failed += 1,
        }
    }

    println!("\n{:<12} | {:<12} | {:<12} | {:<12} | {:<12}", "Accepted", "Rejected", "Failed", "Mean (ms)", "P99 (ms)");
    println!("{:-<12}-+-{:-<12}-+-{:-<12}-+-{:-<12}-+-{:-<12}", "", "", "", "", "");
    println!(
        "{:<12} | {:<12} | {:<12} | {:<12.2} | {:<12.2}",
        accepted,
        rejected,
        failed,
        histogram.mean() / 1000.0,
        histogram.value_at_quantile(0.99) as f64 / 1000.0,
    );
    println!(
        "\n{} general ticket(s) admitted. Compare against the remaining count shown before the run.",
        (accepted * u64::from(config.tickets)).to_string().cyan().bold()
    );
}
