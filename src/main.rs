//! Print the monthly study report from the local database.
//!
//! Run with: cargo run -- [YYYY-MM]

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};

use studytime_lib::reports::{format_duration, format_hours_minutes, MonthlyReport};
use studytime_lib::{bootstrap, data_dir, utils::logging};

const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

/// `2024-03` → `(2, 2024)`. Months are zero based from here on.
fn parse_month(arg: &str) -> Result<(u32, i32)> {
    let (year, month) = arg
        .split_once('-')
        .with_context(|| format!("expected YYYY-MM, got '{arg}'"))?;
    let year: i32 = year.parse().with_context(|| format!("invalid year '{year}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("invalid month '{month}'"))?;
    if !(1..=12).contains(&month) {
        bail!("month must be between 1 and 12, got {month}");
    }
    Ok((month - 1, year))
}

fn print_report(report: &MonthlyReport) {
    let month_name = MONTH_NAMES
        .get(report.month as usize)
        .copied()
        .unwrap_or("?");
    println!("=== {} {} ===", month_name, report.year);
    println!(
        "Tempo total: {}",
        format_hours_minutes(report.summary.total_seconds)
    );
    println!("Dias de estudo: {}", report.summary.study_days);
    println!("Sessões: {}", report.summary.session_count);

    if !report.has_data() {
        println!();
        println!("Nenhuma sessão registrada neste mês.");
        return;
    }

    println!();
    println!("--- Por dia ---");
    for day in report.daily.iter().filter(|day| day.seconds > 0) {
        // One block per quarter hour, at least one for any study at all.
        let blocks = ((day.seconds / 900) as usize).max(1);
        println!(
            "{:>2} | {} {}",
            day.day,
            "█".repeat(blocks),
            format_duration(day.seconds)
        );
    }

    println!();
    println!("--- Por matéria ---");
    for total in &report.by_subject {
        let share = total.seconds as f64 * 100.0 / report.summary.total_seconds as f64;
        println!(
            "{:<16} {:>10} {:>5.0}%",
            total.subject.name,
            format_hours_minutes(total.seconds),
            share
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let today = Local::now();
    let (month, year) = match std::env::args().nth(1) {
        Some(arg) => parse_month(&arg)?,
        None => (today.month0(), today.year()),
    };

    let dir = data_dir()?;
    let app = bootstrap(&dir).await?;

    let report = app.store.monthly_report(month, year, &Local);
    print_report(&report);

    app.shutdown().await;
    Ok(())
}
