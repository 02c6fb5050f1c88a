// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{anyhow, bail, Result};
use std::env;
use std::path::PathBuf;

// Use library instead of local modules
use ev_scurve::{
    fmt_cost, fmt_index, fmt_pct, month_label, CurveGenerator, EvMetrics, ProjectConfig,
    AGGREGATE_PHASE_ID,
};

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let config = load_config(&mut args)?;

    match args.first().map(String::as_str) {
        Some("report") => run_report(&config, args.get(1).map(String::as_str)),
        Some("export") => {
            let path = args
                .get(1)
                .ok_or_else(|| anyhow!("usage: ev-scurve export <path> [PHASE]"))?;
            run_export(&config, path, args.get(2).map(String::as_str))
        }
        Some(other) => bail!("unknown command '{}' (try: report, export)", other),
        None => run_ui_mode(config),
    }
}

/// Pull an optional `--config <path>` out of the argument list; fall back
/// to the built-in demo project.
fn load_config(args: &mut Vec<String>) -> Result<ProjectConfig> {
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        if pos + 1 >= args.len() {
            bail!("--config requires a file path");
        }
        let path = PathBuf::from(args.remove(pos + 1));
        args.remove(pos);
        return ProjectConfig::from_json_file(&path);
    }

    let config = ProjectConfig::demo();
    config.validate()?;
    Ok(config)
}

fn run_report(config: &ProjectConfig, phase_id: Option<&str>) -> Result<()> {
    let phase_id = phase_id.unwrap_or(AGGREGATE_PHASE_ID);
    let phase = config
        .phase(phase_id)
        .ok_or_else(|| anyhow!("unknown phase '{}'", phase_id))?;

    let gen = CurveGenerator::new(config);
    let sample = gen
        .data_date_sample(phase_id)
        .ok_or_else(|| anyhow!("no series for phase '{}'", phase_id))?;
    let metrics = EvMetrics::from_sample(&sample, phase.bac);

    println!("📈 Earned Value S-Curve — {}", config.project_name);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "Phase: {} ({})  │  Data Date: {} (month {})",
        phase.display_name,
        phase.id,
        month_label(config.start_date, config.data_date),
        config.data_date
    );

    println!("\n💰 KPIs at data date");
    println!("  BAC              {}", fmt_cost(metrics.bac));
    println!("  PV (BCWS)        {}", fmt_cost(metrics.pv));
    println!(
        "  EV (BCWP)        {}  ({} complete)",
        fmt_cost(metrics.ev),
        fmt_pct(metrics.percent_complete)
    );
    println!(
        "  AC (ACWP)        {}  ({} of BAC spent)",
        fmt_cost(metrics.ac),
        fmt_pct(metrics.percent_spent)
    );

    println!("\n📊 Performance indices");
    println!(
        "  CPI  {} {}   SPI  {} {}",
        fmt_index(metrics.cpi),
        metrics.cost_health().symbol(),
        fmt_index(metrics.spi),
        metrics.schedule_health().symbol()
    );
    println!(
        "  CV   {} ({})   SV   {} ({})",
        fmt_cost(metrics.cv),
        fmt_pct(metrics.cv_percent),
        fmt_cost(metrics.sv),
        fmt_pct(metrics.sv_percent)
    );

    println!("\n🔮 Forecast");
    println!("  EAC  {}   ETC  {}", fmt_cost(metrics.eac), fmt_cost(metrics.etc));
    println!("  VAC  {}   TCPI {}", fmt_cost(metrics.vac), fmt_index(metrics.tcpi));

    println!("\n🗂️  Phases");
    for p in &config.phases {
        match config.schedule(&p.id) {
            Some(sched) => println!(
                "  {:<12} {:<32} BAC {:>9}  months {}-{}",
                p.id,
                p.display_name,
                fmt_cost(p.bac),
                sched.start_month,
                sched.end_month
            ),
            None => println!(
                "  {:<12} {:<32} BAC {:>9}  (rollup)",
                p.id,
                p.display_name,
                fmt_cost(p.bac)
            ),
        }
    }

    Ok(())
}

fn run_export(config: &ProjectConfig, path: &str, phase_id: Option<&str>) -> Result<()> {
    let phase_id = phase_id.unwrap_or(AGGREGATE_PHASE_ID);
    let gen = CurveGenerator::new(config);
    let series = gen
        .phase_series(phase_id)
        .ok_or_else(|| anyhow!("unknown phase '{}'", phase_id))?;

    ev_scurve::export_series(std::path::Path::new(path), &series)?;
    println!("✓ Exported {} months for {} to {}", series.len(), phase_id, path);

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: ProjectConfig) -> Result<()> {
    println!("🖥️  Loading S-Curve dashboard... (Press 'q' to quit)\n");

    let mut app = ui::App::new(config);
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: ProjectConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a text report: cargo run report");
    std::process::exit(1);
}
