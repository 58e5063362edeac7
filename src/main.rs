use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;

use kicklogic::actions::{ActionTable, GameActions};
use kicklogic::config::Settings;
use kicklogic::export;
use kicklogic::game_stats::{DEFAULT_STATISTICS, compute_game_stats};
use kicklogic::logging::init_logging;
use kicklogic::momentum::MomentumReport;
use kicklogic::pitch_maps::{pass_map, shot_map};
use kicklogic::player_roles::summarize_roles;
use kicklogic::session::Session;
use kicklogic::teams::TeamDirectory;
use kicklogic::weights::WeightTable;

#[derive(Parser, Debug)]
#[command(name = "kicklogic")]
#[command(about = "Match statistics, pitch maps and momentum from soccer action tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Actions CSV (overrides KICKLOGIC_ACTIONS)
    #[arg(long, global = true)]
    actions: Option<PathBuf>,

    /// Team metadata CSV used for labels (overrides KICKLOGIC_TEAMS)
    #[arg(long, global = true)]
    teams: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (overrides KICKLOGIC_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List games and their two teams
    Games,
    /// Shot and pass counts per team
    Stats {
        #[arg(long)]
        game: i64,
    },
    /// Per-minute momentum curve
    Momentum {
        #[arg(long)]
        game: i64,
        /// Team whose advantage is positive (default: side with the earliest weighted action)
        #[arg(long)]
        reference: Option<String>,
        /// EWM smoothing span
        #[arg(long)]
        span: Option<usize>,
        /// Weights such as `pass=1,shot=2,success:shot=3`
        #[arg(long)]
        weights: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Pass start/end points for one team
    Passes {
        #[arg(long)]
        game: i64,
        #[arg(long)]
        team: String,
    },
    /// Shot locations for one team
    Shots {
        #[arg(long)]
        game: i64,
        #[arg(long)]
        team: String,
    },
    /// Goals and minutes grouped by player role
    Roles {
        /// Player rank CSV (overrides KICKLOGIC_PLAYERANK)
        #[arg(long)]
        playerank: Option<PathBuf>,
    },
    /// Write momentum, stats and pitch maps to an .xlsx workbook
    Export {
        #[arg(long)]
        out: PathBuf,
        /// Games to include (default: all)
        #[arg(long)]
        game: Vec<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(path) = cli.actions {
        settings.actions_path = path;
    }
    if let Some(path) = cli.teams {
        settings.teams_path = Some(path);
    }
    if let Some(level) = cli.log_level {
        settings.log_level = level;
    }
    match &cli.command {
        Commands::Momentum { span, weights, .. } => {
            if let Some(span) = span {
                settings.span = *span;
            }
            if let Some(raw) = weights {
                settings.weights = raw.parse::<WeightTable>()?;
            }
        }
        Commands::Roles {
            playerank: Some(path),
        } => settings.playerank_path = path.clone(),
        _ => {}
    }

    init_logging(&settings.log_level)?;
    let session = Session::new(settings);

    match cli.command {
        Commands::Games => run_games(&session),
        Commands::Stats { game } => run_stats(&session, game),
        Commands::Momentum {
            game,
            reference,
            format,
            ..
        } => run_momentum(&session, game, reference.as_deref(), format),
        Commands::Passes { game, team } => run_passes(&session, game, &team),
        Commands::Shots { game, team } => run_shots(&session, game, &team),
        Commands::Roles { .. } => run_roles(&session),
        Commands::Export { out, game } => run_export(&session, &out, game),
    }
}

fn run_games(session: &Session) -> Result<()> {
    let table = session.actions()?;
    let directory = session.team_directory()?;
    for game_id in table.game_ids() {
        let game = table.game(game_id);
        match game.sides() {
            Ok(sides) => {
                let [a, b] = sides.teams();
                println!(
                    "{game_id:>10}  {} vs {}  ({} actions)",
                    directory.label(a, Some(&game)),
                    directory.label(b, Some(&game)),
                    game.rows().len()
                );
            }
            Err(err) => println!("{game_id:>10}  [{err}]"),
        }
    }
    Ok(())
}

fn selected_game(table: &ActionTable, game_id: i64) -> Result<GameActions<'_>> {
    let game = table.game(game_id);
    if game.is_empty() {
        return Err(anyhow!("game {game_id} not found in actions table"));
    }
    Ok(game)
}

fn run_stats(session: &Session, game_id: i64) -> Result<()> {
    let table = session.actions()?;
    let directory = session.team_directory()?;
    let game = selected_game(&table, game_id)?;

    let stats = match compute_game_stats(&game, DEFAULT_STATISTICS) {
        Ok(stats) => stats,
        Err(err) => {
            warn!(game_id, %err, "game statistics unavailable");
            println!("Error: {err}");
            return Ok(());
        }
    };

    println!("{:<24} {:<10} {:>6}", "Team", "Statistic", "Count");
    for row in &stats.rows {
        println!(
            "{:<24} {:<10} {:>6}",
            directory.label(&row.team_id, Some(&game)),
            row.statistic,
            row.count
        );
    }
    Ok(())
}

fn run_momentum(
    session: &Session,
    game_id: i64,
    reference: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let table = session.actions()?;
    let directory = session.team_directory()?;
    let game = selected_game(&table, game_id)?;
    let engine = session.engine()?;

    let report = match engine.compute(&game, reference) {
        Ok(report) => report,
        Err(err) => {
            warn!(game_id, %err, "momentum unavailable");
            println!("Error: {err}");
            return Ok(());
        }
    };

    match format {
        OutputFormat::Json => println!("{}", export::momentum_json(&report)?),
        OutputFormat::Csv => export::write_momentum_csv(std::io::stdout().lock(), &report)?,
        OutputFormat::Table => print_momentum_table(&report, &directory, &game),
    }
    Ok(())
}

fn print_momentum_table(report: &MomentumReport, directory: &TeamDirectory, game: &GameActions<'_>) {
    let reference = directory.label(&report.reference, Some(game));
    let other = directory.label(&report.other, Some(game));
    println!("Momentum: positive favours {reference}, negative favours {other}");
    println!(
        "{:>6} {:>9} {:>9}  {}",
        "Minute", "Momentum", "Smoothed", "Leader"
    );
    for s in &report.samples {
        println!(
            "{:>6} {:>9.3} {:>9.3}  {}",
            s.bucket,
            s.momentum,
            s.smoothed_momentum,
            directory.label(&s.leader, Some(game))
        );
    }
    println!(
        "Minutes led: {reference} {}, {other} {}",
        report.minutes_led(&report.reference),
        report.minutes_led(&report.other)
    );
}

fn run_passes(session: &Session, game_id: i64, team: &str) -> Result<()> {
    let table = session.actions()?;
    let game = selected_game(&table, game_id)?;
    let map = pass_map(&game, team);

    println!(
        "{:>7} {:>7} {:>7} {:>7}  {}",
        "Start X", "Start Y", "End X", "End Y", "Outcome"
    );
    for p in &map.passes {
        println!(
            "{:>7.1} {:>7.1} {:>7} {:>7}  {}",
            p.start_x,
            p.start_y,
            fmt_coord(p.end_x),
            fmt_coord(p.end_y),
            p.outcome.label()
        );
    }
    match map.completion_rate() {
        Some(rate) => println!(
            "{} passes, {} completed ({:.1}%)",
            map.passes.len(),
            map.completed(),
            rate * 100.0
        ),
        None => println!("No passes for team {team} in game {game_id}"),
    }
    if map.off_pitch() > 0 {
        warn!(game_id, team, count = map.off_pitch(), "passes outside pitch bounds");
    }
    Ok(())
}

fn run_shots(session: &Session, game_id: i64, team: &str) -> Result<()> {
    let table = session.actions()?;
    let game = selected_game(&table, game_id)?;
    let map = shot_map(&game, team);

    println!("{:>7} {:>7}  {}", "Start X", "Start Y", "Result");
    for s in &map.shots {
        println!("{:>7.1} {:>7.1}  {}", s.start_x, s.start_y, s.result_name);
    }
    for (result, count) in map.by_result() {
        println!("{result}: {count}");
    }
    Ok(())
}

fn run_roles(session: &Session) -> Result<()> {
    let rows = session.player_ranks()?;
    println!(
        "{:<20} {:>8} {:>8} {:>10} {:>12}",
        "Role", "Players", "Goals", "Minutes", "Min/Goal"
    );
    for role in summarize_roles(&rows) {
        println!(
            "{:<20} {:>8} {:>8} {:>10} {:>12.1}",
            role.role, role.players, role.goals, role.minutes, role.minutes_per_goal
        );
    }
    Ok(())
}

fn run_export(session: &Session, out: &Path, games: Vec<i64>) -> Result<()> {
    let table = session.actions()?;
    let directory = session.team_directory()?;
    let engine = session.engine()?;
    let game_ids = if games.is_empty() {
        table.game_ids()
    } else {
        games
    };

    let report = export::export_workbook(out, &table, &game_ids, &engine, &directory, |p| {
        tracing::debug!(current = p.current, total = p.total, "{}", p.message);
    })
    .with_context(|| format!("export to {}", out.display()))?;

    println!("Export complete: {}", out.display());
    println!("Games: {}", report.games);
    println!("Momentum rows: {}", report.momentum_rows);
    println!("Side bucket rows: {}", report.side_bucket_rows);
    println!("Stat rows: {}", report.stat_rows);
    println!("Passes: {}  Shots: {}", report.pass_rows, report.shot_rows);
    if !report.errors.is_empty() {
        println!("Errors: {}", report.errors.len());
        for err in report.errors.iter().take(8) {
            println!(" - {err}");
        }
    }
    Ok(())
}

fn fmt_coord(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".to_string())
}
