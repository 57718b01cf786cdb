//! ats-scorer: score and rank resumes against a job description

use ats_scorer::cli::{self, Cli, Commands, CommonArgs, ConfigAction};
use ats_scorer::config::{MatchMode, OutputFormat};
use ats_scorer::input::InputManager;
use ats_scorer::output::report::{CandidateReport, Leaderboard};
use ats_scorer::output::{save_report_to_file, suggest_filename, ReportGenerator};
use ats_scorer::{AtsScorerError, Config, Result, ScoringEngine};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, mut config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Score { resume, common } => {
            info!("Scoring {} against {}", resume.display(), common.job.display());

            cli::validate_file_extension(&resume, cli::RESUME_EXTENSIONS)
                .map_err(|e| AtsScorerError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&common.job, cli::JOB_EXTENSIONS)
                .map_err(|e| AtsScorerError::InvalidInput(format!("Job description file: {}", e)))?;

            let format = common.output_format(&config)?;
            let engine = build_engine(&mut config, &common)?;

            let mut input_manager = InputManager::new().with_cache(config.input.enable_caching);
            let job_text = input_manager.extract_text(&common.job).await?;
            let resume_text = input_manager.extract_text(&resume).await?;
            debug!(
                "Extracted {} chars of JD and {} chars of resume",
                job_text.len(),
                resume_text.len()
            );

            let score = engine.score_checked(&job_text, &resume_text)?;
            let candidate = file_stem(&resume);
            info!("{}: {:.2} ({})", candidate, score.total_score, score.decision);

            let report = CandidateReport::new(
                candidate.clone(),
                score,
                common.job.display().to_string(),
                Some(resume.display().to_string()),
                engine.info(),
            );

            let generator = report_generator(&config, &common, format);
            let content = generator.generate_report(&report, &format)?;
            emit(&content, format, common.save.as_deref(), &candidate)?;
        }

        Commands::Rank { resumes, top, common } => {
            info!("Ranking {} resumes against {}", resumes.len(), common.job.display());

            cli::validate_file_extension(&common.job, cli::JOB_EXTENSIONS)
                .map_err(|e| AtsScorerError::InvalidInput(format!("Job description file: {}", e)))?;
            for resume in &resumes {
                cli::validate_file_extension(resume, cli::RESUME_EXTENSIONS).map_err(|e| {
                    AtsScorerError::InvalidInput(format!("Resume file {}: {}", resume.display(), e))
                })?;
            }

            let format = common.output_format(&config)?;
            let engine = build_engine(&mut config, &common)?;

            let mut input_manager = InputManager::new().with_cache(config.input.enable_caching);
            let job_text = input_manager.extract_text(&common.job).await?;

            let pb = extraction_progress(resumes.len(), format);
            let texts = input_manager.extract_batch(&resumes, &pb).await?;

            let mut ranked = engine.rank_checked(&job_text, &texts)?;
            if let Some(n) = top {
                ranked.truncate(n);
            }

            let leaderboard = Leaderboard::new(ranked, common.job.display().to_string(), engine.info());
            for (decision, count) in leaderboard.decision_counts() {
                debug!("{}: {}", decision.label(), count);
            }

            let generator = report_generator(&config, &common, format);
            let content = generator.generate_leaderboard(&leaderboard, &format)?;
            emit(&content, format, common.save.as_deref(), &format!("{}_ranking", file_stem(&common.job)))?;
        }

        Commands::Config { action } => {
            let path = config_file.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    let content = toml::to_string_pretty(&config).map_err(|e| {
                        AtsScorerError::Configuration(format!("Failed to serialize config: {}", e))
                    })?;
                    println!("# {}\n", path.display());
                    println!("{}", content);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset to defaults: {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Apply per-run overrides, then build the engine once for the whole run.
fn build_engine(config: &mut Config, common: &CommonArgs) -> Result<ScoringEngine> {
    if common.word_boundary {
        config.scoring.match_mode = MatchMode::WordBoundary;
    }

    if let Some(path) = &common.lexicon {
        info!("Using lexicon from {}", path.display());
        config.lexicon = config.lexicon.overlay_file(path)?;
    }

    let engine = ScoringEngine::new(config)?;
    debug!(
        "Engine ready: {} lexicon phrases, {:?} matching",
        engine.info().lexicon_phrases,
        engine.info().match_mode
    );
    Ok(engine)
}

fn report_generator(config: &Config, common: &CommonArgs, format: OutputFormat) -> ReportGenerator {
    let use_colors = format == OutputFormat::Console && config.output.color_output && !common.no_color;
    ReportGenerator::with_options(use_colors, common.detailed || config.output.detailed)
}

fn extraction_progress(len: usize, format: OutputFormat) -> ProgressBar {
    if format != OutputFormat::Console {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

fn emit(content: &[u8], format: OutputFormat, save: Option<&Path>, base: &str) -> Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(content, path)?;
            println!("Report saved to {}", path.display());
        }
        None if format == OutputFormat::Pdf => {
            let path = PathBuf::from(suggest_filename(&format, base, true));
            save_report_to_file(content, &path)?;
            println!("Report saved to {}", path.display());
        }
        None => print!("{}", String::from_utf8_lossy(content)),
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
