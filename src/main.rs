//! resume-ats: ATS-style resume and job description compatibility analysis

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_ats::analysis::AnalysisClient;
use resume_ats::cli::{self, Cli, Commands, ConfigAction, InputArgs, TextSource};
use resume_ats::config::Config;
use resume_ats::consistency;
use resume_ats::controller::{AdmissionPolicy, AnalysisController, AnalysisState};
use resume_ats::error::{Result, ResumeAtsError};
use resume_ats::input::InputManager;
use resume_ats::output::formatter::{parse_output_format, save_report_to_file, suggest_filename};
use resume_ats::output::{AnalysisReport, ConsoleFormatter, ReportGenerator};
use resume_ats::session::{parse_command, InteractiveSession, SessionCommand, HELP};
use std::io::Write;
use std::process;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level)
    ).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let use_colors = cli.command.use_colors(config.output.color_output);
    match run_command(cli.command, config, cli.config).await {
        Ok(0) => {}
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", ConsoleFormatter::new(use_colors, false).format_error_banner(&e.user_message()));
            process::exit(1);
        }
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<std::path::PathBuf>) -> Result<i32> {
    match command {
        Commands::Analyze {
            inputs,
            output,
            save,
            model,
            timeout,
            detailed,
            no_color,
        } => {
            if let Some(model) = model {
                config.provider.model = model;
            }
            if let Some(timeout) = timeout {
                config.provider.timeout_secs = timeout;
            }
            let format = match output {
                Some(name) => parse_output_format(&name).map_err(ResumeAtsError::InvalidInput)?,
                None => config.output.format,
            };
            let use_colors = config.output.color_output && !no_color;
            let detailed = detailed || config.output.detailed;

            run_analyze(&config, inputs, format, save, use_colors, detailed).await
        }

        Commands::Interactive { model } => {
            if let Some(model) = model {
                config.provider.model = model;
            }
            run_interactive(&config).await?;
            Ok(0)
        }

        Commands::Extract { file } => {
            cli::validate_file_extension(&file, &["pdf", "txt", "text"])
                .map_err(ResumeAtsError::UnsupportedFormat)?;
            let text = InputManager::new().with_cache(false).extract_text(&file).await?;
            println!("{}", text);
            info!("Extracted {} characters from {}", text.chars().count(), file.display());
            Ok(0)
        }

        Commands::Consistency { profile } => {
            let text = InputManager::new().extract_text(&profile).await?;
            let spinner = spinner("Checking profile consistency (simulated)...");
            let outcome = consistency::run_simulated_check(&text, consistency::SIMULATED_DELAY).await;
            spinner.finish_and_clear();
            let check = outcome?;
            println!("{}", ConsoleFormatter::new(config.output.color_output, false).format_consistency(&check));
            Ok(0)
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::default_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration\n");
                    println!("File: {}", path.display());
                    println!("Provider URL: {}", config.provider.base_url);
                    println!("Model: {}", config.provider.model);
                    println!("API key variable: {}", config.provider.api_key_env);
                    println!(
                        "API key: {}",
                        if config.provider.resolve_api_key().is_ok() { "configured" } else { "missing" }
                    );
                    println!("Timeout: {}s", config.provider.timeout_secs);
                    println!("Minimum characters per text: {}", config.input.min_chars);
                    println!("Output format: {:?}", config.output.format);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
            Ok(0)
        }
    }
}

async fn run_analyze(
    config: &Config,
    inputs: InputArgs,
    format: resume_ats::config::OutputFormat,
    save: Option<std::path::PathBuf>,
    use_colors: bool,
    detailed: bool,
) -> Result<i32> {
    let resume_source = TextSource::from_args(inputs.resume, inputs.resume_text)
        .ok_or_else(|| ResumeAtsError::InvalidInput("A resume is required".to_string()))?;
    let job_source = TextSource::from_args(inputs.job, inputs.job_text)
        .ok_or_else(|| ResumeAtsError::InvalidInput("A job description is required".to_string()))?;

    let mut input_manager = InputManager::new().with_cache(config.input.enable_cache);
    let resume_text = read_source(&mut input_manager, &resume_source).await?;
    let job_text = read_source(&mut input_manager, &job_source).await?;

    let admission = AdmissionPolicy::new(config.input.min_chars);
    admission.check(&resume_text, &job_text)?;

    let client = AnalysisClient::from_config(&config.provider)?;
    let model = client.model().to_string();
    let controller = AnalysisController::new(client, admission);

    let spinner = spinner("Analyzing skills and keywords with the model...");
    let start = Instant::now();
    let outcome = controller.submit(&resume_text, &job_text).await;
    spinner.finish_and_clear();

    let generator = ReportGenerator::with_options(use_colors, detailed);
    match outcome? {
        AnalysisState::Succeeded(result) => {
            let report = AnalysisReport::new(
                result,
                &model,
                &resume_source.describe(),
                &job_source.describe(),
                start.elapsed().as_millis() as u64,
            );
            let rendered = generator.generate_report(&report, &format)?;

            match save {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(suggest_filename(&format, &resume_source.describe(), true))
                    } else {
                        path
                    };
                    save_report_to_file(&rendered, &path)?;
                    println!("✅ Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
            Ok(0)
        }
        state => {
            eprintln!("{}", generator.console().render_state(&state));
            Ok(1)
        }
    }
}

async fn read_source(input_manager: &mut InputManager, source: &TextSource) -> Result<String> {
    match source {
        TextSource::File(path) => input_manager.extract_text(path).await,
        TextSource::Inline(text) => Ok(text.clone()),
    }
}

async fn run_interactive(config: &Config) -> Result<()> {
    let client = AnalysisClient::from_config(&config.provider)?;
    let console = ConsoleFormatter::new(config.output.color_output, config.output.detailed);
    let mut session = InteractiveSession::new(
        client,
        AdmissionPolicy::new(config.input.min_chars),
        InputManager::new().with_cache(config.input.enable_cache),
        console,
    );
    let banner = ConsoleFormatter::new(config.output.color_output, false);

    println!("resume-ats interactive session (model: {})", config.provider.model);
    println!("{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("ats> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e.user_message());
                continue;
            }
        };

        let outcome = match command {
            SessionCommand::Quit => break,
            SessionCommand::Paste(field) => {
                if !session.accepts_input() {
                    println!("Reset before pasting new texts.");
                    continue;
                }
                println!("Paste the text, then a line with a single '.'");
                let text = read_block(&mut lines).await?;
                Ok(session.set_text(field, text))
            }
            SessionCommand::Consistency => {
                if !session.has_result() {
                    println!("Run an analysis first.");
                    continue;
                }
                println!("Paste your LinkedIn About or experience text, then a line with a single '.'");
                let profile = read_block(&mut lines).await?;
                let spinner = spinner("Checking profile consistency (simulated)...");
                let outcome = session.check_consistency(&profile).await;
                spinner.finish_and_clear();
                outcome
            }
            SessionCommand::Analyze => {
                let spinner = spinner("Analyzing skills and keywords with the model...");
                let outcome = session.execute(SessionCommand::Analyze).await;
                spinner.finish_and_clear();
                outcome
            }
            other => session.execute(other).await,
        };

        match outcome {
            Ok(text) => println!("{}", text),
            Err(e) if e.is_extraction() => {
                println!("{}", banner.format_error_banner(&e.user_message()));
                println!("You can try another file or paste the text instead.");
            }
            Err(e) => println!("{}", banner.format_error_banner(&e.user_message())),
        }
    }

    println!("Bye!");
    Ok(())
}

async fn read_block(lines: &mut Lines<BufReader<Stdin>>) -> Result<String> {
    let mut block = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "." {
            break;
        }
        block.push(line);
    }
    Ok(block.join("\n"))
}

fn prompt(text: &str) -> Result<()> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.magenta} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
