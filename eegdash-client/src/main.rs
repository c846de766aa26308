//! eegdash - terminal front end for the EEG analysis dashboard
//!
//! Every dashboard page is a subcommand. Configuration resolves as
//! `--api-url` > `EEGDASH_API_URL` > config.toml > compiled default, and the
//! session persists in the state file between invocations.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use eegdash_client::api::{EegDataQuery, QueueQuery};
use eegdash_client::views::dashboard::{DashboardPoller, DashboardSnapshot, DashboardView};
use eegdash_client::views::eeg::{channel_series, EegBrowser, TABLE_ROWS};
use eegdash_client::views::reports::{download_to, PatientInfo, ReportComposer, ReportTemplate};
use eegdash_client::views::result_detail::{interpretation, ResultDetail};
use eegdash_client::views::results::{ResultFilter, ResultStats, RiskLevel, SortKey};
use eegdash_client::views::upload::{UploadBatch, UploadProgress, UploadWorkflow};
use eegdash_client::views::{QueueFilter, QueueStats};
use eegdash_client::{BuildInfo, ClientContext};
use eegdash_common::config::ConfigResolver;
use eegdash_common::format::{format_file_size, format_safe_date, FULL_DATETIME, TIME_WITH_MS};
use eegdash_common::models::{AnalysisJob, JobStatus, Priority};
use eegdash_common::ClientEvent;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Command-line arguments for eegdash
#[derive(Parser, Debug)]
#[command(name = "eegdash")]
#[command(about = "EEG analysis dashboard client")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides EEGDASH_API_URL and config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file (default: ~/.config/eegdash/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login(Credentials),
    /// Create an account and log in with it
    Register {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long)]
        role: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Backend health check
    Health,
    /// Build information
    Version,
    /// Summary stats and recent analyses
    Dashboard {
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
    },
    /// System-wide statistics
    Stats,
    /// Upload EEG files and queue them for analysis
    Upload {
        #[arg(long)]
        patient_id: String,
        #[arg(long, default_value = "normal", value_parser = PRIORITIES)]
        priority: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Uploaded files
    #[command(subcommand)]
    Files(FilesCommand),
    /// Analysis queue
    #[command(subcommand)]
    Queue(QueueCommand),
    /// Run the model directly on a server-side file
    Predict {
        #[arg(long)]
        file_path: String,
        #[arg(long, default_value = "")]
        patient_id: String,
    },
    /// Analysis results
    #[command(subcommand)]
    Results(ResultsCommand),
    /// Generated reports
    #[command(subcommand)]
    Reports(ReportsCommand),
    /// Stored EEG time series
    #[command(subcommand)]
    Eeg(EegCommand),
}

const PRIORITIES: [&str; 3] = ["urgent", "normal", "routine"];
const PRIORITY_FILTERS: [&str; 4] = ["all", "urgent", "normal", "routine"];
const STATUSES: [&str; 5] = ["queued", "processing", "completed", "failed", "cancelled"];
const STATUS_FILTERS: [&str; 6] = ["all", "queued", "processing", "completed", "failed", "cancelled"];

#[derive(Args, Debug)]
struct Credentials {
    #[arg(short, long)]
    username: String,
    /// Read from stdin when omitted
    #[arg(short, long, env = "EEGDASH_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum FilesCommand {
    List,
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
enum QueueCommand {
    List {
        #[arg(long, value_parser = STATUS_FILTERS)]
        status: Option<String>,
        #[arg(long, value_parser = PRIORITY_FILTERS)]
        priority: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Change a job's priority
    Priority {
        id: u64,
        #[arg(value_parser = PRIORITIES)]
        priority: String,
    },
    /// Change a job's status
    Status {
        id: u64,
        #[arg(value_parser = STATUSES)]
        status: String,
    },
    /// Cancel an active job
    Cancel { id: u64 },
    /// Cancel an active job or permanently delete a finished one
    Delete {
        id: u64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ResultsCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_parser = STATUS_FILTERS)]
        status: Option<String>,
        #[arg(long)]
        diagnosis: Option<String>,
        /// date, confidence, patient or diagnosis
        #[arg(long, default_value = "date")]
        sort: String,
    },
    Show { id: String },
    Delete {
        id: u64,
        #[arg(short, long)]
        yes: bool,
    },
    /// Generate the clinical report for a result
    Report { id: String },
}

#[derive(Subcommand, Debug)]
enum ReportsCommand {
    Generate {
        #[arg(long)]
        result_id: u64,
        /// clinical, research or brief
        #[arg(long, default_value = "clinical")]
        template: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        patient_id: String,
        #[arg(long, default_value = "")]
        age: String,
        #[arg(long, default_value = "")]
        gender: String,
        #[arg(long, default_value = "")]
        recording_date: String,
        #[arg(long, default_value = "")]
        clinical_history: String,
        #[arg(long, default_value = "")]
        medications: String,
    },
    List,
    Show { id: u64 },
    Delete { id: u64 },
    Download {
        id: u64,
        /// File or directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum EegCommand {
    Subjects {
        #[arg(long, default_value = "")]
        search: String,
    },
    Import {
        #[arg(long)]
        file_path: String,
        #[arg(long)]
        subject_id: String,
    },
    Data {
        subject_id: String,
        #[arg(long, default_value_t = 1000)]
        limit: u32,
        #[arg(long)]
        start_time: Option<String>,
        #[arg(long)]
        end_time: Option<String>,
        /// Print per-channel series for these channels instead of the table
        #[arg(long, value_delimiter = ',')]
        channels: Vec<usize>,
    },
    Delete {
        subject_id: String,
        #[arg(short, long)]
        yes: bool,
    },
    Predict { subject_id: String },
}

impl Command {
    /// Commands that work without a stored session
    fn is_public(&self) -> bool {
        matches!(
            self,
            Command::Login(_)
                | Command::Register { .. }
                | Command::Logout
                | Command::Health
                | Command::Version
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigResolver::new()
        .with_cli_api_url(cli.api_url.clone())
        .with_config_path(cli.config.clone())
        .resolve();

    let default_filter = format!(
        "eegdash={level},eegdash_client={level},eegdash_common={level}",
        level = config.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("{}", BuildInfo::current());
    info!("Backend: {}", config.api_url);

    let context = ClientContext::from_config(&config)
        .with_context(|| format!("Failed to open state file {}", config.state_file.display()))?;

    let mut events = context.events.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let ClientEvent::LoginRequired { .. } = event {
                eprintln!("Session expired. Run `eegdash login` to sign in again.");
            }
        }
    });

    if !cli.command.is_public() && !context.session.initialize().await {
        bail!("Not logged in. Run `eegdash login` first.");
    }

    run(cli.command, &context).await
}

async fn run(command: Command, ctx: &ClientContext) -> Result<()> {
    let api = &ctx.api;

    match command {
        Command::Login(credentials) => {
            let password = password(&credentials)?;
            let user = ctx.session.login(&credentials.username, &password).await?;
            println!("Logged in as {} ({})", user.username, user.role);
        }
        Command::Register { credentials, role } => {
            let password = password(&credentials)?;
            let user = ctx
                .session
                .register(&credentials.username, &password, role.as_deref())
                .await?;
            println!("Registered and logged in as {} ({})", user.username, user.role);
        }
        Command::Logout => {
            ctx.session.logout();
            println!("Logged out");
        }
        Command::Whoami => {
            if let Some(user) = ctx.session.user() {
                let role = if user.is_admin() { "administrator" } else { user.role.as_str() };
                println!("{} (id {}, {})", user.username, user.id, role);
            }
        }
        Command::Health => {
            let health = api.auth.check_health().await?;
            println!(
                "{} (version {}, {})",
                health.status,
                health.version.as_deref().unwrap_or("unknown"),
                format_safe_date(health.timestamp.as_deref(), FULL_DATETIME)
            );
        }
        Command::Version => {
            println!("{}", BuildInfo::current());
        }
        Command::Dashboard { watch } => {
            if watch {
                watch_dashboard(ctx).await?;
            } else {
                let view = DashboardView::from_response(api.dashboard.get_dashboard().await?);
                print_dashboard(&view);
            }
        }
        Command::Stats => {
            let stats = api.dashboard.get_stats().await?;
            println!("Total files:          {}", stats.total_files);
            println!("Completed jobs:       {}", stats.completed_jobs);
            println!("Pending jobs:         {}", stats.pending_jobs);
            println!("Failed jobs:          {}", stats.failed_jobs);
            println!("Processed today:      {}", stats.dashboard.files_processed_today);
            println!("Accuracy rate:        {:.1}%", stats.dashboard.accuracy_rate);
            println!("Avg processing time:  {:.1} min", stats.dashboard.avg_processing_time);
        }
        Command::Upload {
            patient_id,
            priority,
            files,
        } => upload(ctx, &patient_id, Priority::from(priority), files).await?,
        Command::Files(FilesCommand::List) => {
            let list = api.upload.list_files().await?;
            print_jobs(&list.files);
            println!("{} files", list.total);
        }
        Command::Files(FilesCommand::Delete { id }) => {
            println!("{}", api.upload.delete_file(id).await?.message);
        }
        Command::Queue(command) => queue(ctx, command).await?,
        Command::Predict {
            file_path,
            patient_id,
        } => {
            let accepted = api.analysis.predict(&file_path, &patient_id).await?;
            print_prediction_started(accepted.job_id);
        }
        Command::Results(command) => results(ctx, command).await?,
        Command::Reports(command) => reports(ctx, command).await?,
        Command::Eeg(command) => eeg(ctx, command).await?,
    }

    Ok(())
}

fn password(credentials: &Credentials) -> Result<String> {
    if let Some(password) = &credentials.password {
        return Ok(password.clone());
    }
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    eprint!("{}\n[y/N] ", prompt);
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_prediction_started(job_id: u64) {
    println!(
        "Prediction started successfully! Job ID: {}. Check the results page for updates.",
        job_id
    );
}

async fn watch_dashboard(ctx: &ClientContext) -> Result<()> {
    let poller = DashboardPoller::spawn(ctx.api.dashboard.clone(), ctx.poll_interval);
    let mut snapshots = poller.subscribe();

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot: DashboardSnapshot = snapshots.borrow_and_update().clone();
                if snapshot.loading {
                    continue;
                }
                if let Some(view) = &snapshot.view {
                    print_dashboard(view);
                }
                if let Some(error) = &snapshot.error {
                    eprintln!("Error: {}", error);
                }
                if !ctx.session.is_authenticated() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.stop().await;
    Ok(())
}

fn print_dashboard(view: &DashboardView) {
    for stat in view.quick_stats() {
        println!("{:<24}{}", stat.title, stat.value);
    }
    if let Some(warning) = &view.warning {
        eprintln!("Warning: {}", warning);
    }

    println!("\nRecent analyses");
    for row in &view.recent {
        let marker = if row.actions_enabled() { " " } else { "!" };
        println!("{}{}", marker, job_line(&row.job));
    }

    if !view.queue.is_empty() {
        println!("\nQueue");
        print_jobs(&view.queue);
    }
}

fn job_line(job: &AnalysisJob) -> String {
    let diagnosis = job
        .result
        .as_ref()
        .map(|r| format!("{} ({:.1}%)", r.primary_diagnosis, r.confidence))
        .unwrap_or_default();
    format!(
        "{:>6}  {:<12} {:<28} {:<11} {:<8} {:>5.0}%  {:<18} {}",
        job.id,
        job.patient_id,
        job.file_name,
        job.status.label(),
        job.priority.label(),
        job.progress,
        format_safe_date(Some(&job.created_at), FULL_DATETIME),
        diagnosis
    )
}

fn print_jobs(jobs: &[AnalysisJob]) {
    for job in jobs {
        println!(" {}", job_line(job));
    }
}

async fn upload(ctx: &ClientContext, patient_id: &str, priority: Priority, files: Vec<PathBuf>) -> Result<()> {
    let mut batch = UploadBatch::new(patient_id, priority)?;
    for path in &files {
        batch
            .add_path(path)
            .await
            .with_context(|| format!("Cannot upload {}", path.display()))?;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<UploadProgress>();
    let printer = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            println!("{:<32} {:>3}%  {}", update.name, update.progress, update.status);
        }
    });

    let workflow = UploadWorkflow::new(ctx.api.upload.clone(), ctx.api.analysis.clone())
        .with_progress(tx);
    workflow.run(&mut batch).await;
    drop(workflow);
    printer.await?;

    for item in batch.items() {
        println!(
            "{} ({}): {}{}",
            item.name,
            item.size_label(),
            item.status,
            item.job_id.map(|id| format!(" [job {}]", id)).unwrap_or_default()
        );
    }
    if let Some(error) = &batch.last_error {
        bail!("{}", error);
    }
    Ok(())
}

async fn queue(ctx: &ClientContext, command: QueueCommand) -> Result<()> {
    let analysis = &ctx.api.analysis;
    match command {
        QueueCommand::List {
            status,
            priority,
            search,
        } => {
            let query = QueueQuery {
                status: status.clone(),
                priority: priority.clone(),
                search: search.clone(),
            };
            let list = analysis.get_queue(&query).await?;

            // Server-side filtering may be partial; apply the same filter locally
            let filter = QueueFilter {
                search: search.unwrap_or_default(),
                status,
                priority,
            };
            let stats = QueueStats::from_jobs(&list.jobs);
            println!(
                "Total {}  queued {}  processing {}  completed {}  failed {}",
                stats.total, stats.queued, stats.processing, stats.completed, stats.failed
            );
            for job in filter.apply(&list.jobs) {
                println!(" {}", job_line(job));
            }
        }
        QueueCommand::Priority { id, priority } => {
            println!("{}", analysis.update_priority(id, &Priority::from(priority)).await?.message);
        }
        QueueCommand::Status { id, status } => {
            println!("{}", analysis.update_status(id, &JobStatus::from(status)).await?.message);
        }
        QueueCommand::Cancel { id } => {
            println!("{}", analysis.cancel_job(id).await?.message);
        }
        QueueCommand::Delete { id, yes } => {
            let job = find_job(ctx, id).await?;
            if !confirm(&DashboardView::delete_prompt(&job), yes)? {
                return Ok(());
            }
            let response = analysis.delete_analysis(id, &job.status).await?;
            println!("{}", response.message);
        }
    }
    Ok(())
}

/// Locate a job by id in the queue, falling back to the results endpoint
async fn find_job(ctx: &ClientContext, id: u64) -> Result<AnalysisJob> {
    let queue = ctx.api.analysis.get_queue(&QueueQuery::default()).await?;
    if let Some(job) = queue.jobs.into_iter().find(|job| job.id == id) {
        return Ok(job);
    }
    Ok(ctx.api.results.get_result(id).await?)
}

async fn results(ctx: &ClientContext, command: ResultsCommand) -> Result<()> {
    match command {
        ResultsCommand::List {
            search,
            status,
            diagnosis,
            sort,
        } => {
            let list = ctx.api.results.get_results().await?;
            let filter = ResultFilter {
                search,
                status,
                diagnosis,
                sort: sort.parse::<SortKey>().map_err(anyhow::Error::msg)?,
            };
            let stats = ResultStats::from_jobs(&list.results);
            println!(
                "Total {}  completed {}  avg confidence {:.1}%  most common {}",
                stats.total,
                stats.completed,
                stats.average_confidence,
                stats.most_common_diagnosis().unwrap_or("-")
            );

            let shown = filter.apply(&list.results);
            print_jobs(&shown);
            println!("{} of {} results", shown.len(), list.results.len());
        }
        ResultsCommand::Show { id } => {
            let detail = ResultDetail::load(&ctx.api.results, &id).await?;
            print_result_detail(&detail);
        }
        ResultsCommand::Delete { id, yes } => {
            let job = ctx.api.results.get_result(id).await?;
            if !confirm(&DashboardView::delete_prompt(&job), yes)? {
                return Ok(());
            }
            println!("{}", ctx.api.results.delete_result(id).await?.message);
        }
        ResultsCommand::Report { id } => {
            let detail = ResultDetail::load(&ctx.api.results, &id).await?;
            let generated = detail.generate_report(&ctx.api.reports).await?;
            println!("Report generated successfully! Report ID: {}", generated.report_id);
        }
    }
    Ok(())
}

fn print_result_detail(detail: &ResultDetail) {
    let job = &detail.job;
    println!("Patient:     {}", job.patient_id);
    println!("File:        {} ({})", job.file_name, format_file_size(job.file_size));
    println!("Status:      {}", job.status.label());
    println!("Submitted:   {}", format_safe_date(Some(&job.created_at), FULL_DATETIME));
    println!("Completed:   {}", format_safe_date(job.completed_at.as_deref(), FULL_DATETIME));
    if let Some(error) = &job.error_message {
        println!("Error:       {}", error);
    }

    let Some(result) = &job.result else {
        return;
    };
    println!("Diagnosis:   {} ({:.1}%)", result.primary_diagnosis, result.confidence);
    println!("Risk:        {}", RiskLevel::parse(&result.risk_level));
    println!("Model:       {}", result.model_version);
    println!("Duration:    {}", result.recording_duration);
    println!("Abnormal:    {} segments", result.abnormal_segments);
    println!("Processing:  {:.1}s", result.processing_time);
    println!("\n{}\n", interpretation(result));
    for bar in detail.breakdown() {
        println!("  {:<20} {:>5.1}%", bar.disorder, bar.probability);
    }
}

async fn reports(ctx: &ClientContext, command: ReportsCommand) -> Result<()> {
    let api = &ctx.api.reports;
    match command {
        ReportsCommand::Generate {
            result_id,
            template,
            title,
            patient_id,
            age,
            gender,
            recording_date,
            clinical_history,
            medications,
        } => {
            let composer = ReportComposer {
                result_id,
                template: template.parse::<ReportTemplate>().map_err(anyhow::Error::msg)?,
                title,
                patient: PatientInfo {
                    patient_id,
                    age,
                    gender,
                    recording_date,
                    clinical_history,
                    medications,
                },
            };
            let generated = composer.generate(api).await?;
            println!("Report generated successfully! Report ID: {}", generated.report_id);
        }
        ReportsCommand::List => {
            let list = api.get_reports().await?;
            for report in &list.reports {
                println!(
                    "{:>6}  {:<10} {:<48} {}",
                    report.id,
                    report.template,
                    report.title,
                    format_safe_date(Some(&report.generated_at), FULL_DATETIME)
                );
            }
            println!("{} reports", list.total);
        }
        ReportsCommand::Show { id } => {
            let report = api.get_report(id).await?;
            println!("{} [{}]", report.title, report.template);
            println!("Generated {}", format_safe_date(Some(&report.generated_at), FULL_DATETIME));
            println!("\n{}", report.content);
        }
        ReportsCommand::Delete { id } => {
            println!("{}", api.delete_report(id).await?.message);
        }
        ReportsCommand::Download { id, output } => {
            let path = download_to(api, id, &output).await?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

async fn eeg(ctx: &ClientContext, command: EegCommand) -> Result<()> {
    let mut browser = EegBrowser::new(ctx.api.eeg.clone());
    match command {
        EegCommand::Subjects { search } => {
            browser.load_subjects().await?;
            for subject in browser.filtered(&search) {
                println!(
                    "{:<12} {:>4} {:<8} {:<16} {}",
                    subject.subject_id,
                    subject.age.map(|a| a.to_string()).unwrap_or_default(),
                    subject.gender.as_deref().unwrap_or(""),
                    subject.condition.as_deref().unwrap_or(""),
                    subject.description
                );
            }
        }
        EegCommand::Import {
            file_path,
            subject_id,
        } => {
            let response = ctx.api.eeg.import_eeg_data(&file_path, &subject_id).await?;
            println!("{}", response.message);
        }
        EegCommand::Data {
            subject_id,
            limit,
            start_time,
            end_time,
            channels,
        } => {
            browser.query = EegDataQuery {
                limit,
                start_time,
                end_time,
            };
            browser.select(&subject_id).await?;

            if channels.is_empty() {
                for point in browser.data.iter().take(TABLE_ROWS) {
                    println!(
                        "{:<14} {:>10.3} {:>10.3} {:>10.3}",
                        format_safe_date(Some(&point.time), TIME_WITH_MS),
                        point.channel_1,
                        point.channel_2,
                        point.channel_3
                    );
                }
            } else {
                for series in channel_series(&browser.data, &channels, browser.data.len()) {
                    let values: Vec<String> = series.values.iter().map(|v| format!("{:.3}", v)).collect();
                    println!("ch{:<3} {}", series.channel, values.join(","));
                }
            }
            println!("{} samples", browser.data.len());
        }
        EegCommand::Delete { subject_id, yes } => {
            if !confirm(&EegBrowser::delete_prompt(&subject_id), yes)? {
                return Ok(());
            }
            let rows = browser.delete_subject(&subject_id).await?;
            println!("EEG data deleted successfully ({} rows)", rows);
        }
        EegCommand::Predict { subject_id } => {
            let accepted = EegBrowser::predict_subject(&ctx.api.analysis, &subject_id).await?;
            print_prediction_started(accepted.job_id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_queue_filters() {
        let cli = Cli::try_parse_from([
            "eegdash", "queue", "list", "--status", "queued", "--priority", "urgent",
        ])
        .unwrap();
        match cli.command {
            Command::Queue(QueueCommand::List { status, priority, search }) => {
                assert_eq!(status.as_deref(), Some("queued"));
                assert_eq!(priority.as_deref(), Some("urgent"));
                assert!(search.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_global_api_url() {
        let cli = Cli::try_parse_from(["eegdash", "health", "--api-url", "http://h/api"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://h/api"));
        assert!(cli.command.is_public());
    }

    #[test]
    fn test_eeg_channel_list() {
        let cli =
            Cli::try_parse_from(["eegdash", "eeg", "data", "S001", "--channels", "1,2,19"]).unwrap();
        match cli.command {
            Command::Eeg(EegCommand::Data { channels, limit, .. }) => {
                assert_eq!(channels, vec![1, 2, 19]);
                assert_eq!(limit, 1000);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_priority_and_status() {
        assert!(Cli::try_parse_from(["eegdash", "queue", "priority", "5", "hihg"]).is_err());
        assert!(Cli::try_parse_from(["eegdash", "queue", "status", "5", "done"]).is_err());
        assert!(Cli::try_parse_from(["eegdash", "queue", "list", "--priority", "high"]).is_err());
        assert!(Cli::try_parse_from([
            "eegdash", "upload", "--patient-id", "PT-1", "--priority", "low", "a.edf",
        ])
        .is_err());

        let cli = Cli::try_parse_from(["eegdash", "queue", "priority", "5", "routine"]).unwrap();
        match cli.command {
            Command::Queue(QueueCommand::Priority { id, priority }) => {
                assert_eq!(id, 5);
                assert_eq!(priority, "routine");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["eegdash", "queue", "list", "--status", "all"]).is_ok());
    }
}
