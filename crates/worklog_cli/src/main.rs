//! Command-line driver for the work-hour ledger.
//!
//! # Responsibility
//! - Map subcommands onto core calls; no hour rules live here.
//! - Keep output line-oriented so it pipes into spreadsheets.

mod config;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::Config;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::process::ExitCode;
use worklog_core::db::{open_db, DbError};
use worklog_core::validate::collect_fields;
use worklog_core::{
    evaluate_fields, Evaluation, Grouping, LedgerQuery, ServiceError, SqliteLedger, Submission,
    SubmissionError, SubmissionService, TaskKey, Taxonomy, ValidationError, WorkType,
};

/// Daily work-hour ledger
#[derive(Debug, Parser)]
#[command(name = "worklog", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the core library version
    Version,

    /// Print the default task catalog
    Taxonomy,

    /// Evaluate entries without saving them; exits 1 when the day is not allowed
    Check {
        /// Work type id or form label (normal, field_or_travel, half_day_or_leave)
        #[arg(value_parser = parse_work_type)]
        work_type: WorkType,

        /// Entries as `category/subtask=hours`
        #[arg(value_parser = parse_entry)]
        entries: Vec<EntryArg>,
    },

    /// Validate one day and append it to the ledger
    Submit {
        /// Person the hours belong to
        person: String,

        /// Work date (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: NaiveDate,

        /// Work type id or form label
        #[arg(value_parser = parse_work_type)]
        work_type: WorkType,

        /// Entries as `category/subtask=hours`
        #[arg(value_parser = parse_entry)]
        entries: Vec<EntryArg>,
    },

    /// Print stored entries as tab-separated export records
    Records(QueryArgs),

    /// Print the hour distribution of stored entries
    Chart {
        #[command(flatten)]
        query: QueryArgs,

        /// Slice level
        #[arg(long, value_enum, default_value = "category")]
        by: ChartBy,
    },
}

/// Ledger filters shared by read commands.
#[derive(Debug, Clone, Default, Args)]
struct QueryArgs {
    /// Only this person
    #[arg(long)]
    person: Option<String>,

    /// Only this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

impl QueryArgs {
    fn to_query(&self) -> LedgerQuery {
        LedgerQuery {
            person: self.person.clone(),
            date: self.date,
            ..LedgerQuery::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChartBy {
    Category,
    Task,
}

impl From<ChartBy> for Grouping {
    fn from(value: ChartBy) -> Self {
        match value {
            ChartBy::Category => Grouping::Category,
            ChartBy::Task => Grouping::Task,
        }
    }
}

/// One raw `category/subtask=hours` argument. Hours stay raw so the core
/// decides what counts as blank or non-numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryArg {
    key: TaskKey,
    raw: String,
}

/// Whether the command's check passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Passed,
    Failed,
}

impl From<Outcome> for ExitCode {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Passed => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::FAILURE,
        }
    }
}

#[derive(Debug)]
enum CliError {
    Validation(ValidationError),
    Submission(SubmissionError),
    Db(DbError),
    Service(ServiceError),
    Io(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Submission(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "output failed: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Submission(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SubmissionError> for CliError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<io::Error> for CliError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type CliResult<T> = Result<T, CliError>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.config.init_logging();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(&cli, &mut out) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli, out: &mut impl Write) -> CliResult<Outcome> {
    match &cli.command {
        Command::Version => {
            writeln!(out, "worklog_core version={}", worklog_core::core_version())?;
            Ok(Outcome::Passed)
        }
        Command::Taxonomy => {
            print_taxonomy(out, &Taxonomy::default_catalog())?;
            Ok(Outcome::Passed)
        }
        Command::Check { work_type, entries } => check(out, *work_type, entries),
        Command::Submit {
            person,
            date,
            work_type,
            entries,
        } => submit(out, &cli.config, person, *date, *work_type, entries),
        Command::Records(query) => records(out, &cli.config, &query.to_query()),
        Command::Chart { query, by } => chart(out, &cli.config, &query.to_query(), (*by).into()),
    }
}

fn check(out: &mut impl Write, work_type: WorkType, entries: &[EntryArg]) -> CliResult<Outcome> {
    let evaluation = evaluate_fields(work_type, &borrow_fields(entries))?;
    print_evaluation(out, &evaluation)?;
    Ok(outcome_for(&evaluation))
}

fn submit(
    out: &mut impl Write,
    config: &Config,
    person: &str,
    date: NaiveDate,
    work_type: WorkType,
    entries: &[EntryArg],
) -> CliResult<Outcome> {
    let (entry_set, ignored) = collect_fields(&borrow_fields(entries))?;
    for key in &ignored {
        eprintln!("ignored non-numeric entry {key}");
    }

    let mut submission = Submission::new(person, date, work_type)?;
    submission.entries = entry_set;

    let conn = open_db(&config.db_path)?;
    let ledger = SqliteLedger::new(&conn);
    let service = SubmissionService::new(&ledger).with_taxonomy(Taxonomy::default_catalog());

    match service.submit(&submission) {
        Ok(receipt) => {
            print_evaluation(out, &receipt.evaluation)?;
            writeln!(out, "submission_id={}", receipt.submission_id)?;
            Ok(Outcome::Passed)
        }
        Err(ServiceError::Rejected(evaluation)) => {
            print_evaluation(out, &evaluation)?;
            Ok(Outcome::Failed)
        }
        Err(err) => {
            warn!("event=cli_submit module=cli status=error error={err}");
            Err(err.into())
        }
    }
}

fn records(out: &mut impl Write, config: &Config, query: &LedgerQuery) -> CliResult<Outcome> {
    let conn = open_db(&config.db_path)?;
    let service = SubmissionService::new(SqliteLedger::new(&conn));

    writeln!(out, "date\tperson\twork_type\tcategory\tsubtask\thours")?;
    for record in service.records(query)? {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}",
            record.date, record.person, record.work_type, record.category, record.subtask, record.hours
        )?;
    }
    Ok(Outcome::Passed)
}

fn chart(
    out: &mut impl Write,
    config: &Config,
    query: &LedgerQuery,
    grouping: Grouping,
) -> CliResult<Outcome> {
    let conn = open_db(&config.db_path)?;
    let service = SubmissionService::new(SqliteLedger::new(&conn));

    let distribution = service.distribution(query, grouping)?;
    writeln!(out, "total={}", distribution.total)?;
    for slice in distribution.slices {
        writeln!(out, "{}\t{}\t{}%", slice.label, slice.hours, slice.share)?;
    }
    Ok(Outcome::Passed)
}

fn borrow_fields(entries: &[EntryArg]) -> Vec<(TaskKey, &str)> {
    entries
        .iter()
        .map(|entry| (entry.key.clone(), entry.raw.as_str()))
        .collect()
}

fn parse_entry(value: &str) -> Result<EntryArg, String> {
    let (key, raw) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("entry must look like `category/subtask=hours`, got `{value}`"))?;
    let key = TaskKey::parse(key).map_err(|err| err.to_string())?;
    Ok(EntryArg {
        key,
        raw: raw.to_string(),
    })
}

fn parse_work_type(value: &str) -> Result<WorkType, String> {
    WorkType::parse(value).map_err(|err| err.to_string())
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("date must be YYYY-MM-DD, got `{value}`"))
}

fn print_evaluation(out: &mut impl Write, evaluation: &Evaluation) -> io::Result<()> {
    writeln!(
        out,
        "allowed={} total={} message={}",
        evaluation.allowed, evaluation.total, evaluation.message
    )
}

fn print_taxonomy(out: &mut impl Write, taxonomy: &Taxonomy) -> io::Result<()> {
    for category in taxonomy.categories() {
        let subtasks = taxonomy
            .subtasks(category)
            .unwrap_or_default()
            .iter()
            .map(|subtask| subtask.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "{category}: {subtasks}")?;
    }
    Ok(())
}

fn outcome_for(evaluation: &Evaluation) -> Outcome {
    if evaluation.allowed {
        Outcome::Passed
    } else {
        Outcome::Failed
    }
}
