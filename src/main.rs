// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};

use sqlid_translator::config::{LogLevel, TranslatorConfig};
use sqlid_translator::convert::{self, ConversionMode};
use sqlid_translator::errors::AppError;
use sqlid_translator::sql_id::StatementDigest;
use sqlid_translator::store::StoreKind;
use sqlid_translator::translator::get_or_create_instance;

/// CLI Wrapper for StoreKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStoreKind {
    Yaml,
    Sqlite,
}

impl From<CliStoreKind> for StoreKind {
    fn from(cli_kind: CliStoreKind) -> Self {
        match cli_kind {
            CliStoreKind::Yaml => StoreKind::Yaml,
            CliStoreKind::Sqlite => StoreKind::Sqlite,
        }
    }
}

/// CLI Wrapper for ConversionMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliConversionMode {
    #[value(name = "yaml2sqlite")]
    YamlToSqlite,
    #[value(name = "sqlite2yaml")]
    SqliteToYaml,
}

impl From<CliConversionMode> for ConversionMode {
    fn from(cli_mode: CliConversionMode) -> Self {
        match cli_mode {
            CliConversionMode::YamlToSqlite => ConversionMode::YamlToSqlite,
            CliConversionMode::SqliteToYaml => ConversionMode::SqliteToYaml,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a mapping file between the text and SQLite formats
    Convert {
        /// Conversion direction
        #[arg(short, long, value_enum, default_value = "yaml2sqlite")]
        mode: CliConversionMode,

        /// Source mapping file; the target gets the same name with a new extension
        #[arg(short, long, value_name = "SOURCE-FILE")]
        file: PathBuf,
    },

    /// Print the SQL_ID and HASH_VALUE of a statement
    SqlId {
        /// Statement text; read from stdin when omitted
        sql: Option<String>,
    },

    /// Translate a statement using a mapping store
    Translate(TranslateArgs),

    /// Generate shell completions for sqlid-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Statement text; read from stdin when omitted
    sql: Option<String>,

    /// Mapping store type
    #[arg(short, long, value_enum, env = "SQLID_MAPPING_TYPE")]
    store: Option<CliStoreKind>,

    /// Mapping file location ('file:' URL or path)
    #[arg(short = 'u', long, env = "SQLID_MAPPING_URL")]
    mapping_url: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config_path: Option<PathBuf>,
}

/// sqlid-translator - SQL statement substitution by Oracle SQL_ID
#[derive(Parser, Debug)]
#[command(name = "sqlid-translator")]
#[command(version)]
#[command(about = "Oracle SQL_ID computation and SQL mapping store tooling")]
#[command(long_about = "Computes Oracle SQL_ID / HASH_VALUE of statements and manages the mapping
stores used to substitute statements by SQL_ID.

EXAMPLES:
    sqlid-translator sql-id \"select 1 from dual\"
    sqlid-translator convert -f mapping.yaml                 # writes mapping.db
    sqlid-translator convert -m sqlite2yaml -f mapping.db    # writes mapping.yaml
    sqlid-translator translate -s sqlite -u file:///srv/mapping.db \"select 1 from dual\"
    sqlid-translator completions bash > sqlid-translator.bash

CONFIGURATION:
    'translate' reads store type and mapping location from --store / --mapping-url,
    the SQLID_MAPPING_TYPE / SQLID_MAPPING_URL environment variables, or a JSON
    config file (--config-path, default under the user config directory).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // Allow everything through the logger; the max level does the filtering
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }
    log::set_max_level(LevelFilter::Info);

    match run(CommandLineOptions::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: CommandLineOptions) -> Result<(), AppError> {
    if let Some(level) = &cli.log_level {
        log::set_max_level(LogLevel::from(level.clone()).to_level_filter());
    }

    match cli.command {
        Commands::Convert { mode, file } => run_convert(mode.into(), file),
        Commands::SqlId { sql } => run_sql_id(sql),
        Commands::Translate(args) => run_translate(args, cli.log_level.is_some()),
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sqlid-translator", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_convert(mode: ConversionMode, source: PathBuf) -> Result<(), AppError> {
    let (target, count) = convert::convert_file(&source, mode)?;

    info!("Wrote {} mapping(s) to {:?}", count, target);
    println!("Done.");
    Ok(())
}

fn run_sql_id(sql: Option<String>) -> Result<(), AppError> {
    let sql = statement_text(sql)?;
    let digest = StatementDigest::of(&sql);
    debug!("MD5 of terminated statement: {}", digest);

    println!("sql_id:     {}", digest.sql_id());
    println!("hash_value: {}", digest.hash_value());
    Ok(())
}

fn run_translate(args: TranslateArgs, log_level_from_cli: bool) -> Result<(), AppError> {
    let config_path = match &args.config_path {
        Some(path) => Some(path.clone()),
        None => TranslatorConfig::default_path().ok().filter(|p| p.exists()),
    };

    let mut config = match &config_path {
        Some(path) => TranslatorConfig::load(path)?,
        None => TranslatorConfig::default(),
    };

    // Override config with CLI options if provided
    if let Some(store) = args.store {
        config.store = store.into();
    }
    if let Some(mapping_url) = args.mapping_url {
        config.mapping_url = mapping_url;
    }
    if !log_level_from_cli {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.validate().context("Configuration validation failed")?;

    let sql = statement_text(args.sql)?;
    let translator = get_or_create_instance(config.store, &config.mapping_url)?;
    let translated = translator.translate(&sql)?;

    if translator.stats().hits == 0 {
        warn!("No mapping registered for this statement, keeping it unchanged");
    }
    print!("{}", translated);
    if !translated.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Take the statement from the argument, or all of stdin
fn statement_text(sql: Option<String>) -> Result<String, AppError> {
    match sql {
        Some(sql) => Ok(sql),
        None => {
            let mut buffer = Vec::new();
            std::io::stdin().read_to_end(&mut buffer)?;
            let sql = String::from_utf8(buffer)
                .map_err(|e| anyhow!("Statement read from stdin is not valid UTF-8: {}", e))?;
            Ok(sql)
        }
    }
}
