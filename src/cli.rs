//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::output;
use crate::domain::calculation::{CalculationRequest, run_calculation};
use crate::domain::error::{FormulaError, TickcalcError};
use crate::domain::expr_parser;
use crate::domain::function::{Constant, Function};
use crate::domain::range::RangeSpec;
use crate::domain::settings::Settings;
use crate::domain::tickers;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "tickcalc", about = "Evaluate formulas over market time series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate an expression and write `t,value` CSV
    Calc {
        expression: String,
        #[arg(short, long)]
        config: PathBuf,
        /// Preset range (5d, 1mo, 1y, ytd, max, ...); defaults to the config
        #[arg(long)]
        range: Option<String>,
        /// Custom range start (YYYY-MM-DD), requires --end
        #[arg(long)]
        start: Option<String>,
        /// Custom range end (YYYY-MM-DD), requires --start
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        interval: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse an expression and list the tickers it references
    Check { expression: String },
    /// List the functions and constants expressions may use
    Functions,
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Start the HTTP server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Calc {
            expression,
            config,
            range,
            start,
            end,
            interval,
            output,
        } => run_calc(
            &expression,
            &config,
            range.as_deref(),
            start.as_deref(),
            end.as_deref(),
            interval,
            output.as_ref(),
        ),
        Command::Check { expression } => run_check(&expression),
        Command::Functions => run_functions(),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::Serve { config } => run_serve(&config),
    }
}

fn fail(err: TickcalcError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, TickcalcError> {
    FileConfigAdapter::from_file(path).map_err(|e| TickcalcError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn load_settings(path: &PathBuf) -> Result<Settings, TickcalcError> {
    tracing::info!("loading config from {}", path.display());
    let config = load_config(path)?;
    Settings::from_config(&config)
}

/// `--start`/`--end` select a custom range, `--range` a preset, and
/// neither falls back to the configured default.
pub fn resolve_range(
    range: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    settings: &Settings,
) -> Result<RangeSpec, TickcalcError> {
    if start.is_some() || end.is_some() {
        return RangeSpec::from_parts("custom", start, end);
    }
    match range {
        Some(r) => RangeSpec::from_parts(r, None, None),
        None => Ok(settings.default_range),
    }
}

/// Run the calculation and write its CSV to `writer`; returns the row count.
pub fn write_calculation<W: Write>(
    data_port: &dyn DataPort,
    settings: &Settings,
    request: &CalculationRequest,
    writer: W,
) -> Result<usize, TickcalcError> {
    let calc = run_calculation(data_port, request, &settings.default_symbol)?;
    let rows = output::rows(&calc.outcome, &request.interval);
    output::write_csv(writer, &rows)?;
    tracing::info!(symbols = %calc.symbols.join(","), rows = rows.len(), "wrote result");
    Ok(rows.len())
}

fn run_calc(
    expression: &str,
    config_path: &PathBuf,
    range: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    interval: Option<String>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let request = match resolve_range(range, start, end, &settings) {
        Ok(range) => CalculationRequest {
            equation: expression.to_string(),
            range,
            interval: interval.unwrap_or_else(|| settings.default_interval.clone()),
        },
        Err(e) => return fail(e),
    };
    let data_port = CsvAdapter::new(settings.data_dir.clone());

    let result = match output_path {
        Some(path) => File::create(path)
            .map_err(TickcalcError::from)
            .and_then(|file| write_calculation(&data_port, &settings, &request, file)),
        None => write_calculation(&data_port, &settings, &request, io::stdout().lock()),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn run_check(expression: &str) -> ExitCode {
    let expr = match expr_parser::parse(expression) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("error: {}", e.display_with_context(expression));
            return (&TickcalcError::from(FormulaError::from(e))).into();
        }
    };

    println!("Parsed:  {}", expr);
    match tickers::extract_tickers(expression) {
        Ok(symbols) if symbols.is_empty() => println!("Tickers: (none, default symbol applies)"),
        Ok(symbols) => println!("Tickers: {}", symbols.join(", ")),
        Err(e) => return fail(FormulaError::from(e).into()),
    }
    ExitCode::SUCCESS
}

fn run_functions() -> ExitCode {
    println!("Functions:");
    for f in Function::ALL {
        let call = format!("{}{}", f.name(), f.signature());
        println!("  {:<22} {}", call, f.summary());
    }
    println!("\nConstants:");
    for c in Constant::ALL {
        println!("  {:<22} {}", c.name(), c.value());
    }
    println!("\nVariables:");
    println!("  {:<22} position index 0, 1, 2, ...", "t");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let adapter = CsvAdapter::new(settings.data_dir.clone());

    let symbols = match symbol {
        Some(s) => vec![s.to_string()],
        None => match adapter.list_symbols() {
            Ok(symbols) => symbols,
            Err(e) => return fail(e),
        },
    };

    if symbols.is_empty() {
        eprintln!("no symbols in {}", settings.data_dir.display());
    }

    for s in &symbols {
        match adapter.get_data_range(s) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} rows, {} to {}", s, count, first, last);
            }
            Ok(None) | Err(TickcalcError::NoData { .. }) => {
                eprintln!("{}: no data found", s);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", s, e);
            }
        }
    }
    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, serve};
        use std::sync::Arc;

        let settings = match load_settings(config_path) {
            Ok(s) => s,
            Err(e) => return fail(e),
        };

        let data_port = Arc::new(CsvAdapter::new(settings.data_dir.clone()))
            as Arc<dyn DataPort + Send + Sync>;
        let state = AppState {
            data_port,
            settings,
        };

        let result = tokio::runtime::Runtime::new().and_then(|rt| rt.block_on(serve(state)));
        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(e.into()),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
