//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_result_writer::CsvResultWriter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::{IndicatorError, StockindError};
use crate::domain::indicator::{
    calculate_kama, calculate_parabolic_sar, calculate_sma, IndicatorOutput, KamaParams,
    ParabolicSarParams, ResultRow, SmaParams,
};
use crate::domain::quote::{prepare_history, Quote};
use crate::domain::settings;
use crate::domain::validation::{validate_kama, validate_parabolic_sar, validate_sma};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::result_port::ResultSink;

#[derive(Parser, Debug)]
#[command(name = "stockind", about = "Technical analysis indicators over price quotes")]
pub struct Cli {
    /// INI file with [data], [kama], [parabolic_sar] and [sma] sections
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Symbol to load, read from <data-dir>/<SYMBOL>.csv
    #[arg(long)]
    pub symbol: String,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Output CSV file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Kaufman's adaptive moving average
    Kama {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        er_period: Option<usize>,
        #[arg(long)]
        fast_period: Option<usize>,
        #[arg(long)]
        slow_period: Option<usize>,
    },
    /// Parabolic stop and reverse
    Psar {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        acceleration_step: Option<Decimal>,
        #[arg(long)]
        max_acceleration_factor: Option<Decimal>,
    },
    /// Simple moving average
    Sma {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        lookback_period: Option<usize>,
        /// Also compute MAD, MSE and MAPE
        #[arg(long)]
        extended: bool,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Validate the indicator parameters in a config file
    CheckConfig,
}

pub fn run(cli: Cli) -> ExitCode {
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn dispatch(cli: Cli) -> Result<(), StockindError> {
    let config = cli.config.as_deref().map(load_config).transpose()?;
    let config = config.as_ref().map(|c| c as &dyn ConfigPort);

    match cli.command {
        Command::Kama {
            source,
            er_period,
            fast_period,
            slow_period,
        } => {
            let params = resolve_kama_params(config, er_period, fast_period, slow_period)?;
            let quotes = load_quotes(&source, config)?;
            eprintln!("Computing {} over {} quotes", params.indicator_type(), quotes.len());
            emit(&calculate_kama(&quotes, &params)?, source.output.as_deref())
        }
        Command::Psar {
            source,
            acceleration_step,
            max_acceleration_factor,
        } => {
            let params =
                resolve_parabolic_sar_params(config, acceleration_step, max_acceleration_factor)?;
            let quotes = load_quotes(&source, config)?;
            eprintln!("Computing {} over {} quotes", params.indicator_type(), quotes.len());
            emit(&calculate_parabolic_sar(&quotes, &params)?, source.output.as_deref())
        }
        Command::Sma {
            source,
            lookback_period,
            extended,
        } => {
            let params = resolve_sma_params(config, lookback_period, extended)?;
            let quotes = load_quotes(&source, config)?;
            eprintln!("Computing {} over {} quotes", params.indicator_type(), quotes.len());
            emit(&calculate_sma(&quotes, &params)?, source.output.as_deref())
        }
        Command::ListSymbols { data_dir } => {
            let adapter = CsvAdapter::new(resolve_data_dir(data_dir.as_deref(), config));
            for symbol in adapter.list_symbols()? {
                println!("{symbol}");
            }
            Ok(())
        }
        Command::CheckConfig => {
            let config = config.ok_or_else(|| StockindError::ConfigParse {
                file: "<none>".to_string(),
                reason: "check-config requires --config".to_string(),
            })?;
            check_config(config)?;
            eprintln!("Config OK");
            Ok(())
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StockindError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| StockindError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// CLI flag, then `[data] directory`, then the working directory.
pub fn resolve_data_dir(flag: Option<&Path>, config: Option<&dyn ConfigPort>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| config.and_then(settings::data_directory))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn resolve_kama_params(
    config: Option<&dyn ConfigPort>,
    er_period: Option<usize>,
    fast_period: Option<usize>,
    slow_period: Option<usize>,
) -> Result<KamaParams, StockindError> {
    let base = match config {
        Some(c) => settings::kama_params(c)?,
        None => KamaParams::default(),
    };
    Ok(KamaParams {
        er_period: er_period.unwrap_or(base.er_period),
        fast_period: fast_period.unwrap_or(base.fast_period),
        slow_period: slow_period.unwrap_or(base.slow_period),
    })
}

pub fn resolve_parabolic_sar_params(
    config: Option<&dyn ConfigPort>,
    acceleration_step: Option<Decimal>,
    max_acceleration_factor: Option<Decimal>,
) -> Result<ParabolicSarParams, StockindError> {
    let base = match config {
        Some(c) => settings::parabolic_sar_params(c)?,
        None => ParabolicSarParams::default(),
    };
    Ok(ParabolicSarParams {
        acceleration_step: acceleration_step.unwrap_or(base.acceleration_step),
        max_acceleration_factor: max_acceleration_factor.unwrap_or(base.max_acceleration_factor),
    })
}

pub fn resolve_sma_params(
    config: Option<&dyn ConfigPort>,
    lookback_period: Option<usize>,
    extended: bool,
) -> Result<SmaParams, StockindError> {
    let base = match config {
        Some(c) => settings::sma_params(c)?,
        None => SmaParams {
            lookback_period: settings::DEFAULT_SMA_LOOKBACK,
            extended: false,
        },
    };
    Ok(SmaParams {
        lookback_period: lookback_period.unwrap_or(base.lookback_period),
        extended: extended || base.extended,
    })
}

/// Parses every indicator section and checks the parameter domains.
pub fn check_config(config: &dyn ConfigPort) -> Result<(), StockindError> {
    let kama = settings::kama_params(config)?;
    let psar = settings::parabolic_sar_params(config)?;
    let sma = settings::sma_params(config)?;

    // Parameter checks run before history checks, so an empty series isolates them.
    for result in [
        validate_kama(&[], &kama),
        validate_parabolic_sar(&[], &psar),
        validate_sma(&[], &sma),
    ] {
        if let Err(e @ IndicatorError::Parameter { .. }) = result {
            return Err(e.into());
        }
    }
    Ok(())
}

pub fn load_quotes(
    source: &SourceArgs,
    config: Option<&dyn ConfigPort>,
) -> Result<Vec<Quote>, StockindError> {
    let adapter = CsvAdapter::new(resolve_data_dir(source.data_dir.as_deref(), config));
    eprintln!("Loading quotes for {}", source.symbol);
    prepare_history(adapter.fetch_quotes(&source.symbol)?)
}

fn emit<R: ResultRow>(
    output: &IndicatorOutput<R>,
    path: Option<&Path>,
) -> Result<(), StockindError> {
    for warning in &output.warnings {
        eprintln!("warning: {warning}");
    }

    let target: Box<dyn Write> = match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(io::stdout()),
    };
    let mut writer = CsvResultWriter::new(target);
    writer.write(output)?;
    writer.into_inner()?.flush()?;

    if let Some(p) = path {
        eprintln!("Wrote {} rows to {}", output.results.len(), p.display());
    }
    Ok(())
}
