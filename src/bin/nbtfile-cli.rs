//! CLI для NBT-файлов
//!
//! Просмотр дерева, извлечение значений по пути, экспорт в JSON, проверка
//! целостности и перепаковка с другим режимом сжатия.

use std::{
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use nbtfile::{
    encode_root,
    logging::{self, LogFormat},
    tag::{json, tree, TreeStyle},
    Compression, ErrorExt, NbtError, NbtFile, Settings,
};
use nbtfile_error::LogLevel;
use owo_colors::OwoColorize;
use tracing::{debug, error, info, warn};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Аргументы командной строки.
#[derive(Parser)]
#[command(name = "nbtfile-cli")]
#[command(version = LONG_VERSION)]
#[command(about = "Inspect, query and convert Named Binary Tag files", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Режим сжатия входного файла (по умолчанию из настроек)
    #[arg(short, long, global = true, help = "none | zstd | gzip | zlib | lz4")]
    compression: Option<Compression>,

    /// Предел глубины вложенности при разборе
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Подробный вывод (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Только ошибки
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Формат логов: compact | pretty | json
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Отключить цвет в выводе дерева
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Вывести дерево тегов
    Dump { file: PathBuf },

    /// Найти тег по пути (`inventory.items[2].name`)
    Get {
        file: PathBuf,
        query: String,
        /// Вывести найденный тег как JSON
        #[arg(long)]
        json: bool,
    },

    /// Экспортировать документ в JSON
    Json {
        file: PathBuf,
        /// Без отступов
        #[arg(long)]
        compact: bool,
    },

    /// Проверить, что файл читается, и вывести сводку
    Check { file: PathBuf },

    /// Пересохранить файл с другим режимом сжатия (атомарно)
    Convert {
        src: PathBuf,
        dst: PathBuf,
        /// Режим сжатия результата
        #[arg(long, default_value = "none")]
        to: Compression,
        /// Уровень сжатия результата
        #[arg(long)]
        level: Option<i32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load()
        .and_then(|s| s.with_overrides(cli.compression, cli.max_depth, cli.log_format))
    {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::from(1);
        }
    };

    let _logging = match logging::init_logging(logging_config(&settings, &cli)) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::from(1);
        }
    };
    debug!(?settings, "effective settings");

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

fn logging_config(
    settings: &Settings,
    cli: &Cli,
) -> logging::LoggingConfig {
    let mut config = settings.logging_config();
    config.level = match (cli.quiet, cli.verbose) {
        (true, _) => "error".to_string(),
        (false, 0) => config.level,
        (false, 1) => "debug".to_string(),
        (false, _) => "trace".to_string(),
    };
    config.with_ansi = io::stderr().is_terminal();
    config
}

fn run(
    cli: &Cli,
    settings: &Settings,
) -> Result<()> {
    match &cli.command {
        Commands::Dump { file } => {
            let doc = load(file, settings)?;
            let style = Style::new(!cli.no_color && io::stdout().is_terminal());
            let mut out = String::new();
            tree::write_compound(&mut out, Some(doc.root_name()), doc.root(), 0, &style)?;
            print_out(&out)
        }

        Commands::Get { file, query, json } => {
            let doc = load(file, settings)?;
            let tag = doc
                .query(query)
                .with_context(|| format!("query '{query}' failed"))?;
            if *json {
                print_out(&format!("{:#}\n", json::to_json(tag)))
            } else {
                print_out(&format!("{tag}\n"))
            }
        }

        Commands::Json { file, compact } => {
            let doc = load(file, settings)?;
            let value = json::compound_to_json(doc.root());
            let text = if *compact {
                value.to_string()
            } else {
                format!("{value:#}")
            };
            print_out(&format!("{text}\n"))
        }

        Commands::Check { file } => {
            let doc = load(file, settings)?;
            let file_size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
            let raw_size = encode_root(doc.root_name(), doc.root())?.len();
            let summary = format!(
                "file:        {}\n\
                 compression: {}\n\
                 root name:   {:?}\n\
                 entries:     {}\n\
                 depth:       {}\n\
                 size:        {} bytes on disk, {} bytes decoded\n",
                file.display(),
                doc.compression(),
                doc.root_name(),
                doc.root().len(),
                doc.root().depth(),
                file_size,
                raw_size,
            );
            info!(path = %file.display(), "file is well-formed");
            print_out(&summary)
        }

        Commands::Convert {
            src,
            dst,
            to,
            level,
        } => {
            let mut doc = load(src, settings)?;
            doc.set_compression_level(level.or(settings.compression_level));
            doc.save_with(dst, *to)
                .with_context(|| format!("failed to write {}", dst.display()))?;
            info!(
                src = %src.display(),
                dst = %dst.display(),
                from = %settings.compression,
                to = %to,
                "converted"
            );
            Ok(())
        }
    }
}

fn load(
    path: &Path,
    settings: &Settings,
) -> Result<NbtFile> {
    NbtFile::load_with(path, settings.compression, settings.decode_options())
        .with_context(|| format!("failed to load {}", path.display()))
}

fn print_out(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match stdout.write_all(text.as_bytes()) {
        // закрытый pipe (`| head`) не считается ошибкой
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

/// Печатает ошибку и возвращает код выхода по статусу ошибки NBT.
fn report(err: &anyhow::Error) -> ExitCode {
    let Some(nbt) = err.downcast_ref::<NbtError>() else {
        error!(error = %format!("{err:#}"), "command failed");
        eprintln!("{} {err:#}", "error:".red().bold());
        return ExitCode::from(1);
    };

    let status = nbt.status_code();
    match nbt.log_level() {
        LogLevel::Error => error!(status = %status, detail = %nbt.log_message(), "command failed"),
        LogLevel::Warn => warn!(status = %status, detail = %nbt.log_message(), "command failed"),
        _ => debug!(status = %status, detail = %nbt.log_message(), "command failed"),
    }

    eprintln!("{} {err:#}", "error:".red().bold());
    if let Some(hint) = nbt.recovery_hint() {
        eprintln!("{} {hint}", "hint:".yellow());
    }
    ExitCode::from(u8::try_from(status.exit_code()).unwrap_or(1))
}

/// Раскраска дерева; без цвета строки совпадают с `Display` для `Tag`.
struct Style {
    color: bool,
}

impl Style {
    fn new(color: bool) -> Self {
        Self { color }
    }
}

impl TreeStyle for Style {
    fn kind(
        &self,
        s: &str,
    ) -> String {
        if self.color {
            s.cyan().to_string()
        } else {
            s.to_string()
        }
    }

    fn name(
        &self,
        s: &str,
    ) -> String {
        let quoted = format!("{s:?}");
        if self.color {
            quoted.yellow().to_string()
        } else {
            quoted
        }
    }

    fn value(
        &self,
        s: String,
    ) -> String {
        if self.color {
            s.green().to_string()
        } else {
            s
        }
    }
}
