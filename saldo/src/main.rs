mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use saldolib::{
    config::Settings,
    error::{LedgerError, Result},
    model::{parse_amount, Money},
    storage::file::FileStore,
    transfer::{self, describe, ExportFormat, ExportOutcome, ImportOutcome, Preview, ResetChoice, ResetOutcome},
    traits::Ui,
    Kind, Ledger, MovementInput,
};
use std::{fs, path::PathBuf, process::ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use ui::{print_balance, print_table, TerminalUi};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Fmt {
    Json,
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "saldo", version, about = "Учёт личных движений денег")]
struct Cli {
    /// Каталог данных (по умолчанию из настроек)
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Отвечать «да» на все подтверждения
    #[arg(short = 'y', long = "yes", global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Добавить движение
    Add {
        #[arg(long, allow_hyphen_values = true)]
        monto: String,
        #[arg(long)]
        intencion: String,
        /// Дата (по умолчанию сегодня)
        #[arg(long)]
        fecha: Option<String>,
        #[arg(long, value_parser = Kind::ALL)]
        tipo: String,
    },
    /// Показать журнал
    List {
        /// Только последние N
        #[arg(long)]
        last: Option<usize>,
    },
    /// Показать одно движение
    Show { id: u64 },
    /// Изменить движение; неуказанные поля остаются прежними
    Edit {
        id: u64,
        #[arg(long, allow_hyphen_values = true)]
        monto: Option<String>,
        #[arg(long)]
        intencion: Option<String>,
        #[arg(long)]
        fecha: Option<String>,
        #[arg(long, value_parser = Kind::ALL)]
        tipo: Option<String>,
    },
    /// Удалить движение
    Delete { id: u64 },
    /// Текущий баланс
    Balance,
    /// Выгрузить журнал в файл
    Export {
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
        /// Формат (по умолчанию по расширению файла)
        #[arg(long, value_enum)]
        format: Option<Fmt>,
    },
    /// Заменить журнал содержимым JSON-файла
    Import { file: PathBuf },
    /// Начать заново. С --yes нужно явно указать --backup или --no-backup
    Reset {
        /// Сначала сохранить резервную копию
        #[arg(long, conflicts_with = "no_backup")]
        backup: bool,
        /// Очистить без резервной копии
        #[arg(long = "no-backup")]
        no_backup: bool,
    },
    /// Восстановить счётчик идентификаторов по журналу
    Repair,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("saldo=info,saldolib=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.data_dir.as_deref())?;
    debug!(data_dir = %settings.data_dir.display(), "using data directory");

    let ledger = Ledger::new(FileStore::new(&settings.data_dir));
    let assume_yes = cli.yes;
    let mut ui = TerminalUi::new(assume_yes, settings.preview_len);

    match cli.command {
        Command::Add {
            monto,
            intencion,
            fecha,
            tipo,
        } => {
            let fecha = fecha.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            let m = ledger.create(MovementInput::parse(&monto, &intencion, &fecha, &tipo)?)?;
            ui.notify(&format!("Movimiento guardado: {}", describe(&m)));
            ui.render(&ledger.list()?);
        }
        Command::List { last } => {
            let all = ledger.list()?;
            let rows = match last {
                Some(n) => saldolib::ledger::last_n(&all, n),
                None => &all[..],
            };
            print_table(rows, all.len());
            print_balance(&all);
        }
        Command::Show { id } => {
            let m = ledger.find(id)?.ok_or(LedgerError::NotFound(id))?;
            println!("{}", describe(&m));
        }
        Command::Edit {
            id,
            monto,
            intencion,
            fecha,
            tipo,
        } => {
            let current = ledger.find(id)?.ok_or(LedgerError::NotFound(id))?;
            let input = MovementInput {
                amount: match monto {
                    Some(text) => parse_amount(&text)?,
                    None => current.amount,
                },
                purpose: intencion.unwrap_or(current.purpose),
                date: fecha.unwrap_or(current.date),
                kind: match tipo {
                    Some(text) => text.parse()?,
                    None => current.kind,
                },
            };
            let m = ledger.update(id, input)?;
            ui.notify(&format!("Movimiento actualizado: {}", describe(&m)));
            ui.render(&ledger.list()?);
        }
        Command::Delete { id } => {
            let m = ledger.find(id)?.ok_or(LedgerError::NotFound(id))?;
            let question = format!("{}\n¿Seguro que deseas eliminar este movimiento?", describe(&m));
            if !ui.confirm(&question) {
                return Ok(());
            }
            ledger.delete(id)?;
            ui.notify("Movimiento eliminado correctamente.");
            ui.render(&ledger.list()?);
        }
        Command::Balance => println!("{}", Money(ledger.balance()?)),
        Command::Export { file, format } => {
            let format = match (format, &file) {
                (Some(Fmt::Json), _) => ExportFormat::Json,
                (Some(Fmt::Csv), _) => ExportFormat::Csv,
                (None, Some(name)) => ExportFormat::from_filename(name),
                (None, None) => ExportFormat::Json,
            };
            let outcome = transfer::export(&ledger, &mut ui, &settings, file.as_deref(), format, write_file)?;
            if let ExportOutcome::Exported { filename, records } = outcome {
                debug!(%filename, records, "export finished");
            }
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)?;
            match transfer::import(&ledger, &mut ui, &settings, &text)? {
                ImportOutcome::Declined => ui.notify("Importación cancelada. No se modificó nada."),
                ImportOutcome::Replaced { .. } | ImportOutcome::Emptied => {}
            }
        }
        Command::Reset { backup, no_backup } => {
            ui.notify(&format!(
                "Esta acción eliminará todos los movimientos actuales.\n{}",
                Preview::of(&ledger.list()?, settings.preview_len).render()
            ));
            let choice = match reset_choice_from_flags(backup, no_backup, assume_yes) {
                Ok(Some(choice)) => choice,
                Ok(None) => ask_reset_choice(&mut ui),
                Err(e) => e.exit(),
            };
            if transfer::reset(&ledger, &mut ui, &settings, choice, write_file)? == ResetOutcome::Cancelled {
                ui.notify("Operación cancelada.");
            }
        }
        Command::Repair => {
            let counter = ledger.repair_counter()?;
            ui.notify(&format!("Contador de IDs: {counter}"));
        }
    }
    Ok(())
}

/// `Ok(None)` means the user has to be asked. Unattended runs (`--yes`) must
/// name the choice, since the interactive default is to cancel.
fn reset_choice_from_flags(
    backup: bool,
    no_backup: bool,
    assume_yes: bool,
) -> std::result::Result<Option<ResetChoice>, clap::Error> {
    match (backup, no_backup) {
        (true, _) => Ok(Some(ResetChoice::ExportThenClear)),
        (_, true) => Ok(Some(ResetChoice::ClearOnly)),
        _ if assume_yes => Err(Cli::command().error(
            ErrorKind::MissingRequiredArgument,
            "reset --yes necesita --backup o --no-backup",
        )),
        _ => Ok(None),
    }
}

fn ask_reset_choice(ui: &mut TerminalUi) -> ResetChoice {
    let answer = ui.prompt(
        "¿Exportar antes de borrar? [c]ancelar, [e]xportar y vaciar, [v]aciar sin exportar",
        "c",
    );
    match answer.as_deref().map(str::trim) {
        Some("e") => ResetChoice::ExportThenClear,
        Some("v") => ResetChoice::ClearOnly,
        _ => ResetChoice::Cancel,
    }
}

fn write_file(name: &str, bytes: &[u8]) -> Result<()> {
    fs::write(name, bytes)?;
    Ok(())
}
