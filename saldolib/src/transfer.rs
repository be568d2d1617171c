//! Сценарии экспорта, импорта и очистки журнала.
//!
//! Хранилище меняется только после явного подтверждения пользователя и
//! всегда целиком (замена, не слияние).

use crate::{
    config::Settings,
    error::Result,
    formats::{
        csv::Csv,
        json::{Json, Parsed},
    },
    ledger::{compute_balance, last_n, Ledger},
    model::{Money, Movement},
    traits::{KeyValueStore, Ui, WriteFormat},
    validate::duplicate_ids,
};
use std::io::Write;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn write<W: Write>(self, w: W, ledger: &[Movement]) -> Result<()> {
        match self {
            ExportFormat::Json => Json::write(w, ledger),
            ExportFormat::Csv => Csv::write(w, ledger),
        }
    }

    /// `.csv` selects CSV, everything else is JSON.
    pub fn from_filename(name: &str) -> Self {
        if name.to_ascii_lowercase().ends_with(".csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Json
        }
    }
}

/// Tail of a ledger plus its totals, shown before export, import and clear.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub last: Vec<Movement>,
    pub total: usize,
    pub balance: f64,
}

impl Preview {
    pub fn of(ledger: &[Movement], n: usize) -> Self {
        Preview {
            last: last_n(ledger, n).to_vec(),
            total: ledger.len(),
            balance: compute_balance(ledger),
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("Últimos {} movimientos (de {}):", self.last.len(), self.total);
        for m in &self.last {
            out.push_str("\n  ");
            out.push_str(&describe(m));
        }
        out
    }
}

pub fn describe(m: &Movement) -> String {
    format!(
        "ID {} | {} | {} | {} | {}",
        m.id,
        m.purpose,
        Money(m.amount),
        m.date,
        m.kind
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported { filename: String, records: usize },
    Cancelled,
}

/// Writes the current ledger through `sink`; never touches the store.
///
/// With `filename == None` the user is prompted, and cancelling the prompt
/// cancels the export.
pub fn export<S, U, F>(
    ledger: &Ledger<S>,
    ui: &mut U,
    settings: &Settings,
    filename: Option<&str>,
    format: ExportFormat,
    sink: F,
) -> Result<ExportOutcome>
where
    S: KeyValueStore,
    U: Ui + ?Sized,
    F: FnOnce(&str, &[u8]) -> Result<()>,
{
    let current = ledger.list()?;
    ui.notify(&format!(
        "Se exportarán los datos actuales. Esto no modifica tus datos.\n{}",
        Preview::of(&current, settings.preview_len).render()
    ));

    let requested = match filename {
        Some(name) => name.to_string(),
        None => match ui.prompt("Nombre del archivo", &settings.export_file) {
            Some(name) => name,
            None => return Ok(ExportOutcome::Cancelled),
        },
    };
    let filename = Settings::resolve_filename(Some(&requested), &settings.export_file);

    let mut buf = Vec::new();
    format.write(&mut buf, &current)?;
    sink(&filename, &buf)?;

    info!(%filename, records = current.len(), ?format, "ledger exported");
    ui.notify("Datos exportados correctamente.");
    Ok(ExportOutcome::Exported {
        filename,
        records: current.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Replaced { records: usize },
    Emptied,
    Declined,
}

/// Parses, validates, previews and, on confirmation, replaces the ledger
/// with the file's content.
///
/// Parse and schema failures return an error before anything is asked or
/// written.
pub fn import<S, U>(ledger: &Ledger<S>, ui: &mut U, settings: &Settings, text: &str) -> Result<ImportOutcome>
where
    S: KeyValueStore,
    U: Ui + ?Sized,
{
    let incoming = match Json::parse(text)? {
        Parsed::Empty => {
            if !ui.confirm("El archivo JSON está vacío. Se inicializarán datos vacíos. ¿Deseas continuar?") {
                return Ok(ImportOutcome::Declined);
            }
            ledger.clear()?;
            ui.render(&[]);
            ui.notify("Datos inicializados como vacíos.");
            return Ok(ImportOutcome::Emptied);
        }
        Parsed::Ledger(l) => l,
    };

    let dups = duplicate_ids(&incoming);
    if !dups.is_empty() {
        warn!(?dups, "import file repeats ids");
        ui.notify(&format!("Aviso: el archivo repite los IDs {dups:?}."));
    }

    let question = format!(
        "Al importar, los datos actuales se eliminarán y serán reemplazados por los del archivo.\n{}\n¿Importar y reemplazar?",
        Preview::of(&incoming, settings.preview_len).render()
    );
    if !ui.confirm(&question) {
        return Ok(ImportOutcome::Declined);
    }

    ledger.replace(&incoming)?;
    ui.render(&incoming);
    ui.notify("Datos importados correctamente.");
    Ok(ImportOutcome::Replaced {
        records: incoming.len(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetChoice {
    Cancel,
    ExportThenClear,
    ClearOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    Cancelled,
    Cleared { backup: Option<String> },
}

/// Start over. With [`ResetChoice::ExportThenClear`] the backup must be
/// written in full before the ledger is cleared; cancelling the filename
/// prompt or a failing sink leaves the data untouched.
pub fn reset<S, U, F>(
    ledger: &Ledger<S>,
    ui: &mut U,
    settings: &Settings,
    choice: ResetChoice,
    sink: F,
) -> Result<ResetOutcome>
where
    S: KeyValueStore,
    U: Ui + ?Sized,
    F: FnOnce(&str, &[u8]) -> Result<()>,
{
    let backup = match choice {
        ResetChoice::Cancel => return Ok(ResetOutcome::Cancelled),
        ResetChoice::ClearOnly => None,
        ResetChoice::ExportThenClear => {
            let Some(name) = ui.prompt("Nombre de archivo para exportar", &settings.backup_file) else {
                return Ok(ResetOutcome::Cancelled);
            };
            let filename = Settings::resolve_filename(Some(&name), &settings.backup_file);
            let current = ledger.list()?;
            let mut buf = Vec::new();
            Json::write(&mut buf, &current)?;
            sink(&filename, &buf)?;
            info!(%filename, records = current.len(), "backup written before clear");
            Some(filename)
        }
    };

    ledger.clear()?;
    ui.render(&[]);
    ui.notify(match backup {
        Some(_) => "Datos exportados y vaciados.",
        None => "Datos vaciados. Ahora puedes empezar desde cero.",
    });
    Ok(ResetOutcome::Cleared { backup })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Kind, MovementInput},
        storage::memory::MemoryStore,
    };

    #[test]
    fn export_format_follows_extension() {
        assert_eq!(ExportFormat::from_filename("a.CSV"), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_filename("a.json"), ExportFormat::Json);
        assert_eq!(ExportFormat::from_filename("datos"), ExportFormat::Json);
    }

    #[test]
    fn preview_shows_tail_and_totals() {
        let l = Ledger::new(MemoryStore::new());
        for i in 1..=5 {
            l.create(MovementInput {
                amount: i as f64,
                purpose: format!("m{i}"),
                date: "2024-01-01".into(),
                kind: Kind::Credito,
            })
            .unwrap();
        }
        let p = Preview::of(&l.list().unwrap(), 3);
        assert_eq!(p.total, 5);
        assert_eq!(p.balance, 15.0);
        assert_eq!(p.last.iter().map(|m| m.id).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(p.render().contains("ID 5 | m5 | 5.00 | 2024-01-01 | credito"));
    }
}
