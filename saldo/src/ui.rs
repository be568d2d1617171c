//! Терминальная реализация диалогов: вопросы и сообщения в stderr, таблицы в stdout.

use saldolib::{
    ledger::{compute_balance, last_n},
    model::Money,
    traits::Ui,
    Movement,
};
use std::io::{self, BufRead};

pub struct TerminalUi {
    assume_yes: bool,
    preview_len: usize,
}

impl TerminalUi {
    pub fn new(assume_yes: bool, preview_len: usize) -> Self {
        TerminalUi {
            assume_yes,
            preview_len,
        }
    }

    /// `None` on EOF or read failure.
    fn read_line(&self) -> Option<String> {
        let mut buf = String::new();
        match io::stdin().lock().read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(buf.trim().to_string()),
        }
    }
}

impl Ui for TerminalUi {
    fn confirm(&mut self, message: &str) -> bool {
        eprintln!("{message}");
        if self.assume_yes {
            eprintln!("[s/N] s");
            return true;
        }
        eprint!("[s/N] ");
        matches!(
            self.read_line().as_deref().map(str::to_lowercase).as_deref(),
            Some("s" | "si" | "sí" | "y" | "yes")
        )
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn prompt(&mut self, message: &str, default: &str) -> Option<String> {
        if self.assume_yes {
            return Some(default.to_string());
        }
        eprint!("{message} [{default}]: ");
        self.read_line()
    }

    fn render(&mut self, ledger: &[Movement]) {
        print_table(last_n(ledger, self.preview_len), ledger.len());
        print_balance(ledger);
    }
}

/// `total` is the size of the whole ledger `rows` was taken from.
pub fn print_table(rows: &[Movement], total: usize) {
    print!("{}", format_table(rows, total));
}

fn format_table(rows: &[Movement], total: usize) -> String {
    if total == 0 {
        return "No hay movimientos registrados\n".to_string();
    }
    let width = rows
        .iter()
        .map(|m| m.purpose.chars().count())
        .max()
        .unwrap_or(0)
        .max("Intención".chars().count());

    let mut out = format!("{:>6}  {:>12}  {:<width$}  {:<10}  {}\n", "ID", "Monto", "Intención", "Fecha", "Tipo");
    for m in rows {
        out.push_str(&format!(
            "{:>6}  {:>12}  {:<width$}  {:<10}  {}\n",
            m.id,
            Money(m.amount).to_string(),
            m.purpose,
            m.date,
            m.kind
        ));
    }
    out
}

pub fn print_balance(ledger: &[Movement]) {
    println!("Saldo actual: {}", Money(compute_balance(ledger)));
}
