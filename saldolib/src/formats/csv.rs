//! Простой CSV только для выгрузки в таблицы: заголовки id,monto,intencion,fecha,tipo

use crate::{error::Result, model::Movement, traits::WriteFormat};
use csv::WriterBuilder;
use std::io::Write;

#[derive(serde::Serialize)]
struct CsvOutRow<'a> {
    id: u64,
    monto: f64,
    intencion: &'a str,
    fecha: &'a str,
    tipo: &'a str,
}

pub struct Csv;

impl WriteFormat for Csv {
    fn write<W: Write>(mut w: W, ledger: &[Movement]) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        if ledger.is_empty() {
            wrt.write_record(["id", "monto", "intencion", "fecha", "tipo"])?;
        }
        for m in ledger {
            wrt.serialize(CsvOutRow {
                id: m.id,
                monto: m.amount,
                intencion: &m.purpose,
                fecha: &m.date,
                tipo: m.kind.as_str(),
            })?;
        }
        wrt.flush()?;
        Ok(())
    }
}
