mod common;

use common::input;
use saldolib::{
    storage::file::FileStore,
    store::LEDGER_KEY,
    traits::KeyValueStore,
    Kind, Ledger, LedgerError,
};

#[test]
fn missing_directory_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let kv = FileStore::new(dir.path().join("nested"));
    assert_eq!(kv.get(LEDGER_KEY).unwrap(), None);
    assert!(Ledger::new(kv).list().unwrap().is_empty());
}

#[test]
fn values_persist_across_handles() {
    let dir = tempfile::tempdir().unwrap();
    {
        let ledger = Ledger::new(FileStore::new(dir.path()));
        ledger.create(input(10.0, "a", "2024-05-01", Kind::Credito)).unwrap();
        ledger.create(input(-3.0, "b", "2024-05-02", Kind::Debito)).unwrap();
    }
    let ledger = Ledger::new(FileStore::new(dir.path()));
    let all = ledger.list().unwrap();
    assert_eq!(all.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(ledger.balance().unwrap(), 7.0);
    assert!(dir.path().join("movimientos.json").exists());
    assert!(dir.path().join("ultimoId.json").exists());
}

#[test]
fn no_temp_files_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let kv = FileStore::new(dir.path());
    kv.set("k", "v1").unwrap();
    kv.set("k", "v2").unwrap();
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["k.json".to_string()]);
    assert_eq!(kv.get("k").unwrap().as_deref(), Some("v2"));
}

#[test]
fn remove_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let kv = FileStore::new(dir.path());
    kv.set("k", "v").unwrap();
    kv.remove("k").unwrap();
    kv.remove("k").unwrap();
    assert_eq!(kv.get("k").unwrap(), None);
}

#[test]
fn garbage_on_disk_is_corruption() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("movimientos.json"), "{{{").unwrap();
    let err = Ledger::new(FileStore::new(dir.path())).list().unwrap_err();
    assert!(matches!(err, LedgerError::Corrupted { .. }));
}

#[test]
fn concurrent_writers_never_expose_a_partial_value() {
    let dir = tempfile::tempdir().unwrap();
    let kv = FileStore::new(dir.path());

    let payload = |fill: char| format!("[{}]", vec![fill.to_string(); 50_000].join(","));
    let a = payload('1');
    let b = payload('2');
    kv.set("k", &a).unwrap();

    std::thread::scope(|s| {
        let writers: Vec<_> = [&a, &b]
            .into_iter()
            .map(|value| {
                let kv = kv.clone();
                s.spawn(move || (0..100).map(|_| kv.set("k", value)).filter(|r| r.is_err()).count())
            })
            .collect();

        for _ in 0..500 {
            let got = kv.get("k").unwrap().unwrap();
            assert!(got == a || got == b, "read a value of {} bytes that neither writer stored", got.len());
        }

        for w in writers {
            assert_eq!(w.join().unwrap(), 0, "writer saw errors");
        }
    });

    let last = kv.get("k").unwrap().unwrap();
    assert!(last == a || last == b);
}
