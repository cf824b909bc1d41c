//! End-to-end replay: CSV operations in, balance CSV out

use std::fs;
use tempfile::tempdir;

use hogar_ledger::io::replay::process;

#[test]
fn replay_produces_reconciled_balances() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(
        data_dir.join("accounts.csv"),
        "name,currency,balance,credit_facility\n\
         Efectivo,UYU,0,false\n\
         Visa Itau,UYU,0,true\n",
    )
    .unwrap();

    let ops_path = dir.path().join("ops.csv");
    fs::write(
        &ops_path,
        "op,kind,date,description,amount,currency,category,account,movement\n\
         create,income,2025-08-01,Sueldo,50000,UYU,Sueldo,Efectivo,\n\
         create,expense,2025-08-03,Supermercado,12000,UYU,Supermercado,Efectivo,\n\
         create,future_bill,2025-08-05,UTE,2400,UYU,Servicios,Efectivo,\n\
         settle,,,,2400,,,Efectivo,3\n\
         create,expense,2025-08-12,Nafta,1800,UYU,Auto,Visa Itau,\n\
         delete,,,,,,,,2\n\
         transfer,,,,,,,,\n",
    )
    .unwrap();

    let mut output = Vec::new();
    process(&data_dir, &ops_path, &mut output).unwrap();

    // 50000 income - 12000 expense - 2400 bill + 12000 deleted back.
    // The card expense accrues and the bogus row is skipped.
    let expected = "name,currency,balance,credit_facility\n\
                    Efectivo,UYU,47600,false\n\
                    Visa Itau,UYU,0,true\n";
    assert_eq!(String::from_utf8(output).unwrap(), expected);
}

#[test]
fn replay_persists_movements_and_balances_back_to_the_tables() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(
        data_dir.join("accounts.csv"),
        "name,currency,balance,credit_facility\n\
         Efectivo,UYU,0,false\n\
         Santander,UYU,0,false\n",
    )
    .unwrap();

    let ops_path = dir.path().join("ops.csv");
    fs::write(
        &ops_path,
        "op,kind,date,description,amount,currency,category,account,movement\n\
         create,future_bill,2025-08-05,Alquiler,30000,UYU,Vivienda,Santander,\n\
         settle,,,,10000,,,Efectivo,1\n",
    )
    .unwrap();

    let mut output = Vec::new();
    process(&data_dir, &ops_path, &mut output).unwrap();

    let movements = fs::read_to_string(data_dir.join("movements.csv")).unwrap();
    // The original bill is closed and the unpaid 20000 lives on as debt.
    assert!(movements.contains("paid"));
    assert!(movements.contains("Deuda"));
    assert!(movements.contains("20000"));

    let accounts = fs::read_to_string(data_dir.join("accounts.csv")).unwrap();
    assert!(accounts.contains("Efectivo,UYU,-10000,false"));
}

#[test]
fn rejected_rows_do_not_poison_the_batch() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(
        data_dir.join("accounts.csv"),
        "name,currency,balance,credit_facility\nEfectivo,UYU,0,false\n",
    )
    .unwrap();

    let ops_path = dir.path().join("ops.csv");
    fs::write(
        &ops_path,
        "op,kind,date,description,amount,currency,category,account,movement\n\
         create,income,2025-08-01,Sueldo,1000,UYU,Sueldo,Cuenta Fantasma,\n\
         delete,,,,,,,,99\n\
         create,income,2025-08-01,Sueldo,1000,UYU,Sueldo,Efectivo,\n",
    )
    .unwrap();

    let mut output = Vec::new();
    process(&data_dir, &ops_path, &mut output).unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Efectivo,UYU,1000,false"));
}
