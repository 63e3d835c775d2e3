use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PAYMENTS: &str = "Payee Name,Amount,Work\n\
                        Alice,1500.50,Cabling\n\
                        ,2000,X\n\
                        Bob,-5,Y\n\
                        Carol,3000,\n";

/// Command with its config directory pointed into `home`.
fn rasid(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rasid").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd
}

fn write_payments(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, PAYMENTS).unwrap();
    path
}

#[test]
fn words_prints_indian_numbering() {
    let home = TempDir::new().unwrap();
    rasid(&home)
        .args(["words", "12345678"])
        .assert()
        .success()
        .stdout(
            "Rupees One Crore Twenty Three Lakh Forty Five Thousand Six Hundred and Seventy Eight Only\n",
        );
}

#[test]
fn generate_json_keeps_valid_rows_in_order() {
    let home = TempDir::new().unwrap();
    let input = write_payments(home.path(), "payments.csv");

    let output = rasid(&home)
        .arg("generate")
        .arg(&input)
        .args(["-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let receipts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let receipts = receipts.as_array().unwrap();
    assert_eq!(receipts.len(), 2);
    assert_eq!(receipts[0]["payee"], "Alice");
    assert_eq!(receipts[0]["amount"], "1500.50");
    assert_eq!(receipts[0]["amount_words"], "One Thousand Five Hundred");
    assert_eq!(receipts[1]["payee"], "Carol");
    assert_eq!(receipts[1]["work"], "Electric Work");
}

#[test]
fn generate_html_next_to_input() {
    let home = TempDir::new().unwrap();
    let input = write_payments(home.path(), "payments.csv");

    rasid(&home)
        .arg("generate")
        .arg(&input)
        .args(["-f", "html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 receipts from 4 rows (2 rejected)"));

    let html = fs::read_to_string(home.path().join("payments.html")).unwrap();
    assert_eq!(html.matches("<div class=\"receipt\">").count(), 2);
    assert!(html.contains("Rupees Three Thousand Only"));
}

#[test]
fn generate_pdf_to_output_file() {
    let home = TempDir::new().unwrap();
    let input = write_payments(home.path(), "payments.csv");
    let output = home.path().join("out.pdf");

    rasid(&home)
        .arg("generate")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let pdf = fs::read(&output).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
}

#[test]
fn generate_reports_missing_columns() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("bad.csv");
    fs::write(&input, "Name,Cost\nAlice,10\n").unwrap();

    rasid(&home)
        .arg("generate")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("required columns not found"))
        .stderr(predicate::str::contains("Work"));
}

#[test]
fn generate_rejects_unsupported_extension() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("payments.txt");
    fs::write(&input, PAYMENTS).unwrap();

    rasid(&home)
        .arg("generate")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("txt"));
}

#[test]
fn generate_honours_max_rows() {
    let home = TempDir::new().unwrap();
    let input = write_payments(home.path(), "payments.csv");

    let output = rasid(&home)
        .arg("generate")
        .arg(&input)
        .args(["-f", "csv", "--max-rows", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let csv = String::from_utf8(output.stdout).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("Alice"));
    assert!(!csv.contains("Carol"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let home = TempDir::new().unwrap();
    let inputs = home.path().join("in");
    fs::create_dir_all(&inputs).unwrap();
    write_payments(&inputs, "march.csv");
    fs::write(inputs.join("april.csv"), "Name,Cost\nAlice,10\n").unwrap();
    let out = home.path().join("out");

    let pattern = format!("{}/*.csv", inputs.display());
    rasid(&home)
        .args(["batch", &pattern, "-f", "html", "--summary", "--continue-on-error"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(out.join("march.html").exists());
    assert!(!out.join("april.html").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,"));
    assert!(summary.contains("march.csv,success"));
    assert!(summary.contains("4500.50"));
    assert!(summary.contains("april.csv,error"));
}

#[test]
fn batch_stops_on_first_error() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("bad.csv"), "Name,Cost\nAlice,10\n").unwrap();

    let pattern = format!("{}/*.csv", home.path().display());
    rasid(&home)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_init_then_get_and_set() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("rasid.json");
    let config_arg = config.to_str().unwrap();

    rasid(&home)
        .args(["config", "init", "-o", config_arg])
        .assert()
        .success();

    rasid(&home)
        .args(["-c", config_arg, "config", "get", "batch.max_rows"])
        .assert()
        .success()
        .stdout("50\n");

    rasid(&home)
        .args(["-c", config_arg, "config", "set", "batch.default_work", "Street Lights"])
        .assert()
        .success();

    let input = write_payments(home.path(), "payments.csv");
    rasid(&home)
        .args(["-c", config_arg, "generate"])
        .arg(&input)
        .args(["-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Carol,3000.00,Three Thousand,Street Lights"));
}
