//! End-to-end CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn psum() -> Command {
    let mut cmd = Command::cargo_bin("psum").expect("binary not found");
    cmd.env_remove("PSUM_MODE")
        .env_remove("PSUM_WORKERS")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_flag() {
    psum()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("CHUNK_SIZE"));
}

#[test]
fn version_flag() {
    psum()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("psum"));
}

#[test]
fn no_arguments_exits_one() {
    psum().assert().code(1);
}

#[test]
fn missing_chunk_size_exits_one() {
    psum()
        .arg("100")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn sum_of_ten() {
    psum()
        .args(["10", "0", "-w", "3", "-p"])
        .assert()
        .success()
        .stdout(predicate::str::contains("++ Result OK"))
        .stdout(predicate::str::contains("Result = 55"))
        .stdout(predicate::str::contains("PE 3:"))
        .stderr(predicate::str::contains("Computing sum [1..10] with chunksize auto..."))
        .stderr(predicate::str::contains(
            "Using 1 master (also acting as worker) and 3 workers ...",
        ));
}

#[test]
fn factorial_of_ten() {
    psum()
        .args(["10", "0", "-w", "3", "--mode", "factorial", "-q"])
        .assert()
        .success()
        .stdout("3628800\n");
}

#[test]
fn sum_with_suffix_and_coordinator_only() {
    psum()
        .args(["100k", "0", "-w", "0", "-q"])
        .assert()
        .success()
        .stdout("5000050000\n");
}

#[test]
fn sum_with_one_worker() {
    psum()
        .args(["100k", "0", "-w", "1", "-q"])
        .assert()
        .success()
        .stdout("5000050000\n");
}

#[test]
fn fixed_chunks_with_coordinator_share() {
    psum()
        .args(["1000", "7", "-w", "2", "-p"])
        .assert()
        .success()
        .stdout(predicate::str::contains("++ Result OK"))
        .stdout(predicate::str::contains("Result = 500500"));
}

#[test]
fn factorial_of_thousand_verified() {
    psum()
        .args(["1k", "50", "-w", "4", "--mode", "fact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("++ Result OK"));
}

#[test]
fn mode_from_environment() {
    psum()
        .env("PSUM_MODE", "product")
        .args(["5", "0", "-w", "2", "-q"])
        .assert()
        .success()
        .stdout("120\n");
}

#[test]
fn no_check_prints_no_verdict() {
    psum()
        .args(["10", "0", "-w", "2", "--no-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Result OK").not())
        .stdout(predicate::str::contains("Elapsed time:"));
}

#[test]
fn json_report() {
    let output = psum()
        .args(["20", "3", "-w", "2", "--mode", "product", "--json", "-p"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(v["mode"], "product");
    assert_eq!(v["n"], 20);
    assert_eq!(v["chunk_size"], 3);
    assert_eq!(v["value"], "2432902008176640000");
    assert_eq!(v["verification"]["verdict"], "OK");
    assert_eq!(v["ranks"].as_array().unwrap().len(), 3);
}

#[test]
fn zero_n_is_a_config_error() {
    psum().args(["0", "0"]).assert().code(2);
}

#[test]
fn overflowing_size_is_a_config_error() {
    psum().args(["20000000000g", "0"]).assert().code(2);
}

#[test]
fn huge_worker_count_is_a_config_error() {
    psum()
        .args(["10", "0", "-w", "18446744073709551615"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("workers requested"));
}

#[test]
fn signed_size_is_a_config_error() {
    psum().args(["+5k", "0"]).assert().code(2);
}

#[test]
fn invalid_mode_is_a_config_error() {
    psum().args(["10", "0", "--mode", "median"]).assert().code(2);
}

#[test]
fn oversized_result_exits_seven() {
    psum()
        .args(["100", "0", "-w", "2", "--mode", "product", "--max-message-size", "8"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("message buffer"));
}

#[test]
fn output_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.txt");
    psum()
        .args(["10", "0", "-w", "2", "--mode", "product", "-q", "-o"])
        .arg(&path)
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "3628800\n");
}

#[test]
fn unwritable_output_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("result.txt");
    psum()
        .args(["10", "0", "-w", "2", "-q", "-o"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot write result"));
}

#[test]
fn completion_bash() {
    psum()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("psum"));
}
