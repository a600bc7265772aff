//! The checksum failure line must reach stderr without any subscriber installed.
//!
//! The check re-runs this test binary as a child so its stderr can be captured.

use std::process::Command;

const CHILD_ENV: &str = "PHEDEX_DIAGNOSTIC_CHILD";

#[test]
fn missing_file_prints_io_error_line() {
    if std::env::var_os(CHILD_ENV).is_some() {
        let dir = tempfile::tempdir().unwrap();
        let sum = phedex::calc_checksum(dir.path().join("missing.root"));
        assert_eq!(sum, "");
        return;
    }

    let output = Command::new(std::env::current_exe().unwrap())
        .args(["missing_file_prints_io_error_line", "--exact", "--nocapture"])
        .env(CHILD_ENV, "1")
        .output()
        .unwrap();
    assert!(output.status.success(), "child test failed: {output:?}");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr
            .lines()
            .any(|line| line == "** I/O ERROR(2): No such file or directory"),
        "diagnostic line not found in stderr:\n{stderr}"
    );
}
