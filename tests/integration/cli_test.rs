//! Command-line tests against the built `dataconv` binary

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn dataconv() -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_dataconv"));
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn stdout(output: &Output) -> String {
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn stderr(output: &Output) -> String {
        String::from_utf8_lossy(&output.stderr).into_owned()
    }

    #[test]
    fn test_inline_data_to_stdout() {
        let output = dataconv()
            .args(["--data", r#"[{"a":1,"b":2},{"a":3,"b":4}]"#, "--to", "csv"])
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(stdout(&output), "a,b\n1,2\n3,4\n");
    }

    #[test]
    fn test_json_output_gets_trailing_newline() {
        let output = dataconv()
            .args(["--data", "<root><x>1</x></root>", "-t", "json"])
            .output()
            .unwrap();

        assert!(output.status.success());
        assert_eq!(stdout(&output), "{\n  \"root\": {\n    \"x\": \"1\"\n  }\n}\n");
    }

    #[test]
    fn test_file_to_output_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("people.yaml");
        let target = dir.path().join("out/people.xlsx");
        fs::write(&input, "- name: Ada\n  age: 36\n").unwrap();

        let output = dataconv()
            .arg(&input)
            .args(["--to", "xlsx", "-o"])
            .arg(&target)
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).is_empty());
        assert!(fs::read(&target).unwrap().starts_with(b"PK"));
        assert!(stderr(&output).contains("Converted"));
    }

    #[test]
    fn test_stdin_with_declared_format() {
        let mut child = dataconv()
            .args(["--stdin", "--from", "csv", "--to", "yaml"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        child
            .stdin
            .take()
            .unwrap()
            .write_all(b"name,admin\nAda,true\n")
            .unwrap();
        let output = child.wait_with_output().unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert_eq!(stdout(&output), "- name: Ada\n  admin: true\n");
    }

    #[test]
    fn test_parse_error_exit_code() {
        let output = dataconv()
            .args(["--data", r#"{"a":"#, "--from", "json", "--to", "csv"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(stdout(&output).is_empty());
        assert!(stderr(&output).contains("JSON parse error"));
        assert!(stderr(&output).contains("Try 'dataconv --help'"));
    }

    #[test]
    fn test_shape_error_has_tip() {
        let output = dataconv()
            .args(["--data", "42", "--to", "csv"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Tip:"));
    }

    #[test]
    fn test_unknown_output_format_is_usage_error() {
        let output = dataconv()
            .args(["--data", "{}", "--to", "docx"])
            .output()
            .unwrap();

        // clap rejects the value before any conversion runs
        assert_eq!(output.status.code(), Some(2));
    }

    #[test]
    fn test_invalid_size_limit_is_config_error() {
        let output = dataconv()
            .args(["--data", "{}", "--to", "json", "--max-input-size", "lots"])
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("Invalid size limit"));
    }

    #[test]
    fn test_binary_format_to_pipe() {
        let output = dataconv()
            .args(["--data", "a: 1", "--to", "png"])
            .output()
            .unwrap();

        assert!(output.status.success());
        assert!(output.stdout.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_directory_conversion() {
        let input = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::write(input.path().join("a.json"), r#"[{"k": 1}]"#).unwrap();
        fs::create_dir(input.path().join("sub")).unwrap();
        fs::write(input.path().join("sub/b.csv"), "k\n2\n").unwrap();

        let output = dataconv()
            .arg(input.path())
            .args(["--to", "xml", "--recursive", "--quiet", "-o"])
            .arg(out.path())
            .output()
            .unwrap();

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(out.path().join("a.xml").is_file());
        let nested = fs::read_to_string(out.path().join("sub/b.xml")).unwrap();
        assert!(nested.contains("<k>2</k>"));
    }

    #[test]
    fn test_directory_without_output_fails() {
        let input = TempDir::new().unwrap();
        fs::write(input.path().join("a.json"), "{}").unwrap();

        let output = dataconv().arg(input.path()).args(["--to", "yaml"]).output().unwrap();
        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Output directory required"));
    }
}
