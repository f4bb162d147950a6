//! Directory conversion tests
//!
//! Tests cover:
//! - Mirrored output layout with the target extension
//! - Recursive and flat discovery
//! - Failure handling with and without continue-on-error
//! - Inputs that would write the same output file

use dataconv::conversion::batch::{convert_directory, discover, BatchOptions};
use dataconv::{ConversionConfig, Converter, ErrorKind, InputFormat, OutputFormat};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[cfg(test)]
mod directory_tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "people.json", r#"[{"name": "Ada"}]"#);
        write(dir.path(), "config.yml", "name: Ada\n");
        write(dir.path(), "README.md", "# not data");
        write(dir.path(), "nested/team.xml", "<team><lead>Ada</lead></team>");
        write(dir.path(), "nested/deeper/scores.csv", "name,score\nAda,10\n");
        dir
    }

    fn converter() -> Converter {
        Converter::new(ConversionConfig::default()).unwrap()
    }

    #[test]
    fn test_flat_discovery_skips_subdirectories_and_unknown_files() {
        let input = sample_tree();
        let files = discover(input.path(), false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["config.yml", "people.json"]);
    }

    #[test]
    fn test_recursive_conversion_mirrors_tree() {
        let input = sample_tree();
        let output = TempDir::new().unwrap();
        let options = BatchOptions {
            recursive: true,
            ..Default::default()
        };

        let report = convert_directory(
            &converter(),
            input.path(),
            output.path(),
            OutputFormat::Json,
            &options,
            |_| {},
        )
        .unwrap();

        assert!(report.is_success());
        assert_eq!(report.converted.len(), 4);
        assert!(output.path().join("people.json").is_file());
        assert!(output.path().join("config.json").is_file());
        assert!(output.path().join("nested/team.json").is_file());
        assert!(output.path().join("nested/deeper/scores.json").is_file());
        assert!(!output.path().join("README.json").exists());

        let team: serde_json::Value =
            serde_json::from_slice(&fs::read(output.path().join("nested/team.json")).unwrap())
                .unwrap();
        assert_eq!(team, serde_json::json!({"team": {"lead": "Ada"}}));
    }

    #[test]
    fn test_identical_content_hits_cache() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(input.path(), "a.json", r#"{"k": 1}"#);
        write(input.path(), "b.yaml", "k: 1\n");

        let report = convert_directory(
            &converter(),
            input.path(),
            output.path(),
            OutputFormat::Pdf,
            &BatchOptions::default(),
            |_| {},
        )
        .unwrap();

        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.cache_hits, 1);
        assert_eq!(
            fs::read(output.path().join("a.pdf")).unwrap(),
            fs::read(output.path().join("b.pdf")).unwrap()
        );
    }

    #[test]
    fn test_continue_on_error_collects_failures() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(input.path(), "ok.csv", "a,b\n1,2\n");
        write(input.path(), "broken.json", r#"{"a":"#);
        write(input.path(), "mapping.yaml", "a: 1\n");

        let options = BatchOptions {
            continue_on_error: true,
            ..Default::default()
        };
        let mut visited = Vec::new();
        let report = convert_directory(
            &converter(),
            input.path(),
            output.path(),
            OutputFormat::Csv,
            &options,
            |file| visited.push(file.to_path_buf()),
        )
        .unwrap();

        assert_eq!(visited.len(), 3);
        assert_eq!(report.total(), 3);
        assert_eq!(report.converted.len(), 1);

        let kinds: Vec<ErrorKind> = report.failed.iter().map(|(_, e)| e.kind()).collect();
        assert!(kinds.contains(&ErrorKind::Parse));
        assert!(kinds.contains(&ErrorKind::Shape));
        assert!(!output.path().join("broken.csv").exists());
    }

    #[test]
    fn test_shared_stem_keeps_first_output() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(input.path(), "people.json", r#"[{"name": "Ada"}]"#);
        write(input.path(), "people.yaml", "- name: Linus\n");

        let options = BatchOptions {
            continue_on_error: true,
            ..Default::default()
        };
        let report = convert_directory(
            &converter(),
            input.path(),
            output.path(),
            OutputFormat::Csv,
            &options,
            |_| {},
        )
        .unwrap();

        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.failed.len(), 1);
        let (skipped, error) = &report.failed[0];
        assert_eq!(skipped, &input.path().join("people.yaml"));
        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.to_string().contains("people.json"));
        assert_eq!(
            fs::read_to_string(output.path().join("people.csv")).unwrap(),
            "name\nAda\n"
        );
    }

    #[test]
    fn test_shared_stem_fails_before_writing() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(input.path(), "people.json", r#"[{"name": "Ada"}]"#);
        write(input.path(), "people.yaml", "- name: Linus\n");

        let err = convert_directory(
            &converter(),
            input.path(),
            output.path(),
            OutputFormat::Csv,
            &BatchOptions::default(),
            |_| {},
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!output.path().join("people.csv").exists());
    }

    #[test]
    fn test_forced_input_format() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        // Extension says JSON, content is CSV
        write(input.path(), "rows.json", "x\n1\n");

        let options = BatchOptions {
            input_format: Some(InputFormat::Csv),
            ..Default::default()
        };
        convert_directory(
            &converter(),
            input.path(),
            output.path(),
            OutputFormat::Yaml,
            &options,
            |_| {},
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(output.path().join("rows.yaml")).unwrap(),
            "- x: 1\n"
        );
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let output = TempDir::new().unwrap();
        let err = convert_directory(
            &converter(),
            Path::new("/definitely/not/here"),
            output.path(),
            OutputFormat::Json,
            &BatchOptions::default(),
            |_| {},
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
