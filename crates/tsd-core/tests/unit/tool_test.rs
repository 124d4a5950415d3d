//! Tests for detector invocation
//!
//! The unix-only tests stand in `true`, `false` or a shell script for the
//! Java runtime so that the supervision logic runs without a JVM.

#[cfg(test)]
mod tool_tests {
    use crate::test_utils::create_file;
    use std::ffi::OsString;
    use std::time::Duration;
    use tempfile::TempDir;
    use tsd_core::{Error, ToolInvocation};

    fn fake_jar(temp: &TempDir) -> std::path::PathBuf {
        create_file(temp.path(), "TestSmellDetector.jar", "not really a jar")
    }

    #[test]
    fn test_args_follow_jar_contract() {
        let invocation = ToolInvocation::new("/opt/tsdetect.jar", "/tmp/input.csv");

        assert_eq!(invocation.runtime(), "java");
        assert_eq!(
            invocation.args(),
            vec![
                OsString::from("-jar"),
                OsString::from("/opt/tsdetect.jar"),
                OsString::from("/tmp/input.csv"),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_jar_is_a_configuration_error() {
        let temp = TempDir::new().unwrap();
        let invocation =
            ToolInvocation::new(temp.path().join("missing.jar"), temp.path().join("input.csv"));

        let err = invocation.run().await.unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("missing.jar"));
    }

    #[tokio::test]
    async fn test_unknown_runtime_is_a_spawn_error() {
        let temp = TempDir::new().unwrap();
        let invocation = ToolInvocation::new(fake_jar(&temp), temp.path().join("input.csv"))
            .with_runtime("tsd-no-such-runtime-binary");

        let err = invocation.run().await.unwrap_err();

        match err {
            Error::Spawn { program, .. } => assert_eq!(program, "tsd-no-such-runtime-binary"),
            other => panic!("expected Spawn error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run_reports_exit_code() {
        let temp = TempDir::new().unwrap();
        let invocation = ToolInvocation::new(fake_jar(&temp), temp.path().join("input.csv"))
            .with_runtime("true");

        let outcome = invocation.run().await.unwrap();

        assert_eq!(outcome.exit_code, Some(0));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_fatal() {
        let temp = TempDir::new().unwrap();
        let invocation = ToolInvocation::new(fake_jar(&temp), temp.path().join("input.csv"))
            .with_runtime("false");

        let err = invocation.run().await.unwrap_err();

        match err {
            Error::ToolFailed { exit_code, .. } => assert_eq!(exit_code, Some(1)),
            other => panic!("expected ToolFailed error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    fn fake_runtime(temp: &TempDir, body: &str) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = create_file(temp.path(), "fake-java", &format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_streams_are_captured_and_cwd_applied() {
        let temp = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let runtime = fake_runtime(&temp, "echo \"$1 $3\"\npwd\necho warning >&2");
        let manifest = temp.path().join("input.csv");
        let invocation = ToolInvocation::new(fake_jar(&temp), &manifest)
            .with_runtime(runtime.to_string_lossy())
            .with_working_dir(work.path());

        let outcome = invocation.run().await.unwrap();

        let mut lines = outcome.stdout.lines();
        assert_eq!(
            lines.next().unwrap(),
            format!("-jar {}", manifest.display())
        );
        let cwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(
            cwd.canonicalize().unwrap(),
            work.path().canonicalize().unwrap()
        );
        assert_eq!(outcome.stderr.trim(), "warning");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_carries_stderr() {
        let temp = TempDir::new().unwrap();
        let runtime = fake_runtime(&temp, "echo 'cannot parse manifest' >&2\nexit 3");
        let invocation = ToolInvocation::new(fake_jar(&temp), temp.path().join("input.csv"))
            .with_runtime(runtime.to_string_lossy());

        let err = invocation.run().await.unwrap_err();

        match err {
            Error::ToolFailed {
                exit_code, stderr, ..
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stderr, "cannot parse manifest");
            }
            other => panic!("expected ToolFailed error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_the_detector() {
        let temp = TempDir::new().unwrap();
        let runtime = fake_runtime(&temp, "sleep 30");
        let invocation = ToolInvocation::new(fake_jar(&temp), temp.path().join("input.csv"))
            .with_runtime(runtime.to_string_lossy())
            .with_timeout(Duration::from_millis(200));

        let err = invocation.run().await.unwrap_err();

        assert!(matches!(err, Error::ToolTimeout { .. }));
    }
}
