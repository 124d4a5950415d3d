//! Tests for manifest building and writing

#[cfg(test)]
mod manifest_tests {
    use crate::test_utils::JavaProject;
    use std::fs;
    use tempfile::TempDir;
    use tsd_core::{Error, ManifestBuilder, NamingConvention};

    fn builder(project: &JavaProject) -> ManifestBuilder {
        ManifestBuilder::new("myproj", project.test_root(), project.main_root())
    }

    #[test]
    fn test_pairs_only_tests_with_production_file() {
        let project = JavaProject::new();
        let foo_test = project.add_test("a/FooTest.java");
        project.add_test("a/BarTest.java");
        let foo = project.add_main("a/Foo.java");

        let manifest = builder(&project).build().unwrap();

        assert_eq!(manifest.len(), 1);
        let row = &manifest.rows()[0];
        assert_eq!(row.project_name(), "myproj");
        assert_eq!(row.test_file(), foo_test);
        assert_eq!(row.production_file(), foo);
        assert_eq!(
            manifest.to_csv().unwrap(),
            format!("myproj,{},{}\n", foo_test.display(), foo.display())
        );
    }

    #[test]
    fn test_stats_count_every_stage() {
        let project = JavaProject::new();
        project.add_test("a/FooTest.java");
        project.add_test("a/BarTest.java");
        project.add_test("a/fixtures/data.json");
        project.add_main("a/Foo.java");

        let stats = builder(&project).build().unwrap().stats();

        assert_eq!(stats.scanned_files, 3);
        assert_eq!(stats.candidates, 2);
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.unmatched(), 1);
    }

    #[test]
    fn test_rows_never_exceed_candidates() {
        let project = JavaProject::new();
        for name in ["AlphaTest", "BetaTest", "GammaTest", "Delta"] {
            project.add_test(&format!("pkg/{name}.java"));
        }
        project.add_main("pkg/Alpha.java");
        project.add_main("pkg/Gamma.java");
        project.add_main("pkg/Unrelated.java");

        let manifest = builder(&project).build().unwrap();

        assert_eq!(manifest.len(), 2);
        assert!(manifest.len() <= manifest.stats().candidates);
    }

    #[test]
    fn test_nested_packages_resolve_relative_to_production_root() {
        let project = JavaProject::new();
        project.add_test("com/acme/core/ParserTest.java");
        let parser = project.add_main("com/acme/core/Parser.java");
        // Same file name in another package must not match
        project.add_main("com/acme/Other.java");
        project.add_test("com/acme/util/OtherTest.java");

        let manifest = builder(&project).build().unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.rows()[0].production_file(), parser);
    }

    #[test]
    fn test_rows_follow_sorted_traversal() {
        let project = JavaProject::new();
        for name in ["b/ZedTest.java", "a/MidTest.java", "a/AnyTest.java"] {
            project.add_test(name);
        }
        for name in ["b/Zed.java", "a/Mid.java", "a/Any.java"] {
            project.add_main(name);
        }

        let manifest = builder(&project).build().unwrap();
        let names: Vec<_> = manifest
            .rows()
            .iter()
            .map(|r| r.production_file().strip_prefix(project.main_root()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                std::path::PathBuf::from("a/Any.java"),
                std::path::PathBuf::from("a/Mid.java"),
                std::path::PathBuf::from("b/Zed.java"),
            ]
        );
    }

    #[test]
    fn test_directory_named_like_test_is_skipped() {
        let project = JavaProject::new();
        fs::create_dir_all(project.test_root().join("FooTest.java")).unwrap();
        project.add_main("Foo.java");

        let manifest = builder(&project).build().unwrap();

        assert!(manifest.is_empty());
        assert_eq!(manifest.stats().candidates, 0);
    }

    #[test]
    fn test_production_directory_is_not_a_match() {
        let project = JavaProject::new();
        project.add_test("FooTest.java");
        fs::create_dir_all(project.main_root().join("Foo.java")).unwrap();

        assert!(builder(&project).build().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_tests_are_excluded() {
        let project = JavaProject::new();
        let real = project.add_test("real/FooTest.java");
        project.add_main("real/Foo.java");
        project.add_main("link/Foo.java");
        fs::create_dir_all(project.test_root().join("link")).unwrap();
        std::os::unix::fs::symlink(&real, project.test_root().join("link/FooTest.java")).unwrap();

        let manifest = builder(&project).build().unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.rows()[0].test_file(), real);
    }

    #[test]
    fn test_custom_convention_is_applied() {
        let project = JavaProject::new();
        project.add_test("ParserSpec.kt");
        project.add_test("LexerTest.java");
        project.add_main("Parser.kt");
        project.add_main("Lexer.java");

        let manifest = builder(&project)
            .with_convention(NamingConvention::new("Spec", "kt"))
            .build()
            .unwrap();

        assert_eq!(manifest.len(), 1);
        assert!(manifest.rows()[0].production_file().ends_with("Parser.kt"));
    }

    #[test]
    fn test_empty_test_root_writes_empty_manifest() {
        let project = JavaProject::new();
        let out = TempDir::new().unwrap();

        let manifest = builder(&project).build().unwrap();
        let path = manifest.write_to(out.path().join("input.csv")).unwrap();

        assert!(manifest.is_empty());
        assert!(path.is_absolute());
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_missing_test_root_is_fatal() {
        let project = JavaProject::new();
        let missing = project.temp.path().join("does-not-exist");

        let err = ManifestBuilder::new("myproj", &missing, project.main_root())
            .build()
            .unwrap_err();

        match err {
            Error::FileSystem { path, .. } => assert_eq!(path, missing),
            other => panic!("expected FileSystem error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_production_root_is_fatal() {
        let project = JavaProject::new();
        project.add_test("FooTest.java");
        let missing = project.temp.path().join("nope");

        let err = ManifestBuilder::new("myproj", project.test_root(), &missing)
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::FileSystem { .. }));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_file_as_test_root_is_fatal() {
        let project = JavaProject::new();
        let file = project.add_test("FooTest.java");

        let err = ManifestBuilder::new("myproj", &file, project.main_root())
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::FileSystem { .. }));
    }

    #[test]
    fn test_rebuild_is_byte_identical() {
        let project = JavaProject::new();
        for i in 0..20 {
            project.add_test(&format!("p{}/C{i}Test.java", i % 3));
            if i % 2 == 0 {
                project.add_main(&format!("p{}/C{i}.java", i % 3));
            }
        }
        let out = TempDir::new().unwrap();

        let first = builder(&project).build().unwrap();
        let path = first.write_to(out.path().join("first.csv")).unwrap();
        let second = builder(&project).build().unwrap();
        let again = second.write_to(out.path().join("second.csv")).unwrap();

        assert_eq!(fs::read(path).unwrap(), fs::read(again).unwrap());
    }

    #[test]
    fn test_line_count_matches_row_count() {
        let project = JavaProject::new();
        for name in ["One", "Two", "Three"] {
            project.add_test(&format!("{name}Test.java"));
            project.add_main(&format!("{name}.java"));
        }
        let out = TempDir::new().unwrap();

        let manifest = builder(&project).build().unwrap();
        let path = manifest.write_to(out.path().join("input.csv")).unwrap();
        let content = fs::read_to_string(path).unwrap();

        assert_eq!(content.lines().count(), manifest.len());
        assert!(content.ends_with('\n'));
        for line in content.lines() {
            assert_eq!(line.split(',').count(), 3);
        }
    }

    #[test]
    fn test_write_truncates_existing_manifest() {
        let project = JavaProject::new();
        let out = TempDir::new().unwrap();
        let target = out.path().join("input.csv");
        fs::write(&target, "stale,row,from\nearlier,run,here\n").unwrap();

        builder(&project).build().unwrap().write_to(&target).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let project = JavaProject::new();
        let out = TempDir::new().unwrap();
        let target = out.path().join("missing").join("input.csv");

        let err = builder(&project).build().unwrap().write_to(&target).unwrap_err();

        assert!(matches!(err, Error::FileSystem { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn test_project_name_with_line_break_is_rejected_before_writing() {
        let project = JavaProject::new();
        project.add_test("FooTest.java");
        project.add_main("Foo.java");
        let out = TempDir::new().unwrap();
        let target = out.path().join("input.csv");

        let manifest = ManifestBuilder::new("my\nproj", project.test_root(), project.main_root())
            .build()
            .unwrap();
        let err = manifest.write_to(&target).unwrap_err();

        assert!(matches!(err, Error::InvalidField { .. }));
        assert!(!target.exists());
    }

    /// Make `dir` unreadable; `false` when the permission is not enforced (root)
    #[cfg(unix)]
    fn lock(dir: &std::path::Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(dir).is_ok() {
            unlock(dir);
            return false;
        }
        true
    }

    #[cfg(unix)]
    fn unlock(dir: &std::path::Path) {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_test_subdirectory_aborts_the_walk() {
        let project = JavaProject::new();
        project.add_test("a/FooTest.java");
        project.add_main("a/Foo.java");
        project.add_test("b/BarTest.java");
        project.add_main("b/Bar.java");
        let locked = project.test_root().join("b");
        if !lock(&locked) {
            return;
        }

        let result = builder(&project).build();
        unlock(&locked);

        match result {
            Err(Error::Traversal { root, .. }) => assert_eq!(root, project.test_root()),
            other => panic!("expected Traversal error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_production_directory_is_fatal() {
        let project = JavaProject::new();
        project.add_test("a/FooTest.java");
        project.add_main("a/Foo.java");
        let locked = project.main_root().join("a");
        if !lock(&locked) {
            return;
        }

        let result = builder(&project).build();
        unlock(&locked);

        match result {
            Err(Error::FileSystem { path, .. }) => assert_eq!(path, locked.join("Foo.java")),
            other => panic!("expected FileSystem error, got {other:?}"),
        }
    }
}
