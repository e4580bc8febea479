use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated home directory for one test: its own data file, config file,
/// and environment-pinned command builder.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.path().join(".todo.toml")
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.config_file();
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read_data(&self) -> String {
        fs::read_to_string(self.data_file()).expect("read data file")
    }

    /// Command with the environment pinned to this home.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("todo").expect("binary");
        cmd.env("HOME", self.dir.path())
            .env("TODO_FILE", self.data_file())
            .env("TODO_CONFIG", self.config_file())
            .env_remove("TODO_TEMPLATE")
            .env_remove("RUST_LOG");
        cmd
    }
}
