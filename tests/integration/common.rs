//! Common utilities for integration tests

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated working directory and config location for one test
pub struct TestContext {
    pub temp: TempDir,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("config")).unwrap();
        Self { temp }
    }

    /// A command for the binary with the environment cleared of anything
    /// the GitHub Actions mode would pick up
    pub fn octocheese(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("octocheese").unwrap();
        cmd.current_dir(self.temp.path());

        cmd.env_remove("GITHUB_TOKEN")
            .env_remove("GITHUB_REPOSITORY")
            .env_remove("INPUT_PYPI_NAME")
            .env("RUST_LOG", "info")
            .env("NO_COLOR", "1");

        let config_dir = self.temp.path().join("config");
        if cfg!(target_os = "windows") {
            cmd.env("APPDATA", &config_dir);
            cmd.env("USERPROFILE", self.temp.path());
        } else if cfg!(target_os = "linux") {
            cmd.env("XDG_CONFIG_HOME", &config_dir);
            cmd.env("HOME", self.temp.path());
        } else {
            cmd.env("HOME", self.temp.path());
        }

        cmd
    }

    /// Write a config file pointing both APIs at `server_uri`
    pub fn write_config(&self, server_uri: &str) -> PathBuf {
        let path = self.temp.path().join("octocheese.yaml");
        std::fs::write(
            &path,
            format!(
                "pypi_url: {uri}/pypi\ngithub_api_url: {uri}\ntimeout_secs: 10\n",
                uri = server_uri
            ),
        )
        .unwrap();
        path
    }
}
