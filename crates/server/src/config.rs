use std::env;
use std::path::PathBuf;

use executors::Invocation;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_BUILD_COMMAND: &str = "make";
const DEFAULT_BUILD_ARGS: &str = "-C build";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub build_command: String,
    pub build_args: Vec<String>,
    pub build_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{0}` is set but empty")]
    EmptyVar(&'static str),
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr =
            env::var("SERVER_LISTEN_ADDR").unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());

        let build_command = env::var("TRAINER_BUILD_COMMAND")
            .unwrap_or_else(|_| DEFAULT_BUILD_COMMAND.to_string());
        if build_command.trim().is_empty() {
            return Err(ConfigError::EmptyVar("TRAINER_BUILD_COMMAND"));
        }

        let build_args =
            env::var("TRAINER_BUILD_ARGS").unwrap_or_else(|_| DEFAULT_BUILD_ARGS.to_string());
        let build_args = build_args
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let build_dir = env::var("TRAINER_BUILD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            listen_addr,
            build_command,
            build_args,
            build_dir,
        })
    }

    /// The fixed build invocation. Request parameters never reach this
    /// argument vector, and nothing here passes through a shell.
    pub fn build_invocation(&self) -> Invocation {
        Invocation::new(
            &self.build_command,
            self.build_args.clone(),
            &self.build_dir,
        )
    }
}
