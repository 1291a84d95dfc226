use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GeneratorError {
    #[error("unable to run artifact generator `{command}`")]
    #[diagnostic(
        code(modgen::generator::spawn),
        help("Check `[generator]` in modgen.toml and that the program is on PATH")
    )]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact generator `{command}` failed: {stderr}")]
    #[diagnostic(code(modgen::generator::failed))]
    Failed { command: String, stderr: String },
}

/// Something the external generator knows how to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// A model; `full` also asks for its migration, controller and resource.
    Model { name: String, full: bool },
    /// A request-validation object named `{name}Request`.
    Request { name: String },
    /// A response-shaping object named `{name}Resource`.
    Resource { name: String },
}
impl Artifact {
    /// The generator sub-command and its arguments.
    pub fn arguments(&self) -> Vec<String> {
        match self {
            Artifact::Model { name, full: false } => vec!["make:model".into(), name.clone()],
            Artifact::Model { name, full: true } => vec![
                "make:model".into(),
                name.clone(),
                "--migration".into(),
                "--controller".into(),
                "--resource".into(),
            ],
            Artifact::Request { name } => vec!["make:request".into(), format!("{}Request", name)],
            Artifact::Resource { name } => {
                vec!["make:resource".into(), format!("{}Resource", name)]
            }
        }
    }
}

/// The collaborator that writes framework artifacts into the default
/// application locations.
pub trait ArtifactGenerator {
    fn generate(&self, artifact: &Artifact) -> Result<(), GeneratorError>;
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub program: String,
    pub args: Vec<String>,
}
impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "php".to_string(),
            args: vec!["artisan".to_string()],
        }
    }
}

/// Runs the configured program (`php artisan` by default) once per artifact.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    working_dir: PathBuf,
}
impl CommandGenerator {
    pub fn new(config: &GeneratorConfig, working_dir: &Path) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: working_dir.to_path_buf(),
        }
    }
}
impl ArtifactGenerator for CommandGenerator {
    fn generate(&self, artifact: &Artifact) -> Result<(), GeneratorError> {
        let arguments = artifact.arguments();
        let command = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(arguments.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        log::debug!("running `{}` in {}", command, self.working_dir.display());

        let output = std::process::Command::new(&self.program)
            .args(&self.args)
            .args(&arguments)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|source| GeneratorError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GeneratorError::Failed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_model_arguments() {
        let artifact = Artifact::Model {
            name: "Invoice".into(),
            full: true,
        };

        assert_eq!(
            artifact.arguments(),
            ["make:model", "Invoice", "--migration", "--controller", "--resource"]
        );
    }

    #[test]
    fn test_request_and_resource_are_suffixed() {
        let request = Artifact::Request {
            name: "Invoice".into(),
        };
        let resource = Artifact::Resource {
            name: "Invoice".into(),
        };

        assert_eq!(request.arguments(), ["make:request", "InvoiceRequest"]);
        assert_eq!(resource.arguments(), ["make:resource", "InvoiceResource"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_runs_in_working_dir() {
        let tmp = tempfile::tempdir().unwrap();
        // $1 is the sub-command, $2 the name
        let config = GeneratorConfig {
            program: "sh".into(),
            args: vec![
                "-c".into(),
                "mkdir -p app/Models && echo \"$1\" > \"app/Models/$2.php\"".into(),
                "sh".into(),
            ],
        };
        let generator = CommandGenerator::new(&config, tmp.path());

        generator
            .generate(&Artifact::Model {
                name: "Invoice".into(),
                full: false,
            })
            .unwrap();

        let written = std::fs::read_to_string(tmp.path().join("app/Models/Invoice.php")).unwrap();
        assert_eq!(written.trim(), "make:model");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_generator_reports_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            program: "sh".into(),
            args: vec!["-c".into(), "echo boom >&2; exit 3".into(), "sh".into()],
        };
        let generator = CommandGenerator::new(&config, tmp.path());

        let error = generator
            .generate(&Artifact::Request {
                name: "Invoice".into(),
            })
            .unwrap_err();

        match error {
            GeneratorError::Failed { stderr, .. } => assert_eq!(stderr, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            program: "modgen-no-such-program".into(),
            args: vec![],
        };

        let error = CommandGenerator::new(&config, tmp.path())
            .generate(&Artifact::Resource {
                name: "Invoice".into(),
            })
            .unwrap_err();

        assert!(matches!(error, GeneratorError::Spawn { .. }));
    }
}
