use core::fmt;
use std::ffi::OsStr;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use serde::Deserialize;
use thiserror::Error;

use crate::{
    directive::Directive,
    types::{Position, Size},
};

/// Name of the display tool that is used when none is configured
pub const DEFAULT_TOOL: &str = "kscreen-doctor";

/// Argument that makes the tool report its current state as JSON
const QUERY_ARG: &str = "--json";

/// Error type for the display module
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to launch `{program}`")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` failed with {status}")]
    Exit {
        program: String,
        status: ExitStatus,
        /// Decoding error that happened while the tool was failing, if any
        #[source]
        decode: Option<serde_json::Error>,
    },
    #[error("Failed to decode the output inventory reported by `{program}`")]
    Decode {
        program: String,
        #[source]
        source: serde_json::Error,
    },
}

type Result<T = ()> = std::result::Result<T, DisplayError>;

/// One timing option of an output
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub id: String,
    pub name: String,
    pub refresh_rate: f64,
    pub size: Size,
}

/// A display connector as reported live by the tool
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub name: String,
    #[serde(default)]
    pub current_mode_id: String,
    pub enabled: bool,
    #[serde(default)]
    pub size: Size,
    #[serde(default, rename = "pos")]
    pub position: Position,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub modes: Vec<Mode>,
    /// Only used to order the screens of an extracted profile
    #[serde(default)]
    pub priority: i32,
}

fn default_scale() -> f64 {
    1.0
}

impl Output {
    /// Returns the mode the output is currently driven at
    pub fn current_mode(&self) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == self.current_mode_id)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Output {{ name: {}, enabled: {}, size: {}, position: {}, scale: {}, mode: {}, modes: {}, priority: {} }}",
            self.name,
            self.enabled,
            self.size,
            self.position,
            self.scale,
            self.current_mode_id,
            self.modes.len(),
            self.priority
        )
    }
}

/// Snapshot of every output known to the tool
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Inventory {
    pub outputs: Vec<Output>,
}

impl Inventory {
    /// Iterates over the outputs in the order the tool reported them
    pub fn outputs(&self) -> impl ExactSizeIterator<Item = &Output> {
        self.outputs.iter()
    }

    /// Returns the output with the given `name`
    pub fn get(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name == name)
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inventory {{ outputs: [")?;
        for (i, output) in self.outputs.iter().enumerate() {
            if i > 0 {
                writeln!(f, ", ")?;
            }
            write!(f, "    {}", output)?;
        }
        write!(f, "\n] }}")
    }
}

/// Handle to the external display control tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTool {
    program: PathBuf,
}

impl Default for DisplayTool {
    fn default() -> Self {
        Self::new(DEFAULT_TOOL)
    }
}

impl DisplayTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Asks the tool for the current state of all outputs
    pub fn query_inventory(&self) -> Result<Inventory> {
        let mut command = Command::new(&self.program);
        command.arg(QUERY_ARG);
        read_inventory(command)
    }

    /// Runs the tool with one argument per directive
    ///
    /// Nothing is spawned for an empty directive list.
    pub fn apply(&self, directives: &[Directive]) -> Result {
        if directives.is_empty() {
            log::debug!("No directives to apply");
            return Ok(());
        }

        let args: Vec<String> = directives.iter().map(Directive::to_string).collect();
        log::debug!("Running {} {}", self.program.display(), args.join(" "));

        let program = program_name(self.program.as_os_str());
        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| DisplayError::Launch {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DisplayError::Exit {
                program,
                status,
                decode: None,
            });
        }

        log::debug!("Applied {} directive(s)", directives.len());
        Ok(())
    }
}

/// Spawns `command` and decodes its standard output as an [`Inventory`]
///
/// The output is decoded on a separate thread while the process runs, so a
/// report larger than the pipe buffer cannot stall the child. A non-zero
/// exit takes precedence over a decoding failure.
pub fn read_inventory(mut command: Command) -> Result<Inventory> {
    let program = program_name(command.get_program());

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| DisplayError::Launch {
            program: program.clone(),
            source,
        })?;

    let Some(stdout) = child.stdout.take() else {
        unreachable!("stdout is piped");
    };
    let decoder =
        thread::spawn(move || serde_json::from_reader::<_, Inventory>(BufReader::new(stdout)));

    let status = child.wait().map_err(|source| DisplayError::Launch {
        program: program.clone(),
        source,
    })?;
    let decoded = decoder
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

    if !status.success() {
        return Err(DisplayError::Exit {
            program,
            status,
            decode: decoded.err(),
        });
    }

    let inventory = decoded.map_err(|source| DisplayError::Decode { program, source })?;
    log::debug!("Discovered outputs:\n{}", inventory);
    Ok(inventory)
}

fn program_name(program: &OsStr) -> String {
    program.to_string_lossy().into_owned()
}
