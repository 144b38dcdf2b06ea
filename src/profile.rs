use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    display::{Inventory, Output},
    types::{Position, Size},
};

/// Directory below the user's config directory that holds named profiles
pub const PROFILE_DIR: &str = "screenprofile";

/// Profile argument that stands for stdin/stdout
pub const STDIO_PROFILE: &str = "-";

/// Error type for the profile module
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to access profile {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Profile {path:?} is malformed")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write profile {path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to determine the refresh rate of output {output} (current mode `{mode_id}`)")]
    Integrity { output: String, mode_id: String },
}

type Result<T = ()> = std::result::Result<T, ProfileError>;

/// The desired state of one output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub name: String,
    pub size: Size,
    pub position: Position,
    pub refresh_rate: f64,
    pub scale: f64,
}

impl Screen {
    /// Projects an enabled output into a screen record
    fn from_output(output: &Output) -> Result<Screen> {
        let refresh_rate = output
            .current_mode()
            .map(|mode| mode.refresh_rate)
            .filter(|rate| *rate > 0.0)
            .ok_or_else(|| ProfileError::Integrity {
                output: output.name.clone(),
                mode_id: output.current_mode_id.clone(),
            })?;

        Ok(Screen {
            name: output.name.clone(),
            size: output.size,
            position: output.position,
            refresh_rate,
            scale: output.scale,
        })
    }
}

/// A saved multi-output arrangement
///
/// Outputs that have no screen in a profile are disabled when it is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub screens: Vec<Screen>,
}

impl Profile {
    /// Builds a profile from the enabled outputs of `inventory`
    ///
    /// Screens are ordered by ascending output priority; outputs with equal
    /// priority keep the order the tool reported them in.
    pub fn extract(inventory: &Inventory) -> Result<Profile> {
        let mut outputs: Vec<&Output> = inventory.outputs().collect();
        outputs.sort_by_key(|output| output.priority);

        let screens = outputs
            .into_iter()
            .filter(|output| output.enabled)
            .map(Screen::from_output)
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Extracted {} screen(s)", screens.len());
        Ok(Profile { screens })
    }

    /// Reads a profile from a JSON file
    pub fn load(path: &Path) -> Result<Profile> {
        let file = File::open(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Reads a profile from `reader`; `origin` only names it in errors
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Profile> {
        serde_json::from_reader(reader).map_err(|source| ProfileError::Decode {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Writes the profile to a JSON file, creating missing parent directories
    pub fn save(&self, path: &Path) -> Result {
        let io_err = |source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer, path)?;
        writer.flush().map_err(io_err)
    }

    /// Writes the profile as pretty-printed JSON followed by a newline
    pub fn to_writer<W: Write>(&self, mut writer: W, origin: &Path) -> Result {
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| ProfileError::Encode {
            path: origin.to_path_buf(),
            source,
        })?;
        writeln!(writer).map_err(|source| ProfileError::Io {
            path: origin.to_path_buf(),
            source,
        })
    }
}

/// Turns a profile argument into a file path
///
/// Anything that looks like a path (a separator or an extension) is taken
/// verbatim. A bare name is looked up in the user's config directory.
pub fn resolve_path(profile: &str) -> PathBuf {
    let candidate = Path::new(profile);
    if profile.contains(std::path::MAIN_SEPARATOR) || candidate.extension().is_some() {
        return candidate.to_path_buf();
    }

    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(PROFILE_DIR);
    path.push(format!("{profile}.json"));
    path
}
