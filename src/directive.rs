use core::fmt;
use std::collections::HashSet;

use thiserror::Error;

use crate::{
    display::{Inventory, Mode, Output},
    profile::{Profile, Screen},
    types::{Position, Size},
};

/// Error type for the directive module
#[derive(Error, Debug, PartialEq)]
pub enum PlanError {
    #[error("Output {0} from the profile is not connected")]
    MissingOutput(String),
    #[error("Output {output} has no mode with size {size}")]
    NoMatchingMode { output: String, size: Size },
}

type Result<T = ()> = std::result::Result<T, PlanError>;

/// One instruction for the display tool
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Disable(String),
    Enable(String),
    Mode { output: String, mode: String },
    Position { output: String, position: Position },
    Scale { output: String, scale: f64 },
}

impl Directive {
    /// Name of the output this directive targets
    pub fn output(&self) -> &str {
        match self {
            Directive::Disable(output) | Directive::Enable(output) => output,
            Directive::Mode { output, .. }
            | Directive::Position { output, .. }
            | Directive::Scale { output, .. } => output,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Directive::Disable(output) => write!(f, "output.{output}.disable"),
            Directive::Enable(output) => write!(f, "output.{output}.enable"),
            Directive::Mode { output, mode } => write!(f, "output.{output}.mode.{mode}"),
            Directive::Position { output, position } => {
                write!(f, "output.{output}.position.{position}")
            }
            Directive::Scale { output, scale } => write!(f, "output.{output}.scale.{scale}"),
        }
    }
}

/// Picks the mode of `output` that best reproduces `screen`
///
/// The size has to match exactly. Among those modes the one closest to the
/// desired refresh rate wins; on equal distance the first listed mode is used.
pub fn nearest_mode<'a>(output: &'a Output, screen: &Screen) -> Result<&'a Mode> {
    output
        .modes
        .iter()
        .filter(|mode| mode.size == screen.size)
        .min_by(|a, b| {
            let da = (a.refresh_rate - screen.refresh_rate).abs();
            let db = (b.refresh_rate - screen.refresh_rate).abs();
            da.total_cmp(&db)
        })
        .ok_or_else(|| PlanError::NoMatchingMode {
            output: output.name.clone(),
            size: screen.size,
        })
}

/// Computes the directives that turn the live `inventory` into `profile`
///
/// Every output without a screen in the profile is disabled. Disables come
/// first, followed by enable, mode, position and scale for each screen in
/// profile order. Nothing is returned unless every screen resolves.
pub fn plan(profile: &Profile, inventory: &Inventory) -> Result<Vec<Directive>> {
    let mut configure = Vec::with_capacity(profile.screens.len() * 4);
    let mut wanted = HashSet::new();

    for screen in &profile.screens {
        let output = inventory
            .get(&screen.name)
            .ok_or_else(|| PlanError::MissingOutput(screen.name.clone()))?;
        let mode = nearest_mode(output, screen)?;

        if !wanted.insert(output.name.as_str()) {
            log::warn!("Profile lists output {} more than once", output.name);
        }
        log::debug!(
            "{}: mode {} ({} Hz, wanted {} Hz) at {} scale {}",
            output.name,
            mode.name,
            mode.refresh_rate,
            screen.refresh_rate,
            screen.position,
            screen.scale
        );

        configure.extend([
            Directive::Enable(output.name.clone()),
            Directive::Mode {
                output: output.name.clone(),
                mode: mode.name.clone(),
            },
            Directive::Position {
                output: output.name.clone(),
                position: screen.position,
            },
            Directive::Scale {
                output: output.name.clone(),
                scale: screen.scale,
            },
        ]);
    }

    let mut directives: Vec<Directive> = inventory
        .outputs()
        .filter(|output| !wanted.contains(output.name.as_str()))
        .map(|output| Directive::Disable(output.name.clone()))
        .collect();
    directives.append(&mut configure);

    Ok(directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_use_the_tool_grammar() {
        let cases = [
            (Directive::Disable("HDMI-A-1".into()), "output.HDMI-A-1.disable"),
            (Directive::Enable("DP-2".into()), "output.DP-2.enable"),
            (
                Directive::Mode {
                    output: "DP-2".into(),
                    mode: "2560x1440@144".into(),
                },
                "output.DP-2.mode.2560x1440@144",
            ),
            (
                Directive::Position {
                    output: "eDP-1".into(),
                    position: Position::new(2560, -120),
                },
                "output.eDP-1.position.2560,-120",
            ),
            (
                Directive::Scale {
                    output: "eDP-1".into(),
                    scale: 1.25,
                },
                "output.eDP-1.scale.1.25",
            ),
        ];

        for (directive, expected) in cases {
            assert_eq!(directive.to_string(), expected);
        }
    }
}
