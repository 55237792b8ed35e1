//! Benchmark profiles and the headless runner's argument handling.
//!
//! - [`reference_profile`]: 150x150 grid with 24 bands, the classic setup
//! - [`stress_profile`]: 400x400 grid (160K cells) for stress testing
//! - [`DemoArgs`]: the runner's two optional positional integers

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt;

use eddy_engine::SolverConfig;

/// Default grid side for the demo runner and the reference profile.
pub const DEFAULT_SIZE: usize = 150;

/// Default band count for the demo runner and the reference profile.
pub const DEFAULT_GRANULARITY: usize = 24;

/// Reference benchmark profile: 150x150 grid, 24 bands, fixed dt 0.1.
pub fn reference_profile() -> SolverConfig {
    SolverConfig::default()
}

/// Stress benchmark profile: 400x400 grid, 64 bands.
pub fn stress_profile() -> SolverConfig {
    SolverConfig {
        granularity: 64,
        ..SolverConfig::square(400)
    }
}

/// Parsed command line of the headless runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoArgs {
    /// Grid side length.
    pub size: usize,
    /// Row bands per dispatch.
    pub granularity: usize,
}

/// A positional argument that is not a non-negative integer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoArgsError {
    /// Which argument (`"size"` or `"granularity"`).
    pub name: &'static str,
    /// The text supplied.
    pub value: String,
}

impl fmt::Display for DemoArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must be an integer, got {:?}", self.name, self.value)
    }
}

impl std::error::Error for DemoArgsError {}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            granularity: DEFAULT_GRANULARITY,
        }
    }
}

impl DemoArgs {
    /// Parse `[size] [granularity]`, program name already stripped.
    /// Extra arguments are ignored.
    pub fn parse<I>(args: I) -> Result<Self, DemoArgsError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        if let Some(size) = args.next() {
            parsed.size = parse_one("size", size.as_ref())?;
        }
        if let Some(granularity) = args.next() {
            parsed.granularity = parse_one("granularity", granularity.as_ref())?;
        }
        Ok(parsed)
    }

    /// Simulation config for these arguments.
    pub fn config(&self) -> SolverConfig {
        SolverConfig {
            granularity: self.granularity,
            ..SolverConfig::square(self.size)
        }
    }
}

fn parse_one(name: &'static str, value: &str) -> Result<usize, DemoArgsError> {
    value.trim().parse().map_err(|_| DemoArgsError {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_gives_defaults() {
        let args = DemoArgs::parse(Vec::<String>::new()).unwrap();
        assert_eq!(args, DemoArgs::default());
        assert_eq!(args.config(), reference_profile());
    }

    #[test]
    fn positional_args_override() {
        let args = DemoArgs::parse(["64", "8"]).unwrap();
        assert_eq!(args.size, 64);
        assert_eq!(args.granularity, 8);
        let cfg = args.config();
        assert_eq!((cfg.width, cfg.height, cfg.granularity), (64, 64, 8));
    }

    #[test]
    fn size_only() {
        let args = DemoArgs::parse(["80"]).unwrap();
        assert_eq!(args.granularity, DEFAULT_GRANULARITY);
    }

    #[test]
    fn rejects_non_integer() {
        let err = DemoArgs::parse(["big"]).unwrap_err();
        assert_eq!(err.name, "size");
        let err = DemoArgs::parse(["80", "-3"]).unwrap_err();
        assert_eq!(err.name, "granularity");
    }

    #[test]
    fn profiles_validate() {
        assert!(reference_profile().validate().is_ok());
        assert!(stress_profile().validate().is_ok());
    }
}
