use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;

use crate::constants::{STARS_COUNT, TIC_TIMEOUT_MS};
use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Headless run: render into a screen buffer dumped to the log and
    /// replay scripted input.
    pub debug: bool,
    pub debug_width: u16,
    pub debug_height: u16,
    pub max_ticks: Option<u64>,
    pub frames_dir: PathBuf,
    pub stars: usize,
    pub seed: Option<u64>,
    pub tick_ms: u64,
    pub show_obstacles: bool,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: false,
            debug_width: 80,
            debug_height: 24,
            max_ticks: None,
            frames_dir: PathBuf::from("frames"),
            stars: STARS_COUNT,
            seed: None,
            tick_ms: TIC_TIMEOUT_MS,
            show_obstacles: false,
            log_file: PathBuf::from("space-garbage.log"),
            log_level: LevelFilter::Info,
        }
    }
}

fn parse<T: FromStr>(arg: &str, value: Option<&String>) -> Result<T> {
    let value = value.ok_or_else(|| GameError::InvalidArgument {
        arg: arg.to_string(),
        reason: "missing value".to_string(),
    })?;
    value.parse::<T>().map_err(|_| GameError::InvalidArgument {
        arg: arg.to_string(),
        reason: format!("cannot parse `{}`", value),
    })
}

impl Config {
    /// Parses arguments without the program name.
    ///
    /// `--debug` takes optional positional `WIDTH HEIGHT [MAX_TICKS]`.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = Config::default();
        let mut i = 0;

        while i < args.len() {
            let arg = args[i].as_str();
            match arg {
                "--debug" => {
                    config.debug = true;
                    let positional: Vec<&String> =
                        args[i + 1..].iter().take_while(|a| !a.starts_with("--")).take(3).collect();
                    if positional.len() == 1 {
                        return Err(GameError::InvalidArgument {
                            arg: arg.to_string(),
                            reason: format!("width `{}` given without a height", positional[0]),
                        });
                    }
                    if positional.len() >= 2 {
                        config.debug_width = parse(arg, Some(positional[0]))?;
                        config.debug_height = parse(arg, Some(positional[1]))?;
                    }
                    if positional.len() == 3 {
                        config.max_ticks = Some(parse(arg, Some(positional[2]))?);
                    }
                    i += positional.len();
                }
                "--frames" => {
                    config.frames_dir = PathBuf::from(parse::<String>(arg, args.get(i + 1))?);
                    i += 1;
                }
                "--stars" => {
                    config.stars = parse(arg, args.get(i + 1))?;
                    i += 1;
                }
                "--seed" => {
                    config.seed = Some(parse(arg, args.get(i + 1))?);
                    i += 1;
                }
                "--max-ticks" => {
                    config.max_ticks = Some(parse(arg, args.get(i + 1))?);
                    i += 1;
                }
                "--tick-ms" => {
                    config.tick_ms = parse(arg, args.get(i + 1))?;
                    i += 1;
                }
                "--show-obstacles" => config.show_obstacles = true,
                "--log-file" => {
                    config.log_file = PathBuf::from(parse::<String>(arg, args.get(i + 1))?);
                    i += 1;
                }
                "--log-level" => {
                    config.log_level = parse(arg, args.get(i + 1))?;
                    i += 1;
                }
                other => {
                    return Err(GameError::InvalidArgument {
                        arg: other.to_string(),
                        reason: "unknown argument".to_string(),
                    });
                }
            }
            i += 1;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(Config::from_args(&[]).unwrap(), Config::default());
    }

    #[test]
    fn debug_with_resolution_and_tick_limit() {
        let config = Config::from_args(&args(&["--debug", "60", "20", "50", "--seed", "3"])).unwrap();
        assert!(config.debug);
        assert_eq!((config.debug_width, config.debug_height), (60, 20));
        assert_eq!(config.max_ticks, Some(50));
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn debug_width_without_height_is_rejected() {
        let err = Config::from_args(&args(&["--debug", "60"])).unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument { ref arg, .. } if arg == "--debug"));
        assert!(Config::from_args(&args(&["--debug", "60", "--seed", "1"])).is_err());
    }

    #[test]
    fn debug_alone_keeps_default_resolution() {
        let config = Config::from_args(&args(&["--debug", "--show-obstacles"])).unwrap();
        assert!(config.debug && config.show_obstacles);
        assert_eq!((config.debug_width, config.debug_height), (80, 24));
    }

    #[test]
    fn flags_with_values() {
        let config = Config::from_args(&args(&[
            "--frames", "assets", "--stars", "10", "--log-level", "debug", "--tick-ms", "50",
        ]))
        .unwrap();
        assert_eq!(config.frames_dir, PathBuf::from("assets"));
        assert_eq!(config.stars, 10);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.tick_ms, 50);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            Config::from_args(&args(&["--stars", "many"])),
            Err(GameError::InvalidArgument { .. })
        ));
        assert!(Config::from_args(&args(&["--seed"])).is_err());
        assert!(Config::from_args(&args(&["--warp"])).is_err());
    }
}
