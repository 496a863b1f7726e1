//! Command-line arguments.

use std::path::PathBuf;

/// Usage text printed when an argument is missing.
pub const USAGE: &str = "\
Usage: vox2sprite <input.vox> <output.png> [--config <file.toml>] [--manifest <file.json>]

Renders every model in a MagicaVoxel file from four sides into one
isometric sprite sheet.

Options:
  --config <file.toml>     shading = \"hsl\" | \"rgb\", parallel = true | false
  --manifest <file.json>   also write the sheet layout as JSON
  -h, --help               print this message";

/// Parsed arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliArgs {
    /// Input `.vox` file.
    pub input: PathBuf,
    /// Output PNG file.
    pub output: PathBuf,
    /// Optional render config.
    pub config: Option<PathBuf>,
    /// Optional JSON manifest path.
    pub manifest: Option<PathBuf>,
}

/// Outcome of argument parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parsed {
    /// Everything needed to run.
    Run(CliArgs),
    /// Print usage and do nothing.
    Usage,
    /// Malformed arguments.
    Invalid(String),
}

/// Parses arguments, excluding the program name.
pub fn parse<I>(args: I) -> Parsed
where
    I: IntoIterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut config = None;
    let mut manifest = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Parsed::Usage,
            "--config" | "--manifest" => {
                let Some(value) = args.next() else {
                    return Parsed::Invalid(format!("{arg} needs a path"));
                };
                let slot = if arg == "--config" { &mut config } else { &mut manifest };
                *slot = Some(PathBuf::from(value));
            }
            flag if flag.starts_with("--") => {
                return Parsed::Invalid(format!("unknown option {flag}"));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    match (positional.next(), positional.next(), positional.next()) {
        (Some(input), Some(output), None) => Parsed::Run(CliArgs {
            input,
            output,
            config,
            manifest,
        }),
        (Some(_), Some(_), Some(extra)) => {
            Parsed::Invalid(format!("unexpected argument {}", extra.display()))
        }
        _ => Parsed::Usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_two_positionals() {
        let parsed = parse(args(&["horse.vox", "horse.png"]));
        assert_eq!(
            parsed,
            Parsed::Run(CliArgs {
                input: "horse.vox".into(),
                output: "horse.png".into(),
                config: None,
                manifest: None,
            })
        );
    }

    #[test]
    fn test_missing_output_prints_usage() {
        assert_eq!(parse(args(&["horse.vox"])), Parsed::Usage);
        assert_eq!(parse(args(&[])), Parsed::Usage);
    }

    #[test]
    fn test_options() {
        let Parsed::Run(cli) = parse(args(&[
            "--config", "render.toml", "in.vox", "out.png", "--manifest", "out.json",
        ])) else {
            panic!("expected run");
        };
        assert_eq!(cli.config, Some("render.toml".into()));
        assert_eq!(cli.manifest, Some("out.json".into()));
        assert_eq!(cli.input, PathBuf::from("in.vox"));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(parse(args(&["in.vox", "out.png", "--config"])), Parsed::Invalid(_)));
        assert!(matches!(parse(args(&["--scale", "2", "a", "b"])), Parsed::Invalid(_)));
        assert!(matches!(parse(args(&["a", "b", "c"])), Parsed::Invalid(_)));
    }
}
