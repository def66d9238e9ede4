use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "marchview",
    author,
    version,
    about = "Windowed ray-marching shader viewer"
)]
pub struct Cli {
    /// Fragment shader to render instead of the bundled ray-march scene.
    #[arg(value_name = "SHADER")]
    pub shader: Option<PathBuf>,

    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Path to a TOML settings file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{value}`"))?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid width: {err}"))?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid height: {err}"))?;
    if width == 0 || height == 0 {
        return Err("surface dimensions must be non-zero".to_owned());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_declaration_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn surface_size_accepts_both_separators() {
        assert_eq!(parse_surface_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_surface_size("800X450"), Ok((800, 450)));
    }

    #[test]
    fn surface_size_rejects_malformed_input() {
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x450").is_err());
        assert!(parse_surface_size("widexhigh").is_err());
    }
}
