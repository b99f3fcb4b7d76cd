use std::path::PathBuf;

use clap::Parser;
use diffpresent::Encoding;

#[derive(Parser, Debug)]
#[command(
    name = "diffpresent",
    about = "Show a unified diff between an expected and an actual file",
    version
)]
pub struct Cli {
    /// File holding the expected content (the `-` side)
    pub expected: PathBuf,

    /// File holding the actual content (the `+` side)
    pub actual: PathBuf,

    /// Encoding of the expected file
    #[arg(long, default_value = "UTF-8")]
    pub expected_encoding: Encoding,

    /// Encoding of the actual file
    #[arg(long, default_value = "UTF-8")]
    pub actual_encoding: Encoding,

    /// Parse both files as JSON and diff their canonical forms
    #[arg(long)]
    pub json: bool,

    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorChoice,

    /// Unchanged lines shown around each change
    #[arg(long)]
    pub context: Option<usize>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal() {
        let cli = Cli::try_parse_from(["diffpresent", "a.txt", "b.txt"]).unwrap();
        assert_eq!(cli.expected, PathBuf::from("a.txt"));
        assert_eq!(cli.actual, PathBuf::from("b.txt"));
        assert_eq!(cli.expected_encoding, Encoding::Utf8);
        assert_eq!(cli.actual_encoding, Encoding::Utf8);
        assert_eq!(cli.color, ColorChoice::Auto);
        assert!(!cli.json);
        assert!(cli.context.is_none());
    }

    #[test]
    fn parse_encodings() {
        let cli = Cli::try_parse_from([
            "diffpresent",
            "--expected-encoding",
            "latin1",
            "--actual-encoding",
            "utf-16le",
            "a",
            "b",
        ])
        .unwrap();
        assert_eq!(cli.expected_encoding, Encoding::Latin1);
        assert_eq!(cli.actual_encoding, Encoding::Utf16Le);
    }

    #[test]
    fn reject_unknown_encoding() {
        assert!(Cli::try_parse_from(["diffpresent", "--actual-encoding", "ebcdic", "a", "b"]).is_err());
    }

    #[test]
    fn parse_options() {
        let cli = Cli::try_parse_from([
            "diffpresent",
            "--json",
            "--color",
            "never",
            "--context",
            "1",
            "--config",
            "diff.toml",
            "-v",
            "a.json",
            "b.json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.context, Some(1));
        assert_eq!(cli.config, Some(PathBuf::from("diff.toml")));
    }

    #[test]
    fn both_files_are_required() {
        assert!(Cli::try_parse_from(["diffpresent", "a.txt"]).is_err());
    }
}
