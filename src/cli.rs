use clap::Parser;

const CLI_AFTER_HELP: &str = "Examples:\n  langcheck \"Avatar\"\n  langcheck \"Avatar\" 2009";

#[derive(Debug, Parser)]
#[command(
    name = "langcheck",
    version,
    about = "Check available subtitle languages and video qualities for a movie on MovieBox",
    after_help = CLI_AFTER_HELP
)]
pub struct Cli {
    /// Movie title to search for.
    pub title: Option<String>,

    /// Only consider results released in this year.
    pub year: Option<i32>,
}

impl Cli {
    /// The title to look up, if one was given and is not blank.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

pub fn usage() -> String {
    format!("Usage: langcheck \"Movie Title\" [year]\n\n{CLI_AFTER_HELP}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_and_year() {
        let cli = Cli::try_parse_from(["langcheck", "Avatar", "2009"]).unwrap();
        assert_eq!(cli.title(), Some("Avatar"));
        assert_eq!(cli.year, Some(2009));
    }

    #[test]
    fn missing_or_blank_title() {
        let cli = Cli::try_parse_from(["langcheck"]).unwrap();
        assert_eq!(cli.title(), None);

        let cli = Cli::try_parse_from(["langcheck", "   "]).unwrap();
        assert_eq!(cli.title(), None);
    }

    #[test]
    fn non_numeric_year_is_rejected() {
        let err = Cli::try_parse_from(["langcheck", "Avatar", "two-thousand"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn usage_lists_examples() {
        let text = usage();
        assert!(text.starts_with("Usage: langcheck"));
        assert!(text.contains("langcheck \"Avatar\" 2009"));
    }
}
