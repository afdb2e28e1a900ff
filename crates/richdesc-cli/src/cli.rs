// SPDX-License-Identifier: AGPL-3.0-or-later
use clap::{Parser, Subcommand, ValueEnum};
use richdesc_core::TextFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "richdesc")]
#[command(about = "Convert rich description fields between HTML, RTF and plain text")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a file (or stdin) from one format to another
    Convert {
        /// Input file, `-` or absent for stdin
        input: Option<PathBuf>,

        /// Output file (stdout when absent)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Source format, inferred from the input extension when absent
        #[arg(long, value_enum)]
        from: Option<FormatArg>,

        /// Target format, inferred from the output extension when absent
        #[arg(long, value_enum)]
        to: Option<FormatArg>,

        /// TOML file with conversion settings
        #[arg(long, env = "RICHDESC_CONFIG")]
        config: Option<PathBuf>,

        /// Exit with an error instead of writing an error descriptor
        #[arg(long)]
        strict: bool,
    },

    /// Print the stored RTF and plain-text columns for an HTML description as JSON
    Describe {
        /// HTML input file, `-` or absent for stdin
        input: Option<PathBuf>,

        /// TOML file with conversion settings
        #[arg(long, env = "RICHDESC_CONFIG")]
        config: Option<PathBuf>,
    },

    /// List supported conversions
    Formats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    #[value(alias = "htm")]
    Html,
    Rtf,
    #[value(alias = "text")]
    Txt,
}

impl From<FormatArg> for TextFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Html => TextFormat::Html,
            FormatArg::Rtf => TextFormat::Rtf,
            FormatArg::Txt => TextFormat::PlainText,
        }
    }
}
