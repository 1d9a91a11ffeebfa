use std::path::PathBuf;
use clap::{Args, ValueEnum};

use crate::feed::DEFAULT_PER_PAGE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Live headlines from thenewsapi.com
    #[value(name = "thenewsapi")]
    TheNewsApi,
    /// A JSON file of previously fetched articles
    File,
}

/// Where articles come from and how they are paged.
#[derive(Debug, Clone, Args)]
pub struct NewsArgs {
    /// Article source
    #[arg(long, value_enum, default_value = "thenewsapi", global = true)]
    pub source: SourceKind,

    /// JSON file to read when using `--source file`
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Articles per feed page
    #[arg(long, default_value_t = DEFAULT_PER_PAGE, global = true)]
    pub per_page: usize,
}
