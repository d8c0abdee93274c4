use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "comments", version, about = "Nested comments API")]
pub struct Cli {
    /// Serve the prebuilt front end for every path the API does not handle
    #[arg(short, long)]
    pub build: bool,

    /// Import comments from the fixture file, then exit
    #[arg(short, long)]
    pub import: bool,

    /// Delete all comments from the database, then exit
    #[arg(short, long)]
    pub delete: bool,
}

impl Cli {
    pub fn runs_maintenance(&self) -> bool {
        self.import || self.delete
    }
}
