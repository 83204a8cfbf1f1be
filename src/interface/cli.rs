//! CLI 인자 파싱 모듈.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "adopilot")]
#[command(about = "Azure DevOps PR diff/comment tools served over stdio")]
pub struct Cli {
    /// Azure DevOps personal access token; omit to sign in interactively
    #[arg(long, env = "ADO_PAT")]
    pub pat: Option<String>,
}
