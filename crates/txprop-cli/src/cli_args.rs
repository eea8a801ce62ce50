use clap::{ArgAction, Args, Parser, Subcommand};
use txprop_core::InnerCall;

#[derive(Parser)]
#[command(name = "txprop")]
#[command(about = "Transaction propagation sequencer")]
pub struct Cli {
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply database migrations
    Migrate,
    /// Run the outer write (and the inner write it calls)
    Run(RunArgs),
    /// Print stored users
    List(ListArgs),
    /// Delete every stored user
    Reset,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// How the outer write reaches the inner write: routed, direct or joined
    #[arg(long, value_parser = parse_inner_call)]
    pub inner: Option<InnerCall>,
    /// Skip the inner write's division by zero
    #[arg(long)]
    pub no_fault: bool,
    #[arg(long)]
    pub outer_id: Option<i64>,
    #[arg(long)]
    pub outer_name: Option<String>,
    #[arg(long)]
    pub inner_id: Option<i64>,
    #[arg(long)]
    pub inner_name: Option<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub json: bool,
}

fn parse_inner_call(value: &str) -> Result<InnerCall, String> {
    value.parse::<InnerCall>().map_err(|err| err.to_string())
}
