use crate::demo::{
    run_demo, run_explain_fairness, run_explain_loan, DemoArgs, FairnessArgs, FairnessDocument,
    LoanExplainArgs,
};
use crate::server;
use bias_shield::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "BiasShield",
    about = "Serve and demonstrate BiasShield loan decisions and fairness reporting",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate explanation documents from JSON inputs
    Explain {
        #[command(subcommand)]
        command: ExplainCommand,
    },
    /// Screen a sample applicant and print every generated document
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ExplainCommand {
    /// Screen an application and explain the decision
    Loan(LoanExplainArgs),
    /// Summarize bias findings for a fairness metrics file
    Bias(FairnessArgs),
    /// Propose remediation strategies for a fairness metrics file
    Remediation(FairnessArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Explain { command } => match command {
            ExplainCommand::Loan(args) => run_explain_loan(args),
            ExplainCommand::Bias(args) => run_explain_fairness(args, FairnessDocument::BiasReport),
            ExplainCommand::Remediation(args) => {
                run_explain_fairness(args, FairnessDocument::Remediation)
            }
        },
        Command::Demo(args) => run_demo(args),
    }
}
