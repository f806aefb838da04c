//! Command line parsing and dispatch.

use crate::output::{
    render_cloudflare, render_privacy, render_range_table, render_subnet_info, render_validation,
    AddressRequest, ContractError, Handler, Operation, SubnetInfoRequest,
};
use crate::ranges::{rfc1918, rfc6598, RangeTable};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "subnet-calculator")]
#[command(about = "IPv4/IPv6 subnet calculator with cloud provider accounting.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,
    /// Print the JSON response instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check an address or CIDR network is well formed
    #[command(alias = "v")]
    Validate { address: String },
    /// Check an IPv4 address or network against RFC1918 and RFC6598
    #[command(alias = "p")]
    CheckPrivate { address: String },
    /// Check an address or network against the Cloudflare ranges
    #[command(alias = "c")]
    CheckCloudflare { address: String },
    /// Show addresses, masks and usable hosts of a network
    #[command(alias = "s")]
    SubnetInfo {
        network: String,
        /// Azure, AWS, OCI or Standard (defaults to SUBNET_CALC_DEFAULT_MODE)
        #[arg(long, short)]
        mode: Option<String>,
    },
    /// List the ranges of a lookup table
    #[command(alias = "r")]
    Ranges {
        #[arg(value_enum, default_value_t = TableName::Cloudflare)]
        table: TableName,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TableName {
    Cloudflare,
    Rfc1918,
    Rfc6598,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn command_name(&self) -> &'static str {
        match self.command {
            Commands::Validate { .. } => Operation::Validate.as_str(),
            Commands::CheckPrivate { .. } => Operation::CheckPrivate.as_str(),
            Commands::CheckCloudflare { .. } => Operation::CheckCloudflare.as_str(),
            Commands::SubnetInfo { .. } => Operation::SubnetInfo.as_str(),
            Commands::Ranges { .. } => "ranges",
        }
    }
}

/// Run a parsed command line against `handler` and return the text to print.
///
/// # Arguments
/// * `cli` - The parsed command line
/// * `handler` - Handler holding the Cloudflare table and default mode
///
/// # Returns
/// JSON when `--json` was given, coloured text otherwise.
pub fn run(cli: &CommandLine, handler: &Handler) -> Result<String, ContractError> {
    log::info!("run({:?})", cli.command);

    if cli.json {
        return run_json(&cli.command, handler);
    }

    let text = match &cli.command {
        Commands::Validate { address } => render_validation(&handler.validate(&AddressRequest {
            address: address.clone(),
        })?),
        Commands::CheckPrivate { address } => {
            render_privacy(&handler.check_private(&AddressRequest {
                address: address.clone(),
            })?)
        }
        Commands::CheckCloudflare { address } => {
            render_cloudflare(&handler.check_cloudflare(&AddressRequest {
                address: address.clone(),
            })?)
        }
        Commands::SubnetInfo { network, mode } => {
            render_subnet_info(&handler.subnet_info(&SubnetInfoRequest {
                network: network.clone(),
                mode: mode.clone(),
            })?)
        }
        Commands::Ranges { table } => render_range_table(&select_table(*table, handler).info()),
    };
    Ok(text)
}

fn run_json(command: &Commands, handler: &Handler) -> Result<String, ContractError> {
    let (operation, body) = match command {
        Commands::Validate { address } => {
            (Operation::Validate, serde_json::json!({ "address": address }))
        }
        Commands::CheckPrivate { address } => {
            (Operation::CheckPrivate, serde_json::json!({ "address": address }))
        }
        Commands::CheckCloudflare { address } => {
            (Operation::CheckCloudflare, serde_json::json!({ "address": address }))
        }
        Commands::SubnetInfo { network, mode } => (
            Operation::SubnetInfo,
            serde_json::json!({ "network": network, "mode": mode }),
        ),
        Commands::Ranges { table } => {
            return Ok(serde_json::to_string(&select_table(*table, handler).info())?);
        }
    };
    handler.handle(operation.as_str(), &body.to_string())
}

fn select_table(table: TableName, handler: &Handler) -> &RangeTable {
    match table {
        TableName::Cloudflare => handler.cloudflare_table(),
        TableName::Rfc1918 => rfc1918(),
        TableName::Rfc6598 => rfc6598(),
    }
}
