//! Command definitions.

use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Reset both counters to zero
    Init {
        /// Record this identity as the privileged owner
        #[arg(long)]
        owner: Option<String>,
    },

    /// Mint the next cave, plus a key when its id is even
    Mint {
        /// Identity of the caller
        #[arg(long)]
        caller: String,

        /// Amount attached to the call
        #[arg(long, default_value_t = 0)]
        payment: u64,
    },

    /// Fee-exempt mint for the privileged owner
    MintPrivileged {
        /// Identity of the caller
        #[arg(long)]
        caller: String,
    },

    /// Burn the newest key to unlock a cave
    Unlock {
        /// Identity of the caller
        #[arg(long)]
        caller: String,

        /// Cave number
        #[arg(long)]
        cave: u64,

        /// Amount attached to the call
        #[arg(long, default_value_t = 0)]
        payment: u64,
    },

    /// Inspect registry state
    #[command(subcommand)]
    Show(ShowCommand),
}

/// Read-only queries.
#[derive(Debug, Clone, Subcommand)]
pub enum ShowCommand {
    /// Print one cave record
    Cave {
        /// Cave number
        number: u64,

        /// Minter, needed under the owner-scoped identity scheme
        #[arg(long, default_value = "")]
        owner: String,
    },

    /// Print one live key record
    Key {
        /// Key number
        number: u64,

        /// Minter, needed under the owner-scoped identity scheme
        #[arg(long, default_value = "")]
        owner: String,
    },

    /// Print the cave and key counters
    Counters,
}
