use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wlroot_crypto::HashAlgorithm;
use wlroot_types::Hash;

#[derive(Parser)]
#[command(
    name = "wlroot",
    about = "wlroot — Merkle roots and inclusion proofs for address whitelists",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Whitelist file (defaults to ./whitelist.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use this entry instead of the file's list (repeatable)
    #[arg(short, long = "entry", global = true)]
    pub entries: Vec<String>,

    /// Override the configured hash algorithm (keccak256 or blake3)
    #[arg(long, global = true)]
    pub hasher: Option<HashAlgorithm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the whitelist's Merkle root
    Root(RootArgs),
    /// Print the inclusion path for one entry
    Proof(ProofArgs),
    /// Check an inclusion path against a root
    Verify(VerifyArgs),
    /// List every entry with its leaf hash
    List(ListArgs),
}

#[derive(Args)]
pub struct RootArgs {}

#[derive(Args)]
pub struct ProofArgs {
    pub entry: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub entry: String,
    #[arg(long)]
    pub root: Hash,
    /// Sibling hashes, leaf side first
    #[arg(long, num_args = 0..)]
    pub path: Vec<Hash>,
}

#[derive(Args)]
pub struct ListArgs {}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verify_parses_root_and_path() {
        let root = Hash::from_bytes([1; 32]);
        let sibling = Hash::from_bytes([2; 32]);
        let (root_arg, sibling_arg, bare_arg) = (root.to_string(), sibling.to_string(), root.to_hex());
        let cli = Cli::try_parse_from([
            "wlroot",
            "verify",
            "0xabc",
            "--root",
            root_arg.as_str(),
            "--path",
            sibling_arg.as_str(),
            bare_arg.as_str(),
        ])
        .unwrap();
        match cli.command {
            Command::Verify(args) => {
                assert_eq!(args.entry, "0xabc");
                assert_eq!(args.root, root);
                assert_eq!(args.path, vec![sibling, root]);
            }
            _ => panic!("expected verify"),
        }
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "wlroot", "root", "-e", "a", "-e", "b", "--hasher", "blake3", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.entries, vec!["a", "b"]);
        assert_eq!(cli.hasher, Some(HashAlgorithm::Blake3));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn bad_root_is_rejected() {
        assert!(Cli::try_parse_from(["wlroot", "verify", "x", "--root", "0x1234"]).is_err());
    }
}
