use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use wlroot_crypto::{verify_path, AnyHasher, HashAlgorithm, HashPrimitive, MerkleProof, MerkleTree};
use wlroot_types::Hash;

use crate::cli::*;
use crate::config::WhitelistConfig;
use crate::entries::{encode_all, encode_entry};

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let format = cli.format;
    let session = Session::resolve(&cli)?;
    match cli.command {
        Command::Root(_) => emit(format, &session.root_report()?),
        Command::Proof(args) => emit(format, &session.proof_report(&args.entry)?),
        Command::Verify(args) => {
            let report = session.verify_report(&args);
            emit(format, &report)?;
            Ok(if report.valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::List(_) => emit(format, &session.list_report()?),
    }
}

/// The hasher and entry list a command runs against.
struct Session {
    hasher: AnyHasher,
    entries: Vec<String>,
}

impl Session {
    fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = WhitelistConfig::discover(cli.config.as_deref())?;
        if let Some(algorithm) = cli.hasher {
            config.hasher = algorithm;
        }
        if !cli.entries.is_empty() {
            config.entries = cli.entries.clone();
        }
        tracing::debug!(
            hasher = %config.hasher,
            entries = config.entries.len(),
            "resolved whitelist"
        );
        Ok(Self {
            hasher: config.build_hasher(),
            entries: config.entries,
        })
    }

    fn tree(&self) -> anyhow::Result<MerkleTree<Hash>> {
        MerkleTree::build(&self.hasher, encode_all(&self.entries))
            .context("building whitelist tree (is the entry list empty?)")
    }

    fn root_report(&self) -> anyhow::Result<RootReport> {
        let tree = self.tree()?;
        Ok(RootReport {
            root: *tree.root_hash(),
            leaves: tree.leaf_count(),
            depth: tree.depth(),
            hasher: self.hasher.algorithm(),
        })
    }

    fn proof_report(&self, entry: &str) -> anyhow::Result<ProofReport> {
        let tree = self.tree()?;
        let proof = tree
            .proof(&self.hasher, &encode_entry(entry))
            .with_context(|| format!("no proof for {entry}"))?;
        Ok(ProofReport {
            entry: entry.to_owned(),
            proof,
        })
    }

    fn verify_report(&self, args: &VerifyArgs) -> VerifyReport {
        let valid = verify_path(&self.hasher, &args.root, &encode_entry(&args.entry), &args.path);
        VerifyReport {
            entry: args.entry.clone(),
            root: args.root,
            valid,
        }
    }

    fn list_report(&self) -> anyhow::Result<Vec<ListItem>> {
        self.entries
            .iter()
            .map(|entry| -> anyhow::Result<ListItem> {
                let leaf = self
                    .hasher
                    .hash_entry(&encode_entry(entry))
                    .with_context(|| format!("hashing {entry}"))?;
                Ok(ListItem {
                    entry: entry.clone(),
                    leaf,
                })
            })
            .collect()
    }
}

/// Text rendering for a command result.
trait Render {
    fn render(&self);
}

fn emit<T: Serialize + Render>(format: OutputFormat, report: &T) -> anyhow::Result<ExitCode> {
    match format {
        OutputFormat::Text => report.render(),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(ExitCode::SUCCESS)
}

#[derive(Debug, Serialize)]
struct RootReport {
    root: Hash,
    leaves: usize,
    depth: usize,
    hasher: HashAlgorithm,
}

impl Render for RootReport {
    fn render(&self) {
        println!("{} {}", "Root:".bold(), self.root.to_string().yellow());
        println!("  Leaves: {}  Depth: {}  Hasher: {}", self.leaves, self.depth, self.hasher.to_string().cyan());
    }
}

#[derive(Debug, Serialize)]
struct ProofReport {
    entry: String,
    #[serde(flatten)]
    proof: MerkleProof<Hash>,
}

impl Render for ProofReport {
    fn render(&self) {
        println!("Proof for {}", self.entry.bold());
        println!("  Leaf: {}", self.proof.leaf.to_string().dimmed());
        for (level, sibling) in self.proof.path.iter().enumerate() {
            println!("  [{level}] {sibling}");
        }
        println!("  Root: {}", self.proof.root.to_string().yellow());
    }
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    entry: String,
    root: Hash,
    valid: bool,
}

impl Render for VerifyReport {
    fn render(&self) {
        if self.valid {
            println!("{} {} is included in {}", "✓".green().bold(), self.entry, self.root.short_hex().yellow());
        } else {
            println!("{} {} is not proven by this path", "✗".red().bold(), self.entry);
        }
    }
}

#[derive(Debug, Serialize)]
struct ListItem {
    entry: String,
    leaf: Hash,
}

impl Render for Vec<ListItem> {
    fn render(&self) {
        for item in self {
            println!("{}  {}", item.leaf.short_hex().dimmed(), item.entry);
        }
        println!("{} entries", self.len().to_string().bold());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITELIST: [&str; 5] = [
        "0xA1A2EE28Ef70A03864824866b6919c8E6B90c3cD",
        "0xDd1c91fB83412966068E502B289b4AF2eF5362Df",
        "0xd1880fB67cDbB27cE14BC4B1A1f718e308be4aDf",
        "0x2C11506fdc4729914272EB3a5CAf41Ac217Ed2bF",
        "0x0737BEf0f49abCf4A62d480A4fFcE1681f90daEE",
    ];

    fn session() -> Session {
        Session {
            hasher: AnyHasher::default(),
            entries: WHITELIST.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn root_report_describes_tree() {
        let report = session().root_report().unwrap();
        assert_eq!(report.leaves, 5);
        assert_eq!(report.depth, 3);
        assert_eq!(report.hasher, HashAlgorithm::Keccak256);
    }

    #[test]
    fn proof_then_verify_succeeds() {
        let s = session();
        let root = s.root_report().unwrap().root;
        let proof = s.proof_report(WHITELIST[4]).unwrap();
        assert_eq!(proof.proof.root, root);

        let args = VerifyArgs {
            entry: WHITELIST[4].to_lowercase(),
            root,
            path: proof.proof.path.clone(),
        };
        assert!(s.verify_report(&args).valid);
    }

    #[test]
    fn verify_rejects_root_hash_as_entry() {
        let s = session();
        let root = s.root_report().unwrap().root;
        let path = s.proof_report(WHITELIST[4]).unwrap().proof.path;
        let args = VerifyArgs {
            entry: root.to_string(),
            root,
            path,
        };
        assert!(!s.verify_report(&args).valid);
    }

    #[test]
    fn proof_for_unknown_entry_fails() {
        let err = session()
            .proof_report("0x0000000000000000000000000000000000000000")
            .unwrap_err();
        assert!(err.to_string().starts_with("no proof for"));
    }

    #[test]
    fn empty_whitelist_fails() {
        let s = Session {
            hasher: AnyHasher::default(),
            entries: vec![],
        };
        assert!(s.root_report().is_err());
        assert!(s.list_report().unwrap().is_empty());
    }

    #[test]
    fn list_keeps_input_order() {
        let items = session().list_report().unwrap();
        let entries: Vec<&str> = items.iter().map(|i| i.entry.as_str()).collect();
        assert_eq!(entries, WHITELIST);
    }

    #[test]
    fn proof_json_is_flat() {
        let proof = session().proof_report(WHITELIST[0]).unwrap();
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["entry"], WHITELIST[0]);
        assert_eq!(json["path"].as_array().unwrap().len(), 3);
        assert!(json["root"].as_str().unwrap().starts_with("0x"));
    }
}
