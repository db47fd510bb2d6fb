//! CLI flags and the derived node configuration (the only configuration
//! surface this node has — no config file, no environment variables).

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "kad-node",
    about = "A Kademlia-style structured overlay node"
)]
pub struct Cli {
    /// This node's own binary identifier.
    #[arg(long, default_value = "0000")]
    pub bid: String,

    /// Number of bits in the key space.
    #[arg(long, default_value_t = 4)]
    pub depth: usize,

    /// Maximum peers per bucket.
    #[arg(long, default_value_t = 1)]
    pub k: usize,

    /// Address to bind the RPC listener on.
    #[arg(long, default_value = "0.0.0.0")]
    pub ip: String,

    /// Port to bind the RPC listener on.
    #[arg(long, default_value = "4242")]
    pub port: String,

    #[arg(long = "bootstrap-bid")]
    pub bootstrap_bid: Option<String>,

    #[arg(long = "bootstrap-ip")]
    pub bootstrap_ip: Option<String>,

    #[arg(long = "bootstrap-port")]
    pub bootstrap_port: Option<String>,
}

/// Fully validated node configuration, derived once from [`Cli`] in `main`.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub self_bid: String,
    pub depth: usize,
    pub k: usize,
    pub ip: String,
    pub port: u16,
    pub bootstrap: Option<(String, String, u16)>,
}

impl NodeConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, String> {
        let port: u16 = cli
            .port
            .parse()
            .map_err(|_| format!("invalid port: {:?}", cli.port))?;

        let bootstrap = match (cli.bootstrap_bid, cli.bootstrap_ip, cli.bootstrap_port) {
            (None, None, None) => None,
            (Some(bid), Some(ip), Some(port_str)) => {
                let bport: u16 = port_str
                    .parse()
                    .map_err(|_| format!("invalid bootstrap port: {port_str:?}"))?;
                Some((bid, ip, bport))
            }
            _ => {
                return Err(
                    "--bootstrap-bid, --bootstrap-ip, and --bootstrap-port must all be given together, or not at all"
                        .to_string(),
                )
            }
        };

        Ok(Self {
            self_bid: cli.bid,
            depth: cli.depth,
            k: cli.k,
            ip: cli.ip,
            port,
            bootstrap,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            bid: "0000".into(),
            depth: 4,
            k: 1,
            ip: "0.0.0.0".into(),
            port: "4242".into(),
            bootstrap_bid: None,
            bootstrap_ip: None,
            bootstrap_port: None,
        }
    }

    #[test]
    fn no_bootstrap_flags_is_valid() {
        let config = NodeConfig::from_cli(base_cli()).unwrap();
        assert!(config.bootstrap.is_none());
    }

    #[test]
    fn partial_bootstrap_flags_is_rejected() {
        let mut cli = base_cli();
        cli.bootstrap_bid = Some("1111".into());
        assert!(NodeConfig::from_cli(cli).is_err());
    }

    #[test]
    fn full_bootstrap_triple_is_valid() {
        let mut cli = base_cli();
        cli.bootstrap_bid = Some("1111".into());
        cli.bootstrap_ip = Some("10.0.0.5".into());
        cli.bootstrap_port = Some("5000".into());
        let config = NodeConfig::from_cli(cli).unwrap();
        assert_eq!(
            config.bootstrap,
            Some(("1111".to_string(), "10.0.0.5".to_string(), 5000))
        );
    }
}
