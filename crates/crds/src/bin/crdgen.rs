//! Prints the CRD manifests for this crate as a multi-document YAML stream.
//!
//! Usage: `cargo run -p crds --bin crdgen > config/crd/mtpnc.yaml`

use anyhow::{Context, Result};
use crds::MultitenantPodNetworkConfig;
use kube::CustomResourceExt;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let crd = MultitenantPodNetworkConfig::crd();
    info!("Generating CRD {}", crd.metadata.name.as_deref().unwrap_or("<unnamed>"));

    let yaml = serde_yaml::to_string(&crd).context("Failed to serialize CRD")?;
    println!("---");
    print!("{yaml}");

    Ok(())
}
